use crate::core::queryable::{
    delete_resource, recycle_resource, resource, CollectionQuery, PostOptions, Projection,
    Queryable, Resource,
};
use crate::domain::model::ListItemData;
use crate::utils::error::Result;
use serde_json::Value;

resource!(
    /// The `items` collection of a list.
    Items => Vec<ListItemData>
);
impl Projection for Items {}
impl CollectionQuery for Items {}

resource!(Item => ListItemData);
impl Projection for Item {}

impl Items {
    pub fn new(parent: &Queryable) -> Self {
        Self::from_queryable(parent.child("items"))
    }

    pub fn get_by_id(&self, id: u32) -> Item {
        Item::from_queryable(self.q.concat_child(&format!("({})", id)))
    }
}

impl Item {
    /// Merges `properties` into the item. Verbose endpoints expect a
    /// `__metadata.type` entry naming the list's item entity type.
    pub async fn update(&self, properties: Value, etag: &str) -> Result<()> {
        let options = PostOptions::tunnelled("MERGE", etag).with_json(properties);
        self.post(options).await?;
        Ok(())
    }

    pub async fn delete(&self) -> Result<()> {
        self.delete_if_match("*").await
    }

    pub async fn delete_if_match(&self, etag: &str) -> Result<()> {
        delete_resource(&self.q, etag).await
    }

    pub async fn recycle(&self) -> Result<String> {
        recycle_resource(&self.q).await
    }
}
