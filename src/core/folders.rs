use crate::core::files::Files;
use crate::core::items::Item;
use crate::core::queryable::{
    delete_resource, path_literal, recycle_resource, resource, CollectionQuery, PostOptions,
    Projection, Queryable, QueryableCollection, QueryableInstance, Resource,
};
use crate::domain::model::FolderData;
use crate::utils::error::{Result, SpError};

resource!(
    /// The `folders` collection of a web or folder.
    Folders => Vec<FolderData>
);
impl Projection for Folders {}
impl CollectionQuery for Folders {}

resource!(
    /// A single folder.
    Folder => FolderData
);
impl Projection for Folder {}

#[derive(Debug, Clone)]
pub struct FolderAddResult {
    pub data: FolderData,
    pub folder: Folder,
}

impl Folders {
    pub fn new(parent: &Queryable) -> Self {
        Self::from_queryable(parent.child("folders"))
    }

    pub fn get_by_name(&self, name: &str) -> Folder {
        Folder::from_queryable(self.q.concat_child(&format!("({})", path_literal(name))))
    }

    /// Urls starting with `/` are absolute, anything else is relative to this collection.
    pub fn get_by_url(&self, url: &str) -> Folder {
        Folder::from_queryable(self.q.child(&format!("getByUrl({})", path_literal(url))))
    }

    /// Creates a folder. Urls starting with `/` are absolute.
    pub async fn add(&self, url: &str) -> Result<FolderAddResult> {
        let target = self.q.child(&format!("add({})", path_literal(url)));
        let data: FolderData = Folders::from_queryable(target)
            .post_as(PostOptions::new())
            .await?;

        let server_relative_url =
            data.server_relative_url
                .as_deref()
                .ok_or_else(|| SpError::UnexpectedResponse {
                    message: "folder add returned no ServerRelativeUrl".to_string(),
                })?;
        tracing::info!("Created folder {}", server_relative_url);

        let folder = Folder::from_queryable(self.q.at_web(&format!(
            "getFolderByServerRelativeUrl({})",
            path_literal(server_relative_url)
        )));
        Ok(FolderAddResult { data, folder })
    }
}

impl Folder {
    pub fn content_type_order(&self) -> QueryableCollection {
        QueryableCollection::from_queryable(self.q.child("ContentTypeOrder"))
    }

    pub fn files(&self) -> Files {
        Files::new(&self.q)
    }

    pub fn folders(&self) -> Folders {
        Folders::new(&self.q)
    }

    pub fn item_count(&self) -> Queryable {
        self.q.child("ItemCount")
    }

    pub fn list_item_all_fields(&self) -> Item {
        Item::from_queryable(self.q.child("ListItemAllFields"))
    }

    pub fn name(&self) -> Queryable {
        self.q.child("Name")
    }

    pub fn parent_folder(&self) -> Folder {
        Folder::from_queryable(self.q.child("ParentFolder"))
    }

    pub fn properties(&self) -> QueryableInstance {
        QueryableInstance::from_queryable(self.q.child("Properties"))
    }

    pub fn server_relative_url(&self) -> Queryable {
        self.q.child("ServerRelativeUrl")
    }

    pub fn unique_content_type_order(&self) -> QueryableCollection {
        QueryableCollection::from_queryable(self.q.child("UniqueContentTypeOrder"))
    }

    pub fn welcome_page(&self) -> Queryable {
        self.q.child("WelcomePage")
    }

    /// Deletes the folder regardless of its version.
    pub async fn delete(&self) -> Result<()> {
        self.delete_if_match("*").await
    }

    pub async fn delete_if_match(&self, etag: &str) -> Result<()> {
        delete_resource(&self.q, etag).await
    }

    /// Moves the folder to the recycle bin and returns the new recycle bin item id.
    pub async fn recycle(&self) -> Result<String> {
        recycle_resource(&self.q).await
    }
}
