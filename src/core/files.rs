use crate::core::items::Item;
use crate::core::queryable::{
    delete_resource, path_literal, recycle_resource, resource, CollectionQuery, PostOptions,
    Projection, Queryable, Resource,
};
use crate::domain::model::FileData;
use crate::utils::error::{Result, SpError};

resource!(
    /// The `files` collection of a folder.
    Files => Vec<FileData>
);
impl Projection for Files {}
impl CollectionQuery for Files {}

resource!(File => FileData);
impl Projection for File {}

#[derive(Debug, Clone)]
pub struct FileAddResult {
    pub data: FileData,
    pub file: File,
}

impl Files {
    pub fn new(parent: &Queryable) -> Self {
        Self::from_queryable(parent.child("files"))
    }

    pub fn get_by_name(&self, name: &str) -> File {
        File::from_queryable(self.q.concat_child(&format!("({})", path_literal(name))))
    }

    /// Uploads `content` as `url` in this folder.
    pub async fn add(&self, url: &str, content: Vec<u8>, overwrite: bool) -> Result<FileAddResult> {
        let target = self.q.child(&format!(
            "add(overwrite={},url={})",
            overwrite,
            path_literal(url)
        ));
        tracing::debug!("Uploading {} bytes to {}", content.len(), target.url());
        let data: FileData = Files::from_queryable(target)
            .post_as(PostOptions::new().with_bytes(content))
            .await?;

        let server_relative_url =
            data.server_relative_url
                .as_deref()
                .ok_or_else(|| SpError::UnexpectedResponse {
                    message: "file add returned no ServerRelativeUrl".to_string(),
                })?;

        let file = File::from_queryable(self.q.at_web(&format!(
            "getFileByServerRelativeUrl({})",
            path_literal(server_relative_url)
        )));
        Ok(FileAddResult { data, file })
    }
}

impl File {
    /// Raw file contents.
    pub async fn get_bytes(&self) -> Result<Vec<u8>> {
        self.q.child("$value").get_raw().await
    }

    pub async fn get_text(&self) -> Result<String> {
        let bytes = self.get_bytes().await?;
        String::from_utf8(bytes).map_err(|e| SpError::UnexpectedResponse {
            message: format!("file content is not UTF-8: {}", e),
        })
    }

    pub fn list_item_all_fields(&self) -> Item {
        Item::from_queryable(self.q.child("ListItemAllFields"))
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
