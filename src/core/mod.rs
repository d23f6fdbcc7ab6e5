pub mod files;
pub mod folders;
pub mod items;
pub mod odata;
pub mod queryable;
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::http::{HttpMethod, HttpRequest, HttpResponse};
pub use crate::domain::model::{FileData, FolderData, ListItemData};
pub use crate::domain::ports::{ConnectionProvider, HttpTransport};
pub use crate::utils::error::Result;
