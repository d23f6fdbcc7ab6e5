use crate::core::files::File;
use crate::core::folders::{Folder, Folders};
use crate::core::items::Items;
use crate::core::queryable::{path_literal, resource, CollectionQuery, Projection, Queryable};
use crate::domain::ports::HttpTransport;
use serde_json::Value;
use std::sync::Arc;

/// Entry point: a site url plus the transport every request goes through.
#[derive(Debug, Clone)]
pub struct SpRest {
    web: Web,
}

impl SpRest {
    pub fn new(site_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        let q = Queryable::root(transport, site_url, "_api/web");
        tracing::debug!("Web endpoint: {}", q.url());
        Self {
            web: Web::from_queryable(q),
        }
    }

    pub fn web(&self) -> Web {
        self.web.clone()
    }
}

resource!(Web => Value);
impl Projection for Web {}

impl Web {
    pub fn folders(&self) -> Folders {
        Folders::new(&self.q)
    }

    pub fn root_folder(&self) -> Folder {
        Folder::from_queryable(self.q.child("RootFolder"))
    }

    pub fn lists(&self) -> Lists {
        Lists::from_queryable(self.q.child("lists"))
    }

    pub fn get_folder_by_server_relative_url(&self, url: &str) -> Folder {
        Folder::from_queryable(self.q.child(&format!(
            "getFolderByServerRelativeUrl({})",
            path_literal(url)
        )))
    }

    pub fn get_file_by_server_relative_url(&self, url: &str) -> File {
        File::from_queryable(self.q.child(&format!(
            "getFileByServerRelativeUrl({})",
            path_literal(url)
        )))
    }
}

resource!(Lists => Vec<Value>);
impl Projection for Lists {}
impl CollectionQuery for Lists {}

resource!(List => Value);
impl Projection for List {}

impl Lists {
    pub fn get_by_title(&self, title: &str) -> List {
        List::from_queryable(self.q.child(&format!("getByTitle({})", path_literal(title))))
    }

    pub fn get_by_id(&self, id: &str) -> List {
        List::from_queryable(self.q.concat_child(&format!("({})", path_literal(id))))
    }
}

impl List {
    pub fn root_folder(&self) -> Folder {
        Folder::from_queryable(self.q.child("RootFolder"))
    }

    pub fn items(&self) -> Items {
        Items::new(&self.q)
    }
}
