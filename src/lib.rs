pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use adapters::http::ReqwestTransport;
pub use config::{toml_config::TomlConfig, ConnectionSettings};
pub use crate::core::files::{File, FileAddResult, Files};
pub use crate::core::folders::{Folder, FolderAddResult, Folders};
pub use crate::core::items::{Item, Items};
pub use crate::core::queryable::{
    CollectionQuery, PostOptions, Projection, Queryable, QueryableCollection, QueryableInstance,
    Resource, Tagged,
};
pub use crate::core::web::{List, Lists, SpRest, Web};
pub use utils::error::{Result, SpError};
