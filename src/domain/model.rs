use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 欄位皆為 Option，$select 投影時伺服器只回傳部分欄位

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct FolderData {
    pub name: Option<String>,
    pub server_relative_url: Option<String>,
    pub item_count: Option<i64>,
    pub unique_id: Option<String>,
    pub exists: Option<bool>,
    pub welcome_page: Option<String>,
    pub time_created: Option<DateTime<Utc>>,
    pub time_last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct FileData {
    pub name: Option<String>,
    pub server_relative_url: Option<String>,
    /// Sent as a string by the server.
    pub length: Option<String>,
    pub unique_id: Option<String>,
    pub exists: Option<bool>,
    pub title: Option<String>,
    #[serde(rename = "ETag")]
    pub etag: Option<String>,
    pub time_created: Option<DateTime<Utc>>,
    pub time_last_modified: Option<DateTime<Utc>>,
}

/// List item fields vary per list, so they stay untyped.
pub type ListItemData = serde_json::Map<String, serde_json::Value>;
