//! URL chaining and HTTP verbs shared by every resource.
//!
//! A `Queryable` is just a URL under construction plus its query string and a
//! handle to the transport. Resource types (`Folders`, `Folder`, `Files`, ...)
//! wrap one and pick which child segments they expose. Building a resource
//! never performs I/O; only `get*`/`post*` do.

use crate::core::odata::{check_status, parse_response, single_value};
use crate::domain::http::{HttpMethod, HttpRequest};
use crate::domain::ports::HttpTransport;
use crate::utils::error::{Result, SpError};
use crate::utils::validation::odata_literal;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub const ACCEPT_VERBOSE: &str = "application/json;odata=verbose";
pub const CONTENT_TYPE_VERBOSE: &str = "application/json;odata=verbose;charset=utf-8";

/// Characters that would split, end or garble a query value.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters that would end a path early or be read as an escape.
const PATH_LITERAL: &AsciiSet = &CONTROLS.add(b'#').add(b'%').add(b'?');

/// An OData string literal ready to sit inside a path segment.
pub fn path_literal(value: &str) -> String {
    utf8_percent_encode(&odata_literal(value), PATH_LITERAL).to_string()
}

/// Query parameter carried from parent to child for cross-site calls.
const TARGET_PARAM: &str = "@target";

/// Joins url segments with single slashes, skipping empty ones.
pub fn combine_paths(parts: &[&str]) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        let trimmed = if i == 0 {
            part.trim_end_matches('/')
        } else {
            part.trim_matches('/')
        };
        if trimmed.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(trimmed);
    }
    out
}

#[derive(Clone)]
pub struct Queryable {
    transport: Arc<dyn HttpTransport>,
    web_url: Arc<str>,
    parent_url: String,
    url: String,
    query: Vec<(String, String)>,
}

impl fmt::Debug for Queryable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queryable")
            .field("url", &self.url)
            .field("parent_url", &self.parent_url)
            .field("query", &self.query)
            .finish()
    }
}

impl Queryable {
    /// Starts a chain at `base_url/path`. The result also becomes the web root
    /// used by `at_web`.
    pub fn root(transport: Arc<dyn HttpTransport>, base_url: &str, path: &str) -> Self {
        let url = combine_paths(&[base_url, path]);
        Self {
            transport,
            web_url: Arc::from(url.as_str()),
            parent_url: base_url.trim_end_matches('/').to_string(),
            url,
            query: Vec::new(),
        }
    }

    fn derive(&self, parent_url: String, url: String) -> Self {
        let query = self
            .query
            .iter()
            .filter(|(k, _)| k == TARGET_PARAM)
            .cloned()
            .collect();
        Self {
            transport: Arc::clone(&self.transport),
            web_url: Arc::clone(&self.web_url),
            parent_url,
            url,
            query,
        }
    }

    /// `url/path`, with this url as the parent.
    pub fn child(&self, path: &str) -> Self {
        self.derive(self.url.clone(), combine_paths(&[&self.url, path]))
    }

    /// `url` + `suffix` with no separator, for addressing segments like `('name')` or `(3)`.
    pub fn concat_child(&self, suffix: &str) -> Self {
        self.derive(self.url.clone(), format!("{}{}", self.url, suffix))
    }

    /// A resource addressed from the web root rather than from this url.
    pub fn at_web(&self, path: &str) -> Self {
        self.derive(self.web_url.to_string(), combine_paths(&[&self.web_url, path]))
    }

    pub fn append(&mut self, path: &str) {
        self.url = combine_paths(&[&self.url, path]);
    }

    pub fn concat(&mut self, suffix: &str) {
        self.url.push_str(suffix);
    }

    /// Sets a query parameter; an existing key keeps its position.
    pub fn set_query(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.query.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.query.push((key.to_string(), value)),
        }
    }

    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_query(key, value);
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn parent_url(&self) -> &str {
        &self.parent_url
    }

    pub fn web_url(&self) -> &str {
        &self.web_url
    }

    pub fn to_url_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, utf8_percent_encode(v, QUERY_VALUE)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.url, query)
    }

    pub async fn get_value(&self) -> Result<Value> {
        let (value, _) = self.get_tagged().await?;
        Ok(value)
    }

    /// GET plus the `ETag` response header, for a later `delete_if_match` or `update`.
    pub async fn get_tagged(&self) -> Result<(Value, Option<String>)> {
        let url = self.to_url_and_query();
        let request = HttpRequest::new(HttpMethod::Get, &url).with_header("Accept", ACCEPT_VERBOSE);
        let response = self.transport.execute(request).await?;
        let value = parse_response(&url, &response)?;
        Ok((value, response.header("ETag").map(str::to_string)))
    }

    /// GET without envelope parsing, e.g. file contents.
    pub async fn get_raw(&self) -> Result<Vec<u8>> {
        let url = self.to_url_and_query();
        let response = self
            .transport
            .execute(HttpRequest::new(HttpMethod::Get, &url))
            .await?;
        check_status(&url, &response)?;
        Ok(response.body)
    }

    /// GET a single property such as `ItemCount` and return its bare value.
    pub async fn get_property(&self) -> Result<Value> {
        let payload = self.get_value().await?;
        single_value(payload).ok_or_else(|| SpError::UnexpectedResponse {
            message: format!("{} did not return a single value", self.url),
        })
    }

    pub async fn post_value(&self, options: PostOptions) -> Result<Value> {
        let url = self.to_url_and_query();
        let mut request =
            HttpRequest::new(HttpMethod::Post, &url).with_header("Accept", ACCEPT_VERBOSE);

        match options.body {
            Some(RequestBody::Json(json)) => {
                request = request
                    .with_header("Content-Type", CONTENT_TYPE_VERBOSE)
                    .with_body(serde_json::to_vec(&json)?);
            }
            Some(RequestBody::Bytes(bytes)) => request = request.with_body(bytes),
            None => {}
        }
        for (name, value) in options.headers {
            request = request.with_header(name, value);
        }

        let response = self.transport.execute(request).await?;
        parse_response(&url, &response)
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, Default)]
pub struct PostOptions {
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl PostOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_json(mut self, json: Value) -> Self {
        self.body = Some(RequestBody::Json(json));
        self
    }

    pub fn with_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.body = Some(RequestBody::Bytes(bytes));
        self
    }

    /// `IF-Match` plus the `X-HTTP-Method` tunnelled through POST.
    pub fn tunnelled(method: &str, etag: &str) -> Self {
        Self::new()
            .with_header("IF-Match", etag)
            .with_header("X-HTTP-Method", method)
    }
}

/// Response data together with the entity version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T> {
    pub data: T,
    pub etag: Option<String>,
}

/// Common surface of every resource wrapper.
#[async_trait]
pub trait Resource: Send + Sync {
    /// What `get` deserializes the response into.
    type Data: DeserializeOwned + Send;

    fn queryable(&self) -> &Queryable;
    fn queryable_mut(&mut self) -> &mut Queryable;

    fn to_url(&self) -> &str {
        self.queryable().url()
    }

    fn to_url_and_query(&self) -> String {
        self.queryable().to_url_and_query()
    }

    fn parent_url(&self) -> &str {
        self.queryable().parent_url()
    }

    async fn get(&self) -> Result<Self::Data> {
        self.get_as::<Self::Data>().await
    }

    async fn get_as<T: DeserializeOwned + Send>(&self) -> Result<T> {
        let payload = self.queryable().get_value().await?;
        Ok(serde_json::from_value(payload)?)
    }

    async fn get_with_etag(&self) -> Result<Tagged<Self::Data>> {
        let (payload, etag) = self.queryable().get_tagged().await?;
        Ok(Tagged {
            data: serde_json::from_value(payload)?,
            etag,
        })
    }

    async fn get_raw(&self) -> Result<Vec<u8>> {
        self.queryable().get_raw().await
    }

    async fn post(&self, options: PostOptions) -> Result<Value> {
        self.queryable().post_value(options).await
    }

    async fn post_as<T: DeserializeOwned + Send>(&self, options: PostOptions) -> Result<T> {
        let payload = self.queryable().post_value(options).await?;
        Ok(serde_json::from_value(payload)?)
    }
}

/// `$select` / `$expand` for any resource.
pub trait Projection: Resource + Sized {
    fn select(mut self, fields: &[&str]) -> Self {
        self.queryable_mut().set_query("$select", fields.join(","));
        self
    }

    fn expand(mut self, fields: &[&str]) -> Self {
        self.queryable_mut().set_query("$expand", fields.join(","));
        self
    }
}

/// Paging, filtering and ordering on collections.
pub trait CollectionQuery: Projection {
    fn filter(mut self, filter: &str) -> Self {
        self.queryable_mut().set_query("$filter", filter);
        self
    }

    /// Repeated calls add further sort keys.
    fn order_by(mut self, field: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        let clause = format!("{} {}", field, direction);
        let value = match self.queryable().query_param("$orderby") {
            Some(existing) => format!("{},{}", existing, clause),
            None => clause,
        };
        self.queryable_mut().set_query("$orderby", value);
        self
    }

    fn top(mut self, count: u32) -> Self {
        self.queryable_mut().set_query("$top", count.to_string());
        self
    }

    fn skip(mut self, count: u32) -> Self {
        self.queryable_mut().set_query("$skip", count.to_string());
        self
    }
}

/// Declares a resource wrapper around a `Queryable`.
macro_rules! resource {
    ($(#[$meta:meta])* $name:ident => $data:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            q: $crate::core::queryable::Queryable,
        }

        impl $name {
            pub fn from_queryable(q: $crate::core::queryable::Queryable) -> Self {
                Self { q }
            }
        }

        impl $crate::core::queryable::Resource for $name {
            type Data = $data;

            fn queryable(&self) -> &$crate::core::queryable::Queryable {
                &self.q
            }

            fn queryable_mut(&mut self) -> &mut $crate::core::queryable::Queryable {
                &mut self.q
            }
        }
    };
}

pub(crate) use resource;

impl Resource for Queryable {
    type Data = Value;

    fn queryable(&self) -> &Queryable {
        self
    }

    fn queryable_mut(&mut self) -> &mut Queryable {
        self
    }
}

resource!(
    /// A collection without a dedicated wrapper, e.g. `ContentTypeOrder`.
    QueryableCollection => Vec<Value>
);
impl Projection for QueryableCollection {}
impl CollectionQuery for QueryableCollection {}

resource!(
    /// A single entity without a dedicated wrapper, e.g. `Properties`.
    QueryableInstance => Value
);
impl Projection for QueryableInstance {}

/// POST with `X-HTTP-Method: DELETE`.
pub(crate) async fn delete_resource(q: &Queryable, etag: &str) -> Result<()> {
    tracing::debug!("Deleting {}", q.url());
    q.post_value(PostOptions::tunnelled("DELETE", etag)).await?;
    Ok(())
}

/// POST to `recycle`; the answer is the recycle bin item id.
pub(crate) async fn recycle_resource(q: &Queryable) -> Result<String> {
    let target = q.child("recycle");
    let payload = target.post_value(PostOptions::new()).await?;
    match single_value(payload) {
        Some(Value::String(id)) => {
            tracing::debug!("Recycled {} as {}", q.url(), id);
            Ok(id)
        }
        other => Err(SpError::UnexpectedResponse {
            message: format!("recycle returned no item id: {:?}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::RecordingTransport;
    use serde_json::json;

    fn web(transport: &Arc<RecordingTransport>) -> Queryable {
        Queryable::root(transport.clone(), "https://contoso.sharepoint.com/sites/dev/", "_api/web")
    }

    #[test]
    fn test_combine_paths() {
        assert_eq!(combine_paths(&["https://x/", "/a/", "b"]), "https://x/a/b");
        assert_eq!(combine_paths(&["https://x", "", "b"]), "https://x/b");
        assert_eq!(combine_paths(&["/sites/dev/", "lists"]), "/sites/dev/lists");
    }

    #[test]
    fn test_root_child_and_concat() {
        let transport = RecordingTransport::new();
        let web = web(&transport);
        assert_eq!(web.url(), "https://contoso.sharepoint.com/sites/dev/_api/web");
        assert_eq!(web.parent_url(), "https://contoso.sharepoint.com/sites/dev");

        let folders = web.child("folders");
        assert_eq!(folders.parent_url(), web.url());
        let folder = folders.concat_child("('Shared')");
        assert_eq!(
            folder.url(),
            "https://contoso.sharepoint.com/sites/dev/_api/web/folders('Shared')"
        );
        assert_eq!(folder.parent_url(), folders.url());

        let mut q = web.clone();
        q.append("lists");
        q.concat("(3)");
        assert_eq!(q.url(), "https://contoso.sharepoint.com/sites/dev/_api/web/lists(3)");
    }

    #[test]
    fn test_query_string_order_and_replace() {
        let transport = RecordingTransport::new();
        let q = web(&transport)
            .child("folders")
            .with_query("$select", "Name")
            .with_query("$top", "5")
            .with_query("$select", "Name,ItemCount");
        assert_eq!(
            q.to_url_and_query(),
            "https://contoso.sharepoint.com/sites/dev/_api/web/folders?$select=Name,ItemCount&$top=5"
        );
    }

    #[test]
    fn test_child_inherits_only_target() {
        let transport = RecordingTransport::new();
        let q = web(&transport)
            .with_query("@target", "'https://other'")
            .with_query("$select", "Title");
        let child = q.child("folders");
        assert_eq!(child.query_param("@target"), Some("'https://other'"));
        assert_eq!(child.query_param("$select"), None);

        let from_root = child.at_web("getFolderByServerRelativeUrl('/a')");
        assert_eq!(
            from_root.url(),
            "https://contoso.sharepoint.com/sites/dev/_api/web/getFolderByServerRelativeUrl('/a')"
        );
        assert_eq!(from_root.query_param("@target"), Some("'https://other'"));
    }

    #[test]
    fn test_collection_query_options() {
        let transport = RecordingTransport::new();
        let collection = QueryableCollection::from_queryable(web(&transport).child("items"))
            .select(&["Id", "Title"])
            .filter("Id gt 3")
            .order_by("Modified", false)
            .order_by("Title", true)
            .top(10)
            .skip(20);
        assert_eq!(
            collection.to_url_and_query(),
            "https://contoso.sharepoint.com/sites/dev/_api/web/items?$select=Id,Title&$filter=Id%20gt%203&$orderby=Modified%20desc,Title%20asc&$top=10&$skip=20"
        );
    }

    #[test]
    fn test_query_values_are_escaped() {
        let transport = RecordingTransport::new();
        let collection = QueryableCollection::from_queryable(web(&transport).child("items"))
            .filter("Title eq 'Q&A' or Title eq 'C#' or Title eq '100%+'");
        assert_eq!(
            collection.to_url_and_query(),
            "https://contoso.sharepoint.com/sites/dev/_api/web/items?$filter=Title%20eq%20'Q%26A'%20or%20Title%20eq%20'C%23'%20or%20Title%20eq%20'100%25%2B'"
        );
        // stored unescaped so order_by and friends can extend it
        assert_eq!(
            collection.queryable().query_param("$filter"),
            Some("Title eq 'Q&A' or Title eq 'C#' or Title eq '100%+'")
        );
    }

    #[test]
    fn test_path_literal() {
        assert_eq!(path_literal("/Docs/Reports"), "'/Docs/Reports'");
        assert_eq!(path_literal("/Docs/Release #2"), "'/Docs/Release %232'");
        assert_eq!(path_literal("50% off?"), "'50%25 off%3F'");
        assert_eq!(path_literal("Bob's"), "'Bob''s'");
    }

    #[test]
    fn test_expand_and_select_on_instance() {
        let transport = RecordingTransport::new();
        let instance = QueryableInstance::from_queryable(web(&transport).child("RootFolder"))
            .select(&["Name", "Files/Name"])
            .expand(&["Files", "Folders"]);
        assert_eq!(
            instance.to_url_and_query(),
            "https://contoso.sharepoint.com/sites/dev/_api/web/RootFolder?$select=Name,Files/Name&$expand=Files,Folders"
        );
    }

    #[tokio::test]
    async fn test_get_with_etag_reads_response_header() {
        let transport = RecordingTransport::new();
        transport
            .push_with_headers(
                200,
                vec![("etag".to_string(), "\"4\"".to_string())],
                json!({"d": {"Title": "Dev"}}),
            )
            .await;

        let tagged = web(&transport).get_with_etag().await.unwrap();
        assert_eq!(tagged.data, json!({"Title": "Dev"}));
        assert_eq!(tagged.etag.as_deref(), Some("\"4\""));
    }

    #[tokio::test]
    async fn test_get_sends_accept_header() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({"d": {"Title": "Dev"}})).await;

        let value = web(&transport).get().await.unwrap();
        assert_eq!(value, json!({"Title": "Dev"}));

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.header("Accept"), Some(ACCEPT_VERBOSE));
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_post_json_sets_content_type() {
        let transport = RecordingTransport::new();
        transport.push_status(204).await;

        let options = PostOptions::new()
            .with_json(json!({"Title": "x"}))
            .with_header("X-HTTP-Method", "MERGE");
        let value = web(&transport).post(options).await.unwrap();
        assert_eq!(value, Value::Null);

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.header("Content-Type"), Some(CONTENT_TYPE_VERBOSE));
        assert_eq!(request.header("X-HTTP-Method"), Some("MERGE"));
        assert_eq!(request.body.as_deref(), Some(br#"{"Title":"x"}"#.as_slice()));
    }

    #[tokio::test]
    async fn test_get_property_returns_bare_value() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({"d": {"ItemCount": 12}})).await;

        let count = web(&transport).child("ItemCount").get_property().await.unwrap();
        assert_eq!(count, json!(12));
    }

    #[tokio::test]
    async fn test_get_raw_keeps_body() {
        let transport = RecordingTransport::new();
        transport.push_raw(200, b"plain text").await;

        let body = web(&transport).child("$value").get_raw().await.unwrap();
        assert_eq!(body, b"plain text");
        let request = transport.last_request().await.unwrap();
        assert!(request.header("Accept").is_none());
    }
}
