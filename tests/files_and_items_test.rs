use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use sp_rest::{CollectionQuery, ReqwestTransport, Resource, SpRest};
use std::sync::Arc;

fn client(server: &MockServer) -> SpRest {
    SpRest::new(&server.base_url(), Arc::new(ReqwestTransport::new()))
}

#[tokio::test]
async fn test_upload_and_download_file() -> Result<()> {
    let server = MockServer::start();
    let upload = server.mock(|when, then| {
        when.method(POST)
            .path("/_api/web/getFolderByServerRelativeUrl('/Docs')/files/add(overwrite=true,url='notes.txt')")
            .body("hello world");
        then.status(200).json_body(json!({"d": {
            "Name": "notes.txt",
            "ServerRelativeUrl": "/Docs/notes.txt",
            "Length": "11"
        }}));
    });
    let download = server.mock(|when, then| {
        when.method(GET)
            .path("/_api/web/getFileByServerRelativeUrl('/Docs/notes.txt')/$value");
        then.status(200).body("hello world");
    });

    let web = client(&server).web();
    let result = web
        .get_folder_by_server_relative_url("/Docs")
        .files()
        .add("notes.txt", b"hello world".to_vec(), true)
        .await?;
    upload.assert();
    assert_eq!(result.data.length.as_deref(), Some("11"));

    let text = result.file.get_text().await?;
    download.assert();
    assert_eq!(text, "hello world");
    Ok(())
}

#[tokio::test]
async fn test_list_files_in_folder() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/_api/web/getFolderByServerRelativeUrl('/Docs')/files")
            .query_param("$orderby", "Name asc");
        then.status(200).json_body(json!({"d": {"results": [
            {"Name": "a.txt", "Length": "1"},
            {"Name": "b.txt", "Length": "2"}
        ]}}));
    });

    let files = client(&server)
        .web()
        .get_folder_by_server_relative_url("/Docs")
        .files()
        .order_by("Name", true)
        .get()
        .await?;

    assert_eq!(files.len(), 2);
    assert_eq!(files[1].name.as_deref(), Some("b.txt"));
    Ok(())
}

#[tokio::test]
async fn test_update_and_delete_list_item() -> Result<()> {
    let server = MockServer::start();
    let mut update = server.mock(|when, then| {
        when.method(POST)
            .path("/_api/web/lists/getByTitle('Tasks')/items(3)")
            .header("x-http-method", "MERGE")
            .header("if-match", "*")
            .json_body(json!({"__metadata": {"type": "SP.Data.TasksListItem"}, "Title": "Done"}));
        then.status(204);
    });

    let item = client(&server)
        .web()
        .lists()
        .get_by_title("Tasks")
        .items()
        .get_by_id(3);
    item.update(
        json!({"__metadata": {"type": "SP.Data.TasksListItem"}, "Title": "Done"}),
        "*",
    )
    .await?;
    update.assert();

    update.delete();
    let delete = server.mock(|when, then| {
        when.method(POST)
            .path("/_api/web/lists/getByTitle('Tasks')/items(3)")
            .header("x-http-method", "DELETE");
        then.status(200);
    });
    item.delete().await?;
    delete.assert();
    Ok(())
}

#[tokio::test]
async fn test_filter_with_reserved_characters() -> Result<()> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/_api/web/lists/getByTitle('FAQ')/items")
            .query_param("$filter", "Title eq 'Q&A' or Title eq 'C#'")
            .query_param("$top", "1");
        then.status(200)
            .json_body(json!({"d": {"results": [{"Id": 1, "Title": "Q&A"}]}}));
    });

    let items = client(&server)
        .web()
        .lists()
        .get_by_title("FAQ")
        .items()
        .filter("Title eq 'Q&A' or Title eq 'C#'")
        .top(1)
        .get()
        .await?;

    mock.assert();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["Title"], "Q&A");
    Ok(())
}
