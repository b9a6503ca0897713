use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{
    collection::{CollectionStore, LoadOutcome},
    config::GalleryConfig,
    ingest::{ImagePipeline, SelectedFile},
    store::http::HttpRecordStore,
    uploader::{SubmitOutcome, UploadFormController, UploaderState},
};

struct Session {
    server: MockServer,
    collection: Arc<CollectionStore<HttpRecordStore>>,
    uploader: UploadFormController<HttpRecordStore>,
    _dir: tempfile::TempDir,
    image: SelectedFile,
}

async fn session(create_status: u16) -> Session {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/art"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/art"))
        .respond_with(ResponseTemplate::new(create_status))
        .mount(&server)
        .await;

    let config = GalleryConfig::new(server.uri().parse().unwrap());
    let collection = Arc::new(CollectionStore::new(HttpRecordStore::new(&config).unwrap()));
    let uploader = UploadFormController::new(
        collection.clone(),
        Arc::new(ImagePipeline::new(&config)),
    );

    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("blue-vase.jpg");
    tokio::fs::write(&image_path, b"\xff\xd8\xff\xdb").await.unwrap();

    Session {
        server,
        collection,
        uploader,
        _dir: dir,
        image: SelectedFile::Path(image_path),
    }
}

async fn requests(server: &MockServer) -> Vec<(String, Option<serde_json::Value>)> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .map(|request| {
            let body = serde_json::from_slice(&request.body).ok();
            (request.method.to_string(), body)
        })
        .collect()
}

#[tokio::test]
async fn test_upload_blue_vase() {
    let Session {
        server,
        collection,
        mut uploader,
        image,
        _dir,
        ..
    } = session(201).await;

    uploader.open();
    uploader.set_title("Blue Vase");
    uploader.attach_image(&image).await.unwrap();
    assert_eq!(uploader.submit().await.unwrap(), SubmitOutcome::Created);
    assert_eq!(uploader.state(), &UploaderState::Idle);

    let requests = requests(&server).await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].0, "POST");
    assert_eq!(
        requests[0].1,
        Some(serde_json::json!({
            "title": "Blue Vase",
            "tags": [],
            "image_data": "data:image/jpeg;base64,/9j/2w==",
        }))
    );
    assert_eq!(requests[1].0, "GET");
    assert!(!collection.is_loading());
}

#[tokio::test]
async fn test_duplicate_tags_are_submitted_as_typed() {
    let Session {
        server,
        mut uploader,
        image,
        _dir,
        ..
    } = session(200).await;

    uploader.open();
    uploader.set_title("Jar");
    uploader.set_tags_raw("a, b, a");
    uploader.attach_image(&image).await.unwrap();
    uploader.submit().await.unwrap();

    let requests = requests(&server).await;
    let body = requests[0].1.as_ref().unwrap();
    assert_eq!(body["tags"], serde_json::json!(["a", "b", "a"]));
}

#[tokio::test]
async fn test_rejected_upload_keeps_draft_and_skips_reload() {
    let Session {
        server,
        mut uploader,
        image,
        _dir,
        ..
    } = session(500).await;

    uploader.open();
    uploader.set_title("Blue Vase");
    uploader.set_artist("Lucie");
    uploader.attach_image(&image).await.unwrap();
    let draft = uploader.draft().cloned().unwrap();

    assert!(uploader.submit().await.is_err());
    assert_eq!(uploader.state(), &UploaderState::Editing(draft));

    let requests = requests(&server).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "POST");
}

#[tokio::test]
async fn test_incomplete_submit_sends_nothing() {
    let Session {
        server,
        mut uploader,
        ..
    } = session(201).await;

    uploader.open();
    uploader.set_title("No image yet");
    assert_eq!(uploader.submit().await.unwrap(), SubmitOutcome::Incomplete);
    assert!(requests(&server).await.is_empty());
}

#[tokio::test]
async fn test_startup_load_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/art"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "title": "Teapot", "tags": ["raku"], "image_data": "data:image/png;base64,AA==" }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/art"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let config = GalleryConfig::new(server.uri().parse().unwrap());
    let collection = CollectionStore::new(HttpRecordStore::new(&config).unwrap());

    assert_eq!(
        collection.load().await.unwrap(),
        LoadOutcome::Applied { count: 1 }
    );
    assert!(collection.load().await.is_err());
    assert_eq!(collection.items()[0].title, "Teapot");
    assert!(!collection.is_loading());
}
