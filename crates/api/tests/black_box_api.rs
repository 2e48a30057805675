use catalog_api::app::{build_app, services::AppServices};
use catalog_infra::{DEFAULT_MAX_UPLOAD_BYTES, MediaConfig, NamingStrategy};
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    upload_dir: tempfile::TempDir,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with_upload_cap(DEFAULT_MAX_UPLOAD_BYTES).await
    }

    async fn spawn_with_upload_cap(max_bytes: u64) -> Self {
        let upload_dir = tempfile::tempdir().expect("failed to create upload dir");
        let services = AppServices::in_memory(
            MediaConfig {
                destination: upload_dir.path().to_path_buf(),
                naming: NamingStrategy::Original,
                max_bytes,
            },
            4,
        )
        .expect("failed to build services");

        // Same router as prod, bound to an ephemeral port.
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            handle,
            upload_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create(client: &reqwest::Client, srv: &TestServer, name: &str, price: f64) -> Value {
    let res = client
        .post(srv.url("/products"))
        .json(&json!({ "name": name, "price": price }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/health")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_returns_the_stored_product() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create(&client, &srv, "Widget", 9.99).await;

    assert_eq!(created["id"], 1);
    assert_eq!(created["name"], "Widget");
    assert_eq!(created["price"], 9.99);
    assert_eq!(created["available"], true);
    assert!(created["createdAt"].is_string());
}

#[tokio::test]
async fn list_returns_data_and_metadata() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    for i in 0..5 {
        create(&client, &srv, &format!("p{i}"), 1.0).await;
    }

    let res = client
        .get(srv.url("/products?page=1&limit=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();

    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["metadata"], json!({ "total": 5, "page": 1, "lastPage": 3 }));

    let res = client
        .get(srv.url("/products?page=9&limit=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_pagination_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for query in ["page=0", "limit=0", "page=-1", "limit=abc"] {
        let res = client
            .get(srv.url(&format!("/products?{query}")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "query {query}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["status"], 400);
    }
}

#[tokio::test]
async fn remove_then_get_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let created = create(&client, &srv, "Widget", 1.0).await;
    let id = created["id"].as_i64().unwrap();

    let res = client
        .delete(srv.url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let removed: Value = res.json().await.unwrap();
    assert_eq!(removed["available"], false);

    let res = client
        .get(srv.url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "message": format!("Product with id {id} not found"), "status": 400 })
    );

    // A second remove is rejected the same way.
    let res = client
        .delete(srv.url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_updates_only_given_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create(&client, &srv, "First", 1.0).await;
    create(&client, &srv, "Second", 2.0).await;

    let res = client
        .patch(srv.url("/products/2"))
        .json(&json!({ "price": -1, "available": false, "id": 77 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();

    assert_eq!(updated["id"], 2);
    assert_eq!(updated["name"], "Second");
    assert_eq!(updated["price"], -1.0);
    assert_eq!(updated["available"], true);
}

#[tokio::test]
async fn patch_with_null_image_clears_it() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let res = client
        .post(srv.url("/products"))
        .json(&json!({ "name": "Pictured", "price": 3.0, "image": "a.png" }))
        .send()
        .await
        .unwrap();
    let created: Value = res.json().await.unwrap();
    let url = srv.url(&format!("/products/{}", created["id"]));

    let res = client.patch(&url).json(&json!({ "name": "Renamed" })).send().await.unwrap();
    let kept: Value = res.json().await.unwrap();
    assert_eq!(kept["image"], "a.png");

    let res = client.patch(&url).json(&json!({ "image": null })).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cleared: Value = res.json().await.unwrap();
    assert_eq!(cleared["image"], Value::Null);
    assert_eq!(cleared["name"], "Renamed");
}

#[tokio::test]
async fn malformed_ids_are_rejected() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/products/abc")).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "invalid product id `abc`");
}

#[tokio::test]
async fn validate_reports_missing_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    for name in ["a", "b", "c", "d", "e"] {
        create(&client, &srv, name, 1.0).await;
    }

    let res = client
        .post(srv.url("/products/validate"))
        .json(&json!({ "ids": [3, 3, 5] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: Value = res.json().await.unwrap();
    assert_eq!(found.as_array().unwrap().len(), 2);

    let res = client
        .post(srv.url("/products/validate"))
        .json(&json!({ "ids": [3, 9] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "some ids were not found", "status": 400 }));
}

#[tokio::test]
async fn upload_stores_the_file_and_returns_a_reference() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let part = reqwest::multipart::Part::bytes(b"PNGDATA".to_vec()).file_name("avatar.png");
    let form = reqwest::multipart::Form::new()
        .text("note", "ignored")
        .part("avatar", part);

    let res = client
        .post(srv.url("/media/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let stored: Value = res.json().await.unwrap();

    assert_eq!(stored["reference"], "avatar.png");
    assert_eq!(stored["originalName"], "avatar.png");
    assert_eq!(stored["size"], 7);
    let on_disk = std::fs::read(srv.upload_dir.path().join("avatar.png")).unwrap();
    assert_eq!(on_disk, b"PNGDATA");

    // The reference can be stored on a product as-is.
    let res = client
        .post(srv.url("/products"))
        .json(&json!({ "name": "With image", "price": 5.0, "image": stored["reference"] }))
        .send()
        .await
        .unwrap();
    let product: Value = res.json().await.unwrap();
    assert_eq!(product["image"], "avatar.png");
}

#[tokio::test]
async fn upload_without_a_file_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let form = reqwest::multipart::Form::new().text("note", "no file here");
    let res = client
        .post(srv.url("/media/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_larger_than_axum_default_limit_is_stored() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let payload = vec![7u8; 3 * 1024 * 1024];
    let part = reqwest::multipart::Part::bytes(payload.clone()).file_name("clip.mp4");
    let form = reqwest::multipart::Form::new().part("video", part);

    let res = client
        .post(srv.url("/media/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let stored: Value = res.json().await.unwrap();

    assert_eq!(stored["size"], payload.len() as u64);
    let on_disk = std::fs::read(srv.upload_dir.path().join("clip.mp4")).unwrap();
    assert_eq!(on_disk.len(), payload.len());
}

#[tokio::test]
async fn upload_over_the_configured_cap_is_413_and_leaves_no_file() {
    let srv = TestServer::spawn_with_upload_cap(1024).await;
    let client = reqwest::Client::new();

    let part = reqwest::multipart::Part::bytes(vec![0u8; 8 * 1024]).file_name("big.bin");
    let form = reqwest::multipart::Form::new().part("file", part);

    let res = client
        .post(srv.url("/media/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], 413);

    assert!(!srv.upload_dir.path().join("big.bin").exists());
}
