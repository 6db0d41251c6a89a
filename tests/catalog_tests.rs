use handle_hunter::catalog::{Catalog, DetectionStrategy};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATALOG_JSON: &str = r#"{
    "websites": [
        {
            "name": "Example",
            "base_url": "https://example.com/u/{}",
            "error_type": "status_code",
            "error_code": 404
        },
        {
            "name": "Opaque",
            "base_url": "https://opaque.example/{}",
            "error_type": "unknown"
        }
    ]
}"#;

#[tokio::test]
async fn catalog_loads_from_a_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("data.json");
    std::fs::write(&file, CATALOG_JSON).unwrap();

    let catalog = Catalog::load(file.to_str().unwrap()).await.unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.websites[0].error_type, DetectionStrategy::StatusCode);
    assert_eq!(catalog.websites[1].error_type, DetectionStrategy::Unverified);
}

#[tokio::test]
async fn catalog_loads_from_a_remote_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CATALOG_JSON))
        .mount(&server)
        .await;

    let catalog = Catalog::load(&format!("{}/data.json", server.uri())).await.unwrap();
    assert_eq!(catalog.len(), 2);
}

#[tokio::test]
async fn malformed_catalog_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("data.json");
    std::fs::write(&file, "{\"websites\": [{\"name\": \"broken\"").unwrap();

    assert!(Catalog::load(file.to_str().unwrap()).await.is_err());
}

#[tokio::test]
async fn unfetchable_catalog_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(Catalog::load(&format!("{}/data.json", server.uri())).await.is_err());
    assert!(Catalog::load("/no/such/file.json").await.is_err());
}
