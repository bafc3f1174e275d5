//! HTTP contract against a mock platform server

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wfsecrets::client::{ApiClient, ClientConfig};
use wfsecrets::secrets::{
    HttpSecretsApi, QueryCache, Scope, SecretFormController, SecretRepository, SecretString,
    SecretsApi, SecretsError, WorkflowCatalog,
};

fn client(server: &MockServer, token: Option<&str>) -> ApiClient {
    ApiClient::new(ClientConfig {
        base_url: format!("{}/api/", server.uri()),
        token: token.map(SecretString::new),
        timeout: 5,
        verbose: true,
    })
    .unwrap()
}

fn http_api(server: &MockServer) -> HttpSecretsApi {
    HttpSecretsApi::new(client(server, None))
}

#[tokio::test]
async fn global_list_has_no_scope_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/secrets"))
        .and(query_param_is_missing("workflowName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["db-pass", "smtp"])))
        .expect(1)
        .mount(&server)
        .await;

    let names = http_api(&server).list_names(&Scope::Global).await.unwrap();
    assert_eq!(names, vec!["db-pass", "smtp"]);
}

#[tokio::test]
async fn workflow_list_carries_encoded_scope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/secrets"))
        .and(query_param("workflowName", "billing & tax"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["api-key"])))
        .expect(1)
        .mount(&server)
        .await;

    let names = http_api(&server).list_names(&Scope::workflow("billing & tax")).await.unwrap();
    assert_eq!(names, vec!["api-key"]);
}

#[tokio::test]
async fn put_sends_value_body_and_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/secrets/api-key"))
        .and(query_param("workflowName", "billing"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_json(json!({ "value": "k-123" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpSecretsApi::new(client(&server, Some("tok-1")));
    api.put_secret("api-key", &SecretString::new("k-123"), &Scope::workflow("billing"))
        .await
        .unwrap();
}

#[tokio::test]
async fn reserved_characters_in_names_stay_in_one_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/secrets/order%20flow%2Fv2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    http_api(&server).delete_secret("order flow/v2", &Scope::Global).await.unwrap();
}

#[tokio::test]
async fn missing_secret_is_absent_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/secrets/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(http_api(&server).get_secret("ghost", &Scope::Global).await.unwrap().is_none());
}

#[tokio::test]
async fn fetched_value_stays_redacted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/secrets/db-pass"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "db-pass", "value": "s3cr3t" })),
        )
        .mount(&server)
        .await;

    let record = http_api(&server).get_secret("db-pass", &Scope::Global).await.unwrap().unwrap();
    let value = record.value.clone().unwrap();
    assert_eq!(value.expose_secret(), "s3cr3t");
    assert!(!format!("{:?}", record).contains("s3cr3t"));
    assert!(!serde_json::to_string(&record).unwrap().contains("s3cr3t"));
}

#[tokio::test]
async fn exists_reads_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/secrets/db-pass/exists"))
        .and(query_param("workflowName", "billing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "exists": true })))
        .mount(&server)
        .await;

    assert!(http_api(&server).secret_exists("db-pass", &Scope::workflow("billing")).await.unwrap());
}

#[tokio::test]
async fn server_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/secrets/db-pass"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Value too large" })),
        )
        .mount(&server)
        .await;

    let err = http_api(&server)
        .put_secret("db-pass", &SecretString::new("v"), &Scope::Global)
        .await
        .unwrap_err();

    match &err {
        SecretsError::Http { status, .. } => assert_eq!(*status, 400),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), Some("Value too large"));
}

#[tokio::test]
async fn form_save_over_http_shows_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/secrets/db-pass"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is locked"))
        .mount(&server)
        .await;

    let repo = SecretRepository::new(Arc::new(http_api(&server)), QueryCache::default());
    let mut form = SecretFormController::create(repo, Scope::Global);
    form.set_name("db-pass").unwrap();
    form.set_value("v").unwrap();

    assert_eq!(form.save().await.unwrap(), None);
    assert_eq!(form.error_message(), Some("database is locked"));
}

#[tokio::test]
async fn workflow_catalog_is_sorted_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/metadata/workflow/names-and-versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shipping": [{ "version": 1 }],
            "billing": [{ "version": 1 }, { "version": 2 }]
        })))
        .mount(&server)
        .await;

    let catalog = WorkflowCatalog::load(&client(&server, None)).await;
    assert_eq!(catalog.names(), ["billing", "shipping"]);
    assert_eq!(catalog.scopes()[0], Scope::Global);
}

#[tokio::test]
async fn unreachable_catalog_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/metadata/workflow/names-and-versions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let catalog = WorkflowCatalog::load(&client(&server, None)).await;
    assert!(catalog.is_empty());
    assert_eq!(catalog.scopes(), vec![Scope::Global]);
}
