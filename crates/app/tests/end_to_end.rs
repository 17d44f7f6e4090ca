//! End-to-end tests
//!
//! These tests run the default wiring (reqwest transport, file and
//! environment configuration sources, JSON path evaluator) against a
//! local mock server.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::time::Duration;

use pretty_assertions::assert_eq;
use restprobe::{
    ApplicationError, Assertion, AssertionRunner, AssertionSuite, ClientBuilder, JsonType,
    RequestOptions, StatusExpectation, TransportError,
};
use serde::Deserialize;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Post {
    id: i64,
    user_id: i64,
    title: String,
}

fn config_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp directory");
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn client_for(server: &MockServer, dir: &TempDir) -> restprobe::ApiClient {
    ClientBuilder::new()
        .config_dir(dir.path())
        .without_process_env()
        .override_value("base.url", server.uri())
        .build()
        .expect("Failed to build client")
}

#[tokio::test]
async fn test_get_post_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": 1,
            "id": 1,
            "title": "sunt aut facere"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = config_dir(&[]);
    let client = client_for(&server, &dir);

    let response = client
        .get("/posts/{id}", RequestOptions::new().path_param("id", 1))
        .await
        .unwrap();

    response
        .assert_status(200)
        .unwrap()
        .assert_path_equals("$.id", 1)
        .unwrap()
        .assert_path_type("$.title", JsonType::String)
        .unwrap()
        .assert_header_equals("content-type", "application/json")
        .unwrap();

    let post: Post = response.body_as().unwrap();
    assert_eq!(
        post,
        Post {
            id: 1,
            user_id: 1,
            title: "sunt aut facere".to_string()
        }
    );
}

#[tokio::test]
async fn test_post_defaults_to_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"title": "foo", "body": "bar", "userId": 1})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 101})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = config_dir(&[]);
    let client = client_for(&server, &dir);

    let response = client
        .post(
            "/posts",
            RequestOptions::new().body(json!({"title": "foo", "body": "bar", "userId": 1})),
        )
        .await
        .unwrap();

    response.assert_status(201).unwrap();
    assert_eq!(response.i64_at("$.id").unwrap(), 101);
}

#[tokio::test]
async fn test_call_header_overrides_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("x-trace", "b"))
        .and(query_param("_limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = config_dir(&[]);
    let client = client_for(&server, &dir);
    client.add_default_header("X-Trace", "a");

    let response = client
        .get(
            "/users",
            RequestOptions::new().header("x-trace", "b").query("_limit", 5),
        )
        .await
        .unwrap();

    response.assert_body_type(JsonType::Array).unwrap();
}

#[tokio::test]
async fn test_connection_refused_produces_no_response() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let dir = config_dir(&[]);
    let client = ClientBuilder::new()
        .config_dir(dir.path())
        .without_process_env()
        .override_value("base.url", format!("http://127.0.0.1:{port}"))
        .build()
        .unwrap();

    let result = client.get("/posts", RequestOptions::new()).await;

    match result {
        Err(ApplicationError::Transport(
            TransportError::ConnectionRefused { .. } | TransportError::Connection(_),
        )) => {}
        other => panic!("expected a transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_status_is_a_response() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let dir = config_dir(&[]);
    let client = client_for(&server, &dir);

    let response = client.delete("/posts/999", RequestOptions::new()).await.unwrap();

    assert!(response.is_client_error());
    let failure = response.assert_status(200).unwrap_err();
    assert_eq!(failure.message, "Expected status code 200 but got 404");
    assert!(response.assert_status_in_range(400, 499).is_ok());
}

#[test]
fn test_environment_file_overrides_base_file() {
    let dir = config_dir(&[
        ("config.properties", "base.url=http://a\ntimeout=1500\n"),
        ("config-qa.properties", "base.url=http://b\n"),
        ("config-prod.yaml", "base:\n  url: http://prod\n"),
    ]);

    let client = ClientBuilder::new()
        .config_dir(dir.path())
        .without_process_env()
        .build()
        .unwrap();
    let config = client.config();

    assert_eq!(config.environment(), "qa");
    assert_eq!(config.base_url().as_deref(), Some("http://b"));
    assert_eq!(config.timeout(), Duration::from_millis(1500));
    assert_eq!(
        config.layer_names(),
        vec!["defaults", "config.properties", "config-qa.properties"]
    );

    config.set_base_url("http://c");
    assert_eq!(config.base_url().as_deref(), Some("http://c"));

    let prod = ClientBuilder::new()
        .config_dir(dir.path())
        .without_process_env()
        .override_value("env", "prod")
        .build()
        .unwrap();
    assert_eq!(prod.config().base_url().as_deref(), Some("http://prod"));
}

#[tokio::test]
async fn test_api_key_is_sent_as_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = config_dir(&[("config.yaml", "api:\n  key: s3cret\n")]);
    let client = client_for(&server, &dir);

    let response = client.get("/me", RequestOptions::new()).await.unwrap();
    assert!(response.bool_at("$.ok").unwrap());
}

#[tokio::test]
async fn test_assertion_suite_collects_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "Leanne Graham",
            "email": "Sincere@april.biz"
        })))
        .mount(&server)
        .await;

    let dir = config_dir(&[]);
    let client = client_for(&server, &dir);
    let response = client.get("/users/1", RequestOptions::new()).await.unwrap();

    let suite = AssertionSuite::new("user contract")
        .with_assertion(Assertion::Status {
            expected: StatusExpectation::success(),
        })
        .with_assertion(Assertion::RequiredPaths {
            paths: vec!["$.id".into(), "$.name".into(), "$.phone".into()],
        })
        .with_assertion(Assertion::BodyMatches {
            pattern: r"@april\.biz".into(),
        })
        .with_assertion(Assertion::ResponseTime { max_ms: 10_000 });

    let report = AssertionRunner::new().run(&suite, &response);

    assert_eq!(report.total, 4);
    assert_eq!(report.failed, 1);
    let failure = report.failures().next().unwrap();
    assert_eq!(failure.message, "Missing required fields: $.phone");
}

#[test]
fn test_logging_can_be_disabled() {
    let dir = config_dir(&[("config.properties", "logging.enabled=false\n")]);
    let client = ClientBuilder::new()
        .config_dir(dir.path())
        .without_process_env()
        .build()
        .unwrap();

    assert!(!client.config().logging_enabled());
    assert!(!restprobe::init_logging(client.config()));
}
