//! HTTP transport tests.
//!
//! Uses wiremock to stand in for the Asana API and checks what goes over the wire.

use asanapi::{AsanaClient, AsanaError, ErrorBody, Get, RequestOptions, Task, User};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> AsanaClient {
    AsanaClient::new("test-token", &format!("{}/api/1.0", server.uri())).unwrap()
}

#[tokio::test]
async fn test_get_sends_bearer_token_under_base_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/1.0/users/me"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"gid": "1", "resource_type": "user", "name": "Greg"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let me = User::me(&client(&mock_server), RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(me.name.as_deref(), Some("Greg"));
}

#[tokio::test]
async fn test_list_sends_page_size_and_offset() {
    let mock_server = MockServer::start().await;

    // Mounted first, so it takes precedence for the second-page request.
    Mock::given(method("GET"))
        .and(path("/api/1.0/projects/p1/tasks"))
        .and(query_param("offset", "next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"gid": "t3"}],
            "next_page": null
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/1.0/projects/p1/tasks"))
        .and(query_param("limit", "2"))
        .and(query_param("opt_fields", "name,completed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"gid": "t1"}, {"gid": "t2"}],
            "next_page": {"offset": "next", "path": "/projects/p1/tasks?limit=2&offset=next"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = RequestOptions::new()
        .per_page(2)
        .fields(["name", "completed"]);
    let tasks = Task::find_by_project(&client(&mock_server), "p1", options)
        .await
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    let gids: Vec<_> = tasks.iter().map(|t| t.gid.as_str()).collect();
    assert_eq!(gids, vec!["t1", "t2", "t3"]);
}

#[tokio::test]
async fn test_not_found_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/1.0/tasks/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"message": "task: Unknown object: 404"}]
        })))
        .mount(&mock_server)
        .await;

    let err = Task::find_by_id(&client(&mock_server), "404", RequestOptions::new())
        .await
        .unwrap_err();

    match err {
        AsanaError::Api {
            status, path, body, ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(path, "/tasks/404");
            assert_eq!(body.message(), "task: Unknown object: 404");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_reports_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/1.0/users/me"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "30")
                .set_body_string("Too Many Requests"),
        )
        .mount(&mock_server)
        .await;

    let err = User::me(&client(&mock_server), RequestOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert!(matches!(
        err,
        AsanaError::Api {
            retry_after_secs: Some(30),
            body: ErrorBody::Raw(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_non_json_success_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/1.0/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let err = User::me(&client(&mock_server), RequestOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AsanaError::MalformedResponse { .. }));
}
