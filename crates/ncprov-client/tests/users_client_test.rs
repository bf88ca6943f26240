//! Contract tests for UsersClient against the Nextcloud OCS provisioning API.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/ocs/v1.php/cloud/users` | `check_api_*` |
//! | POST   | `/ocs/v1.php/cloud/users` | `create_user_*` |
//! | PUT    | `/ocs/v1.php/cloud/users/{userid}` | `update_user_field_*` |
//! | POST   | `/ocs/v1.php/cloud/users/{userid}/welcome` | `send_welcome_email_*` |

use ncprov_client::users::CreateUserRequest;
use ncprov_client::{NextcloudApiError, NextcloudClient, NextcloudConfig};
use wiremock::matchers::{basic_auth, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zeroize::Zeroizing;

fn test_client(mock_server: &MockServer) -> NextcloudClient {
    let config = NextcloudConfig {
        base_url: mock_server.uri().parse().unwrap(),
        username: "admin".into(),
        password: Zeroizing::new("admin-pass".into()),
        timeout_secs: 5,
    };
    NextcloudClient::new(config).unwrap()
}

fn ocs(statuscode: i64, message: &str) -> serde_json::Value {
    serde_json::json!({
        "ocs": {
            "meta": {
                "status": if statuscode == 100 { "ok" } else { "failure" },
                "statuscode": statuscode,
                "message": message
            },
            "data": []
        }
    })
}

// ── GET /users ───────────────────────────────────────────────────────

#[tokio::test]
async fn check_api_sends_ocs_headers_and_basic_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ocs/v1.php/cloud/users"))
        .and(header("OCS-APIRequest", "true"))
        .and(header("Accept", "application/json"))
        .and(basic_auth("admin", "admin-pass"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocs(100, "OK")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client.users().check_api().await.unwrap();
}

#[tokio::test]
async fn check_api_reports_http_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ocs/v1.php/cloud/users"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorised"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    match client.users().check_api().await.unwrap_err() {
        NextcloudApiError::ApiError { status, body, .. } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Unauthorised");
        }
        other => panic!("expected ApiError, got: {other:?}"),
    }
}

#[tokio::test]
async fn check_api_reports_ocs_failure_inside_http_200() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ocs/v1.php/cloud/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocs(997, "Unauthorised")))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.users().check_api().await.unwrap_err();
    assert_eq!(err.ocs_statuscode(), Some(997));
    assert!(err.to_string().contains("Unauthorised"));
}

#[tokio::test]
async fn check_api_rejects_non_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ocs/v1.php/cloud/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.users().check_api().await.unwrap_err();
    assert!(matches!(err, NextcloudApiError::Deserialization { .. }));
}

#[tokio::test]
async fn check_api_treats_missing_meta_as_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ocs/v1.php/cloud/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.users().check_api().await.unwrap_err();
    assert_eq!(err.ocs_statuscode(), Some(-1));
}

// ── POST /users ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_user_posts_form_and_groups_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ocs/v1.php/cloud/users"))
        .and(query_param("groups[]", "admin"))
        .and(query_param("groups[]", "sales team"))
        .and(body_string_contains("userid=alice"))
        .and(body_string_contains("password=p%40ss+word%26more"))
        .and(basic_auth("admin", "admin-pass"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocs(100, "OK")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let req = CreateUserRequest {
        userid: "alice",
        password: "p@ss word&more",
        groups: vec!["admin", "sales team"],
    };
    client.users().create_user(&req).await.unwrap();
}

#[tokio::test]
async fn create_user_surfaces_existing_user_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ocs/v1.php/cloud/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocs(102, "User already exists")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let req = CreateUserRequest {
        userid: "alice",
        password: "correct-horse-battery",
        groups: Vec::new(),
    };
    let err = client.users().create_user(&req).await.unwrap_err();
    assert_eq!(err.ocs_statuscode(), Some(102));
    assert_eq!(
        err.to_string(),
        "POST /users returned OCS status 102: User already exists"
    );
}

#[tokio::test]
async fn create_user_is_not_retried_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ocs/v1.php/cloud/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let req = CreateUserRequest {
        userid: "alice",
        password: "correct-horse-battery",
        groups: Vec::new(),
    };
    match client.users().create_user(&req).await.unwrap_err() {
        NextcloudApiError::ApiError { status, .. } => assert_eq!(status, 500),
        other => panic!("expected ApiError, got: {other:?}"),
    }
}

// ── PUT /users/{userid} ──────────────────────────────────────────────

#[tokio::test]
async fn update_user_field_puts_key_and_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/ocs/v1.php/cloud/users/alice"))
        .and(body_string_contains("key=quota"))
        .and(body_string_contains("value=5+GB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocs(100, "OK")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client
        .users()
        .update_user_field("alice", "quota", "5 GB")
        .await
        .unwrap();
}

#[tokio::test]
async fn update_user_field_encodes_userid_in_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/ocs/v1.php/cloud/users/jane%20doe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocs(100, "OK")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client
        .users()
        .update_user_field("jane doe", "email", "jane@example.org")
        .await
        .unwrap();
}

// ── POST /users/{userid}/welcome ─────────────────────────────────────

#[tokio::test]
async fn send_welcome_email_posts_to_welcome_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ocs/v1.php/cloud/users/alice/welcome"))
        .and(header("OCS-APIRequest", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocs(100, "OK")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client.users().send_welcome_email("alice").await.unwrap();
}

#[tokio::test]
async fn send_welcome_email_reports_missing_email_address() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ocs/v1.php/cloud/users/alice/welcome"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ocs(101, "Email address not available")),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.users().send_welcome_email("alice").await.unwrap_err();
    assert_eq!(err.ocs_statuscode(), Some(101));
}

// ── Base URL handling ────────────────────────────────────────────────

#[tokio::test]
async fn subdirectory_install_keeps_prefix() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nextcloud/ocs/v1.php/cloud/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocs(100, "OK")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = NextcloudConfig {
        base_url: format!("{}/nextcloud/", mock_server.uri()).parse().unwrap(),
        username: "admin".into(),
        password: Zeroizing::new("admin-pass".into()),
        timeout_secs: 5,
    };
    let client = NextcloudClient::new(config).unwrap();
    assert!(client
        .users()
        .api_base()
        .as_str()
        .ends_with("/nextcloud/ocs/v1.php/cloud"));
    client.users().check_api().await.unwrap();
}
