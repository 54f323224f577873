//! Mock auth and storage servers for testing
//!
//! Wiremock servers standing in for the hosted auth admin API and the
//! storage object API.

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_SERVICE_KEY: &str = "test-service-key";
pub const TEST_BUCKET: &str = "hotel-images";

/// Mock of the auth service admin API, mounted under `/auth/v1`
pub struct AuthAdminMock {
    pub server: MockServer,
}

impl AuthAdminMock {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn api_url(&self) -> String {
        format!("{}/auth/v1", self.server.uri())
    }

    /// Accept one user creation and answer with `user_id`
    pub async fn mock_create_user(&self, user_id: Uuid) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/admin/users"))
            .and(header("apikey", TEST_SERVICE_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": user_id,
                "aud": "authenticated",
                "role": "authenticated"
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Reject user creation with `status` and a `msg` body
    pub async fn mock_create_user_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/admin/users"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "code": status,
                "msg": message
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer deletion of `user_id` with `status`
    pub async fn mock_delete_user(&self, user_id: Uuid, status: u16) {
        Mock::given(method("DELETE"))
            .and(path(format!("/auth/v1/admin/users/{}", user_id)))
            .and(header("apikey", TEST_SERVICE_KEY))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({})))
            .expect(1)
            .mount(&self.server)
            .await;
    }
}

/// Mock of the storage object API, mounted under `/storage/v1`
pub struct StorageMock {
    pub server: MockServer,
}

impl StorageMock {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn api_url(&self) -> String {
        format!("{}/storage/v1", self.server.uri())
    }

    /// Accept uploads anywhere in the test bucket
    pub async fn mock_upload(&self) {
        Mock::given(method("POST"))
            .and(path_regex(format!(r"^/storage/v1/object/{}/.+$", TEST_BUCKET)))
            .and(header("x-upsert", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Key": "uploaded"
            })))
            .mount(&self.server)
            .await;
    }

    /// Fail uploads with `status` and a `message` body
    pub async fn mock_upload_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/storage/v1/object/.+$"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "statusCode": status.to_string(),
                "error": "Error",
                "message": message
            })))
            .mount(&self.server)
            .await;
    }
}
