//! Google Drive import through the Composio tool-execution API.
//!
//! Every Drive action is one `POST {endpoint}/api/v3/tools/execute/{slug}`
//! carrying `{arguments, user_id, version}`. The service answers with
//! `{data, successful, error}`; an unsuccessful answer is a
//! [`DriveError::Rejected`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::errors::DriveError;
use crate::traits::HttpClient;

const FIND_FILE: &str = "GOOGLEDRIVE_FIND_FILE";
const DOWNLOAD_FILE: &str = "GOOGLEDRIVE_DOWNLOAD_FILE";
const DRIVE_TOOLKIT: &str = "googledrive";
const FALLBACK_USER: &str = "default";

/// Access to the student's Google Drive.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriveClient: Send + Sync {
    /// Files matching a free-text or Drive query.
    async fn find_files(&self, query: &str) -> Result<Value, DriveError>;

    /// Files and folders directly inside `folder_id` (`root` for the top).
    async fn list_folder(&self, folder_id: &str) -> Result<Value, DriveError> {
        self.find_files(&format!("'{folder_id}' in parents")).await
    }

    /// Content of one file.
    async fn download(&self, file_id: &str) -> Result<Value, DriveError>;
}

/// Composio-backed Drive client.
pub struct ComposioDriveClient {
    http: Arc<dyn HttpClient>,
    api_key: String,
    endpoint: String,
    toolkit_version: String,
    configured_user: Option<String>,
    resolved_user: OnceCell<String>,
}

impl ComposioDriveClient {
    /// Create a client. Without `user_id` the id of the first active Google
    /// Drive connection is looked up on first use.
    pub fn new(
        http: Arc<dyn HttpClient>,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        toolkit_version: impl Into<String>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            toolkit_version: toolkit_version.into(),
            configured_user: user_id.filter(|u| !u.trim().is_empty()),
            resolved_user: OnceCell::new(),
        }
    }

    async fn user_id(&self) -> &str {
        if let Some(user) = &self.configured_user {
            return user;
        }
        self.resolved_user
            .get_or_init(|| async {
                match self.lookup_user().await {
                    Ok(Some(user)) => user,
                    Ok(None) => {
                        warn!("no active Google Drive connection, using default user");
                        FALLBACK_USER.to_string()
                    }
                    Err(e) => {
                        warn!(error = %e, "Drive user lookup failed, using default user");
                        FALLBACK_USER.to_string()
                    }
                }
            })
            .await
    }

    async fn lookup_user(&self) -> Result<Option<String>, DriveError> {
        let response = self
            .http
            .get(
                &format!("{}/api/v3/connected_accounts", self.endpoint),
                &[
                    ("toolkit_slugs", DRIVE_TOOLKIT.to_string()),
                    ("statuses", "ACTIVE".to_string()),
                ],
                &[("x-api-key", &self.api_key)],
            )
            .await?;
        if !(200..300).contains(&response.status) {
            return Err(DriveError::Status {
                status: response.status,
            });
        }
        let body: Value = serde_json::from_str(&response.body)?;
        Ok(active_drive_user(&body))
    }

    async fn execute(&self, slug: &str, arguments: Value) -> Result<Value, DriveError> {
        if self.api_key.is_empty() {
            return Err(DriveError::MissingApiKey);
        }
        let user_id = self.user_id().await;
        let body = json!({
            "arguments": arguments,
            "user_id": user_id,
            "version": self.toolkit_version,
        });
        let response = self
            .http
            .post_json(
                &format!("{}/api/v3/tools/execute/{slug}", self.endpoint),
                &body,
                &[("x-api-key", &self.api_key)],
            )
            .await?;
        if !(200..300).contains(&response.status) {
            return Err(DriveError::Status {
                status: response.status,
            });
        }

        let mut answer: Value = serde_json::from_str(&response.body)?;
        if answer.get("successful").and_then(Value::as_bool) != Some(true) {
            let message = answer
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(DriveError::Rejected { message });
        }
        debug!(action = slug, "Drive action completed");
        Ok(answer
            .get_mut("data")
            .map(Value::take)
            .unwrap_or_else(|| json!({})))
    }
}

#[async_trait]
impl DriveClient for ComposioDriveClient {
    async fn find_files(&self, query: &str) -> Result<Value, DriveError> {
        self.execute(FIND_FILE, json!({ "search_query": query })).await
    }

    async fn download(&self, file_id: &str) -> Result<Value, DriveError> {
        self.execute(DOWNLOAD_FILE, json!({ "file_id": file_id })).await
    }
}

/// User id of the first active Google Drive connection in `items[]`.
fn active_drive_user(body: &Value) -> Option<String> {
    body.get("items")?
        .as_array()?
        .iter()
        .find(|acct| {
            acct.pointer("/toolkit/slug").and_then(Value::as_str) == Some(DRIVE_TOOLKIT)
                && acct.get("status").and_then(Value::as_str) == Some("ACTIVE")
        })?
        .get("user_id")?
        .as_str()
        .map(String::from)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ReqwestHttpClient;
    use assert_matches::assert_matches;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, user: Option<&str>) -> ComposioDriveClient {
        ComposioDriveClient::new(
            Arc::new(ReqwestHttpClient::default()),
            "ck",
            format!("{}/", server.uri()),
            "20260204_00",
            user.map(String::from),
        )
    }

    #[tokio::test]
    async fn find_sends_query_and_returns_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/tools/execute/GOOGLEDRIVE_FIND_FILE"))
            .and(header("x-api-key", "ck"))
            .and(body_partial_json(json!({
                "arguments": {"search_query": "Lecture 3 slides"},
                "user_id": "student",
                "version": "20260204_00"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "successful": true,
                "data": {"files": [{"id": "f1", "name": "lec3.pdf"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data = client(&server, Some("student"))
            .find_files("Lecture 3 slides")
            .await
            .unwrap();
        assert_eq!(data["files"][0]["id"], "f1");
    }

    #[tokio::test]
    async fn list_folder_queries_parents() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"arguments": {"search_query": "'root' in parents"}})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"successful": true, "data": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let data = client(&server, Some("student")).list_folder("root").await.unwrap();
        assert_eq!(data, json!({}));
    }

    #[tokio::test]
    async fn unsuccessful_answer_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "successful": false,
                "error": "file not found"
            })))
            .mount(&server)
            .await;

        let err = client(&server, Some("student")).download("nope").await.unwrap_err();
        assert_matches!(err, DriveError::Rejected { ref message } if message == "file not found");
    }

    #[tokio::test]
    async fn http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client(&server, Some("student")).find_files("x").await.unwrap_err();
        assert_matches!(err, DriveError::Status { status: 401 });
    }

    #[tokio::test]
    async fn resolves_user_from_active_connection_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/connected_accounts"))
            .and(query_param("toolkit_slugs", "googledrive"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"user_id": "old", "status": "EXPIRED", "toolkit": {"slug": "googledrive"}},
                    {"user_id": "mail", "status": "ACTIVE", "toolkit": {"slug": "gmail"}},
                    {"user_id": "student-42", "status": "ACTIVE", "toolkit": {"slug": "googledrive"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"user_id": "student-42"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"successful": true, "data": {}})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let drive = client(&server, None);
        let _ = drive.find_files("a").await.unwrap();
        let _ = drive.find_files("b").await.unwrap();
    }

    #[tokio::test]
    async fn missing_connection_falls_back_to_default_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"user_id": "default"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"successful": true, "data": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let _ = client(&server, None).find_files("a").await.unwrap();
    }

    #[tokio::test]
    async fn empty_key_fails_without_request() {
        let server = MockServer::start().await;
        let drive = ComposioDriveClient::new(
            Arc::new(ReqwestHttpClient::default()),
            "",
            server.uri(),
            "v",
            Some("u".into()),
        );
        assert_matches!(drive.find_files("x").await, Err(DriveError::MissingApiKey));
    }
}
