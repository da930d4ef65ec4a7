//! Remote log store backed by the host's HTTP file service.
//!
//! The service exposes three JSON endpoints under `/api/files/`:
//!
//! | Endpoint    | Body                          | Result                     |
//! |-------------|-------------------------------|----------------------------|
//! | `mkdir`     | `{path}`                      | 2xx, or an error if exists |
//! | `writeFile` | `{path, content, append}`     | 2xx                        |
//! | `readFile`  | `{path}`                      | 200 + text, 404 if missing |
//!
//! Every request carries the host-issued token in [`TOKEN_HEADER`]. The
//! service serializes writes, which is what makes appends atomic here.

use async_trait::async_trait;
use promptlog_application::ports::log_store::{LogStorePort, StoreError, line_terminated};
use promptlog_domain::LogPath;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Header carrying the host's CSRF token.
pub const TOKEN_HEADER: &str = "X-CSRF-Token";

#[derive(Debug, Serialize)]
struct FileRequest<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    append: bool,
}

impl<'a> FileRequest<'a> {
    fn path(path: &'a str) -> Self {
        Self {
            path,
            content: None,
            append: false,
        }
    }
}

/// Log store that talks to a remote file service.
pub struct RemoteFileLogStore {
    client: Client,
    base_url: String,
    token: String,
}

impl RemoteFileLogStore {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url, token))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/api/files/{}", self.base_url, name)
    }

    async fn post(&self, name: &str, body: &FileRequest<'_>) -> Result<Response, StoreError> {
        self.client
            .post(self.endpoint(name))
            .header(TOKEN_HEADER, &self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("{} request failed: {}", name, e)))
    }

    async fn expect_success(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Ask the service to create `dir`.
    ///
    /// The service answers with an error when the directory already exists,
    /// so every failure here counts as success.
    async fn ensure_dir(&self, dir: &str) {
        match self.post("mkdir", &FileRequest::path(dir)).await {
            Ok(response) if response.status().is_success() => {
                debug!("Created remote directory {}", dir);
            }
            Ok(response) => {
                debug!(
                    "mkdir {} returned {}, assuming it exists",
                    dir,
                    response.status()
                );
            }
            Err(e) => debug!("mkdir {} failed, continuing: {}", dir, e),
        }
    }

    async fn write(&self, path: &LogPath, content: &str, append: bool) -> Result<(), StoreError> {
        if let Some(dir) = path.parent() {
            self.ensure_dir(dir).await;
        }
        let body = FileRequest {
            path: path.as_str(),
            content: Some(content),
            append,
        };
        let response = self.post("writeFile", &body).await?;
        Self::expect_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl LogStorePort for RemoteFileLogStore {
    /// The host appends blindly, so a log whose last line lost its
    /// newline cannot be repaired here without an extra read.
    async fn append(&self, path: &LogPath, text: &str) -> Result<(), StoreError> {
        self.write(path, &line_terminated(text), true).await?;
        debug!("Appended to {} at {}", path, self.base_url);
        Ok(())
    }

    async fn read_all(&self, path: &LogPath) -> Result<Option<String>, StoreError> {
        let response = self.post("readFile", &FileRequest::path(path.as_str())).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::expect_success(response).await?;
        response
            .text()
            .await
            .map(Some)
            .map_err(|e| StoreError::Transport(format!("Failed to read response body: {}", e)))
    }

    async fn clear(&self, path: &LogPath) -> Result<(), StoreError> {
        self.write(path, "", false).await
    }

    fn transport(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde::Deserialize;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    const TOKEN: &str = "secret-token";

    #[derive(Debug, Deserialize)]
    struct Request {
        path: String,
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        append: bool,
    }

    /// In-process stand-in for the host's file service.
    #[derive(Default)]
    struct FileService {
        files: Mutex<HashMap<String, String>>,
        dirs: Mutex<HashSet<String>>,
        fail_writes: bool,
    }

    type Reply = (StatusCode, String);

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == TOKEN)
    }

    async fn mkdir(
        State(service): State<Arc<FileService>>,
        headers: HeaderMap,
        Json(req): Json<Request>,
    ) -> Reply {
        if !authorized(&headers) {
            return (StatusCode::FORBIDDEN, "bad token".to_string());
        }
        if !service.dirs.lock().unwrap().insert(req.path) {
            return (StatusCode::CONFLICT, "directory exists".to_string());
        }
        (StatusCode::OK, String::new())
    }

    async fn write_file(
        State(service): State<Arc<FileService>>,
        headers: HeaderMap,
        Json(req): Json<Request>,
    ) -> Reply {
        if !authorized(&headers) {
            return (StatusCode::FORBIDDEN, "bad token".to_string());
        }
        if service.fail_writes {
            return (StatusCode::INTERNAL_SERVER_ERROR, "disk full".to_string());
        }
        let content = req.content.unwrap_or_default();
        let mut files = service.files.lock().unwrap();
        let file = files.entry(req.path).or_default();
        if req.append {
            file.push_str(&content);
        } else {
            *file = content;
        }
        (StatusCode::OK, String::new())
    }

    async fn read_file(
        State(service): State<Arc<FileService>>,
        headers: HeaderMap,
        Json(req): Json<Request>,
    ) -> Reply {
        if !authorized(&headers) {
            return (StatusCode::FORBIDDEN, "bad token".to_string());
        }
        match service.files.lock().unwrap().get(&req.path) {
            Some(content) => (StatusCode::OK, content.clone()),
            None => (StatusCode::NOT_FOUND, "no such file".to_string()),
        }
    }

    async fn serve(service: Arc<FileService>) -> String {
        let app = Router::new()
            .route("/api/files/mkdir", post(mkdir))
            .route("/api/files/writeFile", post(write_file))
            .route("/api/files/readFile", post(read_file))
            .with_state(service);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn store(base_url: &str, token: &str) -> RemoteFileLogStore {
        RemoteFileLogStore::new(base_url, token, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_append_read_clear_round_trip() {
        let service = Arc::new(FileService::default());
        let base = serve(service.clone()).await;
        let store = store(&base, TOKEN);
        let path = LogPath::default();

        assert_eq!(store.read_all(&path).await.unwrap(), None);

        store.append(&path, "{\"n\":1}").await.unwrap();
        // Second mkdir hits an existing directory and must not fail the append.
        store.append(&path, "{\"n\":2}\n").await.unwrap();
        assert_eq!(
            store.read_all(&path).await.unwrap().as_deref(),
            Some("{\"n\":1}\n{\"n\":2}\n")
        );
        assert!(service.dirs.lock().unwrap().contains("promptlog"));

        store.clear(&path).await.unwrap();
        assert_eq!(store.read_all(&path).await.unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_wrong_token_is_a_status_error() {
        let base = serve(Arc::new(FileService::default())).await;
        let store = store(&base, "wrong");

        let err = store.append(&LogPath::default(), "x").await.unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_server_error_carries_body() {
        let service = Arc::new(FileService {
            fail_writes: true,
            ..Default::default()
        });
        let base = serve(service).await;
        let store = store(&base, TOKEN);

        match store.append(&LogPath::default(), "x").await {
            Err(StoreError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "disk full");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = store(&format!("http://{}", addr), TOKEN);
        let err = store.read_all(&LogPath::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }

    #[test]
    fn test_base_url_drops_trailing_slashes() {
        let store = store("http://127.0.0.1:8000//", "t");
        assert_eq!(store.base_url(), "http://127.0.0.1:8000");
        assert_eq!(
            store.endpoint("readFile"),
            "http://127.0.0.1:8000/api/files/readFile"
        );
    }

    #[test]
    fn test_request_body_omits_defaults() {
        let body = serde_json::to_value(FileRequest::path("a/b")).unwrap();
        assert_eq!(body, serde_json::json!({ "path": "a/b" }));

        let body = serde_json::to_value(FileRequest {
            path: "a",
            content: Some(""),
            append: true,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "path": "a", "content": "", "append": true })
        );
    }
}
