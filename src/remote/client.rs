//! HTTP client for the Wunderlist v1 task API
//!
//! | Call | Request | Success |
//! |------|---------|---------|
//! | create task | `POST /tasks` | 201 |
//! | rename task | `PATCH /tasks/{id}` | 200 |
//! | list tasks | `GET /tasks?list_id=` | 2xx |
//! | add comment | `POST /task_comments` | 201 |
//! | list comments | `GET /task_comments?list_id=` | 2xx |
//! | read positions | `GET /task_positions?list_id=` | 2xx |
//! | write positions | `PATCH /task_positions/{list_id}` | 200 |
//!
//! Authentication uses the `X-Access-Token` and `X-Client-ID` headers, fixed
//! when the client is built.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::api::{RemoteError, TaskListApi, WriteOutcome};
use crate::domain::{ListId, RemoteComment, RemoteTask, TaskId, TaskPositions};

/// Credentials sent with every request
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: String,
    pub client_id: String,
}

/// Blocking client for the remote task list
pub struct WunderlistClient {
    api_url: String,
    http: Client,
}

impl WunderlistClient {
    /// Default API base URL
    pub const DEFAULT_API_URL: &'static str = "https://a.wunderlist.com/api/v1";

    /// Builds a client for `api_url` authenticating with `credentials`
    pub fn new(
        api_url: impl Into<String>,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-access-token"),
            header_value(&credentials.access_token)?,
        );
        headers.insert(
            HeaderName::from_static("x-client-id"),
            header_value(&credentials.client_id)?,
        );

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Setup(e.to_string()))?;

        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Sends a read request and decodes a 2xx body as `T`
    fn read<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = send(operation, request)?;
        let status = response.status();

        if !status.is_success() {
            return Err(RemoteError::Status {
                operation,
                status: status.as_u16(),
                body: body_json(response),
            });
        }

        response.json().map_err(|e| RemoteError::Decode {
            operation,
            message: e.to_string(),
        })
    }

    /// Sends a write request; `expected` is the status that means success
    fn write(
        &self,
        operation: &'static str,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> Result<WriteOutcome, RemoteError> {
        let response = send(operation, request)?;
        let success = response.status() == expected;
        Ok(WriteOutcome::new(success, body_json(response)))
    }
}

fn header_value(value: &str) -> Result<HeaderValue, RemoteError> {
    HeaderValue::from_str(value)
        .map_err(|e| RemoteError::Setup(format!("invalid credential header: {}", e)))
}

fn send(operation: &'static str, request: RequestBuilder) -> Result<Response, RemoteError> {
    let response = request.send().map_err(|e| RemoteError::Transport {
        operation,
        message: e.to_string(),
    })?;
    debug!(operation, status = response.status().as_u16(), "Remote call");
    Ok(response)
}

/// Reads a response body as JSON, falling back to the raw text
fn body_json(response: Response) -> serde_json::Value {
    let text = response.text().unwrap_or_default();
    if text.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
}

impl TaskListApi for WunderlistClient {
    fn create_task(&self, list: ListId, title: &str) -> Result<WriteOutcome, RemoteError> {
        let request = self
            .http
            .post(self.url("/tasks"))
            .json(&serde_json::json!({ "list_id": list, "title": title }));
        self.write("create task", request, StatusCode::CREATED)
    }

    fn add_comment(&self, task: TaskId, text: &str) -> Result<WriteOutcome, RemoteError> {
        let request = self
            .http
            .post(self.url("/task_comments"))
            .json(&serde_json::json!({ "task_id": task, "text": text }));
        self.write("add comment", request, StatusCode::CREATED)
    }

    fn rename_task(
        &self,
        task: TaskId,
        title: &str,
        revision: u64,
    ) -> Result<WriteOutcome, RemoteError> {
        let request = self
            .http
            .patch(self.url(&format!("/tasks/{}", task)))
            .json(&serde_json::json!({ "revision": revision, "title": title }));
        self.write("rename task", request, StatusCode::OK)
    }

    fn list_tasks(&self, list: ListId) -> Result<Vec<RemoteTask>, RemoteError> {
        let request = self
            .http
            .get(self.url("/tasks"))
            .query(&[("list_id", list.0)]);
        self.read("list tasks", request)
    }

    fn list_comments(&self, list: ListId) -> Result<Vec<RemoteComment>, RemoteError> {
        let request = self
            .http
            .get(self.url("/task_comments"))
            .query(&[("list_id", list.0)]);
        self.read("list comments", request)
    }

    fn list_positions(&self, list: ListId) -> Result<Vec<TaskPositions>, RemoteError> {
        let request = self
            .http
            .get(self.url("/task_positions"))
            .query(&[("list_id", list.0)]);
        self.read("list positions", request)
    }

    fn apply_positions(
        &self,
        list: ListId,
        revision: u64,
        ordered: &[TaskId],
    ) -> Result<WriteOutcome, RemoteError> {
        let request = self
            .http
            .patch(self.url(&format!("/task_positions/{}", list)))
            .json(&serde_json::json!({ "revision": revision, "values": ordered }));
        self.write("apply positions", request, StatusCode::OK)
    }
}
