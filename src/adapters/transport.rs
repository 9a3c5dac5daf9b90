use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(body: &Value) -> Self {
        Self::new(200, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_str(&self.body).map_err(TransportError::Json)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("resource not found: {path}")]
    NotFound { path: String },
    #[error("bad request to {path}: {body}")]
    BadRequest { path: String, body: String },
    #[error("access denied to {path}: {body}")]
    Forbidden { path: String, body: String },
    #[error("unexpected status {status} from {path}: {body}")]
    Status {
        status: u16,
        path: String,
        body: String,
    },
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode response body: {0}")]
    Json(#[source] serde_json::Error),
    #[error("authentication failed: {0}")]
    Auth(String),
}

impl TransportError {
    pub fn from_status(status: u16, path: &str, body: String) -> Self {
        let path = path.to_string();
        match status {
            400 => Self::BadRequest { path, body },
            401 | 403 => Self::Forbidden { path, body },
            404 => Self::NotFound { path },
            _ => Self::Status { status, path, body },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;

    async fn get(&self, path: &str) -> Result<ApiResponse, TransportError> {
        self.execute(ApiRequest {
            method: Method::Get,
            path: path.to_string(),
            body: None,
        })
        .await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiResponse, TransportError> {
        self.execute(ApiRequest {
            method: Method::Post,
            path: path.to_string(),
            body,
        })
        .await
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<ApiResponse, TransportError> {
        self.execute(ApiRequest {
            method: Method::Put,
            path: path.to_string(),
            body,
        })
        .await
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse, TransportError> {
        self.execute(ApiRequest {
            method: Method::Delete,
            path: path.to_string(),
            body: None,
        })
        .await
    }
}
