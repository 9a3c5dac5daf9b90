use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::adapters::transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};

pub const DEFAULT_BASE_URL: &str = "https://api.easee.cloud";

const TOKEN_PATH: &str = "/api/accounts/token";
const REFRESH_TOKEN_PATH: &str = "/api/accounts/refresh_token";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: String,
}

#[derive(Debug, Clone)]
struct AccessToken {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn from_response(
        response: TokenResponse,
        now: DateTime<Utc>,
    ) -> Result<Self, TransportError> {
        let expires_at = TimeDelta::try_seconds(response.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                TransportError::Auth(format!(
                    "token lifetime out of range: {}s",
                    response.expires_in
                ))
            })?;

        Ok(Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at,
        })
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Clone)]
pub struct EaseeClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    token: Mutex<Option<AccessToken>>,
}

impl EaseeClient {
    pub fn new(settings: ClientSettings) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: settings.base_url.trim_end_matches('/').to_string(),
                username: settings.username,
                password: settings.password,
                token: Mutex::new(None),
            }),
        })
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    pub async fn connect(&self) -> Result<(), TransportError> {
        let token = self.request_token(TOKEN_PATH, self.credentials()).await?;
        *self.inner.token.lock().await = Some(token);
        Ok(())
    }

    async fn bearer_token(&self) -> Result<String, TransportError> {
        let mut guard = self.inner.token.lock().await;
        let now = Utc::now();

        let token = match guard.take() {
            None => {
                tracing::debug!("no access token yet, logging in");
                self.request_token(TOKEN_PATH, self.credentials()).await?
            }
            Some(token) if token.is_expired(now) => {
                tracing::debug!("refreshing access token");
                let body = json!({
                    "accessToken": token.access_token,
                    "refreshToken": token.refresh_token,
                });
                self.request_token(REFRESH_TOKEN_PATH, body).await?
            }
            Some(token) => token,
        };

        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }

    fn credentials(&self) -> Value {
        json!({
            "userName": self.inner.username,
            "password": self.inner.password,
        })
    }

    async fn request_token(&self, path: &str, body: Value) -> Result<AccessToken, TransportError> {
        let response = self
            .inner
            .http
            .post(self.url(path))
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        if !(200..300).contains(&status) {
            tracing::error!(status, path, "token request rejected");
            return Err(TransportError::Auth(format!("{path} returned {status}: {text}")));
        }

        let token: TokenResponse = serde_json::from_str(&text).map_err(TransportError::Json)?;
        AccessToken::from_response(token, Utc::now())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }
}

#[async_trait]
impl Transport for EaseeClient {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            body = ?request.body,
            "easee request"
        );

        let bearer = self.bearer_token().await?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .inner
            .http
            .request(method, self.url(&request.path))
            .bearer_auth(bearer)
            .header(ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if !(200..300).contains(&status) {
            match status {
                400 => tracing::error!(status, path = %request.path, body = %body, "bad request"),
                401 | 403 => tracing::error!(status, path = %request.path, body = %body, "forbidden"),
                404 => tracing::error!(status, path = %request.path, "service not found"),
                _ => tracing::error!(status, path = %request.path, body = %body, "error in request to easee api"),
            }
            return Err(TransportError::from_status(status, &request.path, body));
        }

        Ok(ApiResponse { status, body })
    }
}
