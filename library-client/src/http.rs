//! HTTP transport for the library API
//!
//! The transport carries a process-wide default bearer credential: once set
//! with [`HttpClient::set_token`] every request attaches
//! `Authorization: Bearer <token>` until it is cleared again.

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use shared::client::{AuthResponse, ErrorBody, LoginRequest, RegisterRequest};
use shared::models::{ProfileUpdate, User};

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client trait
///
/// Implementors provide the verbs and the default credential slot; the typed
/// auth endpoints are built on top of them.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;

    /// Configure (or with `None`, remove) the default bearer credential
    fn set_token(&self, token: Option<&str>);
    fn token(&self) -> Option<String>;

    // ========== Auth API ==========

    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        self.post("auth/login", request).await
    }

    /// `POST /auth/register`
    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.post("auth/register", request).await
    }

    /// `GET /auth/me`
    async fn me(&self) -> ClientResult<User> {
        self.get("auth/me").await
    }

    /// `PUT /users/profile`
    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        self.put("users/profile", update).await
    }
}

/// Network HTTP client backed by reqwest
#[derive(Debug)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.read().as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> ClientResult<T> {
        let response = self.authorize(req).send().await.map_err(|e| {
            if e.is_connect() {
                ClientError::Connection(e.to_string())
            } else {
                ClientError::Http(e)
            }
        })?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // error bodies are `{ "message": ... }`; anything else carries no message
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message);
            tracing::debug!(status = status.as_u16(), "Request rejected by server");
            return Err(ClientError::ServerRejected {
                status: status.as_u16(),
                message,
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(path, "GET");
        self.send(self.client.get(self.url(path))).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(path, "POST");
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(path, "PUT");
        self.send(self.client.put(self.url(path)).json(body)).await
    }

    fn set_token(&self, token: Option<&str>) {
        *self.token.write() = token.map(str::to_string);
    }

    fn token(&self) -> Option<String> {
        self.token.read().clone()
    }
}
