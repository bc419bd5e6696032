//! Scripted [`HttpClient`] for unit tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::HttpClient;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Json(Value),
    Reject(u16, Option<String>),
    Offline,
}

/// One request as seen by the mock
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub route: String,
    pub token: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
pub(crate) struct MockHttpClient {
    replies: Mutex<HashMap<String, (Reply, Duration)>>,
    requests: Mutex<Vec<Recorded>>,
    token: Mutex<Option<String>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reply for `route`, e.g. `"POST auth/login"`
    pub fn on(self, route: &str, reply: Reply) -> Self {
        self.on_delayed(route, reply, Duration::ZERO)
    }

    pub fn on_delayed(self, route: &str, reply: Reply, delay: Duration) -> Self {
        self.replies.lock().insert(route.to_string(), (reply, delay));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn count(&self, route: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.route == route).count()
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<T> {
        let route = format!("{method} {}", path.trim_start_matches('/'));
        self.requests.lock().push(Recorded {
            route: route.clone(),
            token: self.token.lock().clone(),
            body,
        });
        let scripted = self.replies.lock().get(&route).cloned();
        let (reply, delay) = scripted.unwrap_or((Reply::Reject(404, None), Duration::ZERO));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Json(value) => serde_json::from_value(value)
                .map_err(|e| ClientError::InvalidResponse(e.to_string())),
            Reply::Reject(status, message) => Err(ClientError::ServerRejected { status, message }),
            Reply::Offline => Err(ClientError::Connection("connection refused".into())),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.dispatch("GET", path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        self.dispatch("POST", path, Some(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        self.dispatch("PUT", path, Some(body)).await
    }

    fn set_token(&self, token: Option<&str>) {
        *self.token.lock() = token.map(str::to_string);
    }

    fn token(&self) -> Option<String> {
        self.token.lock().clone()
    }
}

/// JSON of a user with the given id, username and wire role name
pub(crate) fn user_json(id: i64, username: &str, role: &str) -> Value {
    serde_json::json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "firstName": "Test",
        "lastName": "User",
        "phoneNumber": null,
        "role": role,
        "enabled": true,
        "createdAt": "2024-01-01T00:00:00",
        "updatedAt": "2024-01-01T00:00:00"
    })
}

pub(crate) fn auth_json(id: i64, username: &str, role: &str, token: &str) -> Value {
    serde_json::json!({ "user": user_json(id, username, role), "token": token })
}
