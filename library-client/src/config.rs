//! Client configuration

use std::path::PathBuf;

use crate::error::{ClientError, ClientResult};
use crate::http::NetworkHttpClient;
use crate::storage::{CredentialStorage, FileStorage, MemoryStorage};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Storage key holding the raw bearer credential
pub const DEFAULT_TOKEN_KEY: &str = "token";

const DEFAULT_STORAGE_FILE: &str = "storage.json";

/// Client configuration for connecting to the library API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:8080/api"), fixed for the process lifetime
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory of the persistent key/value store; `None` keeps it in memory
    pub storage_dir: Option<PathBuf>,

    /// Key under which the credential is persisted
    pub token_key: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            storage_dir: None,
            token_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }

    /// Read configuration from the environment
    ///
    /// - `LIBRARY_API_URL`: API base URL
    /// - `LIBRARY_TIMEOUT_SECS`: request timeout
    /// - `LIBRARY_STORAGE_DIR`: persistent storage directory
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("LIBRARY_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        );
        if let Some(timeout) = std::env::var("LIBRARY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = timeout;
        }
        if let Ok(dir) = std::env::var("LIBRARY_STORAGE_DIR") {
            config.storage_dir = Some(PathBuf::from(dir));
        }
        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Persist the credential under `dir`
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Set the storage key of the credential
    pub fn with_token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = key.into();
        self
    }

    /// Check the configuration before anything is built from it
    pub fn validate(&self) -> ClientResult<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ClientError::Config("base_url is required".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must start with http:// or https://, got {url}"
            )));
        }
        if self.token_key.is_empty() {
            return Err(ClientError::Config("token_key must not be empty".into()));
        }
        Ok(())
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<NetworkHttpClient> {
        self.validate()?;
        NetworkHttpClient::new(self)
    }

    /// Create the credential storage from this configuration
    pub fn build_storage(&self) -> CredentialStorage {
        match &self.storage_dir {
            Some(dir) => CredentialStorage::new(
                FileStorage::new(dir.join(DEFAULT_STORAGE_FILE)),
                &self.token_key,
            ),
            None => CredentialStorage::new(MemoryStorage::new(), &self.token_key),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
