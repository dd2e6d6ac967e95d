//! Login collaborator: local credential checks, then `POST /token/generate-token`.
//!
//! The returned token is opaque here; where it is kept is the caller's business.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::error::{AppError, FieldErrors};

pub const TOKEN_PATH: &str = "token/generate-token";
pub const DEFAULT_AUTH_MESSAGE: &str = "Invalid username or password";
pub const CONNECT_MESSAGE: &str = "Unable to connect to server. Please check your connection.";

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

pub fn validate_credentials(credentials: &Credentials) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();

    let username = credentials.username.trim();
    if username.is_empty() {
        errors.add("username", "Username is required");
    } else if username.chars().count() < MIN_USERNAME_LEN {
        errors.add("username", "Username must be at least 3 characters");
    }

    if credentials.password.trim().is_empty() {
        errors.add("password", "Password is required");
    } else if credentials.password.chars().count() < MIN_PASSWORD_LEN {
        errors.add("password", "Password must be at least 6 characters");
    }

    errors.into_result()
}

#[async_trait]
pub trait TokenBackend: Send + Sync {
    async fn generate_token(&self, credentials: &Credentials) -> Result<AuthToken, AppError>;
}

pub struct HttpTokenBackend {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTokenBackend {
    pub fn new(api_url: &Url, timeout: Duration) -> Result<Self, AppError> {
        let mut base = api_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join(TOKEN_PATH)
            .map_err(|err| AppError::Config(format!("invalid auth endpoint: {err}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Other(err.into()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TokenBackend for HttpTokenBackend {
    async fn generate_token(&self, credentials: &Credentials) -> Result<AuthToken, AppError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(credentials)
            .send()
            .await
            .map_err(|err| {
                warn!(endpoint = %self.endpoint, error = %err, "token backend unreachable");
                AppError::Network(CONNECT_MESSAGE.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AUTH_MESSAGE.to_string());
            warn!(status = status.as_u16(), "token backend refused login");
            return Err(AppError::Auth { message });
        }

        response
            .json::<AuthToken>()
            .await
            .map_err(|err| AppError::Other(anyhow::Error::new(err).context("malformed token response")))
    }
}

#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn TokenBackend>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn TokenBackend>) -> Self {
        Self { backend }
    }

    pub fn http(api_url: &Url, timeout: Duration) -> Result<Self, AppError> {
        Ok(Self::new(Arc::new(HttpTokenBackend::new(api_url, timeout)?)))
    }

    /// Field errors are returned before any network traffic happens.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken, AppError> {
        validate_credentials(credentials)?;
        let token = self.backend.generate_token(credentials).await?;
        info!(username = %credentials.username.trim(), "login succeeded");
        Ok(token)
    }
}
