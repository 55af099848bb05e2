//! Low-level HTTP access to the store-rating API.

use crate::Error;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storerate_core::{LoginForm, Role, SessionRecord, SignupForm, UserId};
use tracing::{debug, warn};

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// WIRE TYPES
// =============================================================================

/// `user` object of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginUser {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: LoginUser,
    #[serde(default)]
    pub token: Option<String>,
}

impl LoginResponse {
    /// Build the session record kept after login.
    pub fn into_record(self) -> SessionRecord {
        let record = SessionRecord::new(self.user.id, self.user.name, self.user.role);
        match self.token {
            Some(token) => record.with_token(token),
            None => record,
        }
    }
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the store-rating API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given base URL with the default timeout.
    ///
    /// ```rust,ignore
    /// let api = ApiClient::new("http://localhost:5000/api");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base(base_url.into()),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a client with a custom timeout and an optional bearer token
    /// sent with every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Server`] if the token contains invalid header
    /// characters, or [`Error::Http`] if the HTTP client fails to build.
    pub fn with_options(
        base_url: impl Into<String>,
        timeout: Duration,
        token: Option<&str>,
    ) -> Result<Self, Error> {
        use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                Error::Server {
                    status: 0,
                    message: Some(format!("Invalid token header: {}", e)),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            base_url: normalize_base(base_url.into()),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!(%url, "GET");
        let bytes = Self::checked(self.client.get(&url), &url).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");
        let bytes = Self::checked(self.client.post(&url).json(body), &url).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// POST where any success status is enough and the body is ignored.
    pub(crate) async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), Error>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(%url, "POST");
        Self::checked(self.client.post(&url).json(body), &url).await?;
        Ok(())
    }

    /// Send a request and return the body of a success response.
    ///
    /// Non-success statuses become [`Error::Server`] carrying the body's
    /// `message` field when it has one.
    async fn checked(request: RequestBuilder, url: &str) -> Result<Vec<u8>, Error> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.message);
            warn!(%url, status = status.as_u16(), ?message, "request rejected");
            return Err(Error::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(bytes.to_vec())
    }

    // =========================================================================
    // AUTH ENDPOINTS
    // =========================================================================

    /// `POST /auth/login`.
    pub async fn login(&self, form: &LoginForm) -> Result<LoginResponse, Error> {
        self.post_json("auth/login", form).await
    }

    /// `POST /auth/signup`. Any success status counts.
    pub async fn signup(&self, form: &SignupForm) -> Result<(), Error> {
        self.post_unit("auth/signup", &form.to_new_user()).await
    }
}

fn normalize_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}
