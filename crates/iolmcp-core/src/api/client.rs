//! API client for communicating with the InvertirOnline REST API.
//!
//! `IolClient` owns the bearer-token session and funnels every call
//! through one authenticated-request primitive that renews the token
//! before expiry and recovers exactly once from a 401.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::{header, Client, Method, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::auth::{Clock, Credentials, Session, SystemClock};
use crate::config::Config;

use super::{ApiError, QueryParams};

/// Token endpoint, relative to the base URL
const TOKEN_PATH: &str = "/token";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(deserialize_with = "seconds")]
    expires_in: i64,
}

/// `expires_in` arrives as a number, but a numeric string is tolerated
fn seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Body of an error response; a failed read leaves it empty
async fn error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Failed to read error response body");
            String::new()
        }
    }
}

/// Result of one authenticated round trip.
enum Attempt {
    Completed(Value),
    /// 401 with the response body; the caller decides whether to recover
    Unauthorized(String),
}

/// Authenticated client for the InvertirOnline API.
/// Clone is cheap: clones share the HTTP connection pool and the session,
/// so a token obtained through one clone is seen by all of them.
#[derive(Clone)]
pub struct IolClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: Client,
    base_url: String,
    credentials: Credentials,
    token_margin: Duration,
    clock: Arc<dyn Clock>,
    session: RwLock<Option<Session>>,
}

impl fmt::Debug for IolClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IolClient")
            .field("base_url", &self.inner.base_url)
            .field("credentials", &self.inner.credentials)
            .finish_non_exhaustive()
    }
}

impl IolClient {
    /// Create a new API client using the wall clock
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a new API client with an explicit time source
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                credentials: config.credentials.clone(),
                token_margin: config.token_margin,
                clock,
                session: RwLock::new(None),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Margin-adjusted expiry of the current token, if any
    pub async fn token_expiry(&self) -> Option<DateTime<Utc>> {
        self.inner.session.read().await.as_ref().map(Session::expires_at)
    }

    pub async fn has_token(&self) -> bool {
        self.inner.session.read().await.is_some()
    }

    /// Authenticate unless a token is held and not yet expired
    pub async fn ensure_token(&self) -> Result<(), ApiError> {
        let now = self.inner.clock.now();
        let valid = self
            .inner
            .session
            .read()
            .await
            .as_ref()
            .is_some_and(|session| !session.is_expired_at(now));

        if !valid {
            debug!("No valid access token, authenticating");
            self.authenticate().await?;
        }
        Ok(())
    }

    /// Run the OAuth2 password grant and replace the session.
    ///
    /// Concurrent callers may each authenticate; the last one to finish
    /// wins and every token obtained is valid.
    pub async fn authenticate(&self) -> Result<(), ApiError> {
        let url = format!("{}{}", self.inner.base_url, TOKEN_PATH);
        let form = self.inner.credentials.password_grant_form();

        let response = self
            .inner
            .http
            .post(&url)
            .form(&form[..])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = error_body(response).await;
            error!(status = status.as_u16(), "Authentication rejected");
            return Err(ApiError::Authentication { status, body });
        }

        let text = response.text().await?;
        let grant: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("token response: {}", e)))?;

        if grant.expires_in < 0 {
            return Err(ApiError::InvalidResponse(format!(
                "token response: negative expires_in {}",
                grant.expires_in
            )));
        }
        let now = self.inner.clock.now();
        let session = Duration::try_seconds(grant.expires_in)
            .and_then(|lifetime| {
                Session::issue(grant.access_token, lifetime, now, self.inner.token_margin)
            })
            .ok_or_else(|| {
                ApiError::InvalidResponse(format!(
                    "token response: expires_in {} out of range",
                    grant.expires_in
                ))
            })?;
        info!(
            expires_at = %session.expires_at(),
            minutes = session.minutes_until_expiry(now),
            "Access token obtained"
        );

        *self.inner.session.write().await = Some(session);
        Ok(())
    }

    /// Perform an authenticated request and return the decoded JSON body.
    ///
    /// A 401 on the first attempt triggers one re-authentication and one
    /// retry of the identical request. Any other failure is returned as is.
    pub async fn request<B>(
        &self,
        method: Method,
        endpoint: &str,
        params: Option<&QueryParams>,
        body: Option<&B>,
    ) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.ensure_token().await?;
        let url = self.url_for(endpoint);

        match self.attempt(&method, &url, params, body).await? {
            Attempt::Completed(value) => Ok(value),
            Attempt::Unauthorized(_) => {
                warn!(%method, url = %url, "Token rejected, re-authenticating");
                self.authenticate().await?;

                match self.attempt(&method, &url, params, body).await? {
                    Attempt::Completed(value) => Ok(value),
                    Attempt::Unauthorized(body) => {
                        error!(%method, url = %url, "Still unauthorized after re-authentication");
                        Err(ApiError::Request {
                            status: StatusCode::UNAUTHORIZED,
                            body,
                        })
                    }
                }
            }
        }
    }

    pub async fn get(&self, endpoint: &str, params: Option<&QueryParams>) -> Result<Value, ApiError> {
        self.request::<Value>(Method::GET, endpoint, params, None).await
    }

    pub async fn post<B>(&self, endpoint: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, None, Some(body)).await
    }

    pub async fn put<B>(&self, endpoint: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, endpoint, None, Some(body)).await
    }

    pub async fn delete(&self, endpoint: &str, params: Option<&QueryParams>) -> Result<Value, ApiError> {
        self.request::<Value>(Method::DELETE, endpoint, params, None).await
    }

    fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.inner.base_url, endpoint)
        } else {
            format!("{}/{}", self.inner.base_url, endpoint)
        }
    }

    async fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let guard = self.inner.session.read().await;
        let session = guard
            .as_ref()
            .ok_or_else(|| ApiError::AuthHeader("no access token available".to_string()))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", session.token()))
                .map_err(|e| ApiError::AuthHeader(e.to_string()))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        Ok(headers)
    }

    async fn attempt<B>(
        &self,
        method: &Method,
        url: &str,
        params: Option<&QueryParams>,
        body: Option<&B>,
    ) -> Result<Attempt, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self
            .inner
            .http
            .request(method.clone(), url)
            .headers(self.auth_headers().await?);
        if let Some(params) = params.filter(|p| !p.is_empty()) {
            builder = builder.query(params);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!(%method, url = url, "Sending request");
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let body = error_body(response).await;
            return Ok(Attempt::Unauthorized(body));
        }

        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            let body = error_body(response).await;
            error!(%method, url = url, status = status.as_u16(), "Request failed");
            return Err(ApiError::Request { status, body });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Attempt::Completed(Value::Null));
        }
        serde_json::from_str(&text)
            .map(Attempt::Completed)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))
    }
}
