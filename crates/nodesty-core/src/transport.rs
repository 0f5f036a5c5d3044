//! Shared HTTP transport with authentication, retries and result normalization.
//!
//! One [`HttpTransport`] is built per application and cloned into every domain
//! client. Clones share the connection pool and the mutable credential and base
//! URL, so rotating a token is a single write visible everywhere.

use crate::client::{
    Backoff, ClientConfig, RetryPolicy, TokioBackoff, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT,
    MAX_RETRIES_LIMIT,
};
use crate::config::ApiConfig;
use crate::response::{ApiResponse, FailureKind};
use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("nodesty-rust/", env!("CARGO_PKG_VERSION"));

/// Scheme prefix of the `Authorization` header.
pub const AUTH_SCHEME: &str = "PAT";

const SUPPORTED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Timeout for this call only
    pub timeout: Option<Duration>,
    /// Retry ceiling for this call only
    pub max_retries: Option<u32>,
    /// Extra headers; `Authorization` is always set by the transport
    pub headers: HeaderMap,
}

impl CallOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the retry ceiling, clamped to [`MAX_RETRIES_LIMIT`].
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries.min(MAX_RETRIES_LIMIT));
        self
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Builder for [`HttpTransport`].
pub struct HttpTransportBuilder {
    api_key: SecretString,
    base_url: String,
    http_config: ClientConfig,
    retry_policy: RetryPolicy,
    backoff: Arc<dyn Backoff>,
}

impl HttpTransportBuilder {
    /// Create a builder for the given personal access token.
    pub fn new(api_key: impl Into<String>) -> Self {
        let http_config = ClientConfig::new();
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            retry_policy: http_config.retry_policy,
            http_config,
            backoff: Arc::new(TokioBackoff),
        }
    }

    /// Create a builder from a validated [`ApiConfig`].
    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.api_key.expose_secret())
            .with_base_url(config.base_url.clone())
            .with_timeout(config.timeout())
            .with_max_retries(config.max_retries)
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_config = self.http_config.with_timeout(timeout);
        self
    }

    /// Override the maximum number of retries.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.retry_policy = self.retry_policy.with_max_retries(retries);
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.retry_policy = config.retry_policy;
        self.http_config = config;
        self
    }

    /// Replace the timer used between retries.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.backoff = backoff;
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty, the retry ceiling exceeds
    /// [`MAX_RETRIES_LIMIT`], the base URL is not an `http(s)` URL, or the HTTP
    /// client cannot be created.
    pub fn build(self) -> Result<HttpTransport> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(Error::ConfigError("API key must not be empty".to_string()));
        }
        if self.retry_policy.max_retries > MAX_RETRIES_LIMIT {
            return Err(Error::ConfigError(format!(
                "max_retries must be at most {MAX_RETRIES_LIMIT}, got {}",
                self.retry_policy.max_retries
            )));
        }

        let base_url = parse_base_url(&self.base_url)?;

        let mut builder = ClientBuilder::new()
            .timeout(self.http_config.timeout)
            .user_agent(USER_AGENT)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT));

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpTransport {
            inner: Arc::new(TransportInner {
                http,
                credential: RwLock::new(Arc::new(self.api_key)),
                base_url: RwLock::new(Arc::new(base_url)),
                retry_policy: self.retry_policy,
                backoff: self.backoff,
            }),
        })
    }
}

impl fmt::Debug for HttpTransportBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransportBuilder")
            .field("base_url", &self.base_url)
            .field("http_config", &self.http_config)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

struct TransportInner {
    http: Client,
    credential: RwLock<Arc<SecretString>>,
    base_url: RwLock<Arc<Url>>,
    retry_policy: RetryPolicy,
    backoff: Arc<dyn Backoff>,
}

/// Authenticated HTTP transport shared by all domain clients.
#[derive(Clone)]
pub struct HttpTransport {
    inner: Arc<TransportInner>,
}

/// A request frozen at dispatch time; retries resend it unchanged.
struct PreparedRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    timeout: Option<Duration>,
}

enum Attempt {
    Response { status: StatusCode, body: Vec<u8> },
    NoResponse(String),
    NotSent(String),
}

impl HttpTransport {
    /// Create a transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        HttpTransportBuilder::new(api_key).build()
    }

    /// Create a transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        config.check()?;
        HttpTransportBuilder::from_config(config).build()
    }

    /// Start a builder.
    pub fn builder(api_key: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder::new(api_key)
    }

    /// Current base URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::clone(&self.read_base_url())
    }

    /// Configured retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.inner.retry_policy
    }

    /// Replace the credential used by every subsequent call on this transport
    /// and all of its clones. Calls already dispatched keep the old one.
    pub fn update_credential(&self, api_key: impl Into<String>) {
        let credential = Arc::new(SecretString::from(api_key.into()));
        *self
            .inner
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner) = credential;
        debug!("Nodesty credential updated");
    }

    /// Replace the base URL used by every subsequent call.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an `http(s)` URL; the previous base
    /// URL stays in effect.
    pub fn update_base_url(&self, base_url: impl AsRef<str>) -> Result<()> {
        let url = Arc::new(parse_base_url(base_url.as_ref())?);
        debug!(base_url = %url, "Nodesty base URL updated");
        *self
            .inner
            .base_url
            .write()
            .unwrap_or_else(PoisonError::into_inner) = url;
        Ok(())
    }

    /// `GET` a path.
    pub async fn get<T>(&self, path: &str) -> ApiResponse<T>
    where
        T: DeserializeOwned,
    {
        self.call::<(), T>(Method::GET, path, None, None).await
    }

    /// `POST` a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call(Method::POST, path, Some(body), None).await
    }

    /// `PUT` a JSON body.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call(Method::PUT, path, Some(body), None).await
    }

    /// `PATCH` a JSON body.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call(Method::PATCH, path, Some(body), None).await
    }

    /// `DELETE` a path.
    pub async fn delete<T>(&self, path: &str) -> ApiResponse<T>
    where
        T: DeserializeOwned,
    {
        self.call::<(), T>(Method::DELETE, path, None, None).await
    }

    /// Execute one logical call and normalize its outcome.
    ///
    /// Responses with a 5xx status are retried up to the retry ceiling, waiting
    /// `2^n * base_delay` before retry `n`. Everything else resolves at once.
    /// This never fails: every outcome is an [`ApiResponse`].
    pub async fn call<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: Option<&CallOptions>,
    ) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = match self.prepare(method, path, body, options) {
            Ok(request) => request,
            Err(reason) => {
                warn!(path, %reason, "Nodesty request could not be built");
                return ApiResponse::request_error(reason);
            }
        };

        let policy = match options.and_then(|options| options.max_retries) {
            Some(retries) => self
                .inner
                .retry_policy
                .with_max_retries(retries.min(MAX_RETRIES_LIMIT)),
            None => self.inner.retry_policy,
        };

        let mut retries: u32 = 0;
        loop {
            let attempts = retries + 1;
            debug!(method = %request.method, path, attempt = attempts, "Nodesty request");

            match self.dispatch(&request).await {
                Attempt::Response { status, body } if status.is_success() => {
                    return decode_success(status, &body).with_attempts(attempts);
                }
                Attempt::Response { status, body } => {
                    if policy.should_retry(status, retries) {
                        retries += 1;
                        let delay = policy.delay_for_attempt(retries);
                        debug!(path, %status, retry = retries, "Retrying Nodesty request after {:?}", delay);
                        self.inner.backoff.wait(delay).await;
                        continue;
                    }

                    if status.is_server_error() {
                        warn!(path, %status, attempts, "Nodesty request failed with server error");
                    }
                    return status_failure(status, &body).with_attempts(attempts);
                }
                Attempt::NoResponse(reason) => {
                    warn!(path, %reason, "No response from Nodesty");
                    return ApiResponse::failure(
                        FailureKind::NetworkError,
                        "Network Error",
                        "No response received from server",
                    )
                    .with_attempts(attempts);
                }
                Attempt::NotSent(reason) => {
                    warn!(path, %reason, "Nodesty request could not be sent");
                    return ApiResponse::request_error(reason).with_attempts(attempts);
                }
            }
        }
    }

    fn prepare<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: Option<&CallOptions>,
    ) -> std::result::Result<PreparedRequest, String>
    where
        B: Serialize + ?Sized,
    {
        if !SUPPORTED_METHODS.contains(&method) {
            return Err(format!("Unsupported HTTP method {method}"));
        }

        // Credential and endpoint are captured once; retries reuse them.
        let credential = self.read_credential();
        let base_url = self.read_base_url();
        let url = join_path(&base_url, path)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(options) = options {
            for (name, value) in &options.headers {
                if *name != AUTHORIZATION {
                    headers.insert(name.clone(), value.clone());
                }
            }
        }

        let mut authorization =
            HeaderValue::from_str(&format!("{AUTH_SCHEME} {}", credential.expose_secret()))
                .map_err(|_| "API key is not a valid header value".to_string())?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|err| format!("Failed to serialize request body: {err}"))?;

        Ok(PreparedRequest {
            method,
            url,
            headers,
            body,
            timeout: options.and_then(|options| options.timeout),
        })
    }

    async fn dispatch(&self, request: &PreparedRequest) -> Attempt {
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        match builder.send().await {
            Ok(response) => {
                let status = response.status();
                match response.bytes().await {
                    Ok(bytes) => Attempt::Response {
                        status,
                        body: bytes.to_vec(),
                    },
                    Err(err) => Attempt::NoResponse(err.to_string()),
                }
            }
            Err(err) if err.is_builder() => Attempt::NotSent(err.to_string()),
            Err(err) => Attempt::NoResponse(err.to_string()),
        }
    }

    fn read_credential(&self) -> Arc<SecretString> {
        Arc::clone(
            &self
                .inner
                .credential
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    fn read_base_url(&self) -> Arc<Url> {
        Arc::clone(
            &self
                .inner
                .base_url
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.read_base_url().as_str())
            .field("retry_policy", &self.inner.retry_policy)
            .finish_non_exhaustive()
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|err| Error::ConfigError(format!("Invalid base URL `{raw}`: {err}")))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(Error::InvalidEndpoint(format!(
            "Base URL `{raw}` must be an http(s) URL"
        )));
    }

    // A trailing slash makes `join` append instead of replacing the last segment.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

fn join_path(base_url: &Url, path: &str) -> std::result::Result<Url, String> {
    let relative = path.trim_start_matches('/');
    let url = base_url
        .join(relative)
        .map_err(|err| format!("Invalid request path `{path}`: {err}"))?;

    if url.origin() != base_url.origin() {
        return Err(format!("Request path `{path}` leaves the configured host"));
    }

    Ok(url)
}

/// Statuses without a registered reason phrase render as `HTTP <code>`.
fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned)
}

/// Decode a non-empty 2xx body. A body that is not JSON at all is offered to
/// `T` as a plain string, so text replies still reach untyped callers.
fn decode_body<T>(body: &[u8]) -> serde_json::Result<T>
where
    T: DeserializeOwned,
{
    match serde_json::from_slice::<T>(body) {
        Ok(data) => Ok(data),
        Err(err) if err.is_syntax() || err.is_eof() => {
            let text = String::from_utf8_lossy(body).into_owned();
            serde_json::from_value(serde_json::Value::String(text)).map_err(|_| err)
        }
        Err(err) => Err(err),
    }
}

fn decode_success<T>(status: StatusCode, body: &[u8]) -> ApiResponse<T>
where
    T: DeserializeOwned,
{
    let code = status.as_u16();
    if body.iter().all(u8::is_ascii_whitespace) {
        return ApiResponse::ok(None, status_text(status)).with_status(code);
    }

    match decode_body::<T>(body) {
        Ok(data) => ApiResponse::ok(Some(data), status_text(status)).with_status(code),
        Err(err) => ApiResponse::failure(
            FailureKind::DecodeError,
            "Decode Error",
            format!("Failed to decode response body: {err}"),
        )
        .with_status(code),
    }
}

fn status_failure<T>(status: StatusCode, body: &[u8]) -> ApiResponse<T> {
    let reason = status.canonical_reason();
    let error = server_message(body)
        .or_else(|| reason.map(str::to_owned))
        .unwrap_or_else(|| "API Error".to_string());
    let message = match reason {
        Some(reason) => format!("HTTP {}: {reason}", status.as_u16()),
        None => format!("HTTP {}", status.as_u16()),
    };
    let kind = if status.is_server_error() {
        FailureKind::ServerError
    } else {
        FailureKind::ClientError
    };

    ApiResponse::failure(kind, error, message)
        .with_status(status.as_u16())
}

fn server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}
