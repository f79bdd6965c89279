//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the static browser-like header set
//! - Gating every request on one run-wide concurrency bound
//! - Folding every failure (status, timeout, connection, body) into "no data"

use crate::config::{Config, HeadersConfig};
use crate::HarvestError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

/// Why a fetch produced no data
///
/// Only used for the log line; callers see `None` regardless of the cause.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("{0}")]
    Request(String),

    #[error("concurrency bound closed")]
    Closed,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            Self::Body(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// A single request: method, URL, extra headers and an optional form body
///
/// Extra headers are merged over the client's base header set.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub method: Method,
    pub headers: HeaderMap,
    pub form: Option<Vec<(String, String)>>,
}

impl FetchRequest {
    /// A plain GET with the base headers only
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            headers: HeaderMap::new(),
            form: None,
        }
    }

    /// A POST carrying a urlencoded form body
    pub fn post_form(url: impl Into<String>, form: Vec<(String, String)>) -> Self {
        Self {
            url: url.into(),
            method: Method::POST,
            headers: HeaderMap::new(),
            form: Some(form),
        }
    }

    /// Replaces the extra headers of this request
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Builds the static header set sent with every request
pub fn base_headers(config: &HeadersConfig) -> Result<HeaderMap, HarvestError> {
    let mut headers = HeaderMap::new();
    insert_header(&mut headers, USER_AGENT, &config.user_agent)?;
    insert_header(&mut headers, ACCEPT, &config.accept)?;
    insert_header(&mut headers, ACCEPT_LANGUAGE, &config.accept_language)?;
    insert_header(&mut headers, HeaderName::from_static("dnt"), &config.dnt)?;
    Ok(headers)
}

fn insert_header(
    headers: &mut HeaderMap,
    name: HeaderName,
    value: &str,
) -> Result<(), HarvestError> {
    let value = HeaderValue::from_str(value).map_err(|_| HarvestError::InvalidHeader {
        name: name.to_string(),
        value: value.to_string(),
    })?;
    headers.insert(name, value);
    Ok(())
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The full run configuration (headers, timeout, pool size)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(HarvestError)` - A header value was invalid or the client failed to build
pub fn build_http_client(config: &Config) -> Result<Client, HarvestError> {
    let client = Client::builder()
        .default_headers(base_headers(&config.headers)?)
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(config.crawler.max_idle_connections)
        .gzip(true)
        .brotli(true)
        .build()?;
    Ok(client)
}

/// Issues requests under a run-wide bound on in-flight requests
///
/// Cloning a `Fetcher` shares both the client and the bound.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    permits: Arc<Semaphore>,
    max_in_flight: usize,
}

impl Fetcher {
    /// Wraps a client with a bound of `max_in_flight` concurrent requests
    pub fn new(client: Client, max_in_flight: usize) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
        }
    }

    /// Builds the client and the bound from configuration
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(config)?;
        Ok(Self::new(
            client,
            config.crawler.max_concurrent_requests as usize,
        ))
    }

    /// Configured bound
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Slots currently free
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Fetches a URL and returns its body text
    ///
    /// One slot of the bound is held for the whole request and released when
    /// this call returns, whatever the outcome. Non-2xx statuses, timeouts and
    /// transport errors are logged with the URL and reported as `None`.
    pub async fn fetch(&self, request: FetchRequest) -> Option<String> {
        let result = match self.permits.acquire().await {
            Ok(_permit) => self.send(&request).await,
            Err(_) => Err(FetchError::Closed),
        };

        match result {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "Error fetching {}", request.url);
                None
            }
        }
    }

    async fn send(&self, request: &FetchRequest) -> Result<String, FetchError> {
        tracing::debug!(url = %request.url, method = %request.method, "Sending request");

        let mut builder = self.client.request(request.method.clone(), &request.url);
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }
        builder = builder.headers(request.headers.clone());

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        Ok(response.text().await?)
    }
}
