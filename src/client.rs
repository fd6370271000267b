//! Blocking HTTP client for HAL APIs.
//!
//! Requires the `remote` feature (enabled by default).

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::fetcher::HalClient;
use crate::transport::{Exchange, Transport, TransportFailure};
use crate::types::{HeaderSource, WriteRequest};

/// Default timeout for HTTP requests (10 seconds).
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Options for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    /// Headers sent with every request unless the request sets them itself.
    /// Write requests with user-edited headers send only those.
    pub default_headers: BTreeMap<String, String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: HTTP_TIMEOUT,
            default_headers: BTreeMap::new(),
        }
    }
}

impl ClientOptions {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a default header, replacing any previous value for `name`.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }
}

/// `reqwest`-backed implementation of [`HalClient`] and [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    default_headers: BTreeMap<String, String>,
}

impl HttpClient {
    /// # Errors
    ///
    /// Returns `FetchError::Client` if the TLS backend cannot be initialized.
    pub fn new(options: ClientOptions) -> Result<Self, FetchError> {
        let inner = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|source| FetchError::Client { source })?;

        Ok(Self {
            inner,
            default_headers: options.default_headers,
        })
    }

    pub fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    /// Add default headers not overridden by `explicit`, then `explicit`.
    fn with_headers<'a, I>(&self, mut builder: RequestBuilder, explicit: I) -> RequestBuilder
    where
        I: IntoIterator<Item = (&'a str, &'a str)> + Clone,
    {
        for (name, value) in &self.default_headers {
            let overridden = explicit
                .clone()
                .into_iter()
                .any(|(n, _)| n.eq_ignore_ascii_case(name));
            if !overridden {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        for (name, value) in explicit {
            builder = builder.header(name, value);
        }
        builder
    }
}

fn response_headers(response: &Response) -> BTreeMap<String, String> {
    response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

impl HalClient for HttpClient {
    fn get_json(&self, url: &str, accept: Option<&str>) -> Result<Value, FetchError> {
        let network = |source: reqwest::Error| FetchError::Network {
            url: url.to_string(),
            message: source.to_string(),
        };

        let explicit: Vec<(&str, &str)> = accept.map(|a| ("Accept", a)).into_iter().collect();
        let request = self.with_headers(self.inner.get(url), explicit);

        debug!(url, accept, "GET");
        let response = request.send().map_err(network)?;

        // Check for HTTP errors before parsing
        let response = response.error_for_status().map_err(network)?;
        let body = response.text().map_err(network)?;

        serde_json::from_str(&body).map_err(|source| FetchError::InvalidJson {
            url: url.to_string(),
            source,
        })
    }
}

impl Transport for HttpClient {
    fn execute(&self, request: &WriteRequest) -> Result<Exchange, TransportFailure> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|_| {
            TransportFailure::unreachable(format!("invalid HTTP method '{}'", request.method))
        })?;

        let explicit: Vec<(&str, &str)> = request
            .headers
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
            .collect();
        let target = self.inner.request(method, &request.url);
        let builder = match request.header_source {
            // The edited block started from the defaults; removals must stick.
            HeaderSource::UserText => explicit
                .into_iter()
                .fold(target, |builder, (name, value)| builder.header(name, value)),
            HeaderSource::Json => self.with_headers(target, explicit),
        }
        .body(request.body.clone());

        debug!(method = %request.method, url = %request.url, "sending write request");
        let response = builder
            .send()
            .map_err(|e| TransportFailure::unreachable(e.to_string()))?;

        let status = response.status();
        let headers = response_headers(&response);
        let body = response.text().map_err(|e| e.to_string());

        received(status, headers, body)
    }
}

/// Turn a response that arrived into an outcome.
///
/// Once a status is known it is kept, even if the body could not be read.
fn received(
    status: StatusCode,
    headers: BTreeMap<String, String>,
    body: Result<String, String>,
) -> Result<Exchange, TransportFailure> {
    let body = match body {
        Ok(body) => body,
        Err(message) => {
            return Err(TransportFailure {
                status: Some(status.as_u16()),
                headers,
                message,
            })
        }
    };

    if !status.is_success() {
        return Err(TransportFailure {
            status: Some(status.as_u16()),
            headers,
            message: status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        });
    }

    let resource = if body.trim().is_empty() {
        None
    } else {
        serde_json::from_str(&body).ok()
    };

    Ok(Exchange {
        status: status.as_u16(),
        headers,
        resource,
    })
}
