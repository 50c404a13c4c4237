//! The one place that touches the network.
//!
//! `Transport` wraps a pre-configured `reqwest::Client` and executes the
//! plain-data `HttpRequest` values produced by [`crate::client::TaskClient`].
//! Every non-network concern (status interpretation, JSON) stays in the
//! parser, so 4xx/5xx responses come back as data rather than errors.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method};
use tracing::warn;

use crate::config::{TransportConfig, DEFAULT_BASE_URL};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Shared HTTP client bound to one base address. Cloning is cheap and the
/// clones share a connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base_url: String,
}

impl Transport {
    pub fn new(config: &TransportConfig) -> Result<Self, ApiError> {
        let mut config = config.clone();
        if config.base_url.trim().is_empty() {
            warn!(fallback = DEFAULT_BASE_URL, "transport built without a base address, using fallback");
            config.base_url = DEFAULT_BASE_URL.to_string();
        }
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if config.accept_invalid_certs {
            warn!("TLS certificate validation disabled for development");
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform the round-trip. Only failures to complete the exchange are
    /// errors; any status code is returned as a response.
    pub async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.client.request(method(req.method), &req.url);
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn transport_error(&self, source: reqwest::Error) -> ApiError {
        ApiError::Transport {
            base_url: self.base_url.clone(),
            source,
        }
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}
