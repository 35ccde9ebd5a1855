//! HTTP transport implementation using `reqwest`.

use std::time::Duration;

use crate::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};

/// Timeouts and identification for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Maximum time to establish a TCP/TLS connection.
    pub connect_timeout: Duration,
    /// Maximum time for a whole request, body included.
    pub request_timeout: Duration,
    /// Sent as the `User-Agent` header.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("riftpulse/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

/// A `reqwest`-backed [`HttpTransport`].
///
/// Cloning is cheap: `reqwest::Client` is an `Arc` around a shared
/// connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with the given timeouts.
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Setup(std::io::Error::other(e)))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await.map_err(|e| {
            TransportError::RequestFailed(std::io::Error::other(e))
        })?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            TransportError::ReceiveFailed(std::io::Error::other(e))
        })?;

        tracing::debug!(
            id = %request.id,
            method = %request.method,
            url = %request.url,
            status,
            "http exchange complete"
        );

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
