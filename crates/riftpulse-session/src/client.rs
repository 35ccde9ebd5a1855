//! The configured HTTP client every backend call goes through.
//!
//! [`HttpClient`] holds the base address and the default headers, and
//! turns an [`ApiRequest`] (an endpoint plus an optional body) into a
//! concrete [`HttpRequest`] for the transport. It knows nothing about
//! tokens beyond the `Authorization` default it is told to carry.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use riftpulse_protocol::{Codec, Endpoint, JsonCodec, error_detail};
use riftpulse_transport::{HttpRequest, HttpResponse, HttpTransport, RequestId};
use serde::Serialize;
use url::Url;

use crate::SessionError;

const AUTHORIZATION: &str = "Authorization";
const BEARER_PREFIX: &str = "Bearer ";

// ---------------------------------------------------------------------------
// ApiRequest
// ---------------------------------------------------------------------------

/// One logical call to the backend.
///
/// `retried` marks a request that has already been re-issued after a
/// token refresh. It travels with the request value, so two requests in
/// flight never share it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub id: RequestId,
    pub endpoint: Endpoint,
    pub body: Option<Vec<u8>>,
    pub retried: bool,
}

impl ApiRequest {
    /// A request without a body.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            id: RequestId::next(),
            endpoint,
            body: None,
            retried: false,
        }
    }

    /// A request carrying `body` encoded as JSON.
    ///
    /// # Errors
    /// Returns `SessionError::Protocol` if `body` fails to serialize.
    pub fn json(endpoint: Endpoint, body: &impl Serialize) -> Result<Self, SessionError> {
        let mut request = Self::new(endpoint);
        request.body = Some(JsonCodec.encode(body)?);
        Ok(request)
    }
}

// ---------------------------------------------------------------------------
// HttpClient
// ---------------------------------------------------------------------------

/// Base address, default headers, and a transport.
///
/// Default headers are read at the moment a request is built, so a
/// request re-issued after a refresh picks up the new bearer token.
pub struct HttpClient<T: HttpTransport> {
    transport: T,
    base_url: Url,
    default_headers: RwLock<BTreeMap<String, String>>,
    codec: JsonCodec,
}

impl<T: HttpTransport> HttpClient<T> {
    /// Creates a client that sends every request through `transport`.
    pub fn new(transport: T, base_url: Url) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_owned(), "application/json".to_owned());
        Self {
            transport,
            base_url,
            default_headers: RwLock::new(headers),
            codec: JsonCodec,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    /// Sets a header sent with every request.
    pub fn set_default_header(&self, name: impl Into<String>, value: impl Into<String>) {
        self.default_headers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
    }

    pub fn remove_default_header(&self, name: &str) {
        self.default_headers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
    }

    pub fn default_header(&self, name: &str) -> Option<String> {
        self.default_headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Attaches `Authorization: Bearer <token>` to every request.
    pub fn set_bearer(&self, token: &str) {
        self.set_default_header(AUTHORIZATION, format!("{BEARER_PREFIX}{token}"));
    }

    pub fn clear_bearer(&self) {
        self.remove_default_header(AUTHORIZATION);
    }

    /// The token currently attached as the bearer default.
    pub fn bearer(&self) -> Option<String> {
        self.default_header(AUTHORIZATION)
            .and_then(|v| v.strip_prefix(BEARER_PREFIX).map(str::to_owned))
    }

    /// Builds the concrete request: absolute URL, current default
    /// headers, body.
    ///
    /// # Errors
    /// Returns `SessionError::Protocol` if the URL cannot be built.
    pub fn prepare(&self, request: &ApiRequest) -> Result<HttpRequest, SessionError> {
        let url = request.endpoint.url(&self.base_url)?;
        let mut outgoing = HttpRequest::new(request.id, request.endpoint.method(), url.as_str());

        let headers = self
            .default_headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for (name, value) in headers {
            outgoing = outgoing.header(name, value);
        }
        if let Some(body) = &request.body {
            outgoing = outgoing.json_body(body.clone());
        }
        Ok(outgoing)
    }

    /// Sends an already prepared request. Any status is `Ok`.
    ///
    /// # Errors
    /// Returns `SessionError::Transport` if no response was obtained.
    pub async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, SessionError> {
        let id = request.id;
        let method = request.method;
        tracing::debug!(%id, %method, url = %request.url, "sending request");

        let response = self.transport.send(request).await?;

        tracing::debug!(%id, status = response.status, "response received");
        Ok(response)
    }

    /// Prepares and sends `request` once, without any refresh handling,
    /// and turns a non-2xx answer into an error.
    ///
    /// # Errors
    /// Returns `SessionError::Status` for a non-2xx answer, or the
    /// errors of [`prepare`](Self::prepare) and [`dispatch`](Self::dispatch).
    pub async fn send(&self, request: &ApiRequest) -> Result<HttpResponse, SessionError> {
        let outgoing = self.prepare(request)?;
        error_for_status(self.dispatch(outgoing).await?)
    }
}

/// Extracts the bearer token a prepared request carries.
pub(crate) fn bearer_of(request: &HttpRequest) -> Option<String> {
    request
        .header_value(AUTHORIZATION)
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .map(str::to_owned)
}

/// Passes 2xx responses through and turns anything else into
/// `SessionError::Status`.
pub(crate) fn error_for_status(response: HttpResponse) -> Result<HttpResponse, SessionError> {
    if response.is_success() {
        return Ok(response);
    }
    Err(SessionError::Status {
        status: response.status,
        detail: error_detail(&response.body),
        body: response.body,
    })
}
