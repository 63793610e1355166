//! Request/response wrapper around the external analysis service.
//!
//! [`AnalysisClient`] owns the contract (validation, paths, JSON shapes, error
//! mapping) and delegates the bytes to a [`Transport`]. Production code uses
//! [`HyperTransport`]; tests plug in an in-memory transport.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::error::ClientError;
use crate::protocol::{AnalyzeRequest, AnalyzeResponse, ErrorBody, StatusResponse};
use crate::types::Span;
use crate::validation::validate_text;

pub const ANALYZE_PATH: &str = "/api/analyze";
pub const STATUS_PATH: &str = "/api/ai/status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
}

/// A request as the client hands it to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves one request over the wire.
///
/// Implementations report every failure to obtain a response (connect error,
/// timeout, malformed URL) as [`ClientError::Network`]. Any response,
/// including non-2xx, is `Ok`.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ClientError>> + Send;
}

/// Plain HTTP/1 transport over a hyper-util pooled client.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
    timeout: Duration,
}

impl HyperTransport {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { client, timeout }
    }
}

impl Transport for HyperTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let uri: hyper::Uri = request
            .url
            .parse()
            .map_err(|e| ClientError::Network(format!("invalid url {}: {e}", request.url)))?;
        let method = match request.method {
            HttpMethod::Get => hyper::Method::GET,
            HttpMethod::Head => hyper::Method::HEAD,
            HttpMethod::Post => hyper::Method::POST,
        };
        let mut builder = hyper::Request::builder().method(method).uri(uri);
        if request.body.is_some() {
            builder = builder.header(hyper::header::CONTENT_TYPE, "application/json");
        }
        let body = request.body.map(Bytes::from).unwrap_or_default();
        let req = builder
            .body(Full::new(body))
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let exchange = async {
            let resp = self
                .client
                .request(req)
                .await
                .map_err(|e| ClientError::Network(e.to_string()))?;
            let status = resp.status().as_u16();
            let body = resp
                .into_body()
                .collect()
                .await
                .map_err(|e| ClientError::Network(e.to_string()))?
                .to_bytes();
            Ok(HttpResponse { status, body: body.to_vec() })
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Network(format!(
                "request timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

pub struct AnalysisClient<T> {
    base_url: String,
    transport: T,
}

impl<T: Transport> AnalysisClient<T> {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, transport }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends `text` for analysis and maps the response into spans.
    ///
    /// Text failing [`validate_text`] is rejected without a request.
    ///
    /// # Errors
    ///
    /// `Validation`, `Network`, or `Service` (non-2xx status or undecodable body).
    pub async fn analyze(&self, text: &str) -> Result<Vec<Span>, ClientError> {
        validate_text(text)?;
        let body = serde_json::to_vec(&AnalyzeRequest { text })
            .map_err(|e| ClientError::Network(format!("could not encode request: {e}")))?;
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.url(ANALYZE_PATH),
            body: Some(body),
        };

        tracing::debug!(target: "client", chars = text.chars().count(), "sending analyze request");
        let resp = self.transport.send(request).await?;
        if !resp.is_success() {
            return Err(service_error(&resp, "Analysis failed"));
        }
        let decoded: AnalyzeResponse =
            serde_json::from_slice(&resp.body).map_err(|e| ClientError::Service {
                status: resp.status,
                message: format!("Unreadable analysis response: {e}"),
            })?;
        let spans = decoded.into_spans(text.chars().count());
        tracing::debug!(target: "client", suggestions = spans.len(), "analyze response decoded");
        Ok(spans)
    }

    /// Asks whether the AI backend is available.
    ///
    /// Falls back to a `HEAD` request to the service root when the status
    /// endpoint does not exist (404); a 2xx answer means available.
    pub async fn status(&self) -> Result<bool, ClientError> {
        let request =
            HttpRequest { method: HttpMethod::Get, url: self.url(STATUS_PATH), body: None };
        let resp = self.transport.send(request).await?;
        if resp.is_success() {
            let status: StatusResponse =
                serde_json::from_slice(&resp.body).map_err(|e| ClientError::Service {
                    status: resp.status,
                    message: format!("Unreadable status response: {e}"),
                })?;
            return Ok(status.available);
        }
        if resp.status != 404 {
            return Err(service_error(&resp, "AI service unavailable"));
        }

        tracing::debug!(target: "client", "status endpoint missing; probing service root");
        let head = HttpRequest { method: HttpMethod::Head, url: self.url("/"), body: None };
        let resp = self.transport.send(head).await?;
        Ok(resp.is_success())
    }
}

fn service_error(resp: &HttpResponse, fallback: &str) -> ClientError {
    let message = serde_json::from_slice::<ErrorBody>(&resp.body)
        .ok()
        .and_then(|b| b.text())
        .unwrap_or_else(|| format!("{fallback} (HTTP {})", resp.status));
    ClientError::Service { status: resp.status, message }
}
