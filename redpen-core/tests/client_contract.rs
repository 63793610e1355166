//! Integration tests for the remote analysis client against an in-memory transport.
//!
//! Exercises: AnalysisClient::analyze, AnalysisClient::status, error mapping,
//! and local validation short-circuiting the network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use redpen_core::client::{HttpMethod, HttpRequest, HttpResponse};
use redpen_core::{AnalysisClient, ClientError, Transport, ValidationError};

/// Replays canned results in order and records every request it receives.
#[derive(Clone, Default)]
struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Result<HttpResponse, ClientError>>>>,
    seen: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    fn reply(self, status: u16, body: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse { status, body: body.as_bytes().to_vec() }));
        self
    }

    fn fail(self, err: ClientError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        self.seen.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("no scripted reply".into())))
    }
}

#[tokio::test]
async fn short_text_is_rejected_without_a_request() {
    let transport = ScriptedTransport::default();
    let client = AnalysisClient::new("http://svc", transport.clone());

    let err = client.analyze("hi").await.unwrap_err();

    assert_eq!(err, ClientError::Validation(ValidationError::TooShort { len: 2, min: 10 }));
    assert!(transport.requests().is_empty(), "no network request may be issued");
}

#[tokio::test]
async fn whitespace_and_oversized_text_are_rejected_locally() {
    let transport = ScriptedTransport::default();
    let client = AnalysisClient::new("http://svc", transport.clone());

    let err = client.analyze("            ").await.unwrap_err();
    assert_eq!(err, ClientError::Validation(ValidationError::WhitespaceOnly));

    let long = "a".repeat(5001);
    let err = client.analyze(&long).await.unwrap_err();
    assert_eq!(err, ClientError::Validation(ValidationError::TooLong { len: 5001, max: 5000 }));

    let err = client.analyze("").await.unwrap_err();
    assert_eq!(err, ClientError::Validation(ValidationError::Empty));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn analyze_posts_json_and_maps_suggestions() {
    let body = r#"{"suggestions": [
        {"id": "s1", "type": "GRAMMAR", "span": [0, 3], "rationale": "Misspelling",
         "improvements": [{"text": "The"}, {"text": "This"}]}
    ]}"#;
    let transport = ScriptedTransport::default().reply(200, body);
    let client = AnalysisClient::new("http://svc/", transport.clone());

    let spans = client.analyze("Teh cat sat.").await.unwrap();

    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].id, "s1");
    assert_eq!((spans[0].start, spans[0].end), (0, 3));
    let texts: Vec<&str> = spans[0].candidates.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["The", "This"]);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].url, "http://svc/api/analyze", "trailing slash on base is trimmed");
    let body = requests[0].body.as_deref().unwrap();
    let sent: serde_json::Value = serde_json::from_slice(body).unwrap();
    assert_eq!(sent, serde_json::json!({"text": "Teh cat sat."}));
}

#[tokio::test]
async fn non_2xx_surfaces_server_message() {
    let transport = ScriptedTransport::default()
        .reply(429, r#"{"message": "Too many requests, slow down"}"#)
        .reply(500, "internal error");
    let client = AnalysisClient::new("http://svc", transport);

    let err = client.analyze("Teh cat sat on the mat.").await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Service { status: 429, message: "Too many requests, slow down".into() }
    );

    let err = client.analyze("Teh cat sat on the mat.").await.unwrap_err();
    let expected = ClientError::Service {
        status: 500,
        message: "Analysis failed (HTTP 500)".into(),
    };
    assert_eq!(err, expected);
}

#[tokio::test]
async fn undecodable_success_body_is_a_service_error() {
    let transport = ScriptedTransport::default().reply(200, "<html>oops</html>");
    let client = AnalysisClient::new("http://svc", transport);

    let err = client.analyze("Teh cat sat on the mat.").await.unwrap_err();
    assert!(matches!(err, ClientError::Service { status: 200, .. }));
}

#[tokio::test]
async fn network_failure_is_distinguishable() {
    let refused = ClientError::Network("connection refused".into());
    let transport = ScriptedTransport::default().fail(refused);
    let client = AnalysisClient::new("http://svc", transport);

    let err = client.analyze("Teh cat sat on the mat.").await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert!(err.user_message().contains("analysis service"));
}

#[tokio::test]
async fn status_reads_availability_flag() {
    let transport = ScriptedTransport::default().reply(200, r#"{"available": false}"#);
    let client = AnalysisClient::new("http://svc", transport.clone());

    assert!(!client.status().await.unwrap());
    let requests = transport.requests();
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(requests[0].url, "http://svc/api/ai/status");
}

#[tokio::test]
async fn missing_status_endpoint_falls_back_to_head_request() {
    let transport = ScriptedTransport::default().reply(404, "").reply(200, "");
    let client = AnalysisClient::new("http://svc", transport.clone());

    assert!(client.status().await.unwrap());
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].method, HttpMethod::Head);
    assert_eq!(requests[1].url, "http://svc/");
}

#[tokio::test]
async fn status_service_error_is_reported() {
    let transport = ScriptedTransport::default().reply(503, r#"{"detail": "model offline"}"#);
    let client = AnalysisClient::new("http://svc", transport);

    let err = client.status().await.unwrap_err();
    assert_eq!(err, ClientError::Service { status: 503, message: "model offline".into() });
}
