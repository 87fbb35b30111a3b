//! Shared test doubles for the transport and backoff seams.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::client::Pixela;
use crate::time::{InstantSleeper, Sleeper};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

pub const USER_NAME: &str = "user";
pub const TOKEN: &str = "token";
pub const GRAPH_ID: &str = "graph-id";

pub const OK_BODY: &str = r#"{"message":"Success.","isSuccess":true}"#;
pub const FAILED_BODY: &str = r#"{"message":"failed.","isSuccess":false}"#;
pub const REJECTED_BODY: &str =
    r#"{"message":"Please retry this request.","isSuccess":false,"isRejected":true}"#;
pub const PAGE_NOT_FOUND_BODY: &str = "404 page not found";

/// Mock HTTP client that returns a configurable sequence of responses.
///
/// When the script runs out, the last response is repeated.
#[derive(Debug)]
pub struct MockClient {
    responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self::new(vec![Ok(response(status, body))])
    }

    pub fn ok() -> Self {
        Self::status(200, OK_BODY)
    }

    pub fn api_failed() -> Self {
        Self::status(404, FAILED_BODY)
    }

    pub fn page_not_found() -> Self {
        Self::status(404, PAGE_NOT_FOUND_BODY)
    }

    pub fn always_rejected() -> Self {
        Self::status(503, REJECTED_BODY)
    }

    pub fn rejected_then(rejections: usize, status: u16, body: &str) -> Self {
        let mut responses: Vec<_> = (0..rejections)
            .map(|_| Ok(response(503, REJECTED_BODY)))
            .collect();
        responses.push(Ok(response(status, body)));
        Self::new(responses)
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    fn next_response(&self) -> Result<HttpResponse, HttpError> {
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            return responses.remove(0);
        }
        match responses.first() {
            Some(Ok(resp)) => Ok(resp.clone()),
            Some(Err(_)) => responses.remove(0),
            None => Err(HttpError::InvalidUrl("script exhausted".to_string())),
        }
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.next_response()
    }
}

impl HttpClient for Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).request(req).await
    }
}

/// Sleeper that records every requested delay and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

pub fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    )
}

/// Builds a client for `USER_NAME`/`TOKEN` backed by the given mock.
pub fn pixela(mock: &Arc<MockClient>) -> Pixela<Arc<MockClient>, InstantSleeper> {
    Pixela::builder(USER_NAME, TOKEN)
        .with_http_client(Arc::clone(mock))
        .with_sleeper(InstantSleeper)
        .build()
        .unwrap()
}

pub fn body_text(req: &HttpRequest) -> String {
    String::from_utf8(req.body.clone()).unwrap()
}

pub fn token_header(req: &HttpRequest) -> Option<&str> {
    req.headers
        .get("X-USER-TOKEN")
        .and_then(|v| v.to_str().ok())
}
