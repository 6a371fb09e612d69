//! Shared fakes for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use serde_json::Value;

use crate::config::ClientConfig;
use crate::time::{Clock, Sleeper};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

pub const API_KEY: &str = "sk_test0123456789abcdefghij";
pub const BASE_URL: &str = "https://api.test/v1";
pub const NOW_MS: u64 = 1_700_000_000_000;

/// Mock HTTP client that replays a queue of responses.
///
/// Once the queue is drained, every request fails with a connection error.
#[derive(Debug, Default)]
pub struct MockClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
    delay: Option<Duration>,
}

impl MockClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn ok(data: Value) -> Self {
        Self::new(vec![Ok(envelope(200, data))])
    }

    pub fn failing() -> Self {
        Self::new(vec![])
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
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(connection_refused()))
    }
}

pub fn connection_refused() -> HttpError {
    HttpError::Connection(Box::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    )))
}

/// Clock whose time only moves when told to.
#[derive(Debug, Clone)]
pub struct MockClock {
    millis: Arc<AtomicU64>,
}

impl MockClock {
    pub fn new(initial_millis: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(initial_millis)),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let millis = u64::try_from(duration.as_millis()).unwrap();
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Sleeper that returns immediately and records every requested delay.
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

pub fn test_config() -> ClientConfig {
    ClientConfig::new()
        .with_api_key(API_KEY)
        .with_base_url(BASE_URL)
}

/// A JSON response with the given status and raw body.
pub fn json_response(status: u16, body: &Value) -> HttpResponse {
    let mut headers = http::HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json; charset=utf-8"),
    );
    HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        headers,
        serde_json::to_vec(body).unwrap(),
    )
}

/// A successful envelope around `data`.
pub fn envelope(status: u16, data: Value) -> HttpResponse {
    json_response(status, &serde_json::json!({ "success": true, "data": data }))
}

/// An error envelope.
pub fn error_envelope(status: u16, message: &str) -> HttpResponse {
    json_response(status, &serde_json::json!({ "success": false, "error": message }))
}

/// A response with an arbitrary content type.
pub fn raw_response(status: u16, content_type: &'static str, body: &str) -> HttpResponse {
    let mut headers = http::HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static(content_type),
    );
    HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        headers,
        body.as_bytes().to_vec(),
    )
}

/// Adds a header to a response.
pub fn with_header(mut response: HttpResponse, name: &'static str, value: &str) -> HttpResponse {
    response
        .headers
        .insert(name, http::HeaderValue::from_str(value).unwrap());
    response
}

pub fn request_json(request: &HttpRequest) -> Value {
    serde_json::from_slice(request.body.as_deref().expect("request has no body")).unwrap()
}
