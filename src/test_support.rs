use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::adapters::transport::{ApiRequest, ApiResponse, Transport, TransportError};

#[derive(Default)]
pub struct SpyTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
}

impl SpyTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, result: Result<ApiResponse, TransportError>) {
        self.responses
            .lock()
            .expect("spy responses lock")
            .push_back(result);
    }

    pub fn respond_json(&self, body: Value) {
        self.respond(Ok(ApiResponse::ok_json(&body)));
    }

    pub fn respond_text(&self, body: &str) {
        self.respond(Ok(ApiResponse::new(200, body)));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("spy requests lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("spy requests lock").len()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests()
            .pop()
            .expect("at least one request should have been sent")
    }
}

#[async_trait]
impl Transport for SpyTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests
            .lock()
            .expect("spy requests lock")
            .push(request);

        self.responses
            .lock()
            .expect("spy responses lock")
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::new(200, "")))
    }
}
