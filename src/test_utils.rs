//! Canned-transport helpers shared by the gateway test modules.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::errors::CustomResult;
use crate::request::{Method, Request, Response};
use crate::service::{ApiClient, ApiClientError};

/// Serves scripted responses in order and records every request it saw, so
/// tests can assert both what was sent and — for short-circuit paths — that
/// nothing was sent at all.
pub(crate) struct MockClient {
    responses: Mutex<VecDeque<Response>>,
    seen: Mutex<Vec<(Method, String)>>,
}

impl MockClient {
    pub(crate) fn new(responses: Vec<Response>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn json(status_code: u16, body: Value) -> Response {
        Response {
            status_code,
            body: Bytes::from(body.to_string()),
        }
    }

    pub(crate) fn raw(status_code: u16, body: &str) -> Response {
        Response {
            status_code,
            body: Bytes::from(body.to_owned()),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub(crate) fn calls(&self) -> Vec<(Method, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiClient for MockClient {
    async fn execute(&self, request: Request) -> CustomResult<Response, ApiClientError> {
        self.seen
            .lock()
            .unwrap()
            .push((request.method, request.url.clone()));
        self.responses.lock().unwrap().pop_front().ok_or_else(|| {
            error_stack::Report::new(ApiClientError::RequestNotSent(
                "no scripted response left".to_owned(),
            ))
        })
    }
}
