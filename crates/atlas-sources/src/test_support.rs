//! In-memory transport for adapter tests.

use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone)]
pub(crate) enum Reply {
    Respond(HttpResponse),
    Fail(String),
    Delay(Duration, HttpResponse),
}

impl Reply {
    pub(crate) fn json(status: u16, body: &str) -> Self {
        Self::Respond(HttpResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: body.to_string(),
        })
    }

    pub(crate) fn html(status: u16) -> Self {
        Self::Respond(HttpResponse {
            status,
            content_type: Some("text/html".to_string()),
            body: "<!doctype html><html><body>Not Found</body></html>".to_string(),
        })
    }
}

/// Routes requests by URL prefix. Unrouted URLs fail at the transport level.
#[derive(Default)]
pub(crate) struct MockTransport {
    routes: Vec<(String, Reply)>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(mut self, url_prefix: &str, reply: Reply) -> Self {
        self.routes.push((url_prefix.to_string(), reply));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().expect("requests lock").clone()
    }

    pub(crate) fn calls_by_url(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for request in self.requests() {
            *counts.entry(request.url).or_insert(0) += 1;
        }
        counts
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen
            .lock()
            .expect("requests lock")
            .push(request.clone());

        let reply = self
            .routes
            .iter()
            .find(|(prefix, _)| request.url.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(message)) => Err(TransportError(message)),
            Some(Reply::Delay(delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            None => Err(TransportError(format!("connection refused: {}", request.url))),
        }
    }
}
