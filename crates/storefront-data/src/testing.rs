//! Scripted in-memory transport for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::QueryError;
use crate::request::HttpRequest;
use crate::response::HttpResponse;
use crate::transport::Transport;

struct Route {
    needle: String,
    reply: Result<HttpResponse, QueryError>,
}

/// Transport answering from a script instead of the network.
///
/// Each route matches when its needle occurs in the request URL or body; the
/// first matching route answers. Unmatched requests fail with a connection
/// error. Every request is recorded for later inspection.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer matching requests with `200 OK` and a JSON body.
    pub fn json(self, needle: impl Into<String>, body: serde_json::Value) -> Self {
        self.reply(needle, Ok(HttpResponse::ok_json(&body)))
    }

    /// Answer matching requests with a bare status.
    pub fn status(self, needle: impl Into<String>, status: u16) -> Self {
        self.reply(needle, Ok(HttpResponse::new(status, Default::default(), Vec::new())))
    }

    /// Fail matching requests at the connection level.
    pub fn fail(self, needle: impl Into<String>, reason: impl Into<String>) -> Self {
        self.reply(needle, Err(QueryError::Connection(reason.into())))
    }

    /// Answer matching requests with an arbitrary reply.
    pub fn reply(
        mut self,
        needle: impl Into<String>,
        reply: Result<HttpResponse, QueryError>,
    ) -> Self {
        self.routes.push(Route {
            needle: needle.into(),
            reply,
        });
        self
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of requests whose URL or body mentions `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| matches(r, needle))
            .count()
    }
}

fn matches(request: &HttpRequest, needle: &str) -> bool {
    if request.url.contains(needle) {
        return true;
    }
    request
        .body
        .as_deref()
        .map(|b| String::from_utf8_lossy(b).contains(needle))
        .unwrap_or(false)
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, QueryError> {
        let reply = self
            .routes
            .iter()
            .find(|route| matches(&request, &route.needle))
            .map(|route| route.reply.clone());

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        reply.unwrap_or_else(|| {
            Err(QueryError::Connection(format!(
                "no scripted response for {}",
                request.url
            )))
        })
    }
}
