//! Scripted backend for cache and editor tests.
//!
//! Responses are registered per method and path. A single registered
//! response is sticky; several are consumed in order with the last one
//! sticky. A [`Gate`] holds a request open until the test releases it, which
//! is how tests interleave concurrent edits deterministically.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::infrastructure::ports::{
    BackendResponse, BackendTransport, HttpMethod, RequestOptions, TransportError,
};

type Reply = Result<BackendResponse, TransportError>;

enum Scripted {
    Reply(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// A request the transport received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

/// Releases one gated request.
pub struct Gate {
    sender: oneshot::Sender<Reply>,
}

impl Gate {
    pub fn respond(self, response: BackendResponse) {
        let _ = self.sender.send(Ok(response));
    }

    pub fn fail(self, error: TransportError) {
        let _ = self.sender.send(Err(error));
    }
}

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: HttpMethod, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    pub fn respond(&self, method: HttpMethod, path: &str, response: BackendResponse) {
        self.push(method, path, Scripted::Reply(Ok(response)));
    }

    pub fn fail(&self, method: HttpMethod, path: &str, error: TransportError) {
        self.push(method, path, Scripted::Reply(Err(error)));
    }

    /// Hold the next matching request until the returned gate is released.
    pub fn gate(&self, method: HttpMethod, path: &str) -> Gate {
        let (sender, receiver) = oneshot::channel();
        self.push(method, path, Scripted::Gated(receiver));
        Gate { sender }
    }

    pub fn requests(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn calls(&self, method: HttpMethod, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    fn next(&self, method: HttpMethod, path: &str) -> Option<Scripted> {
        let mut routes = self
            .routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let queue = routes.get_mut(&(method, path.to_string()))?;
        match queue.front() {
            Some(Scripted::Reply(reply)) if queue.len() == 1 => {
                Some(Scripted::Reply(reply.clone()))
            }
            _ => queue.pop_front(),
        }
    }
}

#[async_trait]
impl BackendTransport for ScriptedTransport {
    async fn fetch(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<BackendResponse, TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedCall {
                method: options.method,
                path: endpoint.to_string(),
                body: options.body.clone(),
            });

        match self.next(options.method, endpoint) {
            Some(Scripted::Reply(reply)) => reply,
            Some(Scripted::Gated(receiver)) => receiver
                .await
                .unwrap_or_else(|_| Err(TransportError::connection("gate dropped"))),
            None => Ok(BackendResponse::new(
                404,
                json!({"detail": format!("no scripted response for {} {}", options.method.as_str(), endpoint)}),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn last_response_is_sticky() {
        let transport = ScriptedTransport::new();
        transport.respond(HttpMethod::Get, "/a", BackendResponse::ok(json!(1)));
        transport.respond(HttpMethod::Get, "/a", BackendResponse::ok(json!(2)));

        let mut bodies = Vec::new();
        for _ in 0..3 {
            let response = transport
                .fetch("/a", RequestOptions::get())
                .await
                .expect("scripted");
            bodies.push(response.body);
        }
        assert_eq!(bodies, vec![json!(1), json!(2), json!(2)]);
        assert_eq!(transport.calls(HttpMethod::Get, "/a"), 3);
    }

    #[tokio::test]
    async fn unscripted_paths_are_not_found() {
        let transport = ScriptedTransport::new();
        let response = transport
            .fetch("/missing", RequestOptions::post_empty())
            .await
            .expect("response");
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn gate_holds_request_until_released() {
        let transport = std::sync::Arc::new(ScriptedTransport::new());
        let gate = transport.gate(HttpMethod::Post, "/slow");

        let pending = {
            let transport = transport.clone();
            tokio::spawn(async move {
                transport
                    .fetch("/slow", RequestOptions::post(json!({"v": 1})))
                    .await
            })
        };
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        gate.respond(BackendResponse::ok(json!({"done": true})));
        let response = pending.await.expect("join").expect("response");
        assert_eq!(response.body, json!({"done": true}));
    }
}
