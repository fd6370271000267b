//! Write request execution and outcome events.
//!
//! A submission ends in exactly two events: `response` or `fail-response`,
//! always followed by `response-headers`. The outcome is returned to the
//! caller; [`Submission::dispatch`] forwards the events to a channel for
//! consumers that prefer a stream.

use std::collections::BTreeMap;
use std::sync::mpsc::Sender;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::types::WriteRequest;

/// A completed HTTP exchange with a successful status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exchange {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    /// Parsed response body; `None` when empty or not JSON.
    pub resource: Option<Value>,
}

/// A write request that did not succeed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportFailure {
    /// Response status, if the server answered at all.
    pub status: Option<u16>,
    pub headers: BTreeMap<String, String>,
    pub message: String,
}

impl TransportFailure {
    /// A failure before any response arrived.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            status: None,
            headers: BTreeMap::new(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for TransportFailure {}

/// Executes write requests.
pub trait Transport {
    fn execute(&self, request: &WriteRequest) -> Result<Exchange, TransportFailure>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &WriteRequest) -> Result<Exchange, TransportFailure> {
        (**self).execute(request)
    }
}

/// Result of executing a write request.
pub type Outcome = Result<Exchange, TransportFailure>;

/// Notification emitted after a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum Event {
    Response {
        resource: Option<Value>,
        status: u16,
        headers: BTreeMap<String, String>,
    },
    FailResponse {
        failure: TransportFailure,
    },
    ResponseHeaders {
        status: Option<u16>,
        headers: BTreeMap<String, String>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Response { .. } => "response",
            Event::FailResponse { .. } => "fail-response",
            Event::ResponseHeaders { .. } => "response-headers",
        }
    }
}

/// Events for an outcome, in delivery order.
pub fn outcome_events(outcome: &Outcome) -> [Event; 2] {
    match outcome {
        Ok(exchange) => [
            Event::Response {
                resource: exchange.resource.clone(),
                status: exchange.status,
                headers: exchange.headers.clone(),
            },
            Event::ResponseHeaders {
                status: Some(exchange.status),
                headers: exchange.headers.clone(),
            },
        ],
        Err(failure) => [
            Event::FailResponse {
                failure: failure.clone(),
            },
            Event::ResponseHeaders {
                status: failure.status,
                headers: failure.headers.clone(),
            },
        ],
    }
}

/// A sent write request and what came back.
#[derive(Debug, Clone)]
pub struct Submission {
    pub request: WriteRequest,
    pub outcome: Outcome,
}

impl Submission {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn events(&self) -> [Event; 2] {
        outcome_events(&self.outcome)
    }

    /// History entry recorded after the write, on success and failure alike.
    pub fn navigation_marker(&self) -> String {
        self.request.navigation_marker()
    }

    /// Send the events to `tx` in order.
    ///
    /// Delivery is fire-and-forget: a disconnected receiver is not an error.
    pub fn dispatch(&self, tx: &Sender<Event>) {
        for event in self.events() {
            let name = event.name();
            if tx.send(event).is_err() {
                debug!(event = name, "event receiver disconnected");
            }
        }
    }
}
