//! Client entry point
//!
//! A [`Client`] is long-lived and process-scoped: it owns the shared
//! HTTP transport, the swappable configuration, and the request-id
//! sequence. Query submission is safe from any number of tasks
//! concurrently; every call owns an independent request/response cycle.

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::sync::oneshot;

use crate::query::Expr;
use crate::sync::{Latch, Sequence};
use crate::values::Value;

use super::config::ClientConfig;
use super::errors::{ClientError, ClientResult};
use super::pipeline::{self, QueryHandle, RequestState};

/// A handle to one Lagoon database endpoint.
///
/// Cloning is cheap and shares the transport, config, and request-id
/// sequence. Reconfiguration (`set_secret`) affects only requests
/// submitted afterwards; in-flight requests keep the snapshot they
/// captured at submission.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Arc<RwLock<ClientConfig>>,
    sequence: Arc<Sequence>,
}

impl Client {
    /// Creates a client from a config.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config: Arc::new(RwLock::new(config)),
            sequence: Arc::new(Sequence::new()),
        }
    }

    /// Swaps the authentication secret for subsequently-submitted
    /// requests.
    pub fn set_secret(&self, secret: impl Into<String>) {
        self.config.write().unwrap().secret = secret.into();
    }

    /// Returns an independent client for a different secret (e.g. a
    /// session secret obtained by a bootstrap query), sharing this
    /// client's transport.
    pub fn session_client(&self, secret: impl Into<String>) -> Client {
        let mut config = self.config.read().unwrap().clone();
        config.secret = secret.into();
        Client {
            http: self.http.clone(),
            config: Arc::new(RwLock::new(config)),
            sequence: Arc::new(Sequence::new()),
        }
    }

    /// Submits one query, returning a cancellable handle immediately.
    ///
    /// Must be called from within a tokio runtime. Exactly one result
    /// eventually resolves on the handle: the decoded value, a
    /// transport or malformed-response error, or a structured server
    /// error. The pipeline never retries.
    pub fn query(&self, expr: impl Into<Expr>) -> QueryHandle {
        let expr = expr.into();
        let snapshot = self.config.read().unwrap().snapshot();
        let request_id = self.sequence.increment_and_get();
        let body = expr.to_wire();

        let (result_tx, result_rx) = oneshot::channel();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let state = Arc::new(Mutex::new(RequestState::Built));

        tokio::spawn(pipeline::run_request(
            self.http.clone(),
            snapshot,
            body,
            request_id,
            Arc::clone(&state),
            result_tx,
            cancel_rx,
        ));

        QueryHandle::new(result_rx, cancel_tx, state, request_id)
    }

    /// Blocking convenience form for one-shot bootstrap sequencing.
    ///
    /// Runs the query on a dedicated thread with its own runtime and
    /// blocks on a [`Latch`] until the result arrives or `timeout`
    /// elapses. This defeats non-blocking I/O by design: never call it
    /// from inside an async task or from another request's completion
    /// path.
    pub fn query_sync(
        &self,
        expr: impl Into<Expr>,
        timeout: Duration,
    ) -> ClientResult<Value> {
        let expr = expr.into();
        let client = self.clone();
        let result = Latch::wait_for(
            move |latch| {
                std::thread::spawn(move || {
                    let outcome = match tokio::runtime::Builder::new_current_thread()
                        .enable_all()
                        .build()
                    {
                        Ok(runtime) => {
                            runtime.block_on(async { client.query(expr).resolve().await })
                        }
                        Err(e) => Err(ClientError::Transport {
                            message: format!("runtime construction failed: {}", e),
                            timed_out: false,
                        }),
                    };
                    latch.complete(outcome);
                });
            },
            timeout,
        );
        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(ClientError::Timeout(timeout)),
        }
    }
}
