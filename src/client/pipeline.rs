//! Request pipeline
//!
//! One spawned task per query. Each request moves through
//! `Built -> Sent -> (Succeeded | Failed | Cancelled)`; terminal states
//! are final and idempotent to re-observe. Results flow back over a
//! single-shot channel, never by raising out of `query`.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::observability::{log_request, Severity};
use crate::values::Value;

use super::config::ConfigSnapshot;
use super::errors::{ClientError, ClientResult};
use super::response;

/// Lifecycle of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Constructed, not yet on the wire
    Built,
    /// POSTed, awaiting the reply
    Sent,
    /// Reply decoded successfully
    Succeeded,
    /// Transport, decode, or server failure delivered
    Failed,
    /// Cancelled before completion; no result was delivered
    Cancelled,
}

impl RequestState {
    /// True once the request can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestState::Succeeded | RequestState::Failed | RequestState::Cancelled
        )
    }
}

/// Handle to one in-flight query.
///
/// Exactly one result is eventually delivered through [`resolve`],
/// unless [`cancel`] suppresses it first.
///
/// [`resolve`]: QueryHandle::resolve
/// [`cancel`]: QueryHandle::cancel
#[derive(Debug)]
pub struct QueryHandle {
    result_rx: oneshot::Receiver<ClientResult<Value>>,
    cancel_tx: Mutex<Option<oneshot::Sender<()>>>,
    state: Arc<Mutex<RequestState>>,
    request_id: i64,
}

impl QueryHandle {
    pub(crate) fn new(
        result_rx: oneshot::Receiver<ClientResult<Value>>,
        cancel_tx: oneshot::Sender<()>,
        state: Arc<Mutex<RequestState>>,
        request_id: i64,
    ) -> Self {
        Self {
            result_rx,
            cancel_tx: Mutex::new(Some(cancel_tx)),
            state,
            request_id,
        }
    }

    /// The request's sequence id, as it appears in log lines.
    pub fn request_id(&self) -> i64 {
        self.request_id
    }

    /// Re-observable request state; terminal states never change.
    pub fn state(&self) -> RequestState {
        *self.state.lock().unwrap()
    }

    /// Requests cancellation.
    ///
    /// Before completion this suppresses result delivery (resolving
    /// afterwards yields [`ClientError::Cancelled`]) and drops the
    /// in-flight transport operation, aborting it best-effort. After
    /// completion this is a no-op. The remote side may still have
    /// executed the query.
    pub fn cancel(&self) {
        if let Some(tx) = self.cancel_tx.lock().unwrap().take() {
            // Send fails when the task already finished, which is the
            // after-completion no-op case
            let _ = tx.send(());
        }
    }

    /// Awaits the request's single result.
    pub async fn resolve(self) -> ClientResult<Value> {
        match self.result_rx.await {
            Ok(result) => result,
            // The task dropped its sender without sending: cancelled
            Err(_) => Err(ClientError::Cancelled),
        }
    }
}

/// Runs one request to completion, racing it against cancellation.
pub(crate) async fn run_request(
    http: reqwest::Client,
    snapshot: ConfigSnapshot,
    body: serde_json::Value,
    request_id: i64,
    state: Arc<Mutex<RequestState>>,
    result_tx: oneshot::Sender<ClientResult<Value>>,
    cancel_rx: oneshot::Receiver<()>,
) {
    set_state(&state, RequestState::Sent);
    log_request(
        Severity::Debug,
        "QUERY_SENT",
        request_id,
        &[("endpoint", snapshot.endpoint.to_string())],
    );

    tokio::select! {
        _ = cancel_rx => {
            set_state(&state, RequestState::Cancelled);
            log_request(Severity::Info, "QUERY_CANCELLED", request_id, &[]);
            // result_tx drops unsent; the handle observes Cancelled
        }
        result = execute(http, snapshot, body) => {
            match &result {
                Ok(_) => {
                    set_state(&state, RequestState::Succeeded);
                    log_request(Severity::Debug, "QUERY_OK", request_id, &[]);
                }
                Err(e) => {
                    set_state(&state, RequestState::Failed);
                    log_request(
                        Severity::Warn,
                        "QUERY_FAILED",
                        request_id,
                        &[("error", e.to_string())],
                    );
                }
            }
            // Receiver may be gone if the caller dropped the handle
            let _ = result_tx.send(result);
        }
    }
}

/// Issues exactly one POST and decodes the reply. Never retries.
async fn execute(
    http: reqwest::Client,
    snapshot: ConfigSnapshot,
    body: serde_json::Value,
) -> ClientResult<Value> {
    let reply = http
        .post(snapshot.endpoint)
        .bearer_auth(&snapshot.secret)
        .json(&body)
        .send()
        .await?;
    let status = reply.status().as_u16();
    let text = reply.text().await?;
    response::decode_response(status, &text)
}

fn set_state(state: &Arc<Mutex<RequestState>>, next: RequestState) {
    let mut current = state.lock().unwrap();
    if !current.is_terminal() {
        *current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!RequestState::Built.is_terminal());
        assert!(!RequestState::Sent.is_terminal());
        assert!(RequestState::Succeeded.is_terminal());
        assert!(RequestState::Failed.is_terminal());
        assert!(RequestState::Cancelled.is_terminal());
    }

    #[test]
    fn test_terminal_states_do_not_regress() {
        let state = Arc::new(Mutex::new(RequestState::Built));
        set_state(&state, RequestState::Sent);
        set_state(&state, RequestState::Succeeded);
        set_state(&state, RequestState::Cancelled);
        assert_eq!(*state.lock().unwrap(), RequestState::Succeeded);
    }
}
