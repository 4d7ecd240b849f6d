//! Shared utilities for use cases.
//!
//! Cancellation checks, cancellable awaits, and the bounded-retry completion
//! call used by every agent.

use crate::config::ExecutionParams;
use crate::ports::agent_progress::AgentProgressNotifier;
use crate::ports::llm_gateway::{CompletionError, LlmGateway};
use gnsearch_domain::CompletionRequest;
use std::future::Future;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// The query was cancelled while this operation was pending
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Operation cancelled")]
pub struct Cancelled;

/// Failure of a completion call after retries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<Cancelled> for CallError {
    fn from(_: Cancelled) -> Self {
        CallError::Cancelled
    }
}

impl CallError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CallError::Cancelled)
    }
}

/// Check if cancellation has been requested.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), Cancelled> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(Cancelled);
    }
    Ok(())
}

/// Await `future` unless the token fires first.
///
/// The future is dropped on cancellation, which aborts in-flight I/O.
pub(crate) async fn cancellable<F: Future>(
    future: F,
    token: &Option<CancellationToken>,
) -> Result<F::Output, Cancelled> {
    match token {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(Cancelled),
            output = future => Ok(output),
        },
        None => Ok(future.await),
    }
}

/// Run a completion with timeout and bounded retries.
///
/// Each attempt is limited by `completion_timeout`; a timeout counts as a
/// retryable failure. After `completion_retries` extra attempts the last
/// error is returned.
pub(crate) async fn complete_with_retry(
    gateway: &dyn LlmGateway,
    request: &CompletionRequest,
    params: &ExecutionParams,
    progress: &dyn AgentProgressNotifier,
    token: &Option<CancellationToken>,
) -> Result<String, CallError> {
    let attempts = params.completion_retries + 1;
    let mut attempt = 0;

    loop {
        attempt += 1;
        check_cancelled(token)?;
        debug!(purpose = %request.purpose, attempt, "Completion call");

        let call = tokio::time::timeout(params.completion_timeout, gateway.complete(request));
        let error = match cancellable(call, token).await? {
            Ok(Ok(text)) => return Ok(text),
            Ok(Err(e)) => e,
            Err(_) => CompletionError::Timeout,
        };

        if attempt >= attempts || !error.is_retryable() {
            warn!(purpose = %request.purpose, attempt, error = %error, "Completion failed");
            return Err(CallError::Completion(error));
        }

        warn!(purpose = %request.purpose, attempt, error = %error, "Completion failed, retrying");
        progress.on_retry(&request.purpose, attempt, &error.to_string());
        let backoff = params.retry_backoff * attempt as u32;
        cancellable(tokio::time::sleep(backoff), token).await?;
    }
}
