//! Per-request context: correlation, cancellation, and deadline.
//!
//! Every repository operation takes a [`RequestContext`]. Store round-trips
//! are raced against it with [`RequestContext::guard`], so a cancelled or
//! expired request stops waiting on the store and its transaction is
//! discarded instead of committed.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::infrastructure::ports::RepoError;

/// Correlation ID for tracking requests across the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a new correlation ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short format (first 8 characters) for logging.
    pub fn short(&self) -> String {
        self.0.simple().to_string().chars().take(8).collect()
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-supplied cancellation and deadline for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    correlation_id: CorrelationId,
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    /// A context that never expires and is only cancelled explicitly.
    pub fn new() -> Self {
        Self {
            correlation_id: CorrelationId::new(),
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Set a deadline. An earlier existing deadline is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Same correlation and deadline; cancelling the parent cancels the child.
    pub fn child(&self) -> Self {
        Self {
            correlation_id: self.correlation_id,
            cancel: self.cancel.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Fail if the request is already cancelled or past its deadline.
    pub fn check(&self, operation: &'static str) -> Result<(), RepoError> {
        if self.cancel.is_cancelled() {
            return Err(RepoError::Cancelled { operation });
        }
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            return Err(RepoError::DeadlineExceeded { operation });
        }
        Ok(())
    }

    /// Run `fut` unless cancellation or the deadline fires first.
    ///
    /// A future that loses the race is dropped.
    pub async fn guard<T, F>(&self, operation: &'static str, fut: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, RepoError>>,
    {
        self.check(operation)?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(RepoError::Cancelled { operation }),
            _ = deadline => Err(RepoError::DeadlineExceeded { operation }),
            result = fut => result,
        }
    }
}
