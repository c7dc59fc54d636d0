//! Caller-supplied cancellation and deadline scope.
//!
//! A [`Context`] is raced against every network wait and every backoff
//! wait inside the executor. Dropping the returned future also cancels the
//! operation, but only a fired context produces a typed
//! [`GraphError::Cancelled`] / [`GraphError::DeadlineExceeded`] result.

use std::{future, sync::Arc, time::Duration};

use tokio::{sync::watch, time::Instant};

use crate::GraphError;

/// Cancellation and deadline scope for one or more operations.
#[derive(Clone, Debug, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Fires the cancellation signal of the [`Context`] it was created with.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Cancels every operation running under the associated context.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl Context {
    /// A context that never cancels and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// A context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancel: None,
        }
    }

    /// A context cancelled through the returned handle.
    pub fn cancellable() -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        let context = Self {
            deadline: None,
            cancel: Some(receiver),
        };
        let handle = CancelHandle {
            sender: Arc::new(sender),
        };
        (context, handle)
    }

    /// Derives a context sharing this one's cancellation signal with a
    /// deadline no later than `timeout` from now.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        };
        Self {
            deadline: Some(deadline),
            cancel: self.cancel.clone(),
        }
    }

    /// Deadline of this context, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the error describing why the context is done, if it is.
    pub fn check(&self) -> Result<(), GraphError> {
        if self.cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Err(GraphError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(GraphError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub(crate) async fn done(&self) -> GraphError {
        let cancelled = async {
            match &self.cancel {
                Some(receiver) => {
                    let mut receiver = receiver.clone();
                    let closed = receiver.wait_for(|cancelled| *cancelled).await.is_err();
                    // A dropped handle can never cancel.
                    if closed {
                        future::pending::<()>().await;
                    }
                }
                None => future::pending::<()>().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => GraphError::Cancelled,
            _ = expired => GraphError::DeadlineExceeded,
        }
    }
}
