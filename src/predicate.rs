//! Consistency predicates decide whether a completed response reflects
//! replication lag in the remote directory rather than a real failure.
//!
//! The executor consults the predicate supplied with each request; no
//! predicate means the response is never retried.

use reqwest::StatusCode;

use crate::ODataError;

/// Message returned with `403 Forbidden` while a chat roster is still
/// being provisioned.
pub const ROSTER_NOT_READY: &str = "One or more members cannot be added to the thread roster";

/// A completed attempt as seen by a [`ConsistencyPredicate`].
#[derive(Clone, Copy, Debug)]
pub struct AttemptOutcome<'a> {
    pub status: StatusCode,
    pub error: Option<&'a ODataError>,
    /// 1-based number of the attempt that produced this response.
    pub attempt: u32,
}

/// Strategy deciding whether a response should be retried.
///
/// Implementations must be pure and must tolerate an absent structured
/// error.
pub trait ConsistencyPredicate: Send + Sync {
    fn should_retry(&self, outcome: &AttemptOutcome<'_>) -> bool;

    /// Retries when either predicate does.
    fn or<P>(self, other: P) -> Or<Self, P>
    where
        Self: Sized,
        P: ConsistencyPredicate,
    {
        Or(self, other)
    }
}

impl<F> ConsistencyPredicate for F
where
    F: Fn(&AttemptOutcome<'_>) -> bool + Send + Sync,
{
    fn should_retry(&self, outcome: &AttemptOutcome<'_>) -> bool {
        self(outcome)
    }
}

/// Retries `404 Not Found`, covering reads issued right after a write.
#[derive(Clone, Copy, Debug, Default)]
pub struct RetryOnNotFound;

impl ConsistencyPredicate for RetryOnNotFound {
    fn should_retry(&self, outcome: &AttemptOutcome<'_>) -> bool {
        outcome.status == StatusCode::NOT_FOUND
    }
}

/// Retries a specific status only when the structured error matches a
/// known transient phrase.
#[derive(Clone, Debug)]
pub struct RetryOnMatchedError {
    status: StatusCode,
    phrase: String,
}

impl RetryOnMatchedError {
    pub fn new(status: StatusCode, phrase: impl Into<String>) -> Self {
        Self {
            status,
            phrase: phrase.into(),
        }
    }

    /// `403 Forbidden` carrying [`ROSTER_NOT_READY`].
    pub fn roster_not_ready() -> Self {
        Self::new(StatusCode::FORBIDDEN, ROSTER_NOT_READY)
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }
}

impl ConsistencyPredicate for RetryOnMatchedError {
    fn should_retry(&self, outcome: &AttemptOutcome<'_>) -> bool {
        outcome.status == self.status
            && outcome
                .error
                .is_some_and(|error| error.matches(&self.phrase))
    }
}

/// Combination produced by [`ConsistencyPredicate::or`].
#[derive(Clone, Debug)]
pub struct Or<A, B>(A, B);

impl<A: ConsistencyPredicate, B: ConsistencyPredicate> ConsistencyPredicate for Or<A, B> {
    fn should_retry(&self, outcome: &AttemptOutcome<'_>) -> bool {
        self.0.should_retry(outcome) || self.1.should_retry(outcome)
    }
}
