use crate::ODataError;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// The request completed but the status code was not accepted.
    #[error("unexpected status {status}: {}", status_detail(.error, .body))]
    Status {
        status: u16,
        /// Structured error decoded from the response envelope, if any.
        error: Option<ODataError>,
        /// Raw response body text.
        body: String,
    },
    /// Request encoding or response decoding error.
    #[error("decode error: {0}")]
    Decode(String),
    /// The caller supplied an entity that cannot address a resource.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,
    /// The caller's deadline elapsed before the operation finished.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// An error annotated with the name of the operation that produced it.
    #[error("{operation}: {source}")]
    Operation {
        operation: &'static str,
        source: Box<GraphError>,
    },
}

impl GraphError {
    /// Wraps the error with the name of the calling operation.
    pub fn context(self, operation: &'static str) -> Self {
        Self::Operation {
            operation,
            source: Box::new(self),
        }
    }

    /// HTTP status of the last received response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            Self::Operation { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Structured error decoded from the last response, if any.
    pub fn odata_error(&self) -> Option<&ODataError> {
        match self {
            Self::Status { error, .. } => error.as_ref(),
            Self::Operation { source, .. } => source.odata_error(),
            _ => None,
        }
    }

    /// Returns true when the caller's context ended the operation.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled | Self::DeadlineExceeded => true,
            Self::Operation { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

fn status_detail(error: &Option<ODataError>, body: &str) -> String {
    match error {
        Some(error) => error.to_string(),
        None if body.is_empty() => "<empty body>".to_owned(),
        None => body.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{GraphError, ODataError};

    #[test]
    fn status_looks_through_annotations() {
        let err = GraphError::Status {
            status: 404,
            error: None,
            body: String::new(),
        }
        .context("ChatClient::get");

        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "ChatClient::get: unexpected status 404: <empty body>"
        );
    }

    #[test]
    fn status_display_prefers_structured_error() {
        let err = GraphError::Status {
            status: 403,
            error: Some(ODataError {
                code: Some("Forbidden".to_owned()),
                message: Some("nope".to_owned()),
                ..ODataError::default()
            }),
            body: "{\"error\":{}}".to_owned(),
        };

        assert_eq!(err.to_string(), "unexpected status 403: Forbidden: nope");
        assert_eq!(
            err.odata_error().and_then(|e| e.code.as_deref()),
            Some("Forbidden")
        );
    }

    #[test]
    fn cancellation_is_detected_through_context() {
        assert!(GraphError::Cancelled.context("op").is_cancelled());
        assert!(GraphError::DeadlineExceeded.is_cancelled());
        assert!(!GraphError::Decode("x".to_owned()).is_cancelled());
        assert!(!GraphError::InvalidInput("x".to_owned()).is_cancelled());
        assert_eq!(GraphError::Cancelled.status(), None);
    }
}
