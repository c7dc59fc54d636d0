use std::{borrow::Cow, fmt, sync::Arc};

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::{ConsistencyPredicate, GraphError, ODataError, Query, Result};

/// Graph API version segment.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ApiVersion {
    #[default]
    V1,
    Beta,
}

impl ApiVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "v1.0",
            Self::Beta => "beta",
        }
    }
}

impl std::str::FromStr for ApiVersion {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim() {
            "v1.0" => Ok(Self::V1),
            "beta" => Ok(Self::Beta),
            other => Err(format!("unknown API version '{other}'")),
        }
    }
}

/// Target resource of a request, relative to the versioned endpoint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Uri {
    pub entity: String,
}

impl Uri {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
        }
    }
}

/// Percent-encodes a caller-supplied ID for use as one path segment.
pub(crate) fn path_segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Everything the executor needs for one logical operation.
#[derive(Clone)]
pub struct RequestInput {
    pub method: Method,
    pub uri: Uri,
    pub body: Option<Vec<u8>>,
    pub query: Query,
    pub valid_status_codes: Vec<StatusCode>,
    pub consistency: Option<Arc<dyn ConsistencyPredicate>>,
}

impl fmt::Debug for RequestInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestInput")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .field("query", &self.query)
            .field("valid_status_codes", &self.valid_status_codes)
            .field("consistency", &self.consistency.is_some())
            .finish()
    }
}

impl RequestInput {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            body: None,
            query: Query::default(),
            valid_status_codes: Vec::new(),
            consistency: None,
        }
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn with_valid_status(mut self, codes: impl IntoIterator<Item = StatusCode>) -> Self {
        self.valid_status_codes = codes.into_iter().collect();
        self
    }

    pub fn with_consistency(mut self, predicate: impl ConsistencyPredicate + 'static) -> Self {
        let predicate: Arc<dyn ConsistencyPredicate> = Arc::new(predicate);
        self.consistency = Some(predicate);
        self
    }

    pub(crate) fn accepts(&self, status: StatusCode) -> bool {
        self.valid_status_codes.contains(&status)
    }
}

/// Terminal outcome of a successful operation with its body fully buffered.
#[derive(Clone, Debug)]
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) body: Vec<u8>,
    pub(crate) error: Option<ODataError>,
    pub(crate) attempts: u32,
}

impl Response {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Structured error carried by the response, if it had one.
    pub fn odata_error(&self) -> Option<&ODataError> {
        self.error.as_ref()
    }

    /// Number of attempts the executor made, including the first.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Decodes the buffered body, consuming the response.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|err| {
            GraphError::Decode(format!(
                "invalid response JSON: {err}; body: {}",
                String::from_utf8_lossy(&self.body)
            ))
        })
    }
}
