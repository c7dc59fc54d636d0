//! OData query descriptor and structured error types.

use std::fmt;

use crate::wire;

/// Response verbosity requested through the `Accept` header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Metadata {
    Full,
    Minimal,
    None,
}

impl Metadata {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Minimal => "minimal",
            Self::None => "none",
        }
    }
}

/// Value of the `ConsistencyLevel` request header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConsistencyLevel {
    Eventual,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// `$orderby` clause.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// `$expand` clause with an optional nested `$select`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Expand {
    pub relationship: String,
    pub select: Vec<String>,
}

/// Filtering, selection, paging and metadata options for one request.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Query {
    pub consistency_level: Option<ConsistencyLevel>,
    pub metadata: Option<Metadata>,
    pub count: bool,
    pub expand: Option<Expand>,
    pub filter: Option<String>,
    pub format: Option<String>,
    pub order_by: Option<OrderBy>,
    pub search: Option<String>,
    pub select: Vec<String>,
    pub skip: Option<u32>,
    pub top: Option<u32>,
}

impl Query {
    /// Request headers implied by this query.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::new();
        if let Some(ConsistencyLevel::Eventual) = self.consistency_level {
            headers.push(("ConsistencyLevel", "eventual".to_owned()));
        }
        if let Some(metadata) = self.metadata {
            headers.push((
                "Accept",
                format!("application/json; odata.metadata={}", metadata.as_str()),
            ));
        }
        headers
    }

    /// Query string parameters, unencoded, in a stable order.
    pub fn values(&self) -> Vec<(&'static str, String)> {
        let mut values = Vec::new();
        if self.count {
            values.push(("$count", "true".to_owned()));
        }
        if let Some(expand) = &self.expand {
            let value = if expand.select.is_empty() {
                expand.relationship.clone()
            } else {
                format!("{}($select={})", expand.relationship, expand.select.join(","))
            };
            values.push(("$expand", value));
        }
        if let Some(filter) = &self.filter {
            values.push(("$filter", filter.clone()));
        }
        if let Some(format) = &self.format {
            values.push(("$format", format.clone()));
        }
        if let Some(order_by) = &self.order_by {
            let direction = match order_by.direction {
                Direction::Ascending => "asc",
                Direction::Descending => "desc",
            };
            values.push(("$orderby", format!("{} {direction}", order_by.field)));
        }
        if let Some(search) = &self.search {
            values.push(("$search", format!("\"{search}\"")));
        }
        if !self.select.is_empty() {
            values.push(("$select", self.select.join(",")));
        }
        if let Some(skip) = self.skip {
            values.push(("$skip", skip.to_string()));
        }
        if let Some(top) = self.top {
            values.push(("$top", top.to_string()));
        }
        values
    }
}

/// Detail entry inside a structured error.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorDetail {
    pub code: Option<String>,
    pub message: Option<String>,
    pub target: Option<String>,
}

/// Structured error decoded from the standard OData error envelope.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ODataError {
    pub code: Option<String>,
    pub message: Option<String>,
    pub target: Option<String>,
    pub details: Vec<ErrorDetail>,
    pub inner_error: Option<Box<ODataError>>,
    pub request_id: Option<String>,
    pub client_request_id: Option<String>,
    pub date: Option<String>,
    /// Raw response body the error was decoded from.
    pub raw_message: Option<String>,
}

impl ODataError {
    /// Decodes the error envelope from a response body.
    ///
    /// Returns `None` when the body carries no recognizable envelope.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let envelope: wire::ErrorEnvelope = serde_json::from_slice(body).ok()?;
        let mut error: ODataError = envelope.error?.into();
        error.raw_message = Some(String::from_utf8_lossy(body).into_owned());
        Some(error)
    }

    /// Case-insensitive substring match against the human-readable parts
    /// of the error, including details and nested inner errors.
    pub fn matches(&self, text: &str) -> bool {
        let needle = text.to_lowercase();
        self.matches_lowercase(&needle)
    }

    fn matches_lowercase(&self, needle: &str) -> bool {
        let contains = |value: &Option<String>| {
            value
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(needle))
        };

        contains(&self.message)
            || self.details.iter().any(|detail| contains(&detail.message))
            || self
                .inner_error
                .as_deref()
                .is_some_and(|inner| inner.matches_lowercase(needle))
            || contains(&self.raw_message)
    }
}

impl fmt::Display for ODataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{code}: {message}"),
            (Some(code), None) => f.write_str(code),
            (None, Some(message)) => f.write_str(message),
            (None, None) => f.write_str("unknown error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ConsistencyLevel, Direction, Expand, Metadata, ODataError, OrderBy, Query};

    #[test]
    fn empty_query_adds_nothing() {
        let query = Query::default();
        assert!(query.headers().is_empty());
        assert!(query.values().is_empty());
    }

    #[test]
    fn query_values_in_stable_order() {
        let query = Query {
            count: true,
            expand: Some(Expand {
                relationship: "members".to_owned(),
                select: vec!["id".to_owned(), "displayName".to_owned()],
            }),
            filter: Some("chatType eq 'group'".to_owned()),
            order_by: Some(OrderBy {
                field: "createdDateTime".to_owned(),
                direction: Direction::Descending,
            }),
            search: Some("topic:ops".to_owned()),
            select: vec!["id".to_owned(), "topic".to_owned()],
            top: Some(10),
            ..Query::default()
        };

        assert_eq!(
            query.values(),
            vec![
                ("$count", "true".to_owned()),
                ("$expand", "members($select=id,displayName)".to_owned()),
                ("$filter", "chatType eq 'group'".to_owned()),
                ("$orderby", "createdDateTime desc".to_owned()),
                ("$search", "\"topic:ops\"".to_owned()),
                ("$select", "id,topic".to_owned()),
                ("$top", "10".to_owned()),
            ]
        );
    }

    #[test]
    fn query_headers_carry_metadata_and_consistency() {
        let query = Query {
            consistency_level: Some(ConsistencyLevel::Eventual),
            metadata: Some(Metadata::Full),
            ..Query::default()
        };

        assert_eq!(
            query.headers(),
            vec![
                ("ConsistencyLevel", "eventual".to_owned()),
                ("Accept", "application/json; odata.metadata=full".to_owned()),
            ]
        );
    }

    #[test]
    fn decodes_standard_envelope() {
        let body = br#"{
            "error": {
                "code": "Forbidden",
                "message": "Access denied",
                "target": "members",
                "details": [{ "code": "Roster", "message": "roster busy" }],
                "innerError": { "request-id": "abc", "date": "2024-01-01T00:00:00" }
            }
        }"#;

        let error = ODataError::from_body(body).expect("must decode envelope");
        assert_eq!(error.code.as_deref(), Some("Forbidden"));
        assert_eq!(error.message.as_deref(), Some("Access denied"));
        assert_eq!(error.target.as_deref(), Some("members"));
        assert_eq!(error.details.len(), 1);
        let inner = error.inner_error.as_deref().expect("must keep inner error");
        assert_eq!(inner.request_id.as_deref(), Some("abc"));
        assert!(error.raw_message.is_some());
    }

    #[test]
    fn decodes_legacy_message_object() {
        let body = br#"{"odata.error":{"code":"Request_ResourceNotFound","message":{"lang":"en","value":"Resource does not exist."}}}"#;

        let error = ODataError::from_body(body).expect("must decode legacy envelope");
        assert_eq!(error.message.as_deref(), Some("Resource does not exist."));
    }

    #[test]
    fn absent_or_malformed_envelope_is_none() {
        assert!(ODataError::from_body(b"").is_none());
        assert!(ODataError::from_body(b"<html>bad gateway</html>").is_none());
        assert!(ODataError::from_body(br#"{"value":[]}"#).is_none());
    }

    #[test]
    fn matches_is_case_insensitive_and_recursive() {
        let error = ODataError {
            message: Some("Outer".to_owned()),
            inner_error: Some(Box::new(ODataError {
                message: Some("One or more members cannot be added to the thread roster".to_owned()),
                ..ODataError::default()
            })),
            ..ODataError::default()
        };

        assert!(error.matches("THREAD ROSTER"));
        assert!(!error.matches("insufficient privileges"));
    }
}
