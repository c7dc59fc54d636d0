//! `msgraph-http` is the request core of an async client for the Microsoft
//! Graph object API.
//!
//! Every operation funnels through [`GraphClient::execute`], which applies
//! OData query options, validates the response status and transparently
//! retries responses that a [`ConsistencyPredicate`] classifies as
//! eventual-consistency lag:
//! - [`RetryOnNotFound`] for reads issued right after a write
//! - [`RetryOnMatchedError`] for a status paired with a known transient message
//!
//! [`ChatClient`] and [`AttributeSetClient`] show how entity operations
//! build on the executor.

mod attribute_set;
mod chat;
mod client;
mod context;
mod decode;
mod error;
mod odata;
mod options;
mod predicate;
mod request;
mod types;
mod wire;

pub use attribute_set::AttributeSetClient;
pub use chat::ChatClient;
pub use client::{GraphClient, DEFAULT_ENDPOINT};
pub use context::{CancelHandle, Context};
pub use error::GraphError;
pub use odata::{
    ConsistencyLevel, Direction, ErrorDetail, Expand, Metadata, ODataError, OrderBy, Query,
};
pub use options::ClientOptions;
pub use predicate::{
    AttemptOutcome, ConsistencyPredicate, Or, RetryOnMatchedError, RetryOnNotFound,
    ROSTER_NOT_READY,
};
pub use request::{ApiVersion, RequestInput, Response, Uri};
pub use types::{
    AttributeSet, Chat, ChatType, ConversationMember, SHORT_TYPE_CHAT,
    SHORT_TYPE_CONVERSATION_MEMBER, TYPE_CHAT, TYPE_CONVERSATION_MEMBER,
};

pub type Result<T> = std::result::Result<T, GraphError>;
