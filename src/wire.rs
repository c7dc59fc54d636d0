use serde::Deserialize;

use crate::odata::{ErrorDetail, ODataError};

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default, alias = "odata.error")]
    pub error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub details: Vec<WireDetail>,
    #[serde(default, alias = "innererror")]
    pub inner_error: Option<Box<WireError>>,
    #[serde(default, rename = "request-id")]
    pub request_id: Option<String>,
    #[serde(default, rename = "client-request-id")]
    pub client_request_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Messages are plain strings, or `{"lang": .., "value": ..}` objects on
/// older endpoints.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    Localized { value: String },
}

#[derive(Debug, Deserialize)]
pub struct WireDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

/// List responses carry results under `value`.
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    pub value: Vec<T>,
}

impl From<Message> for String {
    fn from(message: Message) -> Self {
        match message {
            Message::Text(text) => text,
            Message::Localized { value } => value,
        }
    }
}

impl From<WireError> for ODataError {
    fn from(error: WireError) -> Self {
        ODataError {
            code: error.code,
            message: error.message.map(String::from),
            target: error.target,
            details: error
                .details
                .into_iter()
                .map(|detail| ErrorDetail {
                    code: detail.code,
                    message: detail.message,
                    target: detail.target,
                })
                .collect(),
            inner_error: error.inner_error.map(|inner| Box::new((*inner).into())),
            request_id: error.request_id,
            client_request_id: error.client_request_id,
            date: error.date,
            raw_message: None,
        }
    }
}
