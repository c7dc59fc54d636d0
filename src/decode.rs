use serde::{de::DeserializeOwned, Serialize};

use crate::{wire, GraphError, Response, Result};

pub(crate) fn encode_entity<T: Serialize>(entity: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(entity)
        .map_err(|err| GraphError::Decode(format!("invalid request JSON: {err}")))
}

/// Unwraps the `value` array of a list response.
pub(crate) fn decode_collection<T: DeserializeOwned>(response: Response) -> Result<Vec<T>> {
    response
        .json::<wire::Collection<T>>()
        .map(|collection| collection.value)
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use crate::{decode, AttributeSet, GraphError, Response};

    fn response(body: &str) -> Response {
        Response {
            status: StatusCode::OK,
            body: body.as_bytes().to_vec(),
            error: None,
            attempts: 1,
        }
    }

    #[test]
    fn collection_keeps_order() {
        let sets: Vec<AttributeSet> = decode::decode_collection(response(
            r#"{"@odata.context":"x","value":[{"id":"b"},{"id":"a"}]}"#,
        ))
        .expect("must decode");

        let ids: Vec<_> = sets.iter().filter_map(|set| set.id.as_deref()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn collection_without_value_is_decode_error() {
        let err = decode::decode_collection::<AttributeSet>(response(r#"{"items":[]}"#))
            .expect_err("must fail");
        assert!(matches!(err, GraphError::Decode(_)));
    }

    #[test]
    fn encode_skips_absent_fields() {
        let body = decode::encode_entity(&AttributeSet {
            id: Some("test".to_owned()),
            ..AttributeSet::default()
        })
        .expect("must encode");
        assert_eq!(body, br#"{"id":"test"}"#);
    }
}
