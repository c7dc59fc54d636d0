use reqwest::{Method, StatusCode};

use crate::{
    decode::{decode_collection, encode_entity},
    request::path_segment,
    AttributeSet, Context, GraphClient, GraphError, Query, RequestInput, Result,
    RetryOnNotFound, Uri,
};

/// Operations on `/directory/attributeSets`.
#[derive(Clone, Debug)]
pub struct AttributeSetClient {
    pub base: GraphClient,
}

impl AttributeSetClient {
    pub fn new(base: GraphClient) -> Self {
        Self { base }
    }

    pub async fn create(&self, ctx: &Context, set: &AttributeSet) -> Result<AttributeSet> {
        let body = encode_entity(set).map_err(|err| err.context("AttributeSetClient::create"))?;
        let input = RequestInput::new(Method::POST, Uri::new("/directory/attributeSets"))
            .with_body(body)
            .with_valid_status([StatusCode::CREATED]);

        self.base
            .execute(ctx, input)
            .await
            .and_then(|response| response.json())
            .map_err(|err| err.context("AttributeSetClient::create"))
    }

    pub async fn get(&self, ctx: &Context, id: &str, query: Query) -> Result<AttributeSet> {
        let input = RequestInput::new(
            Method::GET,
            Uri::new(format!("/directory/attributeSets/{}", path_segment(id))),
        )
        .with_query(query)
        .with_valid_status([StatusCode::OK])
        .with_consistency(RetryOnNotFound);

        self.base
            .execute(ctx, input)
            .await
            .and_then(|response| response.json())
            .map_err(|err| err.context("AttributeSetClient::get"))
    }

    pub async fn list(&self, ctx: &Context, query: Query) -> Result<Vec<AttributeSet>> {
        let input = RequestInput::new(Method::GET, Uri::new("/directory/attributeSets"))
            .with_query(query)
            .with_valid_status([StatusCode::OK]);

        self.base
            .execute(ctx, input)
            .await
            .and_then(decode_collection)
            .map_err(|err| err.context("AttributeSetClient::list"))
    }

    /// Updates an attribute set. The set must carry its ID.
    pub async fn update(&self, ctx: &Context, set: &AttributeSet) -> Result<()> {
        let id = set.id.as_deref().ok_or_else(|| {
            GraphError::InvalidInput("attribute set ID is required for update".to_owned())
                .context("AttributeSetClient::update")
        })?;
        let body = encode_entity(set).map_err(|err| err.context("AttributeSetClient::update"))?;
        let input = RequestInput::new(
            Method::PATCH,
            Uri::new(format!("/directory/attributeSets/{}", path_segment(id))),
        )
        .with_body(body)
        .with_valid_status([StatusCode::NO_CONTENT])
        .with_consistency(RetryOnNotFound);

        self.base
            .execute(ctx, input)
            .await
            .map(|_| ())
            .map_err(|err| err.context("AttributeSetClient::update"))
    }
}
