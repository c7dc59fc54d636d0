use reqwest::{Method, StatusCode};

use crate::{
    decode::{decode_collection, encode_entity},
    request::path_segment,
    Chat, Context, GraphClient, GraphError, Metadata, Query, RequestInput, Result,
    RetryOnMatchedError, RetryOnNotFound, Uri,
};

/// Operations on `/chats`.
#[derive(Clone, Debug)]
pub struct ChatClient {
    pub base: GraphClient,
    create_retry: RetryOnMatchedError,
}

impl ChatClient {
    pub fn new(base: GraphClient) -> Self {
        Self {
            base,
            create_retry: RetryOnMatchedError::roster_not_ready(),
        }
    }

    /// Replaces the predicate that recognizes a roster that is not ready
    /// yet when creating a chat.
    pub fn with_create_retry(mut self, predicate: RetryOnMatchedError) -> Self {
        self.create_retry = predicate;
        self
    }

    /// Creates a new chat.
    pub async fn create(&self, ctx: &Context, chat: &Chat) -> Result<Chat> {
        let body = encode_entity(chat).map_err(|err| err.context("ChatClient::create"))?;
        let input = RequestInput::new(Method::POST, Uri::new("/chats"))
            .with_body(body)
            .with_query(Query {
                metadata: Some(Metadata::Full),
                ..Query::default()
            })
            .with_valid_status([StatusCode::CREATED])
            .with_consistency(self.create_retry.clone());

        self.base
            .execute(ctx, input)
            .await
            .and_then(|response| response.json())
            .map_err(|err| err.context("ChatClient::create"))
    }

    /// Retrieves a chat.
    pub async fn get(&self, ctx: &Context, id: &str, mut query: Query) -> Result<Chat> {
        query.metadata = Some(Metadata::Full);
        let input = RequestInput::new(
            Method::GET,
            Uri::new(format!("/chats/{}", path_segment(id))),
        )
        .with_query(query)
        .with_valid_status([StatusCode::OK])
        .with_consistency(RetryOnNotFound);

        self.base
            .execute(ctx, input)
            .await
            .and_then(|response| response.json())
            .map_err(|err| err.context("ChatClient::get"))
    }

    /// Lists the chats a user takes part in.
    ///
    /// Use `Query { select: vec!["id".into()], .. }` to fetch IDs only.
    pub async fn list(&self, ctx: &Context, user_id: &str, mut query: Query) -> Result<Vec<Chat>> {
        query.metadata = Some(Metadata::Full);
        let input = RequestInput::new(
            Method::GET,
            Uri::new(format!("/users/{}/chats", path_segment(user_id))),
        )
        .with_query(query)
        .with_valid_status([StatusCode::OK])
        .with_consistency(RetryOnNotFound);

        self.base
            .execute(ctx, input)
            .await
            .and_then(decode_collection)
            .map_err(|err| err.context("ChatClient::list"))
    }

    /// Updates a chat. The chat must carry its ID.
    pub async fn update(&self, ctx: &Context, chat: &Chat) -> Result<()> {
        let id = chat.id.as_deref().ok_or_else(|| {
            GraphError::InvalidInput("chat ID is required for update".to_owned())
                .context("ChatClient::update")
        })?;
        let body = encode_entity(chat).map_err(|err| err.context("ChatClient::update"))?;
        let input = RequestInput::new(
            Method::PATCH,
            Uri::new(format!("/chats/{}", path_segment(id))),
        )
        .with_body(body)
        .with_valid_status([StatusCode::NO_CONTENT])
        .with_consistency(RetryOnNotFound);

        self.base
            .execute(ctx, input)
            .await
            .map(|_| ())
            .map_err(|err| err.context("ChatClient::update"))
    }

    /// Deletes a chat.
    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<()> {
        let input = RequestInput::new(
            Method::DELETE,
            Uri::new(format!("/chats/{}", path_segment(id))),
        )
        .with_valid_status([StatusCode::NO_CONTENT])
        .with_consistency(RetryOnNotFound);

        self.base
            .execute(ctx, input)
            .await
            .map(|_| ())
            .map_err(|err| err.context("ChatClient::delete"))
    }
}
