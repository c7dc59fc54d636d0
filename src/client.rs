use std::fmt;
use std::time::{Duration, Instant};

use reqwest::{header, StatusCode};
use tokio::time::sleep;

use crate::{
    predicate::AttemptOutcome, ApiVersion, ClientOptions, Context, GraphError, ODataError,
    RequestInput, Response, Result, Uri,
};

/// Public cloud Graph endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://graph.microsoft.com";

#[derive(Clone)]
/// HTTP client and request executor for the Graph API.
///
/// Every entity operation funnels through [`GraphClient::execute`], which
/// applies query options, validates the response status and retries
/// responses that a consistency predicate classifies as replication lag.
pub struct GraphClient {
    http: reqwest::Client,
    endpoint: String,
    authorization: String,
    api_version: ApiVersion,
    options: ClientOptions,
}

impl fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphClient")
            .field("endpoint", &self.endpoint)
            .field("authorization", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("options", &self.options)
            .finish()
    }
}

impl GraphClient {
    /// Creates a client with a full raw authorization value.
    ///
    /// Example: `"Bearer <token>"` or any custom scheme.
    pub fn new(endpoint: impl Into<String>, authorization: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            authorization: authorization.into(),
            api_version: ApiVersion::default(),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from a bearer token.
    ///
    /// If the token is missing the `Bearer ` prefix, it is added automatically.
    pub fn new_bearer(endpoint: impl Into<String>, token: impl AsRef<str>) -> Self {
        let authorization = normalize_bearer_authorization(token.as_ref());
        Self::new(endpoint, authorization)
    }

    /// Creates a client for the public cloud endpoint.
    pub fn global(token: impl AsRef<str>) -> Self {
        Self::new_bearer(DEFAULT_ENDPOINT, token)
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `MSGRAPH_TOKEN` — access token (Bearer prefix optional), required
    /// - `MSGRAPH_ENDPOINT` — endpoint root, defaults to [`DEFAULT_ENDPOINT`]
    /// - `MSGRAPH_API_VERSION` — `v1.0` or `beta`, defaults to `v1.0`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use msgraph_http::GraphClient;
    ///
    /// let graph = GraphClient::from_env().expect("missing MSGRAPH_TOKEN");
    /// ```
    pub fn from_env() -> std::result::Result<Self, String> {
        let token = std::env::var("MSGRAPH_TOKEN")
            .map_err(|_| "missing MSGRAPH_TOKEN environment variable".to_owned())?;
        if token.trim().is_empty() {
            return Err("MSGRAPH_TOKEN is set but empty".to_owned());
        }
        let endpoint = std::env::var("MSGRAPH_ENDPOINT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
        let api_version = match std::env::var("MSGRAPH_API_VERSION") {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => ApiVersion::default(),
        };
        Ok(Self::new_bearer(endpoint, token).with_api_version(api_version))
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn with_api_version(mut self, api_version: ApiVersion) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Turns consistency retries off or back on for this client.
    ///
    /// Not meant to be flipped while operations are in flight on clones
    /// of the same client; each clone carries its own copy of the flag.
    pub fn set_retries_disabled(&mut self, disabled: bool) {
        self.options.disable_retries = disabled;
    }

    pub fn retries_disabled(&self) -> bool {
        self.options.disable_retries
    }

    /// Executes one logical operation with bounded consistency retries.
    ///
    /// Transport and cancellation errors are terminal. Responses are
    /// retried only when the request's predicate asks for it and the
    /// retry budget allows; otherwise the last response is validated
    /// against the accepted status set.
    pub async fn execute(&self, ctx: &Context, input: RequestInput) -> Result<Response> {
        let started = Instant::now();
        let mut attempt = 0u32;

        loop {
            ctx.check()?;
            attempt += 1;

            let (status, body) = self.send(ctx, &input).await?;
            let error = ODataError::from_body(&body);

            let wants_retry = input.consistency.as_ref().is_some_and(|predicate| {
                predicate.should_retry(&AttemptOutcome {
                    status,
                    error: error.as_ref(),
                    attempt,
                })
            });

            if wants_retry {
                if let Some(delay) = self.consistency_delay(attempt, started) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        method = %input.method,
                        entity = %input.uri.entity,
                        status = status.as_u16(),
                        attempt,
                        ?delay,
                        "retrying after consistency failure"
                    );
                    wait_before_retry(ctx, delay).await?;
                    continue;
                }

                #[cfg(feature = "tracing")]
                tracing::warn!(
                    method = %input.method,
                    entity = %input.uri.entity,
                    status = status.as_u16(),
                    attempt,
                    disabled = self.options.disable_retries,
                    "consistency retries exhausted"
                );
            }

            return Self::finish(&input, status, body, error, attempt);
        }
    }

    fn finish(
        input: &RequestInput,
        status: StatusCode,
        body: Vec<u8>,
        error: Option<ODataError>,
        attempts: u32,
    ) -> Result<Response> {
        if input.accepts(status) {
            return Ok(Response {
                status,
                body,
                error,
                attempts,
            });
        }

        Err(GraphError::Status {
            status: status.as_u16(),
            error,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    /// Returns the wait before the next consistency retry, or `None` when
    /// the budget is spent or retries are disabled.
    fn consistency_delay(&self, attempt: u32, started: Instant) -> Option<Duration> {
        if self.options.disable_retries || attempt >= self.options.attempt_limit() {
            return None;
        }
        let delay = self.options.backoff_for(attempt - 1);
        if let Some(limit) = self.options.retry_elapsed_limit() {
            if started.elapsed() + delay > limit {
                return None;
            }
        }
        Some(delay)
    }

    /// Sends the request, retrying transport failures only when the
    /// separate transport policy allows it.
    async fn send(&self, ctx: &Context, input: &RequestInput) -> Result<(StatusCode, Vec<u8>)> {
        let mut failures = 0u32;
        loop {
            match self.send_once(ctx, input).await {
                Err(GraphError::Transport(err))
                    if failures < self.options.transport_retries
                        && should_retry_transport(&err) =>
                {
                    let delay = self.options.backoff_for(failures);
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        error = %err,
                        ?delay,
                        "retrying after transport failure"
                    );
                    wait_before_retry(ctx, delay).await?;
                    failures += 1;
                }
                other => return other,
            }
        }
    }

    async fn send_once(
        &self,
        ctx: &Context,
        input: &RequestInput,
    ) -> Result<(StatusCode, Vec<u8>)> {
        let mut request = self
            .http
            .request(input.method.clone(), self.resource_url(&input.uri))
            .header(header::AUTHORIZATION, &self.authorization)
            .timeout(Duration::from_millis(self.options.timeout_ms));

        for (name, value) in input.query.headers() {
            request = request.header(name, value);
        }
        let values = input.query.values();
        if !values.is_empty() {
            request = request.query(&values);
        }
        if let Some(body) = &input.body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = tokio::select! {
            biased;
            reason = ctx.done() => return Err(reason),
            result = request.send() => result.map_err(GraphError::Transport)?,
        };

        let status = response.status();
        // The body is buffered in full here so retry decisions and decoding
        // never need to read the stream twice.
        let body = tokio::select! {
            biased;
            reason = ctx.done() => return Err(reason),
            result = response.bytes() => result.map_err(GraphError::Transport)?,
        };

        Ok((status, body.to_vec()))
    }

    fn resource_url(&self, uri: &Uri) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        let version = self.api_version.as_str();
        if uri.entity.starts_with('/') {
            format!("{endpoint}/{version}{}", uri.entity)
        } else {
            format!("{endpoint}/{version}/{}", uri.entity)
        }
    }
}

/// Waits before the next attempt, aborting as soon as the context ends.
async fn wait_before_retry(ctx: &Context, delay: Duration) -> Result<()> {
    tokio::select! {
        biased;
        reason = ctx.done() => Err(reason),
        _ = sleep(delay) => Ok(()),
    }
}

fn should_retry_transport(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
