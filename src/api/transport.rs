use std::{sync::Arc, time::Duration};

use reqwest::{
    Client, Method, Response,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Body returned by a successful request.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The response declared a JSON content type and parsed cleanly.
    Json(Value),
    /// Any other content type, returned verbatim.
    Text(String),
}

impl Payload {
    /// Convert into a JSON value; text bodies become a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
        }
    }
}

/// Join a base address and a relative path with exactly one separating slash.
///
/// An empty base yields a rooted relative path (`/api/...`).
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// HTTP adapter talking to the remote session authority.
///
/// One call to [`HttpTransport::request`] performs exactly one network call:
/// no retries, no caching.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Arc<str>,
}

impl HttpTransport {
    /// Build a transport rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::Config(format!("failed to build HTTP client: {source}")))?;

        let base_url = base_url.trim_end_matches('/');
        if reqwest::Url::parse(base_url).is_err() {
            return Err(ClientError::Config(format!(
                "invalid base address `{base_url}`"
            )));
        }

        Ok(Self {
            client,
            base_url: Arc::from(base_url),
        })
    }

    /// Address every request path is joined onto.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and decode the response.
    ///
    /// `query` pairs are percent-encoded onto the URL; `body` is sent as JSON.
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> ClientResult<Payload>
    where
        B: ?Sized + Serialize,
    {
        let url = join_url(&self.base_url, path);
        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!(%method, %url, "sending request");
        let response = builder
            .send()
            .await
            .map_err(|source| ClientError::network(&source))?;

        decode(response).await
    }
}

/// Turn a response into a [`Payload`] or a typed failure.
async fn decode(response: Response) -> ClientResult<Payload> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ClientError::http_status(status, &text));
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    if is_json {
        response
            .json::<Value>()
            .await
            .map(Payload::Json)
            .map_err(|source| ClientError::Transport {
                status: Some(status.as_u16()),
                message: format!("failed to decode JSON response: {source}"),
            })
    } else {
        response
            .text()
            .await
            .map(Payload::Text)
            .map_err(|source| ClientError::network(&source))
    }
}
