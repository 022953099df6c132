//! HTTP adapter for the remote collection port.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::TrackerConfig;
use crate::remote::{RemoteCollectionClient, RemoteError, RemoteMethod, RemoteResult, ResourcePath};

/// Remote collection client speaking JSON over HTTP.
///
/// `ureq` is blocking, so every request is offloaded to the blocking thread
/// pool via [`tokio::task::spawn_blocking`] to keep the async runtime free.
///
/// # Example
///
/// ```ignore
/// use trackboard::remote::adapters::http::HttpRemoteCollection;
///
/// let remote = HttpRemoteCollection::new("http://localhost:3000");
/// ```
#[derive(Debug, Clone)]
pub struct HttpRemoteCollection {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpRemoteCollection {
    /// Creates a client rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let raw: String = base_url.into();
        Self {
            agent: ureq::AgentBuilder::new().build(),
            base_url: raw.trim_end_matches('/').to_owned(),
        }
    }

    /// Creates a client for the configured API base URL.
    #[must_use]
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.api_base_url())
    }

    /// Returns the absolute URL of `path`, without its query string.
    #[must_use]
    pub fn url(&self, path: &ResourcePath) -> String {
        format!("{}{}", self.base_url, path.route())
    }

    async fn send(
        &self,
        method: RemoteMethod,
        path: &ResourcePath,
        body: Option<Value>,
    ) -> RemoteResult<Option<Value>> {
        let agent = self.agent.clone();
        let url = self.url(path);
        let query = path
            .filter()
            .map(|(field, value)| (field.to_owned(), value.to_owned()));
        let display_path = path.to_string();

        tokio::task::spawn_blocking(move || {
            let mut request = agent.request(method.as_str(), &url);
            if let Some((field, value)) = &query {
                request = request.query(field, value);
            }
            let outcome = match body {
                Some(payload) => request.send_json(payload),
                None => request.call(),
            };
            let response = outcome.map_err(|err| map_transport_error(err, &display_path))?;
            if method == RemoteMethod::Delete {
                return Ok(None);
            }
            response
                .into_json::<Value>()
                .map(Some)
                .map_err(RemoteError::decode)
        })
        .await
        .map_err(RemoteError::transport)?
    }
}

fn map_transport_error(err: ureq::Error, path: &str) -> RemoteError {
    match err {
        ureq::Error::Status(404, _) => RemoteError::NotFound(path.to_owned()),
        ureq::Error::Status(code, _) => RemoteError::Status {
            code,
            path: path.to_owned(),
        },
        ureq::Error::Transport(transport) => RemoteError::transport(transport),
    }
}

fn expect_record(value: Option<Value>) -> RemoteResult<Value> {
    value.ok_or_else(|| RemoteError::decode(std::io::Error::other("empty response body")))
}

#[async_trait]
impl RemoteCollectionClient for HttpRemoteCollection {
    async fn get(&self, path: &ResourcePath) -> RemoteResult<Vec<Value>> {
        let body = expect_record(self.send(RemoteMethod::Get, path, None).await?)?;
        serde_json::from_value(body).map_err(RemoteError::decode)
    }

    async fn post(&self, path: &ResourcePath, body: &Value) -> RemoteResult<Value> {
        expect_record(
            self.send(RemoteMethod::Post, path, Some(body.clone()))
                .await?,
        )
    }

    async fn put(&self, path: &ResourcePath, body: &Value) -> RemoteResult<Value> {
        expect_record(self.send(RemoteMethod::Put, path, Some(body.clone())).await?)
    }

    async fn patch(&self, path: &ResourcePath, body: &Value) -> RemoteResult<Value> {
        expect_record(
            self.send(RemoteMethod::Patch, path, Some(body.clone()))
                .await?,
        )
    }

    async fn delete(&self, path: &ResourcePath) -> RemoteResult<()> {
        self.send(RemoteMethod::Delete, path, None).await?;
        Ok(())
    }
}
