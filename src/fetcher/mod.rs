use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{Comment, User};

pub const DEFAULT_COMMENTS_URL: &str = "https://jsonplaceholder.typicode.com/comments";
pub const DEFAULT_USERS_URL: &str = "https://jsonplaceholder.typicode.com/users";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} did not return the expected JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug)]
pub struct FetcherOptions {
    pub comments_url: String,
    pub users_url: String,
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
}

impl Default for FetcherOptions {
    fn default() -> Self {
        Self {
            comments_url: DEFAULT_COMMENTS_URL.to_string(),
            users_url: DEFAULT_USERS_URL.to_string(),
            timeout_seconds: 10,
            proxy: None,
        }
    }
}

/// Plain unauthenticated GETs against the two collection endpoints. The whole
/// collection comes back in one response and is paged locally.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    options: FetcherOptions,
}

impl HttpFetcher {
    pub fn new(options: FetcherOptions) -> Result<Self, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!(
                "commentboard/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(options.timeout_seconds.max(1)));

        if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| FetchError::ProxySetup {
                proxy: proxy.to_string(),
                source: e,
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::HttpClientBuild { source: e })?;
        Ok(Self { client, options })
    }

    pub fn options(&self) -> &FetcherOptions {
        &self.options
    }

    pub async fn fetch_comments(&self) -> Result<Vec<Comment>, FetchError> {
        let url = self.options.comments_url.as_str();
        let body = self.get(url).await?;
        let comments: Vec<Comment> = decode(url, &body)?;
        info!(count = comments.len(), "fetched comments");
        Ok(comments)
    }

    /// First user of the users collection; `None` when the array is empty.
    pub async fn fetch_first_user(&self) -> Result<Option<User>, FetchError> {
        let url = self.options.users_url.as_str();
        let body = self.get(url).await?;
        let users: Vec<User> = decode(url, &body)?;
        info!(count = users.len(), "fetched users");
        Ok(users.into_iter().next())
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.bytes().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })?;
        Ok(body.to_vec())
    }
}

pub fn decode<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        source: e,
    })
}
