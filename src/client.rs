use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_CANCELLATIONS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS,
};
use crate::types::{ChatRequest, ChatResponse, DEFAULT_SOURCE};

/// Base URL of the chat service.
pub const DEFAULT_ENDPOINT: &str = "http://askapi.huaxincem.com/";

/// Request timeout; long enough that slow generations are never cut off.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1000);

/// Environment variable consulted when no API key is given explicitly.
pub const API_KEY_ENV: &str = "PALAVER_API_KEY";

const CHAT_PATH: &str = "chat";

/// A chat-completion backend.
///
/// Implementations must resolve promptly with [`Error::Abort`] once `cancel`
/// fires, and must never deliver a response after that.
#[async_trait::async_trait]
pub trait ChatApiClient: Send + Sync {
    /// Sends `text` together with the conversation `history` and returns the reply.
    async fn send(
        &self,
        text: &str,
        history: &[String],
        cancel: &CancellationToken,
    ) -> Result<ChatResponse>;
}

/// Client for the chat HTTP endpoint.
#[derive(Clone)]
pub struct ChatClient {
    client: ReqwestClient,
    headers: HeaderMap,
    url: Url,
    source: String,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl ChatClient {
    /// Create a new chat client against the default endpoint.
    ///
    /// The API key can be provided directly or read from the PALAVER_API_KEY
    /// environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        endpoint: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var(API_KEY_ENV).map_err(|_| {
                Error::authentication(format!(
                    "API key not provided and {API_KEY_ENV} environment variable not set"
                ))
            })?,
        };
        let headers = default_headers(&api_key)?;
        let url = chat_url(endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            headers,
            url,
            source: DEFAULT_SOURCE.to_string(),
            timeout,
            logger: None,
        })
    }

    /// Sets the `source` tag sent with every request.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Installs a logger that observes every request and response.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The fully resolved URL requests are posted to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Maps a non-2xx response to an error carrying its body.
    async fn status_error(response: Response) -> Error {
        let status_code = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("unreadable {status_code} body: {e}"),
                    Some(Box::new(e)),
                );
            }
        };

        match status_code {
            400 => Error::validation(body, None),
            401 | 403 => Error::authentication(body),
            408 => Error::timeout(body, None),
            _ => Error::api(status_code, body),
        }
    }

    async fn post(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(self.url.clone())
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(e.to_string(), Some(self.timeout))
                } else if e.is_connect() {
                    Error::connection(e.to_string(), Some(Box::new(e)))
                } else {
                    Error::http_client(e.to_string(), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        response.json::<ChatResponse>().await.map_err(|e| {
            Error::serialization(format!("reply is not a chat response: {e}"), Some(Box::new(e)))
        })
    }
}

#[async_trait::async_trait]
impl ChatApiClient for ChatClient {
    async fn send(
        &self,
        text: &str,
        history: &[String],
        cancel: &CancellationToken,
    ) -> Result<ChatResponse> {
        let request = ChatRequest::new(text, history.to_vec()).with_source(self.source.clone());
        if let Some(logger) = &self.logger {
            logger.log_request(&request);
        }

        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::abort("request cancelled")),
            result = self.post(&request) => result,
        };
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        match &result {
            Ok(response) => {
                if let Some(logger) = &self.logger {
                    logger.log_response(response);
                }
            }
            Err(err) if err.is_abort() => CLIENT_REQUEST_CANCELLATIONS.click(),
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                tracing::debug!(error = %err, "chat request failed");
            }
        }
        result
    }
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("url", &self.url.as_str())
            .field("source", &self.source)
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

/// Create default headers for chat requests.
fn default_headers(api_key: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    let mut credential = HeaderValue::from_str(api_key)
        .map_err(|_| Error::authentication("API key is not a valid header value"))?;
    credential.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, credential);
    Ok(headers)
}

/// Resolve the chat URL beneath `endpoint`, treating it as a directory.
fn chat_url(endpoint: &str) -> Result<Url> {
    let mut base = Url::parse(endpoint)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(CHAT_PATH)?)
}
