//! HTTP fetch utilities for the codelab pipeline.
//!
//! Every remote read goes through [`RetryingClient::get`], which wraps an
//! injected [`HttpClient`] with bounded retries, exponential backoff with
//! jitter, and rate-limit detection. The blocking [`ReqwestClient`] is the
//! default capability; callers with credentials supply their own client or
//! a bearer token.
use base64::Engine;
use serde::Deserialize;
use std::error::Error as StdError;
use std::io::{self, Read};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent header sent with all requests unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("codelab-loader/", env!("CARGO_PKG_VERSION"));

/// Maximum number of body bytes quoted in an [`NetError::HttpStatus`].
const BODY_SNIPPET_LEN: usize = 512;

/// API error reasons that mean "slow down", not "give up".
const RATE_LIMIT_REASONS: [&str; 2] = ["rateLimitExceeded", "userRateLimitExceeded"];

/// Errors produced by the HTTP layer.
#[derive(Debug, Error)]
pub enum NetError {
    /// The request never produced a response (connection, TLS, timeout).
    #[error("request to {url} failed: {source}")]
    Transport {
        /// The requested URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    /// A non-success response that retrying cannot fix.
    #[error("fetch {url}: {status}; {body}")]
    HttpStatus {
        /// The requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Leading bytes of the response body.
        body: String,
    },
    /// Every attempt failed with a retryable error.
    #[error("{url}: failed after {retries} retries")]
    RetriesExhausted {
        /// The requested URL.
        url: String,
        /// Retry bound that was exhausted.
        retries: u32,
    },
    /// Reading a response body failed.
    #[error("failed to read response body from {url}: {source}")]
    Body {
        /// The requested URL.
        url: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A `data:` URL could not be decoded.
    #[error("invalid data URL: {reason}")]
    InvalidDataUrl {
        /// What was wrong with it.
        reason: String,
    },
}

/// A response as seen by the retry policy: status, headers and a body
/// stream owned by the caller.
pub struct HttpResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Box<dyn Read + Send>,
}

impl HttpResponse {
    /// Create a response from its parts. Header names are matched
    /// case-insensitively.
    #[must_use]
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Box<dyn Read + Send>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// First value of header `name`, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Take ownership of the body stream.
    #[must_use]
    pub fn into_body(self) -> Box<dyn Read + Send> {
        self.body
    }

    /// Read the whole body into memory.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Body`] if the stream fails.
    pub fn bytes(self, url: &str) -> Result<Vec<u8>, NetError> {
        let mut buf = Vec::new();
        let _ = self
            .into_body()
            .read_to_end(&mut buf)
            .map_err(|source| NetError::Body {
                url: url.to_string(),
                source,
            })?;
        Ok(buf)
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// The HTTP capability the pipeline is built on.
///
/// Implementations perform exactly one GET with no retry of their own.
/// Timeouts belong to the implementation.
pub trait HttpClient: Send + Sync {
    /// Perform a single GET request.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Transport`] when no response was received.
    fn get(&self, url: &str) -> Result<HttpResponse, NetError>;
}

/// Blocking `reqwest` implementation of [`HttpClient`].
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Build a client with the given timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Transport`] if the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, NetError> {
        Self::build(reqwest::blocking::Client::builder(), timeout, user_agent)
    }

    /// Build a client that sends `Authorization: Bearer <token>` with every
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Transport`] if the token is not a valid header
    /// value or the client cannot be built.
    pub fn with_bearer_token(
        timeout: Duration,
        user_agent: &str,
        token: &str,
    ) -> Result<Self, NetError> {
        let mut value = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| NetError::Transport {
                url: String::new(),
                source: Box::new(e),
            })?;
        value.set_sensitive(true);
        let mut headers = reqwest::header::HeaderMap::new();
        let _ = headers.insert(reqwest::header::AUTHORIZATION, value);
        Self::build(
            reqwest::blocking::Client::builder().default_headers(headers),
            timeout,
            user_agent,
        )
    }

    fn build(
        builder: reqwest::blocking::ClientBuilder,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, NetError> {
        let client = builder
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| NetError::Transport {
                url: String::new(),
                source: Box::new(e),
            })?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse, NetError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| NetError::Transport {
                url: url.to_string(),
                source: Box::new(e),
            })?;
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        Ok(HttpResponse::new(
            response.status().as_u16(),
            headers,
            Box::new(response),
        ))
    }
}

/// How the retry loop waits between attempts.
pub type SleepFn = fn(Duration);

/// Delay before retry attempt `attempt` (1-based): `2^attempt + jitter`
/// seconds, where `jitter` is expected in `[0, 1)`.
///
/// Saturates at [`Duration::MAX`] once the delay no longer fits.
#[must_use]
pub fn backoff_delay(attempt: u32, jitter: f64) -> Duration {
    Duration::try_from_secs_f64(2f64.powf(f64::from(attempt)) + jitter).unwrap_or(Duration::MAX)
}

/// Whether an error body is an API error payload naming a rate-limit reason.
#[must_use]
pub fn is_rate_limited(body: &[u8]) -> bool {
    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct ErrorDetail {
        errors: Vec<ErrorItem>,
    }
    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct ErrorItem {
        reason: String,
    }

    serde_json::from_slice::<ErrorBody>(body).is_ok_and(|payload| {
        payload
            .error
            .errors
            .iter()
            .any(|e| RATE_LIMIT_REASONS.contains(&e.reason.as_str()))
    })
}

/// An [`HttpClient`] wrapped in the retry/backoff policy.
pub struct RetryingClient<C> {
    inner: C,
    sleep: SleepFn,
}

impl<C: HttpClient> RetryingClient<C> {
    /// Wrap `inner`; waits between attempts with [`thread::sleep`].
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            sleep: thread::sleep,
        }
    }

    /// Replace the function used to wait between attempts.
    #[must_use]
    pub fn with_sleep(mut self, sleep: SleepFn) -> Self {
        self.sleep = sleep;
        self
    }

    /// The wrapped client.
    pub const fn inner(&self) -> &C {
        &self.inner
    }

    /// GET `url` with up to `max_retries` retries.
    ///
    /// Transport failures, rate-limit payloads and 5xx statuses are retried
    /// after [`backoff_delay`]; any other non-2xx status fails immediately.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::HttpStatus`] for a non-retryable status and
    /// [`NetError::RetriesExhausted`] once every attempt has failed.
    pub fn get(&self, url: &str, max_retries: u32) -> Result<HttpResponse, NetError> {
        for attempt in 0..=max_retries {
            if attempt > 0 {
                let delay = backoff_delay(attempt, fastrand::f64());
                debug!(url, attempt, ?delay, "backing off before retry");
                (self.sleep)(delay);
            }

            let response = match self.inner.get(url) {
                Ok(response) => response,
                // Connection or handshake failures are temporary.
                Err(err) => {
                    warn!(url, attempt, error = %err, "request failed, will retry");
                    continue;
                }
            };
            if response.is_success() {
                return Ok(response);
            }

            let status = response.status();
            let body = response.bytes(url).unwrap_or_else(|err| {
                debug!(url, status, error = %err, "could not read error body");
                Vec::new()
            });
            if is_rate_limited(&body) {
                warn!(url, attempt, status, "rate limited, will retry");
                continue;
            }
            if status >= 500 {
                warn!(url, attempt, status, "server error, will retry");
                continue;
            }
            return Err(NetError::HttpStatus {
                url: url.to_string(),
                status,
                body: body_snippet(&body),
            });
        }
        Err(NetError::RetriesExhausted {
            url: url.to_string(),
            retries: max_retries,
        })
    }
}

fn body_snippet(body: &[u8]) -> String {
    let end = body.len().min(BODY_SNIPPET_LEN);
    String::from_utf8_lossy(&body[..end]).into_owned()
}

/// Decode a `data:` URL and return its payload as raw bytes.
///
/// Supports base64 payloads (`data:image/png;base64,...`) and plain
/// percent-free text payloads.
///
/// # Errors
///
/// Returns [`NetError::InvalidDataUrl`] if the URL has no payload separator
/// or the base64 payload does not decode.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, NetError> {
    let data_url = url.trim_start_matches("data:");
    let Some((metadata, data)) = data_url.split_once(',') else {
        return Err(NetError::InvalidDataUrl {
            reason: "missing comma".to_string(),
        });
    };

    if metadata.ends_with(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| NetError::InvalidDataUrl {
                reason: format!("base64 decode error: {e}"),
            })
    } else {
        Ok(data.as_bytes().to_vec())
    }
}
