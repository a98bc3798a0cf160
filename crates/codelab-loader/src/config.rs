//! Fetch configuration.

use std::time::Duration;

use codelab_common::net::DEFAULT_USER_AGENT;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Endpoints, document types and retry bounds used by the [`Loader`].
///
/// Every field has a default, so a TOML file only needs to name what it
/// changes:
///
/// ```toml
/// hosted_retries = 3
/// timeout_secs = 10
/// ```
///
/// [`Loader`]: crate::Loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Base URL of the document metadata API.
    pub api_base: String,
    /// Endpoint serving content-only document exports.
    pub export_base: String,
    /// Host whose URLs are fetched as hosted documents.
    pub hosting_domain: String,
    /// MIME type a hosted document must have.
    pub document_mime: String,
    /// Export format requested from the metadata record.
    pub export_mime: String,
    /// Retry bound for plain URL fetches.
    pub direct_retries: u32,
    /// Retry bound for hosted-document metadata and export fetches.
    pub hosted_retries: u32,
    /// Retry bound for each image download.
    pub image_retries: u32,
    /// Per-request timeout of the default HTTP client, in seconds.
    pub timeout_secs: u64,
    /// User-Agent of the default HTTP client.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/drive/v2".to_string(),
            export_base: "https://docs.google.com/feeds/download/documents/export/Export"
                .to_string(),
            hosting_domain: "docs.google.com".to_string(),
            document_mime: "application/vnd.google-apps.document".to_string(),
            export_mime: "text/html".to_string(),
            direct_retries: 3,
            hosted_retries: 7,
            image_retries: 5,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Read a configuration from TOML. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Config`] if the text is not valid TOML or a
    /// value has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(text)?)
    }

    /// The request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
