//! Resource fetching: local files, hosted documents and plain URLs.

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use codelab_common::net::{
    HttpClient, HttpResponse, NetError, ReqwestClient, RetryingClient, SleepFn,
};
use codelab_common::url::hosted_doc_id;
use codelab_model::Codelab;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::{debug, info};
use url::Url;

use crate::config::FetchConfig;
use crate::error::LoadError;
use crate::pipeline::ParserPipeline;

/// Format of a fetched codelab source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum SourceType {
    /// Markdown text: local files and plain URLs.
    #[strum(serialize = "md")]
    #[serde(rename = "md")]
    Markdown,
    /// Exported hosted document.
    #[strum(serialize = "gdoc")]
    #[serde(rename = "gdoc")]
    HostedDoc,
}

/// Where a [`Resource`] was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A local file.
    File(PathBuf),
    /// A remote URL.
    Remote(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

/// A fetched codelab source, body not yet read.
pub struct Resource {
    /// Format of the body.
    pub source_type: SourceType,
    /// Where the body comes from.
    pub location: Location,
    /// The body stream.
    pub body: Box<dyn Read + Send>,
    /// Last modification time; `None` when the fetch skipped metadata.
    pub modified: Option<DateTime<Utc>>,
}

impl Resource {
    fn remote(
        source_type: SourceType,
        url: String,
        response: HttpResponse,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            source_type,
            location: Location::Remote(url),
            body: response.into_body(),
            modified,
        }
    }

    /// Read the whole body.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] for a failing file and
    /// [`NetError::Body`] for a failing response stream.
    pub fn into_bytes(mut self) -> Result<Vec<u8>, LoadError> {
        let mut buf = Vec::new();
        match self.body.read_to_end(&mut buf) {
            Ok(_) => Ok(buf),
            Err(source) => Err(match self.location {
                Location::File(path) => LoadError::Io { path, source },
                Location::Remote(url) => NetError::Body { url, source }.into(),
            }),
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("source_type", &self.source_type)
            .field("location", &self.location)
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

/// A parsed codelab with the provenance of its source.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCodelab {
    /// The codelab, imports resolved.
    pub codelab: Codelab,
    /// Format of the source it was parsed from.
    pub source_type: SourceType,
    /// Last modification time of the source.
    pub modified: Option<DateTime<Utc>>,
}

/// The fields of a hosted document's metadata record that matter here.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FileMetadata {
    mime_type: String,
    export_links: HashMap<String, String>,
    modified_date: Option<DateTime<Utc>>,
}

/// Fetches, parses and resolves codelabs.
pub struct Loader<C = ReqwestClient> {
    pub(crate) client: RetryingClient<C>,
    pub(crate) config: FetchConfig,
    pub(crate) parsers: ParserPipeline,
}

impl Loader {
    /// A loader using the blocking HTTP client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Net`] if the HTTP client cannot be built.
    pub fn from_config(config: FetchConfig) -> Result<Self, LoadError> {
        let client = ReqwestClient::new(config.timeout(), &config.user_agent)?;
        Ok(Self::new(client).with_config(config))
    }

    /// Like [`Loader::from_config`], sending `token` as a bearer credential
    /// with every request.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Net`] if the HTTP client cannot be built.
    pub fn with_bearer_token(config: FetchConfig, token: &str) -> Result<Self, LoadError> {
        let client = ReqwestClient::with_bearer_token(config.timeout(), &config.user_agent, token)?;
        Ok(Self::new(client).with_config(config))
    }
}

impl<C: HttpClient> Loader<C> {
    /// A loader over `client` with the default configuration and parsers.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client: RetryingClient::new(client),
            config: FetchConfig::default(),
            parsers: ParserPipeline::new(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: FetchConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the parser pipeline.
    #[must_use]
    pub fn with_parsers(mut self, parsers: ParserPipeline) -> Self {
        self.parsers = parsers;
        self
    }

    /// Replace the function used to wait between retries.
    #[must_use]
    pub fn with_sleep(mut self, sleep: SleepFn) -> Self {
        self.client = self.client.with_sleep(sleep);
        self
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// The underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &C {
        self.client.inner()
    }

    /// Fetch, parse and resolve the codelab named by `identifier`.
    ///
    /// # Errors
    ///
    /// Returns whatever [`Loader::fetch`], the matching parser or
    /// [`Loader::resolve_imports`] fails with.
    pub fn load_codelab(&self, identifier: &str) -> Result<LoadedCodelab, LoadError> {
        let resource = self.fetch(identifier)?;
        let source_type = resource.source_type;
        let modified = resource.modified;
        let mut codelab = self.parsers.parse(source_type, &resource.into_bytes()?)?;
        self.resolve_imports(&mut codelab)?;
        info!(id = %codelab.id, steps = codelab.steps.len(), %source_type, "loaded codelab");
        Ok(LoadedCodelab {
            codelab,
            source_type,
            modified,
        })
    }

    /// Fetch the source named by `identifier`.
    ///
    /// An existing local path is opened as Markdown with the file's
    /// modification time. Anything else goes to [`Loader::fetch_remote`]
    /// with metadata.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if a local file cannot be opened, otherwise
    /// as [`Loader::fetch_remote`].
    pub fn fetch(&self, identifier: &str) -> Result<Resource, LoadError> {
        let path = Path::new(identifier);
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return self.fetch_remote(identifier, false);
            }
            Err(source) => {
                return Err(LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened local source");
        Ok(Resource {
            source_type: SourceType::Markdown,
            location: Location::File(path.to_path_buf()),
            body: Box::new(file),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    /// Fetch a remote source.
    ///
    /// Identifiers without a host, or on the hosting domain, are hosted
    /// documents; with `nometa` their content is exported directly and
    /// `modified` is `None`. Any other URL is fetched as Markdown, with
    /// `modified` from its `Last-Modified` header or the current time.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidUrl`] for an unparsable identifier,
    /// [`LoadError::Net`] when the fetch fails, and the metadata errors
    /// of the hosted path.
    pub fn fetch_remote(&self, identifier: &str, nometa: bool) -> Result<Resource, LoadError> {
        match Url::parse(identifier) {
            Ok(url) => match url.host_str() {
                Some(host) if host != self.config.hosting_domain => self.fetch_direct(identifier),
                _ => self.fetch_hosted(identifier, nometa),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => self.fetch_hosted(identifier, nometa),
            Err(source) => Err(LoadError::InvalidUrl {
                url: identifier.to_string(),
                source,
            }),
        }
    }

    fn fetch_direct(&self, url: &str) -> Result<Resource, LoadError> {
        let response = self.client.get(url, self.config.direct_retries)?;
        let modified = response
            .header("last-modified")
            .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
            .map_or_else(Utc::now, |time| time.with_timezone(&Utc));
        debug!(url, %modified, "fetched remote source");
        Ok(Resource::remote(
            SourceType::Markdown,
            url.to_string(),
            response,
            Some(modified),
        ))
    }

    fn fetch_hosted(&self, source: &str, nometa: bool) -> Result<Resource, LoadError> {
        let id = hosted_doc_id(source);
        let retries = self.config.hosted_retries;

        if nometa {
            let export = Url::parse_with_params(
                &self.config.export_base,
                [("id", id), ("exportFormat", "html")],
            )
            .map_err(|source| LoadError::InvalidUrl {
                url: self.config.export_base.clone(),
                source,
            })?;
            let response = self.client.get(export.as_str(), retries)?;
            debug!(id, "exported hosted document");
            return Ok(Resource::remote(
                SourceType::HostedDoc,
                export.to_string(),
                response,
                None,
            ));
        }

        let meta_url = format!(
            "{}/files/{id}?fields=id,mimeType,exportLinks,modifiedDate",
            self.config.api_base
        );
        let body = self.client.get(&meta_url, retries)?.bytes(&meta_url)?;
        let meta: FileMetadata =
            serde_json::from_slice(&body).map_err(|source| LoadError::Metadata {
                id: id.to_string(),
                source,
            })?;
        if meta.mime_type != self.config.document_mime {
            return Err(LoadError::MimeTypeMismatch {
                id: id.to_string(),
                mime_type: meta.mime_type,
            });
        }
        let Some(link) = meta
            .export_links
            .get(&self.config.export_mime)
            .filter(|link| !link.is_empty())
        else {
            return Err(LoadError::MissingExportLink {
                id: id.to_string(),
                mime_type: self.config.export_mime.clone(),
            });
        };

        let response = self.client.get(link, retries)?;
        debug!(id, modified = ?meta.modified_date, "fetched hosted document");
        Ok(Resource::remote(
            SourceType::HostedDoc,
            link.clone(),
            response,
            meta.modified_date,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_names() {
        assert_eq!(SourceType::Markdown.to_string(), "md");
        assert_eq!(SourceType::HostedDoc.to_string(), "gdoc");
    }

    #[test]
    fn metadata_record_fields() {
        let meta: FileMetadata = serde_json::from_str(
            r#"{"id":"abc","mimeType":"text/plain",
                "exportLinks":{"text/html":"https://export/abc"},
                "modifiedDate":"2016-03-01T12:30:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(meta.mime_type, "text/plain");
        assert_eq!(meta.export_links["text/html"], "https://export/abc");
        assert_eq!(
            meta.modified_date.map(|t| t.to_rfc3339()),
            Some("2016-03-01T12:30:00+00:00".to_string())
        );
    }
}
