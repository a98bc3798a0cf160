//! Loader errors.

use std::io;
use std::path::PathBuf;

use codelab_common::net::NetError;
use thiserror::Error;

use crate::fetch::SourceType;

/// Error type returned by document parsers registered with a
/// [`ParserPipeline`](crate::ParserPipeline).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while fetching, parsing or resolving a codelab.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A local file or directory operation failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The HTTP layer failed.
    #[error(transparent)]
    Net(#[from] NetError),
    /// An identifier could not be parsed as a URL.
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        /// The identifier as given.
        url: String,
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },
    /// A hosted document's metadata record did not decode.
    #[error("{id}: invalid metadata record: {source}")]
    Metadata {
        /// Hosted document id.
        id: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A hosted document is not of the expected type.
    #[error("{id}: invalid mime type: {mime_type}")]
    MimeTypeMismatch {
        /// Hosted document id.
        id: String,
        /// The type the metadata record reported.
        mime_type: String,
    },
    /// A hosted document offers no export in the expected format.
    #[error("{id}: no {mime_type:?} export link")]
    MissingExportLink {
        /// Hosted document id.
        id: String,
        /// The export format that was looked for.
        mime_type: String,
    },
    /// No registered parser accepts the source type.
    #[error("no parser registered for {source_type} sources")]
    UnsupportedSource {
        /// Source type of the fetched resource.
        source_type: SourceType,
    },
    /// A parser rejected the document.
    #[error("{parser} parser: {source}")]
    Parse {
        /// Name of the parser that failed.
        parser: &'static str,
        /// What the parser reported.
        #[source]
        source: BoxError,
    },
    /// An imported fragment could not be loaded.
    #[error("{url}: {source}")]
    Import {
        /// Source of the fragment.
        url: String,
        /// Why loading it failed.
        #[source]
        source: Box<LoadError>,
    },
    /// An image could not be downloaded.
    #[error("{url}: {source}")]
    Image {
        /// Source of the image.
        url: String,
        /// Why downloading it failed.
        #[source]
        source: Box<LoadError>,
    },
    /// A configuration file did not decode.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
