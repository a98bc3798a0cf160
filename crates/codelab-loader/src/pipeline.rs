//! Parser pipeline: source type to document parser.
//!
//! Parsers are tried in registration order and the first one whose
//! [`DocumentParser::supports`] accepts the source type wins. The default
//! pipeline only knows exported hosted documents; Markdown sources need a
//! parser registered by the embedding application.

use codelab_model::{Codelab, ContentNode};

use crate::error::{BoxError, LoadError};
use crate::fetch::SourceType;

/// A parser that turns a fetched source into the content tree.
pub trait DocumentParser: Send + Sync {
    /// Human-readable name (for diagnostics).
    fn name(&self) -> &'static str;

    /// Whether this parser handles sources of `source_type`.
    fn supports(&self, source_type: SourceType) -> bool;

    /// Parse a complete codelab.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is structurally unparsable.
    fn parse(&self, body: &[u8]) -> Result<Codelab, BoxError>;

    /// Parse an imported fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is structurally unparsable.
    fn parse_fragment(&self, body: &[u8]) -> Result<Vec<ContentNode>, BoxError>;
}

/// Parses exported hosted documents with [`codelab_gdoc`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GdocParser;

impl DocumentParser for GdocParser {
    fn name(&self) -> &'static str {
        "gdoc"
    }

    fn supports(&self, source_type: SourceType) -> bool {
        source_type == SourceType::HostedDoc
    }

    fn parse(&self, body: &[u8]) -> Result<Codelab, BoxError> {
        Ok(codelab_gdoc::parse_bytes(body)?)
    }

    fn parse_fragment(&self, body: &[u8]) -> Result<Vec<ContentNode>, BoxError> {
        Ok(codelab_gdoc::parse_fragment_bytes(body)?)
    }
}

/// Registered parsers, in lookup order.
pub struct ParserPipeline {
    parsers: Vec<Box<dyn DocumentParser>>,
}

impl ParserPipeline {
    /// A pipeline with the default parsers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(GdocParser)],
        }
    }

    /// A pipeline with no parsers at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Add `parser` after the already registered ones.
    #[must_use]
    pub fn with(mut self, parser: impl DocumentParser + 'static) -> Self {
        self.parsers.push(Box::new(parser));
        self
    }

    /// The first parser supporting `source_type`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnsupportedSource`] if none does.
    pub fn parser_for(&self, source_type: SourceType) -> Result<&dyn DocumentParser, LoadError> {
        self.parsers
            .iter()
            .find(|parser| parser.supports(source_type))
            .map(AsRef::as_ref)
            .ok_or(LoadError::UnsupportedSource { source_type })
    }

    /// Parse a codelab source with the matching parser.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnsupportedSource`] when no parser matches and
    /// [`LoadError::Parse`] when the parser fails.
    pub fn parse(&self, source_type: SourceType, body: &[u8]) -> Result<Codelab, LoadError> {
        let parser = self.parser_for(source_type)?;
        parser.parse(body).map_err(|source| LoadError::Parse {
            parser: parser.name(),
            source,
        })
    }

    /// Parse a fragment source with the matching parser.
    ///
    /// # Errors
    ///
    /// As [`ParserPipeline::parse`].
    pub fn parse_fragment(
        &self,
        source_type: SourceType,
        body: &[u8],
    ) -> Result<Vec<ContentNode>, LoadError> {
        let parser = self.parser_for(source_type)?;
        parser.parse_fragment(body).map_err(|source| LoadError::Parse {
            parser: parser.name(),
            source,
        })
    }
}

impl Default for ParserPipeline {
    fn default() -> Self {
        Self::new()
    }
}
