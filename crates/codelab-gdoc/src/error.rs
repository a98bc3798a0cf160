use thiserror::Error;

/// Input the parser cannot interpret at all.
///
/// Only byte input can fail: markup structure is always recoverable since
/// the HTML tree builder fills in missing `<html>` and `<body>` elements.
///
/// Unrecognized styling or block shapes never produce an error; they fall
/// back to plain content.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input is not UTF-8.
    #[error("document is not valid UTF-8 (first invalid byte at offset {offset})")]
    NotUtf8 {
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },
}
