//! Google Docs HTML export to codelab content tree.
//!
//! # Scope
//!
//! This crate implements:
//! - **Document framing**
//!   - Title paragraph, metadata table, one step per level-1 heading
//!   - Duration annotations in meta-colored text
//!
//! - **Block content**
//!   - Paragraphs, headers (with checklist headers), bulleted, numbered and
//!     nested lists merged across sibling elements
//!   - Single-cell tables as code blocks, console blocks, info boxes and
//!     surveys
//!   - Fragment imports (`[[import ...]]`)
//!
//! - **Inline content**
//!   - Bold, italic and code runs compacted into the fewest text nodes
//!   - Links (with redirect unwrapping), buttons and images
//!   - Comment and footnote blocks dropped along with their references
//!
//! Structure comes entirely from resolved styles, see [`codelab_css::StyleRole`].
//! Markup the parser does not recognize falls back to plain paragraphs.

mod block;
mod dom;
/// Step duration annotations.
pub mod duration;
mod error;
mod inline;
mod parser;
mod state;
mod table;

pub use duration::parse_duration;
pub use error::ParseError;
pub use parser::{parse, parse_bytes, parse_fragment, parse_fragment_bytes};
