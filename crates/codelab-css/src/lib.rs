//! Style classification for exported documents.
//!
//! # Scope
//!
//! This crate implements:
//! - **Style-block parsing** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Qualified rules with comma-separated selector lists
//!   - Declaration lists (also used for `style` attributes)
//!   - Comments, strings and at-rules are skipped safely
//!
//! - **Class cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Only simple class selectors (`.c12`) are kept; the exporting tool
//!     keys every presentational choice on generated class names
//!   - Later rules win, inline declarations win over rules
//!
//! - **Style roles**
//!   - Semantic roles inferred from resolved property values, never from
//!     class names: meta text, code and console fonts, buttons, info boxes,
//!     surveys, comment blocks, bold and italic runs
//!
//! # Not Yet Implemented
//!
//! - Compound, descendant and pseudo-class selectors
//! - Specificity beyond "class rule < inline declaration"

/// Class cascade per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Style-block parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// Semantic roles derived from property values.
pub mod role;
/// Property value helpers per [CSS Values Level 4](https://www.w3.org/TR/css-values-4/).
pub mod values;

pub use cascade::ClassRules;
pub use parser::{ClassRule, Properties, StyleSheet, parse_declarations};
pub use role::{Emphasis, StyleRole, classify};
pub use values::{ColorValue, parse_px};
