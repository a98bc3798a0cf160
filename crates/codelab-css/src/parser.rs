//! Style-block parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! The exporting tool writes one flat `<style>` element made of qualified
//! rules and a few at-rules. This parser keeps the rules whose selector is a
//! plain class selector and drops everything else without failing.

use std::collections::HashMap;

use codelab_common::warning::warn_once;

/// Property name to normalized value.
///
/// Names are lower-cased; values are lower-cased, stripped of quotes and of
/// any `!important` suffix.
pub type Properties = HashMap<String, String>;

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-a-qualified-rule)
///
/// A rule whose selector is a single class selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRule {
    /// The class name, without the leading `.`.
    pub class: String,
    /// Declarations in the rule block.
    pub properties: Properties,
}

/// [§ 5.3.2 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// The class rules of a document, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    /// Class rules in the order they were declared.
    pub rules: Vec<ClassRule>,
}

impl StyleSheet {
    /// [§ 5.3.2 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// Parse raw style-block text. Never fails: anything that is not a class
    /// rule is skipped.
    #[must_use]
    pub fn parse(css: &str) -> Self {
        let mut scanner = Scanner::new(css);
        let mut rules = Vec::new();

        while let Some(item) = scanner.next_item() {
            let Item::Qualified { prelude, block } = item else {
                continue;
            };
            let properties = parse_declarations(&block);
            // "a comma-separated list of selectors"
            for selector in prelude.split(',') {
                if let Some(class) = class_selector(selector.trim()) {
                    rules.push(ClassRule {
                        class: class.to_string(),
                        properties: properties.clone(),
                    });
                }
            }
        }

        Self { rules }
    }

    /// Append the rules of another style block, as if concatenated.
    pub fn extend(&mut self, other: Self) {
        self.rules.extend(other.rules);
    }

    /// Whether no class rules were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
///
/// Parse `name: value; ...` as found in a rule block or a `style` attribute.
/// Later declarations of the same property win.
#[must_use]
pub fn parse_declarations(text: &str) -> Properties {
    let mut properties = Properties::new();
    for declaration in split_top_level(text, ';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = normalize_value(value);
        if name.is_empty() || value.is_empty() {
            continue;
        }
        let _ = properties.insert(name, value);
    }
    properties
}

/// Lower-case, drop quotes and `!important`, trim.
fn normalize_value(value: &str) -> String {
    let mut value = value.trim().to_lowercase();
    if let Some(stripped) = value.strip_suffix("!important") {
        value = stripped.trim_end().to_string();
    }
    value
        .chars()
        .filter(|&c| c != '"' && c != '\'')
        .collect::<String>()
        .trim()
        .to_string()
}

/// The class name of a selector made of exactly one class selector.
fn class_selector(selector: &str) -> Option<&str> {
    let name = selector.strip_prefix('.')?;
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(name)
}

/// Split on `separator` outside strings, parentheses and brackets.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// A top-level construct of a style block.
enum Item {
    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-an-at-rule)
    At,
    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-a-qualified-rule)
    Qualified { prelude: String, block: String },
}

/// Character scanner over a style block.
struct Scanner {
    chars: Vec<char>,
    position: usize,
}

impl Scanner {
    fn new(css: &str) -> Self {
        Self {
            chars: css.chars().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comments)
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.position += 1,
                Some('/') if self.peek_at(1) == Some('*') => self.skip_comment(),
                _ => return,
            }
        }
    }

    fn skip_comment(&mut self) {
        self.position += 2;
        while let Some(c) = self.peek() {
            if c == '*' && self.peek_at(1) == Some('/') {
                self.position += 2;
                return;
            }
            self.position += 1;
        }
    }

    /// [§ 5.3.3 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    fn next_item(&mut self) -> Option<Item> {
        loop {
            self.skip_whitespace_and_comments();
            match self.peek()? {
                // Stray closing brace at the top level: drop it.
                '}' | ';' => self.position += 1,
                '@' => {
                    let (_, terminator) = self.consume_until(&['{', ';']);
                    if terminator == Some('{') {
                        let _ = self.consume_block();
                    }
                    return Some(Item::At);
                }
                _ => {
                    let (prelude, terminator) = self.consume_until(&['{']);
                    if terminator.is_none() {
                        warn_once("css", "style block ends inside a rule prelude");
                        return None;
                    }
                    let block = self.consume_block();
                    return Some(Item::Qualified { prelude, block });
                }
            }
        }
    }

    /// Consume up to (and including) the first of `stops` at nesting depth
    /// zero. Returns the consumed text and the stop character, if any.
    fn consume_until(&mut self, stops: &[char]) -> (String, Option<char>) {
        let mut text = String::new();
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            if c == '/' && self.peek_at(1) == Some('*') {
                self.skip_comment();
                continue;
            }
            if c == '"' || c == '\'' {
                text.push_str(&self.consume_string(c));
                continue;
            }
            self.position += 1;
            match c {
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                _ if depth == 0 && stops.contains(&c) => return (text, Some(c)),
                _ => {}
            }
            text.push(c);
        }
        (text, None)
    }

    /// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// Called just after an opening `{`; consumes through the matching `}`
    /// and returns the text in between.
    fn consume_block(&mut self) -> String {
        let mut text = String::new();
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            if c == '/' && self.peek_at(1) == Some('*') {
                self.skip_comment();
                continue;
            }
            if c == '"' || c == '\'' {
                text.push_str(&self.consume_string(c));
                continue;
            }
            self.position += 1;
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return text;
                    }
                }
                _ => {}
            }
            text.push(c);
        }
        warn_once("css", "unterminated rule block");
        text
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// Returns the string including its quotes.
    fn consume_string(&mut self, quote: char) -> String {
        let mut text = String::from(quote);
        self.position += 1;
        while let Some(c) = self.peek() {
            self.position += 1;
            text.push(c);
            if c == '\\' {
                if let Some(next) = self.peek() {
                    self.position += 1;
                    text.push(next);
                }
            } else if c == quote {
                break;
            }
        }
        text
    }
}
