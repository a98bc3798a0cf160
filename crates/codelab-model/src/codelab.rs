//! Codelab and step containers.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::node::{ContentNode, ImportNode, ListNode};

/// A parsed tutorial: a title, an id and an ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Codelab {
    /// Human readable title.
    pub title: String,
    /// Slug derived from the title unless overridden by metadata.
    pub id: String,
    /// Steps in document order.
    pub steps: Vec<Step>,
    /// Free-form metadata keyed by lower-cased name.
    pub metadata: BTreeMap<String, String>,
}

impl Codelab {
    /// A codelab titled `title` with its id derived by [`slugify`].
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: slugify(&title),
            title,
            ..Self::default()
        }
    }

    /// A comma-separated metadata value split into items.
    #[must_use]
    pub fn meta_list(&self, key: &str) -> Vec<String> {
        self.metadata
            .get(key)
            .map(|value| split_list(value))
            .unwrap_or_default()
    }

    /// Every [`ImportNode`] under any step, in document order.
    ///
    /// Resolved fragment content is not searched: fragments do not import.
    pub fn imports_mut(&mut self) -> Vec<&mut ImportNode> {
        fn collect<'a>(node: &'a mut ContentNode, out: &mut Vec<&'a mut ImportNode>) {
            match node {
                ContentNode::Import(import) => out.push(import),
                other => {
                    for child in other.children_mut() {
                        collect(child, out);
                    }
                }
            }
        }

        let mut imports = Vec::new();
        for step in &mut self.steps {
            for node in &mut step.content.children {
                collect(node, &mut imports);
            }
        }
        imports
    }

    /// Renumber code blocks per step and surveys across the codelab, in
    /// document order.
    ///
    /// Needed once imported fragments have been spliced in, since fragments
    /// are numbered without knowing where they land.
    pub fn reindex(&mut self) {
        let mut surveys = 0u32;
        let id = self.id.clone();
        for step in &mut self.steps {
            let mut blocks = 0u32;
            for node in &mut step.content.children {
                node.walk_mut(&mut |n| match n {
                    ContentNode::Code(code) => {
                        blocks += 1;
                        code.block_index = blocks;
                    }
                    ContentNode::Survey(survey) => {
                        surveys += 1;
                        survey.id = format!("{id}-{surveys}");
                    }
                    _ => {}
                });
            }
        }
    }
}

/// One step of a codelab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Step title.
    pub title: String,
    /// Estimated time to complete; zero when not annotated.
    pub duration: Duration,
    /// Step body.
    pub content: ListNode,
}

impl Step {
    /// An empty step titled `title`.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Derive an id from a title: lower-cased, with every run of whitespace or
/// punctuation collapsed to a single `-` and no leading or trailing `-`.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Split a comma-separated value into trimmed, non-empty items.
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_from_title() {
        assert_eq!(slugify("Test Codelab"), "test-codelab");
        assert_eq!(slugify("  Build an App: Part 2!  "), "build-an-app-part-2");
        assert_eq!(slugify("C++ & Rust"), "c-rust");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn split_comma_list() {
        assert_eq!(split_list("one"), vec!["one"]);
        assert_eq!(split_list(" two "), vec!["two"]);
        assert_eq!(split_list(" one, two"), vec!["one", "two"]);
        assert_eq!(
            split_list(" one, two and a half, three"),
            vec!["one", "two and a half", "three"]
        );
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn meta_list_reads_metadata() {
        let mut codelab = Codelab::new("Test");
        let _ = codelab
            .metadata
            .insert("categories".to_string(), "Web, Android".to_string());
        assert_eq!(codelab.meta_list("categories"), vec!["Web", "Android"]);
        assert!(codelab.meta_list("tags").is_empty());
    }
}
