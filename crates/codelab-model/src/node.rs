//! Content node types.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// A node of the content tree.
///
/// Every composite case owns its children exclusively; the tree has no
/// back-references and therefore no cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentNode {
    /// A run of text with uniform formatting.
    Text(TextNode),
    /// An inline or block image.
    Image(ImageNode),
    /// A hyperlink around another node.
    Url(UrlNode),
    /// A call-to-action button, normally wrapped in a [`ContentNode::Url`].
    Button(ButtonNode),
    /// A code or console block.
    Code(CodeNode),
    /// A sequence of nodes, inline or as its own block.
    List(ListNode),
    /// A bulleted, numbered or checklist list.
    ItemsList(ItemsListNode),
    /// A section header below step level.
    Header(HeaderNode),
    /// A highlighted note box.
    Infobox(InfoboxNode),
    /// A multiple-choice poll.
    Survey(SurveyNode),
    /// A reference to an external fragment document.
    Import(ImportNode),
}

impl ContentNode {
    /// Shorthand for an unformatted [`ContentNode::Text`].
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(TextNode::new(value))
    }

    /// Whether the node carries no visible content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(t) => t.value.is_empty(),
            Self::List(l) => l.is_empty(),
            Self::ItemsList(l) => l.items.is_empty(),
            Self::Infobox(b) => b.children.is_empty(),
            Self::Survey(s) => s.groups.is_empty(),
            Self::Code(_)
            | Self::Image(_)
            | Self::Url(_)
            | Self::Button(_)
            | Self::Header(_)
            | Self::Import(_) => false,
        }
    }

    /// Direct children in document order.
    #[must_use]
    pub fn children(&self) -> Box<dyn Iterator<Item = &Self> + '_> {
        match self {
            Self::Url(u) => Box::new(std::iter::once(&*u.child)),
            Self::Button(b) => Box::new(std::iter::once(&*b.child)),
            Self::Header(h) => Box::new(std::iter::once(&*h.child)),
            Self::List(l) => Box::new(l.children.iter()),
            Self::ItemsList(l) => Box::new(l.items.iter().flat_map(|item| item.children.iter())),
            Self::Infobox(b) => Box::new(b.children.iter()),
            Self::Import(i) => Box::new(i.resolved_children.iter()),
            Self::Text(_) | Self::Image(_) | Self::Code(_) | Self::Survey(_) => {
                Box::new(std::iter::empty())
            }
        }
    }

    /// Mutable direct children in document order.
    pub fn children_mut(&mut self) -> Box<dyn Iterator<Item = &mut Self> + '_> {
        match self {
            Self::Url(u) => Box::new(std::iter::once(&mut *u.child)),
            Self::Button(b) => Box::new(std::iter::once(&mut *b.child)),
            Self::Header(h) => Box::new(std::iter::once(&mut *h.child)),
            Self::List(l) => Box::new(l.children.iter_mut()),
            Self::ItemsList(l) => Box::new(
                l.items
                    .iter_mut()
                    .flat_map(|item| item.children.iter_mut()),
            ),
            Self::Infobox(b) => Box::new(b.children.iter_mut()),
            Self::Import(i) => Box::new(i.resolved_children.iter_mut()),
            Self::Text(_) | Self::Image(_) | Self::Code(_) | Self::Survey(_) => {
                Box::new(std::iter::empty())
            }
        }
    }

    /// Visit this node and all of its descendants in document order.
    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut Self)) {
        visit(self);
        for child in self.children_mut() {
            child.walk_mut(visit);
        }
    }

    /// Concatenated text of every [`TextNode`] under this node.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(t) => out.push_str(&t.value),
            Self::Code(c) => out.push_str(&c.value),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// A run of text with uniform formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    /// The text itself.
    pub value: String,
    /// Bold run.
    pub bold: bool,
    /// Italic run.
    pub italic: bool,
    /// Inline code run.
    pub code: bool,
}

impl TextNode {
    /// An unformatted run.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Mark the run bold.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Mark the run italic.
    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Mark the run as inline code.
    #[must_use]
    pub const fn code(mut self) -> Self {
        self.code = true;
        self
    }

    /// Whether two runs share bold, italic and code flags.
    #[must_use]
    pub const fn same_format(&self, other: &Self) -> bool {
        self.bold == other.bold && self.italic == other.italic && self.code == other.code
    }

    /// Whether the run has no formatting at all.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.code
    }
}

/// An image reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    /// Image source URL.
    pub url: String,
    /// Maximum display width in pixels, if the source specified one.
    pub max_width: Option<f32>,
}

/// A hyperlink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlNode {
    /// Link destination.
    pub target: String,
    /// Linked content.
    pub child: Box<ContentNode>,
}

impl UrlNode {
    /// Link `child` to `target`.
    #[must_use]
    pub fn new(target: impl Into<String>, child: ContentNode) -> Self {
        Self {
            target: target.into(),
            child: Box::new(child),
        }
    }
}

/// A call-to-action button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonNode {
    /// Rendered with the accent color.
    pub colored: bool,
    /// Rendered raised.
    pub raised: bool,
    /// Rendered with a download affordance.
    pub download: bool,
    /// Button label.
    pub child: Box<ContentNode>,
}

/// A code or console block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeNode {
    /// Block text, lines separated by `\n`.
    pub value: String,
    /// Terminal session rather than source code.
    pub is_console: bool,
    /// 1-based position among code and console blocks of the owning step.
    pub block_index: u32,
}

/// A sequence of nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListNode {
    /// Children in document order.
    pub children: Vec<ContentNode>,
    /// Render as its own paragraph rather than inline.
    pub is_block: bool,
}

impl ListNode {
    /// An inline sequence.
    #[must_use]
    pub const fn new(children: Vec<ContentNode>) -> Self {
        Self {
            children,
            is_block: false,
        }
    }

    /// A sequence rendered as its own block.
    #[must_use]
    pub const fn block(children: Vec<ContentNode>) -> Self {
        Self {
            children,
            is_block: true,
        }
    }

    /// Append a node.
    pub fn append(&mut self, node: ContentNode) {
        self.children.push(node);
    }

    /// Whether there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// The flavour of an [`ItemsListNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemsKind {
    /// Bulleted list.
    Plain,
    /// Numbered list.
    Ordered,
    /// List of things to verify.
    Checklist,
}

/// A list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsListNode {
    /// Fixed when the list is created; merged siblings never change it.
    pub kind: ItemsKind,
    /// One inline sequence per item.
    pub items: Vec<ListNode>,
}

impl ItemsListNode {
    /// An empty list of the given kind.
    #[must_use]
    pub const fn new(kind: ItemsKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// Start a new item and return it for filling.
    pub fn new_item(&mut self) -> &mut ListNode {
        self.items.push(ListNode::default());
        let last = self.items.len() - 1;
        &mut self.items[last]
    }
}

/// The flavour of a [`HeaderNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HeaderKind {
    /// Ordinary section header.
    Plain,
    /// Header introducing a checklist ("What you'll learn").
    Check,
}

/// A section header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderNode {
    /// Heading level; 1 only occurs in fragments.
    pub level: u8,
    /// Header flavour.
    pub kind: HeaderKind,
    /// Header content.
    pub child: Box<ContentNode>,
}

impl HeaderNode {
    /// A plain header.
    #[must_use]
    pub fn new(level: u8, child: ContentNode) -> Self {
        Self {
            level,
            kind: HeaderKind::Plain,
            child: Box::new(child),
        }
    }
}

/// Whether an [`InfoboxNode`] is a tip or a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Polarity {
    /// A tip or recommendation.
    Positive,
    /// A warning.
    Negative,
}

/// A highlighted note box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoboxNode {
    /// Tip or warning.
    pub polarity: Polarity,
    /// Box content.
    pub children: Vec<ContentNode>,
}

/// One question of a [`SurveyNode`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyGroup {
    /// The question.
    pub name: String,
    /// Possible answers in document order.
    pub options: Vec<String>,
}

/// A multiple-choice poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyNode {
    /// `{codelab-id}-{n}`, `n` counting surveys across the whole codelab.
    pub id: String,
    /// Questions in document order.
    pub groups: Vec<SurveyGroup>,
}

/// A reference to an external fragment document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportNode {
    /// Where the fragment lives.
    pub source_url: String,
    /// Parsed fragment content; empty until imports are resolved.
    pub resolved_children: Vec<ContentNode>,
}

impl ImportNode {
    /// An unresolved import of `source_url`.
    #[must_use]
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            resolved_children: Vec::new(),
        }
    }
}
