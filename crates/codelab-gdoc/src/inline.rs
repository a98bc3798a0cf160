//! Inline content: text runs, links, buttons and images.

use codelab_common::url::unwrap_redirect;
use codelab_css::{Emphasis, StyleRole, parse_px};
use codelab_model::{ButtonNode, ContentNode, ImageNode, ListNode, TextNode, UrlNode};
use scraper::ElementRef;

use crate::dom::{self, Child, normalize_char};
use crate::state::DocState;

/// Formatting inherited from enclosing elements.
#[derive(Debug, Clone, Copy, Default)]
struct Format {
    bold: bool,
    italic: bool,
    code: bool,
}

impl Format {
    fn text(self, value: String) -> ContentNode {
        ContentNode::Text(TextNode {
            value,
            bold: self.bold,
            italic: self.italic,
            code: self.code,
        })
    }

    /// Formatting implied by an HTML tag rather than by styles.
    fn with_tag(mut self, name: &str) -> Self {
        match name {
            "b" | "strong" => self.bold = true,
            "i" | "em" => self.italic = true,
            "code" | "kbd" | "tt" => self.code = true,
            _ => {}
        }
        self
    }
}

/// Inline content of `element`, compacted.
pub(crate) fn inline_content(state: &DocState<'_>, element: ElementRef<'_>) -> Vec<ContentNode> {
    let mut out = Vec::new();
    collect_children(state, element, Format::default(), &mut out);
    compact(out)
}

/// `element` itself as inline content, compacted.
pub(crate) fn inline_element(state: &DocState<'_>, element: ElementRef<'_>) -> Vec<ContentNode> {
    let mut out = Vec::new();
    collect_element(state, element, Format::default(), &mut out);
    compact(out)
}

/// Inline content of a list item or header: compacted, whitespace
/// collapsed, edges trimmed.
pub(crate) fn trimmed_content(state: &DocState<'_>, element: ElementRef<'_>) -> Vec<ContentNode> {
    let mut nodes = inline_content(state, element);
    for node in &mut nodes {
        if let ContentNode::Text(text) = node
            && !text.code
        {
            text.value = dom::collapse_whitespace(&text.value);
        }
    }
    if let Some(ContentNode::Text(first)) = nodes.first_mut() {
        first.value = first.value.trim_start().to_string();
    }
    if let Some(ContentNode::Text(last)) = nodes.last_mut() {
        last.value = last.value.trim_end().to_string();
    }
    nodes.retain(|node| !node.is_empty());
    nodes
}

/// A single node standing for `nodes`: the node itself when there is one,
/// an inline list otherwise.
pub(crate) fn single(mut nodes: Vec<ContentNode>) -> ContentNode {
    if nodes.len() == 1
        && let Some(node) = nodes.pop()
    {
        return node;
    }
    ContentNode::List(ListNode::new(nodes))
}

fn collect_children(
    state: &DocState<'_>,
    element: ElementRef<'_>,
    format: Format,
    out: &mut Vec<ContentNode>,
) {
    for child in dom::children(element) {
        match child {
            Child::Text(text) => {
                if !text.is_empty() {
                    out.push(format.text(text.chars().map(normalize_char).collect()));
                }
            }
            Child::Element(e) => collect_element(state, e, format, out),
        }
    }
}

fn collect_element(
    state: &DocState<'_>,
    element: ElementRef<'_>,
    format: Format,
    out: &mut Vec<ContentNode>,
) {
    let name = dom::tag(&element);
    match name {
        "br" => out.push(format.text("\n".to_string())),
        "img" => {
            if let Some(image) = image(state, element) {
                out.push(image);
            }
        }
        // Block content nested in an item is handled by the caller.
        "style" | "script" | "ul" | "ol" | "table" => {}
        _ if dom::is_footnote_marker(&element) => {}
        "a" => anchor(state, element, format, out),
        _ => {
            let properties = state.properties(&element);
            let role = codelab_css::classify(&properties);
            if role == Some(StyleRole::Button) {
                out.push(button(element));
                return;
            }
            let emphasis = Emphasis::from_properties(&properties);
            let mut format = format.with_tag(name);
            format.bold |= emphasis.bold;
            format.italic |= emphasis.italic;
            format.code |= role.is_some_and(StyleRole::is_code);
            collect_children(state, element, format, out);
        }
    }
}

fn anchor(
    state: &DocState<'_>,
    element: ElementRef<'_>,
    format: Format,
    out: &mut Vec<ContentNode>,
) {
    let Some(href) = element.value().attr("href") else {
        // Bookmark anchor; exported headings carry one each.
        collect_children(state, element, format, out);
        return;
    };
    let mut inner = Vec::new();
    collect_children(state, element, format, &mut inner);
    let inner = compact(inner);
    if inner.is_empty() {
        return;
    }
    out.push(ContentNode::Url(UrlNode::new(unwrap_redirect(href), single(inner))));
}

/// A button-styled span, linked when it contains a link.
///
/// Every button is rendered colored and raised; labels starting with
/// "download" get the download affordance.
fn button(element: ElementRef<'_>) -> ContentNode {
    let label = dom::plain_text(element).trim().to_string();
    let download = label.to_lowercase().starts_with("download");
    let node = ContentNode::Button(ButtonNode {
        colored: true,
        raised: true,
        download,
        child: Box::new(ContentNode::text(label)),
    });
    match dom::first_link(element) {
        Some(href) => ContentNode::Url(UrlNode::new(unwrap_redirect(href), node)),
        None => node,
    }
}

fn image(state: &DocState<'_>, element: ElementRef<'_>) -> Option<ContentNode> {
    let url = element.value().attr("src")?.trim();
    if url.is_empty() {
        return None;
    }
    let max_width = state
        .properties(&element)
        .get("width")
        .and_then(|width| parse_px(width));
    Some(ContentNode::Image(ImageNode {
        url: url.to_string(),
        max_width,
    }))
}

/// Reduce an inline sequence to the fewest nodes.
///
/// Empty runs are dropped. Whitespace at the edges of a code run moves
/// out into a non-code run. Runs with the same formatting merge, and a
/// whitespace-only run merges into a preceding non-code run whatever its
/// formatting. Adjacent links to the same target merge.
pub(crate) fn compact(nodes: Vec<ContentNode>) -> Vec<ContentNode> {
    let mut out: Vec<ContentNode> = Vec::with_capacity(nodes.len());
    for node in nodes.into_iter().flat_map(split_code_edges) {
        if node.is_empty() {
            continue;
        }
        let unmerged = match (out.last_mut(), node) {
            (Some(ContentNode::Text(last)), ContentNode::Text(text))
                if last.same_format(&text)
                    || (!last.code && !text.code && text.value.trim().is_empty()) =>
            {
                last.value.push_str(&text.value);
                None
            }
            (Some(ContentNode::Url(last)), ContentNode::Url(url)) if last.target == url.target => {
                let previous =
                    std::mem::replace(&mut *last.child, ContentNode::List(ListNode::default()));
                let mut merged = flatten_inline(previous);
                merged.extend(flatten_inline(*url.child));
                *last.child = single(compact(merged));
                None
            }
            (_, node) => Some(node),
        };
        if let Some(node) = unmerged {
            out.push(node);
        }
    }
    out
}

/// Move leading and trailing whitespace of a code run into plain runs.
fn split_code_edges(node: ContentNode) -> Vec<ContentNode> {
    let ContentNode::Text(text) = node else {
        return vec![node];
    };
    if !text.code {
        return vec![ContentNode::Text(text)];
    }
    let trimmed = text.value.trim();
    if trimmed.len() == text.value.len() || trimmed.is_empty() {
        return vec![ContentNode::Text(text)];
    }
    let start = text.value.len() - text.value.trim_start().len();
    let end = start + trimmed.len();
    let plain = TextNode {
        code: false,
        ..text.clone()
    };
    let mut parts = Vec::with_capacity(3);
    if start > 0 {
        parts.push(ContentNode::Text(TextNode {
            value: text.value[..start].to_string(),
            ..plain.clone()
        }));
    }
    parts.push(ContentNode::Text(TextNode {
        value: trimmed.to_string(),
        ..text.clone()
    }));
    if end < text.value.len() {
        parts.push(ContentNode::Text(TextNode {
            value: text.value[end..].to_string(),
            ..plain
        }));
    }
    parts
}

fn flatten_inline(node: ContentNode) -> Vec<ContentNode> {
    match node {
        ContentNode::List(list) if !list.is_block => list.children,
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> ContentNode {
        ContentNode::text(value)
    }

    #[test]
    fn whitespace_run_joins_preceding_bold_run() {
        let nodes = compact(vec![
            ContentNode::Text(TextNode::new("Bo").bold()),
            text(" "),
            ContentNode::Text(TextNode::new("ld").bold()),
            ContentNode::Text(TextNode::new(" italic").italic()),
        ]);
        assert_eq!(
            nodes,
            vec![
                ContentNode::Text(TextNode::new("Bo ld").bold()),
                ContentNode::Text(TextNode::new(" italic").italic()),
            ]
        );
    }

    #[test]
    fn code_whitespace_moves_out() {
        let nodes = compact(vec![
            text("This is"),
            ContentNode::Text(TextNode::new(" code").code()),
            text("."),
        ]);
        assert_eq!(
            nodes,
            vec![
                text("This is "),
                ContentNode::Text(TextNode::new("code").code()),
                text("."),
            ]
        );
    }

    #[test]
    fn whitespace_does_not_join_code_runs() {
        let nodes = compact(vec![ContentNode::Text(TextNode::new("x").code()), text(" ")]);
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn links_to_same_target_merge() {
        let nodes = compact(vec![
            ContentNode::Url(UrlNode::new("url", text("one"))),
            ContentNode::Url(UrlNode::new("url", text(" url"))),
            ContentNode::Url(UrlNode::new("other", text("!"))),
        ]);
        assert_eq!(
            nodes,
            vec![
                ContentNode::Url(UrlNode::new("url", text("one url"))),
                ContentNode::Url(UrlNode::new("other", text("!"))),
            ]
        );
    }

    #[test]
    fn empty_runs_are_dropped() {
        assert!(compact(vec![text(""), text("")]).is_empty());
    }
}
