//! Block dispatch: paragraphs, headers, lists and containers.

use codelab_common::url::unwrap_redirect;
use codelab_css::StyleRole;
use codelab_model::{
    ContentNode, HeaderKind, HeaderNode, ImportNode, ItemsKind, ItemsListNode, ListNode,
};
use scraper::ElementRef;

use crate::dom::{self, Child};
use crate::duration::parse_duration;
use crate::inline;
use crate::state::{Blocks, DocState};
use crate::table;

/// Header texts that introduce a checklist, compared after
/// [`normalize_phrase`].
const CHECK_PHRASES: [&str; 2] = ["what you'll learn", "what we've covered"];

/// Opening of a fragment import paragraph: `[[import <url>]]`.
const IMPORT_OPEN: &str = "[[import";
const IMPORT_CLOSE: &str = "]]";

/// Emit the blocks for every child of `container`.
pub(crate) fn blocks(state: &mut DocState<'_>, container: ElementRef<'_>, out: &mut Blocks) {
    for child in dom::children(container) {
        match child {
            Child::Element(element) => block(state, element, out),
            Child::Text(text) => loose_text(state, text, out),
        }
    }
}

/// Text directly inside a block container becomes its own paragraph.
pub(crate) fn loose_text(state: &mut DocState<'_>, text: &str, out: &mut Blocks) {
    if text.trim().is_empty() {
        return;
    }
    let value: String = text.chars().map(dom::normalize_char).collect();
    emit(state, out, ContentNode::List(ListNode::block(vec![ContentNode::text(value)])));
}

/// Emit the blocks for one element.
pub(crate) fn block(state: &mut DocState<'_>, element: ElementRef<'_>, out: &mut Blocks) {
    let name = dom::tag(&element);
    if let Some(level) = dom::heading_level(name) {
        header(state, element, level, out);
        return;
    }

    let before = out.len();
    match name {
        _ if dom::is_footnote_marker(&element) => {}
        "style" | "script" | "meta" | "link" | "title" | "hr" | "br" => {}
        "table" => table::table(state, element, out),
        "ul" | "ol" => list(state, element, out),
        "div" if state.role(&element) == Some(StyleRole::Comment) => {}
        "div" | "section" | "article" | "main" | "blockquote" | "center" | "tbody" | "tr"
        | "td" | "th" => blocks(state, element, out),
        "p" if dom::has_class(&element, "title") => {}
        "p" => paragraph(state, element, out),
        _ => {
            // Inline element outside a paragraph, an image most often.
            let nodes = inline::inline_element(state, element);
            if !is_blank(&nodes) {
                out.push(ContentNode::List(ListNode::block(nodes)));
            }
        }
    }
    if out.len() > before {
        state.after_check_header = false;
        state.awaiting_duration = false;
    }
}

fn emit(state: &mut DocState<'_>, out: &mut Blocks, node: ContentNode) {
    out.push(node);
    state.after_check_header = false;
    state.awaiting_duration = false;
}

fn header(state: &mut DocState<'_>, element: ElementRef<'_>, level: u8, out: &mut Blocks) {
    let nodes = inline::trimmed_content(state, element);
    if nodes.is_empty() {
        return;
    }
    let mut header = HeaderNode::new(level, inline::single(nodes));
    let is_check = is_check_phrase(&header.child.text_content());
    if is_check {
        header.kind = HeaderKind::Check;
    }
    emit(state, out, ContentNode::Header(header));
    state.after_check_header = is_check;
}

/// Lower-cased, whitespace-collapsed, with typographic apostrophes folded
/// to `'`.
fn normalize_phrase(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' | '`' => '\'',
            c => c,
        })
        .collect();
    dom::collapse_whitespace(folded.trim()).to_lowercase()
}

fn is_check_phrase(text: &str) -> bool {
    CHECK_PHRASES.contains(&normalize_phrase(text).as_str())
}

fn paragraph(state: &mut DocState<'_>, element: ElementRef<'_>, out: &mut Blocks) {
    if state
        .uniform_text_role(element, |role| role == StyleRole::Meta)
        .is_some()
    {
        if state.awaiting_duration
            && let Some(duration) = parse_duration(&dom::plain_text(element))
        {
            state.duration = duration;
            state.awaiting_duration = false;
        }
        return;
    }

    if let Some(source) = import_source(element) {
        out.push(ContentNode::Import(ImportNode::new(source)));
        return;
    }

    let nodes = inline::inline_content(state, element);
    if !is_blank(&nodes) {
        out.push(ContentNode::List(ListNode::block(nodes)));
    }
}

fn is_blank(nodes: &[ContentNode]) -> bool {
    nodes
        .iter()
        .all(|node| matches!(node, ContentNode::Text(t) if t.value.trim().is_empty()))
}

/// The source of an import paragraph: the first link inside it, or the text
/// between the brackets.
fn import_source(element: ElementRef<'_>) -> Option<String> {
    let text = dom::plain_text(element);
    let inner = text
        .trim()
        .strip_prefix(IMPORT_OPEN)?
        .strip_suffix(IMPORT_CLOSE)?;
    let source = dom::first_link(element)
        .map_or_else(|| inner.trim().to_string(), unwrap_redirect);
    (!source.is_empty()).then_some(source)
}

fn list(state: &DocState<'_>, element: ElementRef<'_>, out: &mut Blocks) {
    let kind = if state.after_check_header {
        ItemsKind::Checklist
    } else {
        kind_of(&element)
    };
    out.push_list(kind, dom::list_level(&element), items(state, element));
}

fn kind_of(element: &ElementRef<'_>) -> ItemsKind {
    if dom::tag(element) == "ol" {
        ItemsKind::Ordered
    } else {
        ItemsKind::Plain
    }
}

/// Items of a list element. Lists nested inside an item become an items
/// list at the end of that item.
fn items(state: &DocState<'_>, list: ElementRef<'_>) -> Vec<ListNode> {
    dom::child_elements(list)
        .filter(|child| dom::tag(child) == "li")
        .filter_map(|li| {
            let mut item = ListNode::new(inline::trimmed_content(state, li));
            for nested in dom::child_elements(li).filter(|e| matches!(dom::tag(e), "ul" | "ol")) {
                let nested_items = items(state, nested);
                if !nested_items.is_empty() {
                    item.append(ContentNode::ItemsList(ItemsListNode {
                        kind: kind_of(&nested),
                        items: nested_items,
                    }));
                }
            }
            (!item.is_empty()).then_some(item)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_phrases() {
        assert!(is_check_phrase("What you’ll learn"));
        assert!(is_check_phrase("what you'll  LEARN "));
        assert!(is_check_phrase("What we`ve covered"));
        assert!(!is_check_phrase("What you'll need"));
    }
}
