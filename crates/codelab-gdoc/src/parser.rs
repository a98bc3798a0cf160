//! Document and fragment entry points.

use codelab_common::warning::clear_warnings;
use codelab_css::StyleSheet;
use codelab_model::{Codelab, ContentNode, ListNode, Step, slugify};
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::block;
use crate::dom::{self, Child};
use crate::error::ParseError;
use crate::state::{Blocks, DocState};
use crate::table;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Metadata keys that override the id derived from the title.
const ID_KEYS: [&str; 2] = ["id", "url"];

/// Parse an exported document into a codelab.
///
/// The paragraph classed `title` names the codelab; each level-1 heading
/// starts a step. A table before the first step is read as metadata and
/// anything else before the first step is ignored.
///
/// The markup parser synthesizes any missing `<html>` or `<body>`, so text
/// input never fails; the `Result` matches [`parse_bytes`].
///
/// # Errors
///
/// None for `&str` input.
pub fn parse(html: &str) -> Result<Codelab, ParseError> {
    clear_warnings();
    let document = Html::parse_document(html);
    let styles = style_sheet(&document);
    let body = body(&document);

    let mut state = DocState::new(&styles);
    let mut codelab = Codelab::default();
    let mut step: Option<Step> = None;
    let mut blocks = Blocks::default();

    for child in dom::children(body) {
        let element = match child {
            Child::Element(element) => element,
            Child::Text(text) => {
                if step.is_some() {
                    block::loose_text(&mut state, text, &mut blocks);
                }
                continue;
            }
        };
        let name = dom::tag(&element);

        if name == "h1" {
            finish_step(&mut codelab, step.take(), &mut blocks, &state);
            state.start_step();
            step = Some(Step::new(dom::collapse_whitespace(
                dom::plain_text(element).trim(),
            )));
            continue;
        }
        if name == "p" && dom::has_class(&element, "title") {
            codelab.title = dom::collapse_whitespace(dom::plain_text(element).trim());
            state.survey_prefix = codelab_id(&codelab);
            continue;
        }
        if step.is_none() {
            if name == "table" {
                codelab.metadata.extend(table::metadata(element));
                state.survey_prefix = codelab_id(&codelab);
            }
            continue;
        }
        block::block(&mut state, element, &mut blocks);
    }
    finish_step(&mut codelab, step, &mut blocks, &state);
    codelab.id = codelab_id(&codelab);

    debug!(id = %codelab.id, steps = codelab.steps.len(), "parsed codelab");
    Ok(codelab)
}

/// Parse raw bytes with [`parse`].
///
/// # Errors
///
/// Returns [`ParseError::NotUtf8`] for non-UTF-8 input, otherwise as
/// [`parse`].
pub fn parse_bytes(bytes: &[u8]) -> Result<Codelab, ParseError> {
    parse(decode(bytes)?)
}

/// Parse an exported fragment into a bare content sequence.
///
/// Same rules as [`parse`] without the codelab and step framing: every block
/// is kept and level-1 headings become headers. Survey ids are left without
/// a codelab prefix until the owning codelab is re-indexed.
///
/// # Errors
///
/// None for `&str` input, as with [`parse`].
pub fn parse_fragment(html: &str) -> Result<Vec<ContentNode>, ParseError> {
    let document = Html::parse_document(html);
    let styles = style_sheet(&document);
    let body = body(&document);

    let mut state = DocState::new(&styles);
    let mut blocks = Blocks::default();
    block::blocks(&mut state, body, &mut blocks);
    let nodes = blocks.into_nodes();

    debug!(nodes = nodes.len(), "parsed fragment");
    Ok(nodes)
}

/// Parse raw bytes with [`parse_fragment`].
///
/// # Errors
///
/// Returns [`ParseError::NotUtf8`] for non-UTF-8 input, otherwise as
/// [`parse_fragment`].
pub fn parse_fragment_bytes(bytes: &[u8]) -> Result<Vec<ContentNode>, ParseError> {
    parse_fragment(decode(bytes)?)
}

fn decode(bytes: &[u8]) -> Result<&str, ParseError> {
    let (bytes, skipped) = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => (rest, UTF8_BOM.len()),
        None => (bytes, 0),
    };
    std::str::from_utf8(bytes).map_err(|e| ParseError::NotUtf8 {
        offset: skipped + e.valid_up_to(),
    })
}

/// Every `<style>` element of the document, in order, as one sheet.
fn style_sheet(document: &Html) -> StyleSheet {
    let mut sheet = StyleSheet::default();
    for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
        if dom::tag(&element) == "style" {
            sheet.extend(StyleSheet::parse(&element.text().collect::<String>()));
        }
    }
    sheet
}

/// The `<body>` element; html5ever always creates one.
fn body(document: &Html) -> ElementRef<'_> {
    let root = document.root_element();
    dom::child_elements(root)
        .find(|element| dom::tag(element) == "body")
        .unwrap_or(root)
}

fn finish_step(
    codelab: &mut Codelab,
    step: Option<Step>,
    blocks: &mut Blocks,
    state: &DocState<'_>,
) {
    let content = std::mem::take(blocks).into_nodes();
    if let Some(mut step) = step {
        step.content = ListNode::new(content);
        step.duration = state.duration;
        codelab.steps.push(step);
    }
}

/// Metadata id override, else the slug of the title.
fn codelab_id(codelab: &Codelab) -> String {
    ID_KEYS
        .iter()
        .filter_map(|key| codelab.metadata.get(*key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map_or_else(|| slugify(&codelab.title), str::to_string)
}
