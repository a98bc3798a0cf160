//! Tables: code and console blocks, info boxes, surveys and the metadata
//! table.

use std::collections::BTreeMap;

use codelab_common::warning::warn_once;
use codelab_css::StyleRole;
use codelab_model::{CodeNode, ContentNode, InfoboxNode, Polarity, SurveyGroup, SurveyNode};
use scraper::ElementRef;

use crate::block;
use crate::dom::{self, Child};
use crate::state::{Blocks, DocState};

/// Table rows as lists of cells, nested tables excluded.
fn rows(table: ElementRef<'_>) -> Vec<Vec<ElementRef<'_>>> {
    let mut rows = Vec::new();
    collect_rows(table, &mut rows);
    rows
}

fn collect_rows<'a>(element: ElementRef<'a>, rows: &mut Vec<Vec<ElementRef<'a>>>) {
    for child in dom::child_elements(element) {
        match dom::tag(&child) {
            "tr" => rows.push(
                dom::child_elements(child)
                    .filter(|cell| matches!(dom::tag(cell), "td" | "th"))
                    .collect(),
            ),
            "thead" | "tbody" | "tfoot" => collect_rows(child, rows),
            _ => {}
        }
    }
}

/// Read a two-column table as lower-cased keys and trimmed values.
pub(crate) fn metadata(table: ElementRef<'_>) -> BTreeMap<String, String> {
    let mut meta = BTreeMap::new();
    for row in rows(table) {
        let [key, value] = row.as_slice() else {
            continue;
        };
        let key = dom::plain_text(*key).trim().trim_end_matches(':').trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        let value = dom::plain_text(*value).trim().to_string();
        let _ = meta.insert(key, value);
    }
    meta
}

/// Emit the blocks a table stands for.
pub(crate) fn table(state: &mut DocState<'_>, table: ElementRef<'_>, out: &mut Blocks) {
    let cells: Vec<ElementRef<'_>> = rows(table).into_iter().flatten().collect();
    if cells.len() != 1 {
        if cells.len() > 1 {
            warn_once("gdoc", "multi-cell table flattened to paragraphs");
        }
        for cell in cells {
            block::blocks(state, cell, out);
        }
        return;
    }
    let cell = cells[0];

    match state.role(&cell) {
        Some(StyleRole::InfoboxPositive) => infobox(state, cell, Polarity::Positive, out),
        Some(StyleRole::InfoboxNegative) => infobox(state, cell, Polarity::Negative, out),
        Some(StyleRole::Survey) => survey(state, cell, out),
        _ => match state.uniform_text_role(cell, StyleRole::is_code) {
            Some(role) => {
                let node = CodeNode {
                    value: code_text(cell),
                    is_console: role == StyleRole::Console,
                    block_index: state.next_block_index(),
                };
                out.push(ContentNode::Code(node));
            }
            None => block::blocks(state, cell, out),
        },
    }
}

fn infobox(state: &mut DocState<'_>, cell: ElementRef<'_>, polarity: Polarity, out: &mut Blocks) {
    let mut inner = Blocks::default();
    block::blocks(state, cell, &mut inner);
    out.push(ContentNode::Infobox(InfoboxNode {
        polarity,
        children: inner.into_nodes(),
    }));
}

/// Each heading starts a group; list items after it are its options.
fn survey(state: &mut DocState<'_>, cell: ElementRef<'_>, out: &mut Blocks) {
    let mut groups: Vec<SurveyGroup> = Vec::new();
    for element in dom::child_elements(cell) {
        let name = dom::tag(&element);
        if dom::heading_level(name).is_some() {
            let title = dom::collapse_whitespace(dom::plain_text(element).trim());
            if !title.is_empty() {
                groups.push(SurveyGroup {
                    name: title,
                    options: Vec::new(),
                });
            }
        } else if matches!(name, "ul" | "ol") {
            let Some(group) = groups.last_mut() else {
                warn_once("gdoc", "survey options without a question");
                continue;
            };
            group.options.extend(
                dom::child_elements(element)
                    .filter(|item| dom::tag(item) == "li")
                    .map(|item| dom::collapse_whitespace(dom::plain_text(item).trim()))
                    .filter(|option| !option.is_empty()),
            );
        }
    }
    let id = state.next_survey_id();
    out.push(ContentNode::Survey(SurveyNode { id, groups }));
}

/// One line per paragraph; `<br>` inside a paragraph also breaks the line.
fn code_text(cell: ElementRef<'_>) -> String {
    let lines: Vec<String> = dom::children(cell)
        .filter_map(|child| match child {
            Child::Element(e) => Some(dom::plain_text(e)),
            Child::Text(text) if !text.trim().is_empty() => Some(
                text.chars().map(dom::normalize_char).collect(),
            ),
            Child::Text(_) => None,
        })
        .collect();
    lines.join("\n").trim_end_matches('\n').to_string()
}
