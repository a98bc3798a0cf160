//! Per-parse state and the block accumulator.

use std::time::Duration;

use codelab_css::{Properties, StyleRole, StyleSheet, classify};
use codelab_model::{ContentNode, ItemsKind, ItemsListNode, ListNode};
use scraper::ElementRef;

use crate::dom::{self, Child};

/// Parser context for one document or fragment.
///
/// Owned by a single parse call; concurrent fragment parses each get their
/// own.
pub(crate) struct DocState<'s> {
    styles: &'s StyleSheet,
    /// Prefix of survey ids: the codelab id, empty for fragments.
    pub survey_prefix: String,
    /// Last code block index handed out in the current step.
    pub block_index: u32,
    /// Surveys seen so far in the whole document.
    pub survey_ordinal: u32,
    /// No block content and no duration has been read in the current step.
    pub awaiting_duration: bool,
    /// Duration of the current step.
    pub duration: Duration,
    /// The last emitted block is a checklist header.
    pub after_check_header: bool,
}

impl<'s> DocState<'s> {
    pub(crate) fn new(styles: &'s StyleSheet) -> Self {
        Self {
            styles,
            survey_prefix: String::new(),
            block_index: 0,
            survey_ordinal: 0,
            awaiting_duration: false,
            duration: Duration::ZERO,
            after_check_header: false,
        }
    }

    /// Reset the step-scoped counters.
    pub(crate) const fn start_step(&mut self) {
        self.block_index = 0;
        self.awaiting_duration = true;
        self.duration = Duration::ZERO;
        self.after_check_header = false;
    }

    pub(crate) const fn next_block_index(&mut self) -> u32 {
        self.block_index += 1;
        self.block_index
    }

    pub(crate) fn next_survey_id(&mut self) -> String {
        self.survey_ordinal += 1;
        format!("{}-{}", self.survey_prefix, self.survey_ordinal)
    }

    /// Effective properties of `element`.
    pub(crate) fn properties(&self, element: &ElementRef<'_>) -> Properties {
        let element = element.value();
        self.styles.resolve(element.attr("class"), element.attr("style"))
    }

    pub(crate) fn role(&self, element: &ElementRef<'_>) -> Option<StyleRole> {
        classify(&self.properties(element))
    }

    /// The role shared by every visible text run under `element`, when each
    /// run sits inside an element whose role `keep` accepts.
    ///
    /// `None` if any visible run has no such role, or there are no visible
    /// runs at all.
    pub(crate) fn uniform_text_role(
        &self,
        element: ElementRef<'_>,
        keep: fn(StyleRole) -> bool,
    ) -> Option<StyleRole> {
        let mut found = None;
        let mut unstyled = false;
        self.visit_text_roles(element, None, keep, &mut |role| match role {
            Some(role) => {
                let _ = found.get_or_insert(role);
            }
            None => unstyled = true,
        });
        if unstyled { None } else { found }
    }

    fn visit_text_roles(
        &self,
        element: ElementRef<'_>,
        inherited: Option<StyleRole>,
        keep: fn(StyleRole) -> bool,
        visit: &mut dyn FnMut(Option<StyleRole>),
    ) {
        let role = self.role(&element).filter(|role| keep(*role)).or(inherited);
        for child in dom::children(element) {
            match child {
                Child::Text(text) => {
                    if !text.chars().all(char::is_whitespace) {
                        visit(role);
                    }
                }
                Child::Element(e) if dom::is_footnote_marker(&e) => {}
                Child::Element(e) => self.visit_text_roles(e, role, keep, visit),
            }
        }
    }
}

/// Block-level output of a step, an info box or a fragment.
///
/// Consecutive list elements are merged here: the list element just pushed
/// stays open until any other block arrives.
#[derive(Default)]
pub(crate) struct Blocks {
    nodes: Vec<ContentNode>,
    /// Base nesting level of the open items list, if the last block is one.
    open_list: Option<u8>,
}

impl Blocks {
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn push(&mut self, node: ContentNode) {
        self.open_list = None;
        if !node.is_empty() {
            self.nodes.push(node);
        }
    }

    /// Add the items of one list element at nesting `level`.
    ///
    /// Joins the open list when there is one, nesting deeper levels under
    /// its last item. Otherwise opens a new list of `kind`.
    pub(crate) fn push_list(&mut self, kind: ItemsKind, level: u8, items: Vec<ListNode>) {
        if items.is_empty() {
            return;
        }
        if let Some(base) = self.open_list
            && let Some(ContentNode::ItemsList(open)) = self.nodes.last_mut()
        {
            merge_items(open, base, level, kind, items);
            return;
        }
        self.nodes.push(ContentNode::ItemsList(ItemsListNode { kind, items }));
        self.open_list = Some(level);
    }

    pub(crate) fn into_nodes(self) -> Vec<ContentNode> {
        self.nodes
    }
}

/// Append `items` at `level` into `list`, whose items sit at `list_level`.
fn merge_items(
    list: &mut ItemsListNode,
    list_level: u8,
    level: u8,
    kind: ItemsKind,
    items: Vec<ListNode>,
) {
    if level <= list_level || list.items.is_empty() {
        list.items.extend(items);
        return;
    }
    let Some(last) = list.items.last_mut() else {
        return;
    };
    if let Some(ContentNode::ItemsList(nested)) = last.children.last_mut() {
        merge_items(nested, list_level + 1, level, kind, items);
    } else {
        last.append(ContentNode::ItemsList(ItemsListNode { kind, items }));
    }
}
