//! Content tree for codelab documents.
//!
//! This crate provides the typed, render-target-independent model produced
//! by the document parser and consumed by renderers and export layers.
//!
//! # Design
//!
//! [`ContentNode`] is a closed enum: every composite case owns its children
//! outright, there are no parent pointers, and adding a node kind is a
//! compile-checked change everywhere the tree is matched on. A [`Codelab`]
//! owns its [`Step`]s, and each step's content is rooted in a [`ListNode`].

mod codelab;
mod node;

pub use codelab::{Codelab, Step, slugify, split_list};
pub use node::{
    ButtonNode, CodeNode, ContentNode, HeaderKind, HeaderNode, ImageNode, ImportNode,
    InfoboxNode, ItemsKind, ItemsListNode, ListNode, Polarity, SurveyGroup, SurveyNode, TextNode,
    UrlNode,
};
