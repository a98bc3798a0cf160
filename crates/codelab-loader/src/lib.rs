//! Codelab loading: fetch, parse, resolve.
//!
//! This crate ties the pipeline together behind [`Loader`]:
//!
//! 1. **Fetch** - [`Loader::fetch`] reads a local file, a hosted document
//!    (by id or editor URL) or any other URL into a [`Resource`].
//! 2. **Parse** - a [`ParserPipeline`] picks the [`DocumentParser`] that
//!    supports the resource's [`SourceType`].
//! 3. **Resolve** - [`Loader::resolve_imports`] fetches every imported
//!    fragment concurrently and splices it into the tree.
//!
//! [`Loader::download_images`] is the companion batch operation for export
//! layers that copy referenced images next to their output.
//!
//! All remote reads go through [`codelab_common::net::RetryingClient`] with
//! the retry bounds from [`FetchConfig`].

mod config;
mod error;
mod fetch;
mod pipeline;
mod resolve;

pub use config::FetchConfig;
pub use error::{BoxError, LoadError};
pub use fetch::{LoadedCodelab, Loader, Location, Resource, SourceType};
pub use pipeline::{DocumentParser, GdocParser, ParserPipeline};
