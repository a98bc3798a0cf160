//! Common utilities for the codelab pipeline.
//!
//! This crate provides shared infrastructure used by the fetcher and parser:
//! - **HTTP transport** - an injectable client capability plus the
//!   retry/backoff policy every remote fetch goes through
//! - **URL helpers** - redirect unwrapping and hosted-document ids
//! - **Warning System** - deduplicated diagnostics for tolerated input

pub mod net;
pub mod url;
pub mod warning;
