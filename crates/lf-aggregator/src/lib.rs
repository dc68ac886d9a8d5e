//! Listforge Aggregator
//!
//! This crate drives the batch around the pure core: fetch each configured
//! source, normalize, reduce/reconcile, and write the resulting lists.
//! Every unreliable input degrades to "contributes nothing" — the only
//! escalated error apart from I/O on our own outputs is a whitelist file
//! that exists but cannot be decoded.

pub mod error;
pub mod fetch;
pub mod output;
pub mod pipeline;
pub mod settings;

pub use error::AggregateError;
pub use fetch::{Fetch, HttpFetcher};
pub use pipeline::{Pipeline, RunSummary};
pub use settings::{ListKind, ListSpec, Settings};
