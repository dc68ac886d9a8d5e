//! Listforge Core Library
//!
//! This crate provides the algorithmic core of the listforge blocklist
//! aggregator. It turns raw fetched text from heterogeneous blocklist
//! sources into minimal, non-redundant rule sets.
//!
//! # Architecture
//!
//! The core is a pure batch transformation over immutable input snapshots:
//! it performs no I/O, holds no state across runs, and treats absent or
//! malformed input as "contributes nothing" rather than an error.
//!
//! # Modules
//!
//! - `normalize`: per-source-kind line cleaning pipelines
//! - `reduce`: subdomain collapse and wildcard hotspot detection
//! - `reconcile`: filter/whitelist reconciliation
//! - `types`: shared type definitions

pub mod normalize;
pub mod reconcile;
pub mod reduce;
pub mod types;

// Re-export commonly used items
pub use normalize::normalize;
pub use reconcile::reconcile;
pub use reduce::{collapse_to_roots, detect_hotspots, hosts_to_restrictive_filters, DEFAULT_HOTSPOT_LIMIT};
pub use types::{DomainSet, FilterLine, SourceKind};
