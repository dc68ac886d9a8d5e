//! Shared type definitions for listforge.
//!
//! Domains are plain lowercase ASCII label strings; validation happens at
//! the normalization boundary, so everything downstream can assume clean
//! input. Filter rules are a tagged variant rather than prefix-sniffed
//! strings so the reconciliation logic can match exhaustively.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Unordered collection of unique, normalized domains.
///
/// Set semantics by construction: insertion order is irrelevant and
/// duplicates collapse, which keeps every merge step commutative and
/// idempotent.
pub type DomainSet = HashSet<String>;

/// Flavour of a raw source text, selecting the normalization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Hosts-file style sources (`0.0.0.0 ads.example.com`).
    Hosts,
    /// One opaque regex pattern per line.
    Regex,
    /// Adblock-syntax network filters (`||ads.example.com^`).
    Filter,
}

/// Anchored pattern for a restrictive filter: `||domain^`.
static RESTRICTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\|\|([a-z0-9_.-]+)\^$").unwrap());

/// Anchored pattern for a whitelist exception: `@@||domain^` or `@@||domain^|`.
static EXCEPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@@\|\|([a-z0-9_.-]+)\^\|?$").unwrap());

/// One syntactically valid adblock network rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterLine {
    /// `||domain^` — block this domain and all of its subdomains.
    Restrictive(String),
    /// `@@||domain^` — exempt this domain from blocking.
    Exception(String),
}

impl FilterLine {
    /// Parse a raw line into a filter rule.
    ///
    /// Returns `None` for anything that is not an anchored restrictive or
    /// exception rule; malformed lines are a normal occurrence upstream and
    /// are never an error.
    pub fn parse(line: &str) -> Option<Self> {
        if let Some(caps) = RESTRICTIVE_RE.captures(line) {
            return Some(Self::Restrictive(caps[1].to_string()));
        }
        if let Some(caps) = EXCEPTION_RE.captures(line) {
            return Some(Self::Exception(caps[1].to_string()));
        }
        None
    }

    /// The bare domain payload.
    pub fn domain(&self) -> &str {
        match self {
            Self::Restrictive(d) | Self::Exception(d) => d,
        }
    }
}

impl fmt::Display for FilterLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restrictive(d) => write!(f, "||{d}^"),
            Self::Exception(d) => write!(f, "@@||{d}^"),
        }
    }
}
