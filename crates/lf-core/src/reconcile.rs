//! Filter/whitelist reconciliation.
//!
//! Mixed filter-syntax input is split into restrictive filters and
//! whitelist exceptions, then reconciled in two phases:
//!
//! 1. Exact matches are unambiguous — a domain that is both blocked and
//!    unconditionally excepted must not be blocked, so it moves to the
//!    verified whitelist and leaves the restrictive set.
//! 2. Partial matches are conservative — a whitelist entry covered by a
//!    broader restrictive filter is verified (the author asked for that
//!    specific subdomain), but the broader block stays active.
//!
//! Partial matching walks ancestor suffixes of each whitelist domain
//! against the restrictive set, which gives the same semantics as the
//! covered-by relation used by the reducer.

use std::collections::BTreeSet;

use crate::reduce::collapse_to_roots;
use crate::types::{DomainSet, FilterLine};

/// Strip the leftmost label; `None` once no dot remains.
fn parent_domain(host: &str) -> Option<&str> {
    match host.find('.') {
        Some(idx) if idx + 1 < host.len() => Some(&host[idx + 1..]),
        _ => None,
    }
}

/// True if some strict ancestor of `domain` is present in `filters`.
fn covered_by_ancestor(domain: &str, filters: &DomainSet) -> bool {
    let mut suffix = parent_domain(domain);
    while let Some(s) = suffix {
        if filters.contains(s) {
            return true;
        }
        suffix = parent_domain(s);
    }
    false
}

/// Reconcile raw filter lines against an optional whitelist seed into the
/// final rule set.
///
/// `whitelist_seed` holds plain domain lines from an external whitelist
/// file; `!`/`#` comment lines and blanks are tolerated and ignored. The
/// result is the union of re-wrapped restrictive filters and verified
/// `@@||domain^` exceptions, sorted for stable output.
pub fn reconcile(
    filter_lines: &DomainSet,
    whitelist_seed: Option<&DomainSet>,
) -> BTreeSet<String> {
    let mut restrictive = DomainSet::new();
    let mut unverified = DomainSet::new();
    let mut verified = DomainSet::new();

    // Defensive re-parse: upstream normalization already dropped noise, but
    // this boundary must tolerate arbitrary input on its own.
    for line in filter_lines {
        match FilterLine::parse(line) {
            Some(FilterLine::Restrictive(d)) => {
                restrictive.insert(d);
            }
            Some(FilterLine::Exception(d)) => {
                unverified.insert(d);
            }
            None => {}
        }
    }

    if let Some(seed) = whitelist_seed {
        unverified.extend(
            seed.iter()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty() && !line.starts_with('!') && !line.starts_with('#'))
                .map(|line| line.to_ascii_lowercase()),
        );
    }

    if !unverified.is_empty() {
        // Exact matches: blocking and unconditionally excepting the same
        // domain is contradictory, so the exception wins outright.
        let exact: Vec<String> = restrictive.intersection(&unverified).cloned().collect();
        for domain in exact {
            restrictive.remove(&domain);
            unverified.remove(&domain);
            verified.insert(domain);
        }

        // Partial matches: verify the narrower exception, keep the broader
        // block.
        for domain in &unverified {
            if covered_by_ancestor(domain, &restrictive) {
                verified.insert(domain.clone());
            }
        }
    }

    if !verified.is_empty() {
        log::debug!("reconcile: verified {} whitelist entries", verified.len());
    }

    // Reconciliation can surface a top-level domain that subsumes
    // previously-independent entries, so collapse once more.
    let mut rules: BTreeSet<String> = collapse_to_roots(&restrictive)
        .into_iter()
        .map(|d| FilterLine::Restrictive(d).to_string())
        .collect();
    rules.extend(
        verified
            .into_iter()
            .map(|d| FilterLine::Exception(d).to_string()),
    );

    rules
}
