//! Line normalization pipelines.
//!
//! Each [`SourceKind`] has an ordered cleaning pipeline that turns raw
//! fetched text into admissible entries. Order matters: later steps assume
//! earlier ones already stripped address prefixes and comments. Lines that
//! fail every recognized shape are silently discarded — upstream sources
//! are arbitrarily dirty and must never fail the batch.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{DomainSet, SourceKind};

/// Leading hosts-file dead-zone address (`0.0.0.0 `, `127.0.0.1 `).
static IP_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}\s+").unwrap());

/// A line that is nothing but an IPv4 address.
static BARE_IP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").unwrap());

/// Trailing inline comment on a hosts line.
static INLINE_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+#.*$").unwrap());

/// `localhost.<label>` with no further labels — a local alias, not an FQDN.
static LOCALHOST_ALIAS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^localhost\.[^.]+$").unwrap());

/// The only filter shapes admitted: `||domain^` and `@@||domain^`, each
/// optionally carrying a trailing `|` or a `$third-party`/`$document`
/// modifier.
static VALID_FILTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:@@)?\|\|[a-z0-9_.-]+\^(?:\||\$(?:third-party|document))?$").unwrap()
});

/// Stripped filter modifiers.
static FILTER_MODIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(?:third-party|document)$").unwrap());

/// Restrictive filter whose target is a bare IPv4 address.
static IP_FILTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\|\|(?:[0-9]{1,3}\.){3}[0-9]{1,3}\^$").unwrap());

/// Normalize raw source text into a clean entry set.
///
/// Returns `None` for empty or whitespace-only input and for input where
/// nothing survives cleaning; callers must treat absence as "skip this
/// source", never as a failure.
pub fn normalize(raw: &str, kind: SourceKind) -> Option<DomainSet> {
    if raw.trim().is_empty() {
        return None;
    }

    let mut entries = DomainSet::new();
    let mut dropped = 0usize;

    for line in raw.lines() {
        let line = line.trim();
        let cleaned = match kind {
            SourceKind::Hosts => clean_hosts_line(line),
            SourceKind::Regex => clean_regex_line(line),
            SourceKind::Filter => clean_filter_line(line),
        };
        match cleaned {
            Some(entry) => {
                entries.insert(entry);
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!("normalize({kind:?}): dropped {dropped} lines");
    }

    if entries.is_empty() {
        None
    } else {
        Some(entries)
    }
}

/// Hosts pipeline: strip address prefixes and comments, then admit only
/// lowercase FQDN-shaped entries.
fn clean_hosts_line(line: &str) -> Option<String> {
    // Remove the local dead-zone prefix
    let line = IP_PREFIX_RE.replace(line, "");
    // Remove address-only lines
    if line.is_empty() || BARE_IP_RE.is_match(&line) {
        return None;
    }
    // Remove any line that doesn't start a-z 0-9
    let first = line.as_bytes()[0];
    if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
        return None;
    }
    // Remove in-line comments
    let line = INLINE_COMMENT_RE.replace(&line, "");
    let line = line.trim_end();
    // Remove non-domains and single-label localhost aliases
    if !line.contains('.') || LOCALHOST_ALIAS_RE.is_match(line) {
        return None;
    }
    Some(line.to_ascii_lowercase())
}

/// Regex pipeline: comments and blanks only; pattern content is opaque and
/// case is preserved.
fn clean_regex_line(line: &str) -> Option<String> {
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(line.to_string())
}

/// Filter pipeline: admit only anchored restrictive/exception shapes, strip
/// modifiers, and reject bare-IP targets.
fn clean_filter_line(line: &str) -> Option<String> {
    if !VALID_FILTER_RE.is_match(line) {
        return None;
    }
    let line = FILTER_MODIFIER_RE.replace(line, "");
    if IP_FILTER_RE.is_match(&line) {
        return None;
    }
    Some(line.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(entries: &[&str]) -> DomainSet {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_hosts_mixed_input() {
        let raw = "0.0.0.0 ads.example.com  # tracker\n127.0.0.1\nlocalhost.localdomain\n\n";
        assert_eq!(
            normalize(raw, SourceKind::Hosts),
            Some(set(&["ads.example.com"]))
        );
    }

    #[test]
    fn test_hosts_keeps_multi_label_localhost() {
        let raw = "localhost.tracker.example.com\nlocalhost.localdomain\n";
        assert_eq!(
            normalize(raw, SourceKind::Hosts),
            Some(set(&["localhost.tracker.example.com"]))
        );
    }

    #[test]
    fn test_hosts_drops_non_fqdn_and_comments() {
        let raw = "# header comment\nlocalhost\nads.example.com\n::1 ip6-localhost\n";
        assert_eq!(
            normalize(raw, SourceKind::Hosts),
            Some(set(&["ads.example.com"]))
        );
    }

    #[test]
    fn test_hosts_drops_uppercase_start() {
        // The first-character gate runs before lowercasing, as in the
        // upstream list tooling this mirrors.
        let raw = "ADS.example.com\ntracker.example.com\n";
        assert_eq!(
            normalize(raw, SourceKind::Hosts),
            Some(set(&["tracker.example.com"]))
        );
    }

    #[test]
    fn test_empty_input_is_absent() {
        assert_eq!(normalize("", SourceKind::Hosts), None);
        assert_eq!(normalize("  \n\t\n", SourceKind::Filter), None);
        assert_eq!(normalize("# only comments\n", SourceKind::Regex), None);
    }

    #[test]
    fn test_regex_passthrough_preserves_case() {
        let raw = "# comment\n^Ad[0-9]+\\.\n\n(^|\\.)track\\.\n";
        assert_eq!(
            normalize(raw, SourceKind::Regex),
            Some(set(&["^Ad[0-9]+\\.", "(^|\\.)track\\."]))
        );
    }

    #[test]
    fn test_filter_shapes() {
        let raw = concat!(
            "||ads.example.com^\n",
            "||tracker.example.com^$third-party\n",
            "||metrics.example.com^$document\n",
            "@@||cdn.example.com^|\n",
            "||1.2.3.4^\n",
            "||partial.example.com\n",
            "! comment\n",
            "||scripted.example.com^$script\n",
        );
        assert_eq!(
            normalize(raw, SourceKind::Filter),
            Some(set(&[
                "||ads.example.com^",
                "||tracker.example.com^",
                "||metrics.example.com^",
                "@@||cdn.example.com^|",
            ]))
        );
    }
}
