//! Domain set reduction.
//!
//! Both routines here share one trick: reversing a domain string
//! character-wise and sorting lexicographically places every domain
//! immediately before all of its subdomains, because a subdomain's reversed
//! form always has the parent's reversed form as a prefix followed by a
//! dot. A single left-to-right scan over the sorted list then suffices for
//! collapse and for hotspot counting, with the sort dominating at
//! O(n log n). Ordering is plain byte ordering over ASCII labels; no
//! locale or collation state is consulted.

use crate::types::DomainSet;

/// Default subdomain count at which a parent domain is flagged for review.
pub const DEFAULT_HOTSPOT_LIMIT: usize = 50;

/// True if `rev_host` is a reversed subdomain of `rev_root`.
fn covers(rev_root: &str, rev_host: &str) -> bool {
    rev_host.len() > rev_root.len()
        && rev_host.as_bytes()[rev_root.len()] == b'.'
        && rev_host.starts_with(rev_root)
}

fn reversed_sorted(domains: &DomainSet) -> Vec<String> {
    let mut rev: Vec<String> = domains.iter().map(|d| d.chars().rev().collect()).collect();
    rev.sort_unstable();
    rev
}

/// Collapse a domain set to its roots: every entry covered by a blocked
/// ancestor in the same set is removed.
///
/// The result never contains two entries in a covered-by relationship, and
/// every input domain remains covered by some emitted root.
pub fn collapse_to_roots(domains: &DomainSet) -> DomainSet {
    let rev = reversed_sorted(domains);

    let mut roots = DomainSet::with_capacity(rev.len());
    let mut current_root: Option<&str> = None;

    for host in &rev {
        match current_root {
            Some(root) if covers(root, host) => {
                // Covered subdomain; the root stays active.
            }
            _ => {
                roots.insert(host.chars().rev().collect());
                current_root = Some(host);
            }
        }
    }

    roots
}

/// Flag domains with unusually many registered subdomains.
///
/// Same traversal as [`collapse_to_roots`], but covered runs are counted
/// instead of skipped. Parents whose run reaches `limit` are returned with
/// their subdomain count, descending. Purely diagnostic: the report never
/// feeds back into reduction.
pub fn detect_hotspots(domains: &DomainSet, limit: usize) -> Vec<(String, usize)> {
    let rev = reversed_sorted(domains);

    let mut hotspots: Vec<(String, usize)> = Vec::new();
    let mut current_root: Option<&str> = None;
    let mut count = 0usize;

    let flush = |root: Option<&str>, count: usize, out: &mut Vec<(String, usize)>| {
        if let Some(root) = root {
            if count >= limit {
                out.push((root.chars().rev().collect(), count));
            }
        }
    };

    for host in &rev {
        match current_root {
            Some(root) if covers(root, host) => count += 1,
            _ => {
                flush(current_root, count, &mut hotspots);
                current_root = Some(host);
                count = 0;
            }
        }
    }
    flush(current_root, count, &mut hotspots);

    hotspots.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    hotspots
}

/// Convert a cleaned hosts set into restrictive filter lines.
///
/// Strips `www.` prefixes when at least one further dot remains (so
/// `www.be` style registrable domains survive intact), collapses the set
/// to roots, and wraps each root as `||domain^`.
pub fn hosts_to_restrictive_filters(hosts: &DomainSet) -> DomainSet {
    let stripped: DomainSet = hosts
        .iter()
        .map(|host| match host.strip_prefix("www.") {
            Some(rest) if rest.contains('.') => rest.to_string(),
            _ => host.clone(),
        })
        .collect();

    collapse_to_roots(&stripped)
        .into_iter()
        .map(|d| format!("||{d}^"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(entries: &[&str]) -> DomainSet {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_collapse_nested_chain() {
        let input = set(&[
            "example.com",
            "mail.example.com",
            "a.mail.example.com",
            "other.org",
        ]);
        assert_eq!(collapse_to_roots(&input), set(&["example.com", "other.org"]));
    }

    #[test]
    fn test_collapse_independent_roots() {
        let input = set(&["a.com", "b.com"]);
        assert_eq!(collapse_to_roots(&input), input);
    }

    #[test]
    fn test_collapse_no_label_boundary_confusion() {
        // notexample.com is not a subdomain of example.com
        let input = set(&["example.com", "notexample.com", "sub.example.com"]);
        assert_eq!(
            collapse_to_roots(&input),
            set(&["example.com", "notexample.com"])
        );
    }

    #[test]
    fn test_collapse_empty_and_singleton() {
        assert_eq!(collapse_to_roots(&set(&[])), set(&[]));
        assert_eq!(collapse_to_roots(&set(&["a.com"])), set(&["a.com"]));
    }

    #[test]
    fn test_collapse_idempotent() {
        let input = set(&[
            "example.com",
            "a.example.com",
            "b.a.example.com",
            "tracker.net",
            "x.tracker.net",
        ]);
        let once = collapse_to_roots(&input);
        let twice = collapse_to_roots(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_collapse_coverage_and_minimality() {
        let input = set(&[
            "ads.example.com",
            "example.com",
            "deep.ads.example.com",
            "cdn.other.org",
            "static.cdn.other.org",
        ]);
        let roots = collapse_to_roots(&input);

        // Coverage: every input domain is still covered by some root
        for d in &input {
            assert!(
                roots
                    .iter()
                    .any(|r| d == r || d.ends_with(&format!(".{r}"))),
                "{d} lost coverage"
            );
        }

        // Minimality: no root covers another root
        for a in &roots {
            for b in &roots {
                if a != b {
                    assert!(!a.ends_with(&format!(".{b}")), "{a} covered by {b}");
                }
            }
        }
    }

    #[test]
    fn test_collapse_order_independent() {
        let forward = ["example.com", "a.example.com", "b.org", "c.b.org"];
        let mut reversed = forward;
        reversed.reverse();
        assert_eq!(
            collapse_to_roots(&set(&forward)),
            collapse_to_roots(&set(&reversed))
        );
    }

    #[test]
    fn test_hotspot_threshold_boundary() {
        let mut input = set(&["busy.com"]);
        for i in 0..5 {
            input.insert(format!("sub{i}.busy.com"));
        }
        input.insert("quiet.org".to_string());
        for i in 0..4 {
            input.insert(format!("sub{i}.quiet.org"));
        }

        let hotspots = detect_hotspots(&input, 5);
        assert_eq!(hotspots, vec![("busy.com".to_string(), 5)]);
    }

    #[test]
    fn test_hotspot_counts_final_run() {
        // The last group in sort order must be flushed too ("zz" sorts the
        // parent after everything else).
        let mut input = DomainSet::new();
        input.insert("zz.example".to_string());
        for i in 0..3 {
            input.insert(format!("s{i}.zz.example"));
        }
        assert_eq!(
            detect_hotspots(&input, 3),
            vec![("zz.example".to_string(), 3)]
        );
    }

    #[test]
    fn test_hotspot_ordering_descending() {
        let mut input = DomainSet::new();
        for i in 0..4 {
            input.insert(format!("s{i}.small.net"));
        }
        input.insert("small.net".to_string());
        for i in 0..7 {
            input.insert(format!("s{i}.big.net"));
        }
        input.insert("big.net".to_string());

        assert_eq!(
            detect_hotspots(&input, 2),
            vec![("big.net".to_string(), 7), ("small.net".to_string(), 4)]
        );
    }

    #[test]
    fn test_www_strip_requires_remaining_dot() {
        let input = set(&["www.tracker.example.com", "www.be"]);
        let filters = hosts_to_restrictive_filters(&input);
        assert_eq!(filters, set(&["||tracker.example.com^", "||www.be^"]));
    }

    #[test]
    fn test_hosts_to_filters_collapses_after_www_strip() {
        let input = set(&["www.ads.net", "x.ads.net", "ads.net"]);
        assert_eq!(hosts_to_restrictive_filters(&input), set(&["||ads.net^"]));
    }
}
