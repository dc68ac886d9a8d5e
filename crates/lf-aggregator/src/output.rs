//! Output files: header templating, change detection, writing.
//!
//! Headers come from a per-list template file with `{placeholder}`
//! substitution. Before writing, the existing file is re-read with its
//! comment lines stripped and compared as a set; an unchanged list is not
//! rewritten, which keeps published timestamps meaningful.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::error::{AggregateError, Result};
use crate::settings::ListSpec;

/// Load a header template from the includes directory.
///
/// Blank lines are dropped; a missing or empty template means the list is
/// written without a header.
pub fn load_header_template(includes_dir: &Path, spec: &ListSpec) -> Option<String> {
    let file = spec.header.as_deref()?;
    let path = includes_dir.join(file);
    if !path.is_file() {
        log::warn!("header template {} not found", path.display());
        return None;
    }

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("failed to read header template {}: {e}", path.display());
            return None;
        }
    };

    let lines: Vec<&str> = raw.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Render a header template for a generated list.
///
/// Recognized placeholders: `{c}` (comment char), `{title}`,
/// `{description}`, `{time_timestamp}`, `{count}`, and a
/// `{c} {arr_sources}` line expanded to one comment line per source.
pub fn build_header(
    template: &str,
    spec: &ListSpec,
    count: usize,
    now: DateTime<Local>,
) -> String {
    let c = spec.kind.comment_char();
    let description = spec.description.as_deref().unwrap_or("None");
    let timestamp = now.format("%d-%m-%Y %H:%M %Z").to_string();

    let sources = if spec.sources.is_empty() {
        format!("{c} None")
    } else {
        spec.sources
            .iter()
            .map(|s| format!("{c} {s}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    // {c} expands first so the sources key below can match its line.
    template
        .replace("{c}", &c.to_string())
        .replace("{title}", &format!("listforge - {}", spec.name))
        .replace("{description}", description)
        .replace("{time_timestamp}", &timestamp)
        .replace("{count}", &count.to_string())
        .replace(&format!("{c} {{arr_sources}}"), &sources)
}

/// Read an existing output file back as a rule set, ignoring `!`/`#`
/// comment lines and blanks. `None` when the file does not exist or cannot
/// be read.
pub fn read_existing_rules(path: &Path) -> Option<BTreeSet<String>> {
    if !path.is_file() {
        return None;
    }
    let raw = fs::read_to_string(path).ok()?;
    Some(
        raw.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('!') && !l.starts_with('#'))
            .map(str::to_string)
            .collect(),
    )
}

/// Whether writing `rules` to `path` would change its rule content.
pub fn output_required(rules: &BTreeSet<String>, path: &Path) -> bool {
    match read_existing_rules(path) {
        Some(existing) if !existing.is_empty() => &existing != rules,
        // Missing, unreadable, or comment-only files are always rewritten.
        _ => true,
    }
}

/// Write a list file: optional header, then one rule per line, `\n` endings.
pub fn write_list(path: &Path, header: Option<&str>, rules: &BTreeSet<String>) -> Result<()> {
    let mut content = String::new();
    if let Some(header) = header {
        content.push_str(header);
        content.push('\n');
    }
    for rule in rules {
        content.push_str(rule);
        content.push('\n');
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| AggregateError::Output {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| AggregateError::Output {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ListKind;
    use chrono::TimeZone;

    fn spec() -> ListSpec {
        ListSpec {
            name: "adguardhome.txt".to_string(),
            kind: ListKind::Filter,
            description: Some("Combined list".to_string()),
            sources: vec![
                "https://a.example/hosts.txt".to_string(),
                "https://b.example/filters.txt".to_string(),
            ],
            header: None,
            whitelist: None,
        }
    }

    fn rules(entries: &[&str]) -> BTreeSet<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_header_placeholders() {
        let template = "{c} Title: {title}\n{c} {description}\n{c} Entries: {count}\n{c} Updated: {time_timestamp}\n{c} {arr_sources}";
        let now = Local.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap();
        let header = build_header(template, &spec(), 42, now);

        assert!(header.starts_with("! Title: listforge - adguardhome.txt"));
        assert!(header.contains("! Combined list"));
        assert!(header.contains("! Entries: 42"));
        assert!(header.contains("! Updated: 09-03-2024 12:30"));
        assert!(header.contains("! https://a.example/hosts.txt\n! https://b.example/filters.txt"));
    }

    #[test]
    fn test_build_header_no_sources_no_description() {
        let mut spec = spec();
        spec.description = None;
        spec.sources.clear();
        let now = Local.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap();
        let header = build_header("{c} {description}\n{c} {arr_sources}", &spec, 0, now);
        assert_eq!(header, "! None\n! None");
    }

    #[test]
    fn test_write_then_not_required() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/list.txt");
        let rules = rules(&["||a.com^", "||b.com^"]);

        assert!(output_required(&rules, &path));
        write_list(&path, Some("! header\n! more"), &rules).unwrap();
        assert!(!output_required(&rules, &path));

        // Changed content requires a rewrite again
        let changed = self::rules(&["||a.com^"]);
        assert!(output_required(&changed, &path));
    }

    #[test]
    fn test_comment_only_file_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        fs::write(&path, "! header only\n# nothing else\n").unwrap();
        assert!(output_required(&rules(&["||a.com^"]), &path));
    }

    #[test]
    fn test_read_existing_skips_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        fs::write(&path, "! header\n||a.com^\n\n@@||b.com^\n").unwrap();
        assert_eq!(
            read_existing_rules(&path),
            Some(rules(&["||a.com^", "@@||b.com^"]))
        );
    }
}
