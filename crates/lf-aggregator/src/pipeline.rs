//! Per-list assembly.
//!
//! For each configured list: fetch every source, normalize, merge as a
//! set, then hand off to the core reducers. Merging is set union, so the
//! order sources are fetched in can never affect the result. A list whose
//! sources all came back empty is skipped, not failed.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use chrono::Local;

use lf_core::{
    detect_hotspots, hosts_to_restrictive_filters, normalize, reconcile, DomainSet,
    DEFAULT_HOTSPOT_LIMIT,
};

use crate::error::{AggregateError, Result};
use crate::fetch::Fetch;
use crate::output::{build_header, load_header_template, output_required, write_list};
use crate::settings::{ListKind, ListSpec, Settings};

/// Outcome of one aggregation run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Lists written (or, in a dry run, lists that would change).
    pub written: Vec<String>,
    /// Lists whose content matched the existing output.
    pub unchanged: Vec<String>,
    /// Lists skipped because no source contributed anything.
    pub skipped: Vec<String>,
}

pub struct Pipeline<'a, F: Fetch> {
    fetcher: &'a F,
    settings: &'a Settings,
}

impl<'a, F: Fetch> Pipeline<'a, F> {
    pub fn new(fetcher: &'a F, settings: &'a Settings) -> Self {
        Self { fetcher, settings }
    }

    /// Fetch and normalize every source of a list, merged as set union.
    fn gather_sources(&self, spec: &ListSpec) -> Option<DomainSet> {
        let mut merged = DomainSet::new();

        for url in &spec.sources {
            let Some(raw) = self.fetcher.fetch(url) else {
                continue;
            };
            match normalize(&raw, spec.kind.source_kind()) {
                Some(entries) => merged.extend(entries),
                None => log::warn!("no usable entries in {url}"),
            }
        }

        if merged.is_empty() {
            None
        } else {
            Some(merged)
        }
    }

    /// Load the whitelist seed for a list, if it has one.
    ///
    /// A missing file is absence; a file that exists but is not valid
    /// UTF-8 (or cannot be read) is the one escalated input error.
    fn load_whitelist_seed(&self, spec: &ListSpec) -> Result<Option<DomainSet>> {
        let Some(file) = spec.whitelist.as_deref() else {
            return Ok(None);
        };
        let path = self.settings.includes_dir.join(file);
        if !path.is_file() {
            log::warn!("whitelist {} not found", path.display());
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(|e| AggregateError::Whitelist {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let text = String::from_utf8(bytes).map_err(|e| AggregateError::Whitelist {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let seed: DomainSet = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('!') && !l.starts_with('#'))
            .map(str::to_string)
            .collect();

        Ok(Some(seed))
    }

    /// Build the final rule set for one list. `Ok(None)` when every source
    /// contributed nothing.
    pub fn build_list(&self, spec: &ListSpec) -> Result<Option<BTreeSet<String>>> {
        let Some(entries) = self.gather_sources(spec) else {
            return Ok(None);
        };

        let rules: BTreeSet<String> = match spec.kind {
            ListKind::Hosts => {
                for (domain, count) in detect_hotspots(&entries, DEFAULT_HOTSPOT_LIMIT) {
                    log::info!("hotspot: {domain} has {count} subdomains");
                }
                let filters = hosts_to_restrictive_filters(&entries);
                let seed = self.load_whitelist_seed(spec)?;
                reconcile(&filters, seed.as_ref())
            }
            ListKind::Filter => {
                let seed = self.load_whitelist_seed(spec)?;
                reconcile(&entries, seed.as_ref())
            }
            ListKind::Regex => entries.iter().map(|r| format!("/{r}/")).collect(),
        };

        if rules.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rules))
        }
    }

    /// Run the whole batch. With `dry_run`, nothing is written and
    /// `written` reports the lists that would change.
    pub fn run(&self, force: bool, dry_run: bool) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for spec in &self.settings.lists {
            let Some(rules) = self.build_list(spec)? else {
                log::warn!("skipping {}: no entries", spec.name);
                summary.skipped.push(spec.name.clone());
                continue;
            };

            let path: PathBuf = self.settings.output_dir.join(&spec.name);
            if !force && !output_required(&rules, &path) {
                log::info!("no updates required for {}", spec.name);
                summary.unchanged.push(spec.name.clone());
                continue;
            }

            if !dry_run {
                let header = load_header_template(&self.settings.includes_dir, spec)
                    .map(|t| build_header(&t, spec, rules.len(), Local::now()));
                write_list(&path, header.as_deref(), &rules)?;
                log::info!("wrote {} entries to {}", rules.len(), path.display());
            }
            summary.written.push(spec.name.clone());
        }

        Ok(summary)
    }
}
