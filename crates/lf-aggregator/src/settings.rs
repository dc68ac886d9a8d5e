//! YAML settings.
//!
//! One settings file describes every output list: where its sources live,
//! which normalization pipeline applies, and which include files (header
//! template, whitelist) accompany it. A missing settings file is a
//! loggable skip; a file that exists but fails to parse is an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use lf_core::SourceKind;

use crate::error::{AggregateError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directory the generated lists are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Directory holding header templates and whitelist files.
    #[serde(default = "default_includes_dir")]
    pub includes_dir: PathBuf,
    pub lists: Vec<ListSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListSpec {
    /// Output file name.
    pub name: String,
    pub kind: ListKind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    /// Header template file, relative to `includes_dir`.
    #[serde(default)]
    pub header: Option<String>,
    /// Whitelist file, relative to `includes_dir`.
    #[serde(default)]
    pub whitelist: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Hosts,
    Regex,
    Filter,
}

impl ListKind {
    /// The normalization pipeline this list feeds.
    pub fn source_kind(self) -> SourceKind {
        match self {
            Self::Hosts => SourceKind::Hosts,
            Self::Regex => SourceKind::Regex,
            Self::Filter => SourceKind::Filter,
        }
    }

    /// Comment character used in generated headers.
    pub fn comment_char(self) -> char {
        match self {
            Self::Filter => '!',
            Self::Hosts | Self::Regex => '#',
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_includes_dir() -> PathBuf {
    PathBuf::from("includes")
}

impl Settings {
    /// Load settings from a YAML file.
    ///
    /// `Ok(None)` when the file does not exist — callers skip the run.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            log::warn!("settings file {} not found", path.display());
            return Ok(None);
        }

        let raw = fs::read_to_string(path).map_err(|source| AggregateError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;

        let settings =
            serde_yaml::from_str(&raw).map_err(|source| AggregateError::SettingsParse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Some(settings))
    }
}
