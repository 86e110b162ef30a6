//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only ever sees the values derived
//! from it ([`TypeMapping`], [`PlaceholderPolicy`], filter case rules).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `GRAFT__<SECTION>__<KEY>`
//! 3. Config file: `--config FILE`, otherwise the platform config file and
//!    then `.graft.toml` in the current directory, each optional
//! 4. Built-in defaults (always present)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use graft_core::domain::{
    DEFAULT_PLACEHOLDER_NAME, EntryFilter, EntryKind, PlaceholderPolicy, TypeMapping,
};

use crate::cli::PlaceholderMode;
use crate::error::{CliError, CliResult};

/// Local configuration file name, looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".graft.toml";

const ENV_PREFIX: &str = "GRAFT";
const ENV_SEPARATOR: &str = "__";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub merge: MergeConfig,
    pub placeholder: PlaceholderConfig,
    /// Suffix → manifest element name.
    pub types: BTreeMap<String, String>,
    pub manifest: ManifestConfig,
    pub locate: LocateConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub overwrite: bool,
    pub include_case_sensitive: bool,
    pub exclude_case_sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    pub mode: PlaceholderMode,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Manifest file extension, without the dot.
    pub extension: String,
    /// Separator written into `Include` attributes.
    pub include_separator: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocateConfig {
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let types = TypeMapping::default()
            .iter()
            .map(|(suffix, kind)| (suffix.to_string(), kind.to_string()))
            .collect();
        Self {
            merge: MergeConfig::default(),
            placeholder: PlaceholderConfig::default(),
            types,
            manifest: ManifestConfig::default(),
            locate: LocateConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            overwrite: false,
            include_case_sensitive: EntryFilter::DEFAULT_INCLUDE_CASE_SENSITIVE,
            exclude_case_sensitive: EntryFilter::DEFAULT_EXCLUDE_CASE_SENSITIVE,
        }
    }
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            mode: PlaceholderMode::File,
            file_name: DEFAULT_PLACEHOLDER_NAME.into(),
        }
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            extension: "csproj".into(),
            include_separator: graft_adapters::manifest::DEFAULT_INCLUDE_SEPARATOR.to_string(),
        }
    }
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            max_depth: graft_core::application::DEFAULT_LOCATE_DEPTH,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then file(s), then environment.
    ///
    /// An explicit `config_file` must exist; the default locations are
    /// optional.
    pub fn load(config_file: Option<&Path>) -> CliResult<Self> {
        let defaults = config::Config::try_from(&Self::default()).map_err(config_error)?;
        let mut builder = config::Config::builder().add_source(defaults);

        match config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(CliError::config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                builder = builder
                    .add_source(config::File::from(Self::config_path()).required(false))
                    .add_source(config::File::from(Path::new(LOCAL_CONFIG_FILE)).required(false));
            }
        }

        let cfg: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error)?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.graft.toml` in the
    /// current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "graft", "graft")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Reject values that would only fail later, deep inside a merge.
    pub fn validate(&self) -> CliResult<()> {
        self.type_mapping()?;
        self.include_separator()?;
        if self.manifest.extension.trim_start_matches('.').is_empty() {
            return Err(CliError::config("manifest.extension cannot be empty"));
        }
        Ok(())
    }

    /// The suffix table as an immutable classifier mapping.
    pub fn type_mapping(&self) -> CliResult<TypeMapping> {
        let mut builder = TypeMapping::builder().with_defaults();
        for (suffix, kind) in &self.types {
            let kind: EntryKind = kind.parse().map_err(|e| CliError::ConfigError {
                message: format!("types.{suffix}: {e}"),
                source: Some(Box::new(e)),
            })?;
            builder = builder.map(suffix.as_str(), kind);
        }
        builder.build().map_err(|e| CliError::ConfigError {
            message: format!("invalid types table: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Placeholder policy, with CLI overrides applied.
    pub fn placeholder_policy(
        &self,
        mode: Option<PlaceholderMode>,
        file_name: Option<&str>,
    ) -> PlaceholderPolicy {
        match mode.unwrap_or(self.placeholder.mode) {
            PlaceholderMode::Folder => PlaceholderPolicy::Folder,
            PlaceholderMode::File => PlaceholderPolicy::materialize(
                file_name.unwrap_or(self.placeholder.file_name.as_str()),
            ),
        }
    }

    pub fn manifest_extension(&self) -> &str {
        self.manifest.extension.trim_start_matches('.')
    }

    pub fn include_separator(&self) -> CliResult<char> {
        match self.manifest.include_separator.as_str() {
            "\\" => Ok('\\'),
            "/" => Ok('/'),
            other => Err(CliError::config(format!(
                "manifest.include_separator must be '\\' or '/', got '{other}'"
            ))),
        }
    }

    /// Look up a dotted key such as `placeholder.mode`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        let found = key
            .split('.')
            .try_fold(&value, |node, segment| node.get(segment))?;
        Some(match found {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

fn config_error(e: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}
