//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here; `commands`
//! resolves unset flags against the configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "graft",
    bin_name = "graft",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Merge payloads into projects and keep the manifest in sync",
    long_about = "Graft copies a distribution payload into a project tree and \
                  appends every new file to the project manifest, classified \
                  by extension. Directories left without files get a placeholder.",
    after_help = "EXAMPLES:\n\
        \x20 graft new ./Shop --template ./template --payload ./extract --name Shop\n\
        \x20 graft merge ./Shop --source ./payload --root wwwroot --exclude '*.map'\n\
        \x20 graft entries ./Shop --kind content\n\
        \x20 graft completions bash > /usr/share/bash-completion/completions/graft",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a project from a template and optionally merge a payload.
    #[command(
        visible_alias = "n",
        about = "Create a project from a template",
        after_help = "EXAMPLES:\n\
            \x20 graft new ./Shop --template ./template\n\
            \x20 graft new ./Shop --template ./template --name Shop\n\
            \x20 graft new ./Shop --template ./template --payload ./extract --placeholder folder"
    )]
    New(NewArgs),

    /// Merge a source tree into an existing project.
    #[command(
        visible_alias = "m",
        about = "Merge a source tree into a project",
        after_help = "EXAMPLES:\n\
            \x20 graft merge ./Shop --source ./payload\n\
            \x20 graft merge ./Shop --source ./payload --root wwwroot --overwrite\n\
            \x20 graft merge ./Shop --source ./extract --locate-root --dry-run"
    )]
    Merge(MergeArgs),

    /// List the entries of a project manifest.
    #[command(
        visible_alias = "ls",
        about = "List manifest entries",
        after_help = "EXAMPLES:\n\
            \x20 graft entries ./Shop\n\
            \x20 graft entries ./Shop --kind TypeScriptCompile\n\
            \x20 graft entries ./Shop --format csv > entries.csv"
    )]
    Entries(EntriesArgs),

    /// Initialise a Graft configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 graft init          # default location\n\
            \x20 graft init --local  # .graft.toml in CWD\n\
            \x20 graft init --force  # overwrite existing"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 graft completions bash > ~/.local/share/bash-completion/completions/graft\n\
            \x20 graft completions zsh  > ~/.zfunc/_graft\n\
            \x20 graft completions fish > ~/.config/fish/completions/graft.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Graft configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 graft config get placeholder.mode\n\
            \x20 graft config list\n\
            \x20 graft config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `graft new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Directory the project is created in (or reused from).
    #[arg(value_name = "TARGET", help = "Project directory")]
    pub target: PathBuf,

    #[arg(
        short = 't',
        long = "template",
        value_name = "DIR",
        help = "Template directory holding the project manifest"
    )]
    pub template: PathBuf,

    /// Extracted payload to merge after the project is established.
    #[arg(
        short = 'p',
        long = "payload",
        value_name = "DIR",
        help = "Payload directory to merge into the new project"
    )]
    pub payload: Option<PathBuf>,

    #[arg(
        short = 'n',
        long = "name",
        value_name = "NAME",
        help = "Project name; renames the manifest to NAME.<ext>"
    )]
    pub name: Option<String>,

    #[command(flatten)]
    pub merge: MergeFlags,
}

// ── merge ─────────────────────────────────────────────────────────────────────

/// Arguments for `graft merge`.
#[derive(Debug, Args)]
pub struct MergeArgs {
    #[arg(value_name = "PROJECT_DIR", help = "Project directory (manifest location)")]
    pub project: PathBuf,

    #[arg(
        short = 's',
        long = "source",
        value_name = "DIR",
        help = "Source tree to merge"
    )]
    pub source: PathBuf,

    /// Explicit manifest; otherwise the single manifest in PROJECT_DIR.
    #[arg(long = "manifest", value_name = "FILE", help = "Manifest file to update")]
    pub manifest: Option<PathBuf>,

    #[command(flatten)]
    pub merge: MergeFlags,
}

/// Merge options shared by `new` and `merge`.
///
/// Unset options fall back to the configuration file.
#[derive(Debug, Clone, Default, Args)]
pub struct MergeFlags {
    #[arg(
        short = 'r',
        long = "root",
        value_name = "LOGICAL",
        help = "Logical directory the source lands under (default: project root)"
    )]
    pub root: Option<String>,

    #[arg(
        short = 'i',
        long = "include",
        value_name = "GLOB",
        action = clap::ArgAction::Append,
        help = "Only merge paths matching GLOB (repeatable)"
    )]
    pub include: Vec<String>,

    #[arg(
        short = 'x',
        long = "exclude",
        value_name = "GLOB",
        action = clap::ArgAction::Append,
        help = "Skip paths matching GLOB (repeatable)"
    )]
    pub exclude: Vec<String>,

    #[arg(long = "include-case-insensitive", help = "Match --include globs ignoring case")]
    pub include_case_insensitive: bool,

    #[arg(long = "exclude-case-sensitive", help = "Match --exclude globs respecting case")]
    pub exclude_case_sensitive: bool,

    #[arg(long = "overwrite", help = "Replace files that already exist in the project")]
    pub overwrite: bool,

    #[arg(
        long = "no-overwrite",
        conflicts_with = "overwrite",
        help = "Keep existing project files even if the config enables overwrite"
    )]
    pub no_overwrite: bool,

    #[arg(
        long = "placeholder",
        value_enum,
        value_name = "MODE",
        help = "How empty directories are represented"
    )]
    pub placeholder: Option<PlaceholderMode>,

    #[arg(
        long = "placeholder-name",
        value_name = "NAME",
        help = "File name used by --placeholder file"
    )]
    pub placeholder_name: Option<String>,

    #[arg(
        long = "locate-root",
        help = "Descend through single-directory wrappers to find the payload root"
    )]
    pub locate_root: bool,

    #[arg(long = "dry-run", help = "Show what would change without writing anything")]
    pub dry_run: bool,
}

// ── entries ───────────────────────────────────────────────────────────────────

/// Arguments for `graft entries`.
#[derive(Debug, Args)]
pub struct EntriesArgs {
    #[arg(value_name = "PROJECT_DIR", help = "Project directory (manifest location)")]
    pub project: PathBuf,

    #[arg(long = "manifest", value_name = "FILE", help = "Manifest file to read")]
    pub manifest: Option<PathBuf>,

    /// Entry kind as written in the manifest; matched ignoring case.
    #[arg(short = 'k', long = "kind", value_name = "KIND", help = "Only list entries of KIND")]
    pub kind: Option<String>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for `graft entries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Aligned columns.
    Table,
    /// One `Kind:/path` per line.
    List,
    /// A JSON array.
    Json,
    /// `kind,include` rows with a header.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `graft init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(
        long = "local",
        help = "Create .graft.toml in the current directory"
    )]
    pub local: bool,

    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `graft completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// `graft config` subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one configuration value.
    Get {
        /// Dotted key, e.g. `placeholder.mode`.
        key: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the configuration file path.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Representation of an otherwise-empty directory.
///
/// Also the `placeholder.mode` configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderMode {
    /// Create an empty file and record it as content.
    File,
    /// Record a folder entry only.
    Folder,
}

impl std::fmt::Display for PlaceholderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Folder => write!(f, "folder"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn merge_flags_repeat() {
        let cli = Cli::try_parse_from([
            "graft", "merge", "proj", "--source", "src", "-x", "*.map", "-x", "*.pdb",
            "--placeholder", "folder",
        ])
        .unwrap();
        let Commands::Merge(args) = cli.command else {
            panic!("expected merge");
        };
        assert_eq!(args.merge.exclude, vec!["*.map", "*.pdb"]);
        assert_eq!(args.merge.placeholder, Some(PlaceholderMode::Folder));
        assert!(!args.merge.overwrite);
    }

    #[test]
    fn overwrite_flags_conflict() {
        let result = Cli::try_parse_from([
            "graft", "merge", "proj", "--source", "src", "--overwrite", "--no-overwrite",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn new_requires_template() {
        assert!(Cli::try_parse_from(["graft", "new", "proj"]).is_err());
    }

    #[test]
    fn entries_alias_and_format() {
        let cli = Cli::try_parse_from(["graft", "ls", "proj", "--format", "csv"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Entries(EntriesArgs {
                format: ListFormat::Csv,
                ..
            })
        ));
    }
}
