//! Output management and formatting.
//!
//! Human and plain output go through [`OutputManager`]'s line methods. JSON
//! output is a single document on stdout so it stays parseable when piped.

use std::io::{self, IsTerminal};
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use graft_core::application::{MergeReport, Project};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::CliResult;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

/// JSON envelope for a command result.
#[derive(Debug, Serialize)]
pub struct JsonEnvelope<'a, T: Serialize> {
    pub command: &'a str,
    pub timestamp: DateTime<Utc>,
    pub result: &'a T,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    ///
    /// `--output-format auto` defers to `output.format` from the config,
    /// and `auto` there resolves to Human on a TTY, Plain otherwise.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => {
                OutputFormat::from_str(&config.output.format, true).unwrap_or(OutputFormat::Auto)
            }
            explicit => explicit,
        };
        let resolved_format = match requested {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet and JSON mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}")
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`.  Never suppressed.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}")
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}")
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}")
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Write `value` as pretty JSON inside a timestamped envelope.
    pub fn json<T: Serialize>(&self, command: &str, value: &T) -> CliResult<()> {
        let envelope = JsonEnvelope {
            command,
            timestamp: Utc::now(),
            result: value,
        };
        let text = serde_json::to_string_pretty(&envelope)?;
        self.term.write_line(&text)?;
        Ok(())
    }

    /// Spinner shown while a walk runs; only in interactive human mode.
    pub fn spinner(&self, msg: &str) -> Option<ProgressBar> {
        if self.silent()
            || self.resolved_format != OutputFormat::Human
            || !io::stderr().is_terminal()
        {
            return None;
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(msg.to_owned());
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    }

    // ── Merge results ─────────────────────────────────────────────────────

    pub fn project(&self, project: &Project) -> io::Result<()> {
        if project.reused {
            self.info(&format!(
                "Reusing project at {} ({})",
                project.root.display(),
                project.manifest_path.display()
            ))
        } else {
            self.success(&format!(
                "Created project at {} ({} template files)",
                project.root.display(),
                project.copied
            ))
        }
    }

    /// Summary plus per-file detail of a merge.
    pub fn report(&self, report: &MergeReport, verbose: bool) -> io::Result<()> {
        for line in render_report(report, verbose) {
            match line {
                ReportLine::Header(text) => self.header(&text)?,
                ReportLine::Item(text) => self.print(&text)?,
                ReportLine::Warning(text) => self.warning(&text)?,
                ReportLine::Done(text) => self.success(&text)?,
            }
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    fn silent(&self) -> bool {
        self.quiet || self.resolved_format == OutputFormat::Json
    }
}

/// One line of a rendered merge report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    Header(String),
    Item(String),
    Warning(String),
    Done(String),
}

/// Lay out a merge report. Per-file lines for copies and entries are only
/// included when `verbose`; skips and failures always are.
pub fn render_report(report: &MergeReport, verbose: bool) -> Vec<ReportLine> {
    let mut lines = Vec::new();
    let verb = if report.dry_run { "Would copy" } else { "Copied" };

    if verbose && !report.copied.is_empty() {
        lines.push(ReportLine::Header(format!("{verb}:")));
        for file in &report.copied {
            let marker = if file.replaced { " (replaced)" } else { "" };
            lines.push(ReportLine::Item(format!(
                "  {}{marker}",
                file.destination.display()
            )));
        }
    }

    if verbose && report.new_entry_count() > 0 {
        lines.push(ReportLine::Header("Manifest entries:".into()));
        for entry in report.all_entries() {
            lines.push(ReportLine::Item(format!("  + {entry}")));
        }
    }

    for skipped in &report.skipped {
        lines.push(ReportLine::Warning(format!(
            "Skipped {} (already exists)",
            skipped.destination.display()
        )));
    }
    for failure in &report.failures {
        lines.push(ReportLine::Warning(format!(
            "Failed {}: {}",
            failure.path.display(),
            failure.reason
        )));
    }

    let summary = format!(
        "{verb} {} file(s), {} new manifest entr{} ({} placeholder), {} skipped, {} failed",
        report.copied.len(),
        report.new_entry_count(),
        if report.new_entry_count() == 1 { "y" } else { "ies" },
        report.placeholders.len(),
        report.skipped.len(),
        report.failures.len(),
    );
    lines.push(ReportLine::Done(summary));

    if report.dry_run {
        lines.push(ReportLine::Item("Dry run: nothing was written".into()));
    } else if !report.manifest_saved {
        lines.push(ReportLine::Item("Manifest unchanged".into()));
    }
    lines
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use graft_core::application::{CopiedFile, SkipReason, SkippedFile};
    use graft_core::domain::{EntryKind, LogicalPath, ManifestEntry};

    fn make_manager(quiet: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color: true,
            config: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    fn sample_report() -> MergeReport {
        let mut report = MergeReport::new("/src", "/proj", false);
        report.copied.push(CopiedFile {
            source: "/src/a.ts".into(),
            destination: "/proj/a.ts".into(),
            replaced: false,
        });
        report.skipped.push(SkippedFile {
            source: "/src/c.xyz".into(),
            destination: "/proj/c.xyz".into(),
            reason: SkipReason::DestinationExists,
        });
        report.entries_added.push(ManifestEntry::new(
            EntryKind::TypeScriptCompile,
            LogicalPath::parse("a.ts").unwrap(),
        ));
        report.manifest_saved = true;
        report
    }

    #[test]
    fn quiet_manager_still_writes_errors() {
        let out = make_manager(true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
        assert!(out.error("something went wrong").is_ok());
        assert!(out.is_quiet());
    }

    #[test]
    fn plain_and_json_never_color() {
        assert!(!make_manager(false, OutputFormat::Plain).supports_color());
        assert!(!make_manager(false, OutputFormat::Json).supports_color());
        assert_eq!(make_manager(false, OutputFormat::Json).format(), OutputFormat::Json);
    }

    #[test]
    fn config_format_applies_when_flag_is_auto() {
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            output_format: OutputFormat::Auto,
        };
        let mut cfg = AppConfig::default();
        cfg.output.format = "plain".into();
        assert_eq!(OutputManager::new(&args, &cfg).format(), OutputFormat::Plain);
    }

    #[test]
    fn spinner_is_hidden_outside_human_mode() {
        assert!(make_manager(false, OutputFormat::Plain).spinner("walking").is_none());
    }

    #[test]
    fn report_always_lists_skips() {
        let lines = render_report(&sample_report(), false);
        assert!(lines.contains(&ReportLine::Warning(
            "Skipped /proj/c.xyz (already exists)".into()
        )));
        assert!(!lines.iter().any(|l| matches!(l, ReportLine::Header(_))));
        assert!(matches!(
            lines.last(),
            Some(ReportLine::Done(s)) if s.starts_with("Copied 1 file(s), 1 new manifest entry")
        ));
    }

    #[test]
    fn verbose_report_lists_entries() {
        let lines = render_report(&sample_report(), true);
        assert!(lines.contains(&ReportLine::Item("  + TypeScriptCompile:/a.ts".into())));
    }

    #[test]
    fn dry_run_report_says_so() {
        let mut report = sample_report();
        report.dry_run = true;
        report.manifest_saved = false;
        let lines = render_report(&report, false);
        assert!(lines.contains(&ReportLine::Item("Dry run: nothing was written".into())));
        assert!(matches!(
            lines.iter().rev().nth(1),
            Some(ReportLine::Done(s)) if s.starts_with("Would copy")
        ));
    }
}
