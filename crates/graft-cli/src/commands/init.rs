//! `graft init`: write the default configuration file.

use std::path::{Path, PathBuf};

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliResult, IntoCli},
    output::OutputManager,
};

const HEADER: &str = "\
# Graft configuration.
#
# Every key can also be set through the environment, e.g.
#   GRAFT__PLACEHOLDER__MODE=folder
#   GRAFT__TYPES__JS=Content
";

pub fn execute(
    args: InitArgs,
    global: GlobalArgs,
    _config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let config_path = target_path(args.local);

    if config_path.exists() && !args.force && !confirm_overwrite(&config_path, &global)? {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    let text = render_default()?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(&config_path, text)
        .with_cli_context(|| format!("Failed to write config to '{}'", config_path.display()))?;

    output.success(&format!(
        "Configuration created at {}",
        config_path.display(),
    ))?;
    Ok(())
}

fn target_path(local: bool) -> PathBuf {
    if local {
        PathBuf::from(LOCAL_CONFIG_FILE)
    } else {
        AppConfig::config_path()
    }
}

fn render_default() -> CliResult<String> {
    let body = toml::to_string_pretty(&AppConfig::default())
        .with_cli_context(|| "Failed to serialise default config")?;
    Ok(format!("{HEADER}\n{body}"))
}

#[cfg(feature = "interactive")]
fn confirm_overwrite(path: &Path, global: &GlobalArgs) -> CliResult<bool> {
    use std::io::IsTerminal as _;

    if global.quiet || global.is_json() || !std::io::stdin().is_terminal() {
        return Ok(false);
    }
    dialoguer::Confirm::new()
        .with_prompt(format!("Overwrite {}?", path.display()))
        .default(false)
        .interact()
        .map_err(|e| crate::error::CliError::InvalidInput {
            message: "failed to read confirmation".into(),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm_overwrite(_path: &Path, _global: &GlobalArgs) -> CliResult<bool> {
    Ok(false)
}
