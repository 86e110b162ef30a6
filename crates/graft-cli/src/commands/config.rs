//! `graft config`: inspect configuration values.

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config
                .get(&key)
                .ok_or_else(|| CliError::config(format!("Unknown config key: '{key}'")))?;
            if global.is_json() {
                output.json("config get", &serde_json::json!({ "key": key, "value": value }))?;
            } else {
                output.print(&format!("{key} = {value}"))?;
            }
        }

        ConfigCommands::List => {
            if global.is_json() {
                output.json("config list", &config)?;
            } else {
                output.header("Current Configuration:")?;
                let serialised = toml::to_string_pretty(&config)
                    .with_cli_context(|| "Failed to serialise config")?;
                output.print(&serialised)?;
            }
        }

        ConfigCommands::Path => {
            let path = AppConfig::config_path();
            if global.is_json() {
                output.json("config path", &path)?;
            } else {
                output.print(&path.display().to_string())?;
            }
        }
    }

    Ok(())
}
