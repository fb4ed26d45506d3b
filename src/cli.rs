//! CLI argument types and layered configuration for the `tste` binary.
//! Values load from CLI args, environment (prefix `TSTE_`), and an optional
//! TOML configuration file, with CLI arguments taking precedence.

use std::path::PathBuf;

use clap::Parser;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading CLI configuration.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file or environment could not be parsed.
    #[error("failed to load configuration: {0}")]
    Figment(#[from] Box<figment::Error>),
    /// The requested task is not configured.
    #[error("unknown task \"{name}\"; run with --list-tasks to see the configured tasks")]
    UnknownTask { name: String },
    /// Task record could not be serialised for display.
    #[error("failed to render task record: {0}")]
    Render(#[from] serde_json::Error),
}

/// Command-line arguments for the `tste` binary.
///
/// # Examples
///
/// ```
/// use clap::Parser;
/// use tst_eval::cli::TsteArgs;
///
/// let args = TsteArgs::parse_from(["tste", "--task", "subjective-to-neutral"]);
/// assert_eq!(args.task.as_deref(), Some("subjective-to-neutral"));
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "tste",
    about = "Inspect style transfer evaluation tasks and their model configuration"
)]
pub struct TsteArgs {
    /// Style transfer task to inspect, e.g. `subjective-to-neutral`.
    #[arg(long)]
    pub task: Option<String>,

    /// List the configured task names and exit.
    #[arg(long, default_value_t = false)]
    pub list_tasks: bool,

    /// Run without performing any side effects.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Optional path to a TOML configuration file.
    #[arg(long)]
    pub config_path: Option<PathBuf>,
}

/// Values a configuration file or the environment may supply when the CLI
/// leaves them unset.
#[derive(Debug, Default, Deserialize)]
pub struct LayeredConfig {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub dry_run: Option<bool>,
}

impl TsteArgs {
    /// Fill unset fields from the configuration file (when given) and the
    /// `TSTE_`-prefixed environment, CLI arguments winning throughout.
    ///
    /// # Errors
    ///
    /// Returns a [`CliError`] if any layer cannot be read or parsed.
    pub fn layered(mut self) -> Result<Self, CliError> {
        let mut figment = Figment::new();
        if let Some(path) = &self.config_path {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("TSTE_"));
        let layered: LayeredConfig = figment.extract().map_err(Box::new)?;

        if self.task.is_none() {
            self.task = layered.task;
        }
        if !self.dry_run {
            self.dry_run = layered.dry_run.unwrap_or(false);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case(&["tste"], None, false)]
    #[case(&["tste", "--task", "informal-to-formal"], Some("informal-to-formal"), false)]
    #[case(&["tste", "--dry-run"], None, true)]
    fn parses_flags(
        #[case] argv: &[&str],
        #[case] expected_task: Option<&str>,
        #[case] expected_dry_run: bool,
    ) {
        let args = TsteArgs::parse_from(argv);
        assert_eq!(args.task.as_deref(), expected_task);
        assert_eq!(args.dry_run, expected_dry_run);
    }

    #[test]
    #[serial_test::serial]
    fn config_file_fills_unset_task() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "task = \"subjective-to-neutral\"").expect("write config");
        let mut args = TsteArgs::parse_from(["tste"]);
        args.config_path = Some(file.path().to_path_buf());
        let layered = args.layered().expect("layer config");
        assert_eq!(layered.task.as_deref(), Some("subjective-to-neutral"));
    }

    #[test]
    #[serial_test::serial]
    fn cli_task_wins_over_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "task = \"subjective-to-neutral\"").expect("write config");
        let mut args = TsteArgs::parse_from(["tste", "--task", "informal-to-formal"]);
        args.config_path = Some(file.path().to_path_buf());
        let layered = args.layered().expect("layer config");
        assert_eq!(layered.task.as_deref(), Some("informal-to-formal"));
    }
}
