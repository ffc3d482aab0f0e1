use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// File the completion flag is kept in when `--state` is not given
pub const DEFAULT_STATE_FILE: &str = ".dashtour-state.json";

/// Dashboard Tour - a guided onboarding tour in your terminal
#[derive(Parser)]
#[command(name = "dashtour")]
#[command(about = "Guided product tour over a dashboard, with a terminal front end")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the dashboard and run the tour (default)
    Run(RunArgs),
    /// Clear the completion flag so the tour is offered again
    Reset {
        #[arg(long, default_value = DEFAULT_STATE_FILE)]
        state: PathBuf,

        /// Tour configuration file; its completion key is the one cleared
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show whether the tour has been completed
    Status {
        #[arg(long, default_value = DEFAULT_STATE_FILE)]
        state: PathBuf,

        /// Tour configuration file; its completion key is the one checked
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate a tour script file
    Validate {
        /// Path to the script (JSON array of steps)
        script: PathBuf,
    },
    /// Print the tour stylesheet and its theme tokens
    Styles,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Route the dashboard is opened on
    #[arg(long, default_value = "/dashboard")]
    pub path: String,

    /// Tour script to use instead of the built-in one
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Tour configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// File holding the completion flag
    #[arg(long, default_value = DEFAULT_STATE_FILE)]
    pub state: PathBuf,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            path: "/dashboard".to_string(),
            script: None,
            config: None,
            state: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_args() {
        // Running with no args should succeed (defaults to run)
        let result = Cli::try_parse_from(["dashtour"]);
        assert!(result.is_ok());
        let cli = result.unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_run_with_options() {
        let result = Cli::try_parse_from([
            "dashtour",
            "run",
            "--path",
            "/agents/classification",
            "--script",
            "/path/to/tour.json",
            "--state",
            "/tmp/state.json",
        ]);
        assert!(result.is_ok());
        match result.unwrap().command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.path, "/agents/classification");
                assert_eq!(args.script.unwrap().to_str().unwrap(), "/path/to/tour.json");
                assert!(args.config.is_none());
                assert_eq!(args.state.to_str().unwrap(), "/tmp/state.json");
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_run_defaults_match_default_args() {
        let cli = Cli::try_parse_from(["dashtour", "run"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                let defaults = RunArgs::default();
                assert_eq!(args.path, defaults.path);
                assert_eq!(args.state, defaults.state);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_validate_command() {
        let result = Cli::try_parse_from(["dashtour", "validate", "/path/to/tour.json"]);
        assert!(result.is_ok());
        match result.unwrap().command {
            Some(Commands::Validate { script }) => {
                assert_eq!(script.to_str().unwrap(), "/path/to/tour.json");
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_validate_requires_path() {
        assert!(Cli::try_parse_from(["dashtour", "validate"]).is_err());
    }

    #[test]
    fn test_cli_reset_default_state() {
        let cli = Cli::try_parse_from(["dashtour", "reset"]).unwrap();
        match cli.command {
            Some(Commands::Reset { state, config }) => {
                assert_eq!(state.to_str().unwrap(), DEFAULT_STATE_FILE);
                assert!(config.is_none());
            }
            _ => panic!("Expected Reset command"),
        }
    }

    #[test]
    fn test_cli_reset_and_status_accept_config() {
        let cli = Cli::try_parse_from(["dashtour", "reset", "--config", "/etc/tour.json"]).unwrap();
        match cli.command {
            Some(Commands::Reset { config, .. }) => {
                assert_eq!(config.unwrap().to_str().unwrap(), "/etc/tour.json");
            }
            _ => panic!("Expected Reset command"),
        }

        let cli = Cli::try_parse_from([
            "dashtour",
            "status",
            "--state",
            "/tmp/state.json",
            "--config",
            "/etc/tour.json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Status { state, config }) => {
                assert_eq!(state.to_str().unwrap(), "/tmp/state.json");
                assert_eq!(config.unwrap().to_str().unwrap(), "/etc/tour.json");
            }
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn test_cli_unknown_command_fails() {
        assert!(Cli::try_parse_from(["dashtour", "install"]).is_err());
    }
}
