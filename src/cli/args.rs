//! CLI argument definitions using clap
//!
//! Commands:
//! - tokenrelay serve [--config <path>] [--host <host>] [--port <port>]
//! - tokenrelay check-config [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tokenrelay - correlate an out-of-band action with a waiting browser session
#[derive(Parser, Debug)]
#[command(name = "tokenrelay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the relay server
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the bind port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate configuration and print the resolved settings
    CheckConfig {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from(["tokenrelay", "serve", "--port", "8080", "--host", "127.0.0.1"])
            .unwrap();

        assert_eq!(
            cli.command,
            Command::Serve {
                config: None,
                host: Some("127.0.0.1".to_string()),
                port: Some(8080),
            }
        );
    }

    #[test]
    fn test_parse_check_config() {
        let cli = Cli::try_parse_from(["tokenrelay", "check-config", "--config", "relay.json"]).unwrap();

        assert_eq!(
            cli.command,
            Command::CheckConfig {
                config: Some(PathBuf::from("relay.json")),
            }
        );
    }

    #[test]
    fn test_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["tokenrelay", "publish"]).is_err());
    }
}
