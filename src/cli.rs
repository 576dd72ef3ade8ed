//! CLI definitions for claimrunner.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// claimrunner CLI.
#[derive(Parser)]
#[command(name = "claimrunner")]
#[command(about = "Sequential tab clicker with a persisted claimed-item set")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "~/.claimrunner/config.toml",
        env = "CLAIMRUNNER_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the control server in foreground (default)
    Serve {
        /// Server host (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Process a list of URLs once and print the summary
    Run {
        /// File with one URL per line (`#id=<n>` annotations allowed)
        file: PathBuf,

        /// Open tabs in the background
        #[arg(long)]
        background: bool,
    },

    /// Inspect or edit the persisted claimed set
    Claimed {
        #[command(subcommand)]
        action: ClaimedAction,
    },

    /// Print recent links from the active tab that are not yet claimed
    Links,
}

#[derive(Subcommand)]
pub(crate) enum ClaimedAction {
    /// List claimed ids in ascending order
    List,

    /// Record an id as claimed
    Add {
        /// Item id
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["claimrunner"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["claimrunner", "run", "urls.txt", "--background"]).unwrap();
        match cli.command {
            Some(Commands::Run { file, background }) => {
                assert_eq!(file, PathBuf::from("urls.txt"));
                assert!(background);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_claimed_add_with_global_config() {
        let cli =
            Cli::try_parse_from(["claimrunner", "claimed", "add", "42", "-c", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/tmp/c.toml"));
        match cli.command {
            Some(Commands::Claimed {
                action: ClaimedAction::Add { id },
            }) => assert_eq!(id, "42"),
            _ => panic!("expected claimed add"),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["claimrunner", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Some(Commands::Serve { host, port }) => {
                assert!(host.is_none());
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected serve"),
        }
    }
}
