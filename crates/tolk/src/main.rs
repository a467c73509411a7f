// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! tolk - Telegram group translation bot.
//!
//! This is the binary entry point.

mod check;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tolk - Telegram group translation bot.
#[derive(Parser, Debug)]
#[command(name = "tolk", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// The subcommand to run; `serve` when none was given.
    fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Commands {
    /// Start the bot and poll Telegram for updates.
    Serve,
    /// Check configuration, the config store and external services.
    Check {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => tolk_config::load_and_validate_path(path),
        None => tolk_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            tolk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command() {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Check { plain } => check::run_check(&config, plain).await,
    };

    if let Err(e) = result {
        eprintln!("tolk: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_serve_with_config_path() {
        let cli = Cli::parse_from(["tolk", "--config", "/etc/tolk/tolk.toml", "serve"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/tolk/tolk.toml")));
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::parse_from(["tolk"]);
        assert_eq!(cli.command(), Commands::Serve);
        let cli = Cli::parse_from(["tolk", "check"]);
        assert_eq!(cli.command(), Commands::Check { plain: false });
    }

    #[test]
    fn cli_parses_check_plain() {
        let cli = Cli::parse_from(["tolk", "check", "--plain"]);
        assert!(matches!(cli.command, Some(Commands::Check { plain: true })));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = tolk_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.bot.name, "tolk");
    }
}
