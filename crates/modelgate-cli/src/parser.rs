//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure; subcommands live in
//! [`crate::commands`].

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface definition for the modelgate gateway.
///
/// Running without a subcommand starts the server with defaults, so the
/// binary works as a container entry point without arguments.
#[derive(Parser)]
#[command(name = "modelgate")]
#[command(about = "OpenAI-compatible gateway over platform-bound chat services")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        // Verify the CLI parser can be constructed
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_args() {
        let cli = Cli::parse_from(["modelgate", "serve", "--port", "9000", "--insecure-tls"]);
        match cli.command {
            Some(Commands::Serve {
                port,
                insecure_tls,
                static_dir,
                ..
            }) => {
                assert_eq!(port, Some(9000));
                assert!(insecure_tls);
                assert!(static_dir.is_none());
            }
            _ => panic!("expected the serve command"),
        }
    }

    #[test]
    fn test_repeated_cors_origins() {
        let cli = Cli::parse_from([
            "modelgate",
            "serve",
            "--cors-origin",
            "https://a.example",
            "--cors-origin",
            "https://b.example",
        ]);
        match cli.command {
            Some(Commands::Serve { cors_origins, .. }) => {
                assert_eq!(cors_origins, ["https://a.example", "https://b.example"]);
            }
            _ => panic!("expected the serve command"),
        }
    }

    #[test]
    fn test_services_json_flag() {
        let cli = Cli::parse_from(["modelgate", "services", "--json"]);
        assert!(matches!(cli.command, Some(Commands::Services { json: true })));
    }

    #[test]
    fn test_no_command_is_allowed() {
        let cli = Cli::parse_from(["modelgate"]);
        assert!(cli.command.is_none());
    }
}
