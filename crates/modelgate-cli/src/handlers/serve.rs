//! Serve command handler.
//!
//! Builds the server configuration from flags and environment, then
//! runs the Axum server until interrupted.

use std::path::PathBuf;

use anyhow::Result;

use modelgate_axum::{ServerConfig, start_server};

/// Arguments for the serve command.
#[derive(Debug, Default)]
pub struct ServeArgs {
    pub port: Option<u16>,
    pub static_dir: Option<PathBuf>,
    pub cors_origins: Vec<String>,
    pub insecure_tls: bool,
    pub api_only: bool,
}

/// Execute the serve command.
///
/// Flags override environment variables; environment variables override
/// defaults. The static directory is probed from conventional build
/// locations when not given explicitly.
pub async fn execute(args: ServeArgs) -> Result<()> {
    let mut config = ServerConfig::with_defaults();

    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if !args.cors_origins.is_empty() {
        config = config.with_allowed_origins(args.cors_origins);
    }
    if args.insecure_tls {
        config = config.with_insecure_tls(true);
    }

    // Resolve static directory: api-only flag > explicit flag > default location > API-only
    if !args.api_only {
        if let Some(dir) = args.static_dir {
            config = config.with_static_dir(dir);
        } else if let Some(dir) = probe_static_dir() {
            config = config.with_static_dir(dir);
        }
    }

    print_banner(&config);
    start_server(config).await
}

/// Conventional web client build locations, preferred order.
const STATIC_DIR_CANDIDATES: &[&str] = &["./public", "./dist", "./web/dist", "./static"];

fn probe_static_dir() -> Option<PathBuf> {
    STATIC_DIR_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.join("index.html").exists())
}

fn print_banner(config: &ServerConfig) {
    if let Some(ref dir) = config.static_dir {
        println!();
        println!("  🚀 modelgate starting...");
        println!();
        println!("  📂 Serving UI from: {}", dir.display());
        println!("  🌐 Local:   http://localhost:{}", config.port);
        println!("  🌐 Network: http://0.0.0.0:{}", config.port);
        println!();
        println!("  Press Ctrl+C to stop");
        println!();
    } else {
        println!();
        println!("  🚀 modelgate starting (API only)...");
        println!();
        println!("  🌐 API:     http://localhost:{}", config.port);
        println!();
        println!("  💡 Tip: Use --static-dir to serve a frontend build");
        println!();
    }
}
