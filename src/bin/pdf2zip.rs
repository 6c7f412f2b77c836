//! Server binary for pdf2zip.
//!
//! A thin shim over the library crate: parse flags, initialise logging,
//! probe the rasterizer, serve the app.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2zip::{app, ServerConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default address, Ghostscript from PATH
  pdf2zip

  # Serve on all interfaces, port 9000
  pdf2zip --host 0.0.0.0 --port 9000

  # Pin a specific Ghostscript build
  pdf2zip --ghostscript /opt/gs-10.03/bin/gs
  GHOSTSCRIPT_PATH=/opt/gs-10.03/bin/gs pdf2zip

Open http://<host>:<port>/ in a browser, upload a PDF, pick the settings,
and download the pages as converted_images.zip."#;

/// PDF to Image Converter — web server.
#[derive(Debug, Parser)]
#[command(name = "pdf2zip", version, about, after_help = AFTER_HELP)]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Path to the Ghostscript executable.
    #[arg(long, env = "GHOSTSCRIPT_PATH", default_value = "gs")]
    ghostscript: PathBuf,

    /// Increase log verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match ghostscript_version(&args.ghostscript) {
        Some(version) => info!(
            "Ghostscript {} at '{}'",
            version,
            args.ghostscript.display()
        ),
        None => warn!(
            "Ghostscript not answering at '{}' — conversions will fail until it is installed",
            args.ghostscript.display()
        ),
    }

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", args.host, args.port))?;

    let router = app(ServerConfig {
        ghostscript: args.ghostscript,
    });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, router)
        .await
        .context("Server terminated")?;

    Ok(())
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "pdf2zip=info,tower_http=warn",
        1 => "pdf2zip=debug,tower_http=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Ask the rasterizer for its version; `None` if it cannot be run.
fn ghostscript_version(binary: &Path) -> Option<String> {
    let output = Command::new(binary).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!version.is_empty()).then_some(version)
}
