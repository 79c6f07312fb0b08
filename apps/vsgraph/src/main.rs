//! # vsgraph - Visual-Scripting Graph Host
//!
//! The command-line host for the vsgraph execution engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            apps/vsgraph (THE BINARY)         │
//! │                                              │
//! │   ┌─────────────┐        ┌──────────────┐    │
//! │   │    CLI      │        │  Graph files │    │
//! │   │   (clap)    │        │    (toml)    │    │
//! │   └──────┬──────┘        └──────┬───────┘    │
//! │          └───────────┬──────────┘            │
//! │                      ▼                       │
//! │              ┌──────────────┐                │
//! │              │ vsgraph-core │                │
//! │              │ (THE ENGINE) │                │
//! │              └──────────────┘                │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! vsgraph kinds
//! vsgraph validate -g graphs/hello.toml
//! vsgraph inspect -g graphs/hello.toml --json-mode
//! vsgraph run -g graphs/hello.toml --ticks 10 --until-quiescent
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vsgraph::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // VSGRAPH_LOG_FORMAT=json enables machine-parseable output. Logs go to
    // stderr so --json-mode stdout stays parseable.
    let log_format = std::env::var("VSGRAPH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vsgraph=info,vsgraph_core=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the vsgraph startup banner.
fn print_banner() {
    println!(
        r#"
  vsgraph v{}
  signal/data graph host
"#,
        env!("CARGO_PKG_VERSION")
    );
}
