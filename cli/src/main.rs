//! pathmux CLI: driving adapter for pathmux route tables.
//!
//! Subcommands:
//! - `check <routes>`: validate that every route registers
//! - `match <routes> <METHOD> <PATH>`: resolve one request
//! - `tree <routes>`: print the route tree

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use pathmux::{RouteTableConfig, Router};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pathmux")]
#[command(about = "Check and query radix-tree route tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate that every route in the table registers
    Check {
        /// Route table (.json, .yaml or .yml)
        routes: PathBuf,
    },
    /// Resolve one request against the route table
    Match {
        /// Route table (.json, .yaml or .yml)
        routes: PathBuf,
        /// Request method, e.g. GET
        method: String,
        /// Request path, e.g. /post/42
        path: String,
    },
    /// Print the route tree
    Tree {
        /// Route table (.json, .yaml or .yml)
        routes: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pathmux=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Check { routes } => cmd_check(&routes),
        Command::Match {
            routes,
            method,
            path,
        } => cmd_match(&routes, &method, &path),
        Command::Tree { routes } => cmd_tree(&routes),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_check(path: &Path) -> Result<(), String> {
    let router = load_router(path)?;
    println!("Routes valid ({} routes)", router.len());
    Ok(())
}

fn cmd_match(path: &Path, method: &str, request_path: &str) -> Result<(), String> {
    let router = load_router(path)?;
    println!("{}", pathmux_test::resolve(&router, method, request_path));
    Ok(())
}

fn cmd_tree(path: &Path) -> Result<(), String> {
    let router = load_router(path)?;
    print!("{}", router.dump());
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Config loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_router(path: &Path) -> Result<Router<String>, String> {
    let config = load_config(path)?;
    let router = config
        .build()
        .map_err(|e| format!("routes invalid: {e}"))?;
    info!(path = %path.display(), routes = router.len(), "route table loaded");
    Ok(router)
}

fn load_config(path: &Path) -> Result<RouteTableConfig<String>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read \"{}\": {e}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    parse_config(&content, is_json)
}

fn parse_config(content: &str, is_json: bool) -> Result<RouteTableConfig<String>, String> {
    if is_json {
        serde_json::from_str(content).map_err(|e| format!("JSON parse error: {e}"))
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(content).map_err(|e| format!("YAML parse error: {e}"))
    }
}
