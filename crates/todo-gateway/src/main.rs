//! Todo Gateway - HTTP API for the Todo service

use clap::Parser;
use std::path::PathBuf;
use todo_gateway::{run_lambda, run_server, server, telemetry, GatewayConfig};

#[derive(Parser, Debug)]
#[command(name = "todo-gateway")]
#[command(about = "HTTP API for per-user todo lists")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "TODO_CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Use in-memory storage (for testing, data will not persist)
    #[arg(long)]
    memory_store: bool,

    /// Disable authentication (for development only!)
    #[arg(long)]
    no_auth: bool,

    /// Enable debug logging
    #[arg(short, long, env = "TODO_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let in_lambda = server::running_in_lambda();

    telemetry::init_tracing(args.debug, in_lambda);

    // Build configuration: file and TODO_* environment, then CLI flags
    let mut config = GatewayConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.memory_store {
        config.use_memory_store = true;
    }
    if args.no_auth {
        config.auth_enabled = false;
    }

    if config.use_memory_store {
        tracing::warn!("⚠️  Using in-memory storage - data will NOT persist!");
    }

    if !config.auth_enabled {
        tracing::warn!("⚠️  Authentication is DISABLED - for development only!");
    }

    if in_lambda {
        run_lambda(config).await
    } else {
        tracing::info!("Starting Todo API on {}", config.bind_addr());
        run_server(config, server::shutdown_signal()).await
    }
}
