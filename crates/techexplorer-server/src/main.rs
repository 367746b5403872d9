//! Tech Explorer: technology discovery chat API.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod routes;
mod state;

use state::AppState;
use techexplorer_core::ExplorerConfig;

fn print_help() {
    println!("Tech Explorer, technology catalog & discovery API");
    println!();
    println!("Usage: techexplorer [command]");
    println!();
    println!("Commands:");
    println!("  (none)     Start the server");
    println!("  config     Print the resolved configuration as JSON");
    println!("  help       Show this help message");
    println!();
    println!("Environment:");
    println!("  PORT, AI_AGENT_BASE_URL, AI_AGENT_ENDPOINT, CORS_ORIGIN, APP_ENV");
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Serve,
    PrintConfig,
    Help,
}

/// Map the first CLI argument to a command. Needs no configuration.
fn parse_command(args: &[String]) -> Result<Command, String> {
    match args.get(1).map(String::as_str) {
        None => Ok(Command::Serve),
        Some("--config" | "config") => Ok(Command::PrintConfig),
        Some("--help" | "-h" | "help") => Ok(Command::Help),
        Some(other) => Err(other.to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let command = match parse_command(&args) {
        Ok(Command::Help) => {
            print_help();
            return Ok(());
        }
        Ok(command) => command,
        Err(unknown) => {
            eprintln!("Unknown command: {}. Use 'techexplorer help' for usage.", unknown);
            std::process::exit(1);
        }
    };

    let config = ExplorerConfig::from_env()?;

    if command == Command::PrintConfig {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let port = config.port;
    info!("AI agent configured: {}", config.stream_url());
    info!("Environment: {}", config.environment);

    let state = Arc::new(AppState::new(config)?);
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Tech Explorer server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
