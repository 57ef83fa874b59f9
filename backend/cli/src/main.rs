mod doctor_cmd;
mod runtime;
mod status_cmd;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use folio_config::FolioConfig;
use folio_gateway::GatewayState;

use runtime::{build_services, Services};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio: persona chat backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Probe a running server's health endpoint
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Ask the persona a single question without starting the server
    Ask {
        /// The visitor message
        message: String,
    },
    /// Validate configuration and print it with secrets masked
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = folio_config::read()?;

    folio_logging::init_logger(config.logging.dir.as_deref(), &config.logging.level);

    match cli.command {
        Commands::Serve { port } => {
            folio_config::check(&config)?;
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
        }
        Commands::Status { port } => {
            status_cmd::run(port.unwrap_or(config.server.port)).await?;
        }
        Commands::Ask { message } => {
            folio_config::check(&config)?;
            ask_once(&config, &message).await?;
        }
        Commands::Doctor => {
            doctor_cmd::run(&config)?;
        }
    }

    Ok(())
}

async fn run_server(config: FolioConfig) -> Result<()> {
    info!(
        port = config.server.port,
        bind = %config.server.bind_address,
        config = %folio_config::redact(&serde_json::to_value(&config)?),
        "Starting Folio"
    );

    let Services {
        agent,
        model,
        outbox_worker,
    } = build_services(&config)?;
    let state = GatewayState::new(agent, model, &config.persona.profile_url);

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .context("Invalid bind address")?;
    folio_gateway::start_server(addr, state).await?;

    outbox_worker.await?;
    Ok(())
}

async fn ask_once(config: &FolioConfig, message: &str) -> Result<()> {
    let Services {
        agent,
        outbox_worker,
        ..
    } = build_services(config)?;

    let outcome = agent.chat(message, Vec::new()).await;
    println!("{}", outcome.reply());

    drop(agent);
    outbox_worker.await?;
    Ok(())
}
