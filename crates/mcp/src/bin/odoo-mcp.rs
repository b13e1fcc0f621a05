// Odoo MCP server binary

use clap::Parser;
use odoo_mcp::config::{Cli, Command, ConnectionArgs, LogFormat, ServerConfig};
use odoo_mcp::server::McpServer;
use odoo_mcp::tools::odoo_tools;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Doctor => odoo_mcp::doctor::run(&cli.connection).await,
        Command::Serve => match serve(&cli.connection).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("{:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn serve(connection: &ConnectionArgs) -> anyhow::Result<()> {
    tracing::info!("Odoo MCP Server starting...");

    let config = ServerConfig::from_connection(connection)?;
    tracing::debug!(config = ?config, "Configuration loaded");

    let client = Arc::new(config.connect()?);
    let registry = odoo_tools(client, &config.policy());
    tracing::info!(
        url = %config.url,
        database = %config.database,
        read_only = config.read_only,
        "Registered {} tools",
        registry.len()
    );

    let server = McpServer::new(registry);
    server.start().await?;

    tracing::info!("Odoo MCP Server stopped");
    Ok(())
}

// stdout carries protocol frames, so logs go to stderr
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| "info".into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
