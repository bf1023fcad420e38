use clap::Parser;

mod cli;
mod edit;
mod server;

use cli::*;
use edit::{run_edit_command, show_config};
use server::run_server_command;
use sitevoice_types::Mode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("/tmp"))
        .join("sitevoice")
        .join("log");
    let log_guard = sitevoice_util::logging::init_tracing(Some(&log_dir), cli.print_logs);

    let current_dir = std::env::current_dir()?;
    let config = sitevoice_config::load_config(&current_dir)?;
    tracing::info!(
        command = cli.command.name(),
        log_file = ?log_guard.path,
        "sitevoice starting"
    );

    match cli.command {
        Commands::Serve {
            port,
            hostname,
            cors,
        } => run_server_command(&config, port, hostname, cors).await?,
        Commands::Plan { command } => run_edit_command(&config, Mode::Plan, command, None).await?,
        Commands::Apply { plan, command } => {
            run_edit_command(&config, Mode::Apply, command, plan.as_deref()).await?
        }
        Commands::Config => show_config(&config)?,
    }

    Ok(())
}
