use std::net::SocketAddr;
use std::sync::Arc;

use sitevoice_config::Config;
use sitevoice_server::ServerState;

pub(crate) async fn run_server_command(
    config: &Config,
    port: Option<u16>,
    hostname: Option<String>,
    cors: Vec<String>,
) -> anyhow::Result<()> {
    let bind_host = hostname.unwrap_or_else(|| config.hostname().to_string());
    let bind_port = port.unwrap_or_else(|| config.port());
    let mut origins = config.cors().to_vec();
    origins.extend(cors);

    let addr: SocketAddr = format!("{}:{}", bind_host, bind_port).parse()?;
    let state = Arc::new(ServerState::from_config(config)?);
    println!("Starting sitevoice server on {}", addr);
    sitevoice_server::run_server_with_state(addr, state, &origins).await
}
