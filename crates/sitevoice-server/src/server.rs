use axum::http::{header::HeaderValue, request::Parts};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use sitevoice_config::Config;
use sitevoice_engine::Editor;

use crate::routes;

pub struct ServerState {
    pub editor: Editor,
}

impl ServerState {
    pub fn new(editor: Editor) -> Self {
        Self { editor }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(Editor::from_config(config)?))
    }
}

fn is_local_origin(origin: &str) -> bool {
    origin.starts_with("http://localhost:") || origin.starts_with("http://127.0.0.1:")
}

/// Local origins are always allowed; `extra` adds exact origins, and `*`
/// opens the endpoint to any origin.
pub fn cors_layer(extra: &[String]) -> CorsLayer {
    let allow_origin = if extra.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let extra: Vec<String> = extra
            .iter()
            .map(|origin| origin.trim_end_matches('/').to_string())
            .collect();
        AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
            origin
                .to_str()
                .map(|origin| is_local_origin(origin) || extra.iter().any(|o| o == origin))
                .unwrap_or(false)
        })
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn app(state: Arc<ServerState>, cors: &[String]) -> axum::Router {
    routes::router()
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(addr: SocketAddr, config: &Config) -> anyhow::Result<()> {
    let state = Arc::new(ServerState::from_config(config)?);
    run_server_with_state(addr, state, config.cors()).await
}

pub async fn run_server_with_state(
    addr: SocketAddr,
    state: Arc<ServerState>,
    cors: &[String],
) -> anyhow::Result<()> {
    let app = app(state, cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
