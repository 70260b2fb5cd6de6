use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::ws::WebSocketUpgrade;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::events::RoomEvent;
use crate::rooms::RoomRegistry;
use crate::suggest::{SuggestClient, SuggestRequest, SuggestResponse, FALLBACK_ANSWER};

/// Shared server state: the room registry, the fan-out channel every
/// connection subscribes to, and the suggestion relay client.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    pub event_tx: broadcast::Sender<RoomEvent>,
    pub suggest: SuggestClient,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let (event_tx, _rx) = broadcast::channel(100);
        Self {
            registry: Arc::new(RoomRegistry::new()),
            event_tx,
            suggest: SuggestClient::new(&config.suggest),
        }
    }
}

/// Build the HTTP application router. Cross-origin access is unrestricted.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/suggest", post(suggest))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}

async fn healthcheck() -> impl IntoResponse {
    Json(serde_json::json!({"status": "OK"}))
}

async fn suggest(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> impl IntoResponse {
    match state.suggest.complete(&request).await {
        Ok(answer) => (StatusCode::OK, Json(SuggestResponse { answer })),
        Err(err) => {
            tracing::error!(%err, "suggest relay failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SuggestResponse {
                    answer: FALLBACK_ANSWER.into(),
                }),
            )
        }
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| crate::ws::handle_socket(socket, state))
}

/// Run the HTTP server bound to the configured address.
pub async fn run_http_server(config: Config) -> Result<()> {
    let state = AppState::new(&config);
    let addr: SocketAddr = config.bind.parse()?;
    tracing::info!(%addr, "relay server listening");
    axum::Server::bind(&addr)
        .serve(build_router(state).into_make_service())
        .await?;
    Ok(())
}
