#![cfg(feature = "server")]

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use triage_session::{SessionStore, TurnService};
use triage_types::{Envelope, TurnRequest};

use crate::settings::Settings;

#[derive(Clone)]
struct AppState {
    service: Arc<TurnService<dyn SessionStore>>,
    turn_deadline: Duration,
}

pub async fn serve(
    service: Arc<TurnService<dyn SessionStore>>,
    settings: &Settings,
) -> anyhow::Result<()> {
    let state = AppState {
        service,
        turn_deadline: Duration::from_millis(settings.turn_deadline_ms),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/triage/turn", post(handle_turn))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    tracing::info!(addr = %settings.bind_addr, "triage HTTP server listening");
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn handle_turn(
    State(state): State<AppState>,
    Json(req): Json<TurnRequest>,
) -> Json<Envelope> {
    let envelope = state
        .service
        .handle_turn(
            req.session_id,
            &req.locale,
            &req.user_message,
            req.answer,
            req.profile,
            state.turn_deadline,
        )
        .await;
    Json(envelope)
}
