//! tenderhub library - http handlers, services and application setup.
//!
//! this crate provides the procurement api server:
//! - [`services`]: tender and bid operations with access control
//! - [`handlers`]: axum handlers translating http to service calls
//! - [`cli`]: command-line interface implementation

#![warn(missing_docs)]

/// command-line interface.
pub mod cli;
/// http request handlers.
pub mod handlers;
/// tender and bid services.
pub mod services;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use tenderhub_db::TenderhubDb;
use tenderhub_quorum::QuorumEngine;

/// shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// database connection for persistent storage.
    pub db: TenderhubDb,
    /// decision evaluator for bid approvals.
    pub quorum: QuorumEngine,
}

/// create the axum application with all routes.
pub fn create_app(db: TenderhubDb) -> Router {
    let state = AppState {
        db,
        quorum: QuorumEngine::default(),
    };

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/ping", get(handlers::ping))
        .merge(handlers::tenders_router())
        .merge(handlers::bids_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
