//! Invoicing back-office API library.
//!
//! Manages company profiles, SMTP sending accounts, clients, products, and
//! invoices; renders invoices as PDF documents and emails them to clients.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod document;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod mailer;
pub mod migrator;
pub mod pdf;
pub mod services;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub mailer: mailer::Mailer,
}

/// Builds the full application router: the `/api` surface plus the bundled
/// front-end served from `frontend_dir`, with any unknown path falling back
/// to `index.html`.
pub fn app_router(state: AppState) -> Router {
    let frontend_dir = PathBuf::from(&state.config.frontend_dir);
    let static_files =
        ServeDir::new(&frontend_dir).fallback(ServeFile::new(frontend_dir.join("index.html")));

    let mut router = Router::new()
        .nest("/api", handlers::api_routes())
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http());

    if state.config.is_development() {
        router = router.layer(tower_http::cors::CorsLayer::permissive());
    }

    router.with_state(state)
}
