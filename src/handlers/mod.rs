pub mod clients;
pub mod common;
pub mod company_profiles;
pub mod invoices;
pub mod products;
pub mod smtp_accounts;

use axum::{routing::post, Router};

use crate::AppState;

/// Composes the `/api` surface.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/presets", company_profiles::routes())
        .nest("/smtp-configs", smtp_accounts::routes())
        .route("/verify-smtp", post(smtp_accounts::verify_smtp))
        .route("/test-email", post(smtp_accounts::send_test_email))
        .nest("/clients", clients::routes())
        .nest("/products", products::routes())
        .nest("/invoices", invoices::routes())
}
