use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use tracing::{debug, warn};

use super::common::{IdResponse, StatusMessage};
use crate::document::InvoiceDocument;
use crate::errors::ServiceError;
use crate::mailer::SmtpCredentials;
use crate::services::smtp_accounts::{
    create_account as create_account_service, delete_account as delete_account_service,
    list_accounts as list_accounts_service,
};
use crate::AppState;

async fn list_accounts(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    // smtp_account::Model skips the password field on serialization.
    let accounts = list_accounts_service(&state.db).await?;
    Ok(Json(accounts))
}

async fn create_account(
    State(state): State<AppState>,
    Json(creds): Json<SmtpCredentials>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = create_account_service(&state.db, &state.mailer, creds).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    delete_account_service(&state.db, id).await?;
    Ok(Json(StatusMessage::deleted()))
}

/// Credential check against the relay; collapses to a bare 200/400 and
/// never persists or sends anything.
pub async fn verify_smtp(
    State(state): State<AppState>,
    Json(creds): Json<SmtpCredentials>,
) -> StatusCode {
    match state.mailer.verify_login(&creds).await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            debug!(error = %err, "smtp verification failed");
            StatusCode::BAD_REQUEST
        }
    }
}

/// Sends a synthetic zero-item invoice to the account's own address so the
/// user can confirm the credentials end to end. Collapses to 200/500.
pub async fn send_test_email(
    State(state): State<AppState>,
    Json(creds): Json<SmtpCredentials>,
) -> StatusCode {
    let doc = InvoiceDocument::test_message(&creds.email, &state.config.default_company_name);
    match state.mailer.send_invoice(&doc, None, &creds).await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            warn!(error = %err, "test email failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts))
        .route("/", post(create_account))
        .route("/:id", delete(delete_account))
}
