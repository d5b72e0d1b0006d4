use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Serialize;

use super::common::StatusMessage;
use crate::errors::ServiceError;
use crate::mailer::SmtpCredentials;
use crate::services::invoices::{
    create_invoice as create_invoice_service, delete_invoice as delete_invoice_service,
    get_invoice as get_invoice_service, list_invoices as list_invoices_service,
    render_and_store_pdf, update_invoice as update_invoice_service, InvoiceUpdate, NewInvoice,
};
use crate::AppState;

/// Create responses carry the server-computed total alongside the id.
#[derive(Debug, Serialize)]
struct CreatedInvoice {
    id: i32,
    total: Decimal,
}

async fn list_invoices(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let invoices = list_invoices_service(&state.db).await?;
    Ok(Json(invoices))
}

async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<NewInvoice>,
) -> Result<impl IntoResponse, ServiceError> {
    let (id, total) = create_invoice_service(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedInvoice { id, total })))
}

async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let invoice = get_invoice_service(&state.db, id).await?;
    Ok(Json(invoice))
}

async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<InvoiceUpdate>,
) -> Result<impl IntoResponse, ServiceError> {
    update_invoice_service(&state.db, id, payload).await?;
    Ok(Json(StatusMessage::updated()))
}

async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    delete_invoice_service(&state.db, id).await?;
    Ok(Json(StatusMessage::deleted()))
}

/// Renders the invoice, stores the PDF on disk, and returns it as a
/// download.
async fn download_pdf(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let (doc, bytes) = render_and_store_pdf(&state.db, &state.config, id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", doc.pdf_filename()),
            ),
        ],
        bytes,
    ))
}

/// Renders the invoice and emails it to the invoice's client using the
/// credentials supplied in the request body. The stored PDF stays on disk
/// even when the send fails.
async fn send_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(creds): Json<SmtpCredentials>,
) -> Result<impl IntoResponse, ServiceError> {
    let (doc, bytes) = render_and_store_pdf(&state.db, &state.config, id).await?;
    state.mailer.send_invoice(&doc, Some(bytes), &creds).await?;
    Ok(Json(StatusMessage::sent()))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices))
        .route("/", post(create_invoice))
        .route("/:id", get(get_invoice))
        .route("/:id", put(update_invoice))
        .route("/:id", delete(delete_invoice))
        .route("/:id/pdf", get(download_pdf))
        .route("/:id/send", post(send_invoice))
}
