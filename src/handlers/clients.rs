use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};

use super::common::{IdResponse, StatusMessage};
use crate::errors::ServiceError;
use crate::services::clients::{
    create_client as create_client_service, delete_client as delete_client_service,
    list_clients as list_clients_service, update_client as update_client_service, ClientPatch,
    NewClient,
};
use crate::AppState;

async fn list_clients(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let clients = list_clients_service(&state.db).await?;
    Ok(Json(clients))
}

async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<NewClient>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = create_client_service(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<ClientPatch>,
) -> Result<impl IntoResponse, ServiceError> {
    update_client_service(&state.db, id, patch).await?;
    Ok(Json(StatusMessage::updated()))
}

async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    delete_client_service(&state.db, id).await?;
    Ok(Json(StatusMessage::deleted()))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients))
        .route("/", post(create_client))
        .route("/:id", put(update_client))
        .route("/:id", delete(delete_client))
}
