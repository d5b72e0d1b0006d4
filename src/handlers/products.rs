use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};

use super::common::{IdResponse, StatusMessage};
use crate::errors::ServiceError;
use crate::services::products::{
    create_product as create_product_service, delete_product as delete_product_service,
    list_products as list_products_service, update_product as update_product_service, NewProduct,
    ProductPatch,
};
use crate::AppState;

async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let products = list_products_service(&state.db).await?;
    Ok(Json(products))
}

async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = create_product_service(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<ProductPatch>,
) -> Result<impl IntoResponse, ServiceError> {
    update_product_service(&state.db, id, patch).await?;
    Ok(Json(StatusMessage::updated()))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    delete_product_service(&state.db, id).await?;
    Ok(Json(StatusMessage::deleted()))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/", post(create_product))
        .route("/:id", put(update_product))
        .route("/:id", delete(delete_product))
}
