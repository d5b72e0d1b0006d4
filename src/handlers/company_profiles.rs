use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};

use super::common::{IdResponse, StatusMessage};
use crate::errors::ServiceError;
use crate::services::company_profiles::{
    create_profile as create_profile_service, delete_profile as delete_profile_service,
    list_profiles as list_profiles_service, update_profile as update_profile_service,
    CompanyProfilePatch, NewCompanyProfile,
};
use crate::AppState;

async fn list_profiles(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let profiles = list_profiles_service(&state.db).await?;
    Ok(Json(profiles))
}

async fn create_profile(
    State(state): State<AppState>,
    Json(payload): Json<NewCompanyProfile>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = create_profile_service(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<CompanyProfilePatch>,
) -> Result<impl IntoResponse, ServiceError> {
    update_profile_service(&state.db, id, patch).await?;
    Ok(Json(StatusMessage::updated()))
}

async fn delete_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    delete_profile_service(&state.db, id).await?;
    Ok(Json(StatusMessage::deleted()))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles))
        .route("/", post(create_profile))
        .route("/:id", put(update_profile))
        .route("/:id", delete(delete_profile))
}
