// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::catalog::{CreateFinishTypePayload, FinishType, FinishTypeQuery},
};

// GET /api/finish-types
#[utoipa::path(
    get,
    path = "/api/finish-types",
    tag = "Catalog",
    params(FinishTypeQuery),
    responses((status = 200, description = "Tipos de acabamento", body = Vec<FinishType>)),
    security(("api_jwt" = []))
)]
pub async fn list_finish_types(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<FinishTypeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let types = app_state
        .catalog_service
        .list(query.element_kind)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok(Json(types))
}

// GET /api/finish-types/{id}
#[utoipa::path(
    get,
    path = "/api/finish-types/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do tipo de acabamento")),
    responses(
        (status = 200, description = "Tipo de acabamento", body = FinishType),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_finish_type(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let finish_type = app_state
        .catalog_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok(Json(finish_type))
}

// POST /api/finish-types (só superusuário)
#[utoipa::path(
    post,
    path = "/api/finish-types",
    tag = "Catalog",
    request_body = CreateFinishTypePayload,
    responses(
        (status = 201, description = "Tipo de acabamento criado", body = FinishType),
        (status = 403, description = "Apenas superusuários"),
        (status = 409, description = "Código já existe para este elemento")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_finish_type(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateFinishTypePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, app_state.i18n_store))?;

    let finish_type = app_state
        .catalog_service
        .create(user.is_superuser, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(finish_type)))
}
