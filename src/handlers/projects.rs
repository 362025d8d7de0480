// src/handlers/projects.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{db_utils::get_rls_connection, error::{ApiError, AppError}},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermProjectsWrite, PermRoomsRead, RequirePermission},
        tenancy::TenantContext,
    },
    models::organization::{CreateProjectPayload, Project},
};

// GET /api/projects
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    params(("x-organization-id" = Uuid, Header, description = "ID da organização")),
    responses((status = 200, description = "Projetos da organização", body = Vec<Project>)),
    security(("api_jwt" = []))
)]
pub async fn list_projects(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermRoomsRead>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let mut tx = get_rls_connection(&app_state, &tenant, &user).await.map_err(to_api)?;
    let projects = app_state
        .room_service
        .list_projects(&mut tx, tenant.0)
        .await
        .map_err(to_api)?;
    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok(Json(projects))
}

// POST /api/projects
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = CreateProjectPayload,
    params(("x-organization-id" = Uuid, Header, description = "ID da organização")),
    responses(
        (status = 201, description = "Projeto criado", body = Project),
        (status = 409, description = "Já existe um projeto com este nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermProjectsWrite>,
    Json(payload): Json<CreateProjectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    payload.validate().map_err(|e| to_api(e.into()))?;

    let mut tx = get_rls_connection(&app_state, &tenant, &user).await.map_err(to_api)?;
    let project = app_state
        .room_service
        .create_project(&mut tx, tenant.0, &payload)
        .await
        .map_err(to_api)?;
    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok((StatusCode::CREATED, Json(project)))
}
