// src/handlers/rbac.rs

use axum::{extract::State, Json, response::IntoResponse};
use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::rbac::Permission,
};

// GET /api/users/permissions (Para o frontend saber o que mostrar na tela de cargos)
#[utoipa::path(
    get,
    path = "/api/users/permissions",
    tag = "RBAC",
    responses(
        (status = 200, description = "Permissões do sistema", body = Vec<Permission>),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {

    let permissions = app_state.rbac_repo
        .list_all_permissions()
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok(Json(permissions))
}
