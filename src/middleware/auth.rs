// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::auth::User,
};

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|bearer| bearer.token().to_string())
        .ok_or(AppError::InvalidToken)
}

/// Exige `Authorization: Bearer <jwt>`.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let locale = Locale::from_headers(request.headers());

    let token = bearer_token(request.headers())
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;
    let user = app_state
        .auth_service
        .validate_token(&token)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

/// Exige token válido + `X-Organization-Id` de uma organização da qual o usuário é membro.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let locale = Locale::from_headers(request.headers());

    let (user, tenant) = admit_member(&app_state, request.headers())
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    request.extensions_mut().insert(tenant);
    Ok(next.run(request).await)
}

async fn admit_member(app_state: &AppState, headers: &HeaderMap) -> Result<(User, TenantContext), AppError> {
    let token = bearer_token(headers)?;
    let tenant = TenantContext::from_headers(headers)?;
    let user = app_state.auth_service.validate_token(&token).await?;

    // Superusuário entra em qualquer organização
    if !user.is_superuser {
        let is_member = app_state
            .organization_repo
            .check_user_membership(user.id, tenant.0)
            .await?;

        if !is_member {
            tracing::warn!("Usuário {} tentou acessar a organização {}", user.id, tenant.0);
            return Err(AppError::NotOrganizationMember);
        }
    }

    Ok((user, tenant))
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}
