// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::ledger::AuthorizationContext,
};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

fn guarded_identity(parts: &Parts) -> Result<(AuthenticatedUser, TenantContext), AppError> {
    let user = parts
        .extensions
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or(AppError::InvalidToken)?;

    // Só existe depois do `tenant_guard`
    let tenant = parts
        .extensions
        .get::<TenantContext>()
        .copied()
        .ok_or_else(|| AppError::BadRequest("organization context missing".to_string()))?;

    Ok((user, tenant))
}

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);
        let reject = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

        let (user, tenant) = guarded_identity(parts).map_err(reject)?;

        // Superusuário não passa pela tabela de cargos
        if user.0.is_superuser {
            return Ok(RequirePermission(PhantomData));
        }

        let required_perm = T::slug();
        let has_permission = app_state
            .rbac_repo
            .user_has_permission(user.0.id, tenant.0, required_perm)
            .await
            .map_err(reject)?;

        if !has_permission {
            return Err(reject(AppError::Forbidden(required_perm.to_string())));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// Editor = superusuário ou membro com o cargo "Editor" na organização.
impl<S> FromRequestParts<S> for AuthorizationContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);
        let reject = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

        let (user, tenant) = guarded_identity(parts).map_err(reject)?;

        if user.0.is_superuser {
            return Ok(AuthorizationContext::editor());
        }

        let is_editor = app_state
            .rbac_repo
            .member_has_role(user.0.id, tenant.0, AuthorizationContext::EDITOR_ROLE)
            .await
            .map_err(reject)?;

        Ok(if is_editor { AuthorizationContext::editor() } else { AuthorizationContext::reporter() })
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermProjectsWrite;
impl PermissionDef for PermProjectsWrite {
    fn slug() -> &'static str { "projects:write" }
}

pub struct PermRoomsRead;
impl PermissionDef for PermRoomsRead {
    fn slug() -> &'static str { "rooms:read" }
}

pub struct PermRoomsWrite;
impl PermissionDef for PermRoomsWrite {
    fn slug() -> &'static str { "rooms:write" }
}

pub struct PermVolumesWrite;
impl PermissionDef for PermVolumesWrite {
    fn slug() -> &'static str { "volumes:write" }
}

pub struct PermReportsRead;
impl PermissionDef for PermReportsRead {
    fn slug() -> &'static str { "reports:read" }
}
