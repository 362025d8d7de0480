// src/handlers/rooms.rs

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::get_rls_connection, error::{ApiError, AppError}},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermRoomsRead, PermRoomsWrite, PermVolumesWrite, RequirePermission},
        tenancy::TenantContext,
    },
    models::{
        catalog::ElementKind,
        ledger::{AuthorizationContext, EntryBatch, MultiKindEntryBatch, WorkVolumeEntry},
        room::{AddPlannedFinishPayload, CreateRoomPayload, PlannedFinish, Room, RoomDetail, RoomListQuery},
    },
};

// =============================================================================
//  ÁREA 1: CÔMODOS
// =============================================================================

// GET /api/rooms
#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "Rooms",
    params(
        RoomListQuery,
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses((status = 200, description = "Cômodos da organização", body = Vec<Room>)),
    security(("api_jwt" = []))
)]
pub async fn list_rooms(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermRoomsRead>,
    Query(query): Query<RoomListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let mut tx = get_rls_connection(&app_state, &tenant, &user).await.map_err(to_api)?;
    let rooms = app_state
        .room_service
        .list_rooms(&mut tx, tenant.0, query.project_id)
        .await
        .map_err(to_api)?;
    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok(Json(rooms))
}

// POST /api/rooms
#[utoipa::path(
    post,
    path = "/api/rooms",
    tag = "Rooms",
    request_body = CreateRoomPayload,
    params(("x-organization-id" = Uuid, Header, description = "ID da organização")),
    responses(
        (status = 201, description = "Cômodo criado", body = Room),
        (status = 404, description = "Projeto não encontrado"),
        (status = 409, description = "Código de cômodo já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_room(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermRoomsWrite>,
    Json(payload): Json<CreateRoomPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    payload.validate().map_err(|e| to_api(e.into()))?;

    let mut tx = get_rls_connection(&app_state, &tenant, &user).await.map_err(to_api)?;
    let room = app_state
        .room_service
        .create_room(&mut tx, tenant.0, &payload)
        .await
        .map_err(to_api)?;
    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok((StatusCode::CREATED, Json(room)))
}

// GET /api/rooms/{room_id}
#[utoipa::path(
    get,
    path = "/api/rooms/{room_id}",
    tag = "Rooms",
    params(
        ("room_id" = Uuid, Path, description = "ID do cômodo"),
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Cômodo com plano e últimos volumes", body = RoomDetail),
        (status = 404, description = "Cômodo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_room(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermRoomsRead>,
    Path(room_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let mut tx = get_rls_connection(&app_state, &tenant, &user).await.map_err(to_api)?;
    let detail = app_state
        .room_service
        .room_detail(&mut tx, tenant.0, room_id)
        .await
        .map_err(to_api)?;
    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok(Json(detail))
}

// =============================================================================
//  ÁREA 2: PLANO DE ACABAMENTOS
// =============================================================================

// GET /api/rooms/{room_id}/plan
#[utoipa::path(
    get,
    path = "/api/rooms/{room_id}/plan",
    tag = "Rooms",
    params(
        ("room_id" = Uuid, Path, description = "ID do cômodo"),
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses((status = 200, description = "Acabamentos planejados", body = Vec<PlannedFinish>)),
    security(("api_jwt" = []))
)]
pub async fn list_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermRoomsRead>,
    Path(room_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let mut tx = get_rls_connection(&app_state, &tenant, &user).await.map_err(to_api)?;
    let plan = app_state
        .room_service
        .list_plan(&mut tx, tenant.0, room_id)
        .await
        .map_err(to_api)?;
    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok(Json(plan))
}

// POST /api/rooms/{room_id}/plan
#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/plan",
    tag = "Rooms",
    request_body = AddPlannedFinishPayload,
    params(
        ("room_id" = Uuid, Path, description = "ID do cômodo"),
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 201, description = "Acabamento planejado", body = PlannedFinish),
        (status = 400, description = "Tipo de acabamento de outro elemento"),
        (status = 409, description = "Acabamento já planejado neste cômodo")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_planned_finish(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermRoomsWrite>,
    Path(room_id): Path<Uuid>,
    Json(payload): Json<AddPlannedFinishPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    payload.validate().map_err(|e| to_api(e.into()))?;

    let mut tx = get_rls_connection(&app_state, &tenant, &user).await.map_err(to_api)?;
    let planned = app_state
        .room_service
        .add_planned_finish(&mut tx, tenant.0, room_id, &payload)
        .await
        .map_err(to_api)?;
    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok((StatusCode::CREATED, Json(planned)))
}

// =============================================================================
//  ÁREA 3: LIVRO DE VOLUMES
// =============================================================================

// POST /api/rooms/{room_id}/volumes/{element_kind}
#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/volumes/{element_kind}",
    tag = "Volumes",
    request_body = EntryBatch,
    params(
        ("room_id" = Uuid, Path, description = "ID do cômodo"),
        ("element_kind" = ElementKind, Path, description = "floor, wall ou ceiling"),
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 201, description = "Lançamentos gravados", body = Vec<WorkVolumeEntry>),
        (status = 403, description = "Diminuição não permitida para o cargo"),
        (status = 422, description = "Lançamento viola as regras do plano")
    ),
    security(("api_jwt" = []))
)]
pub async fn append_volumes(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermVolumesWrite>,
    auth: AuthorizationContext,
    Path((room_id, element_kind)): Path<(Uuid, ElementKind)>,
    Json(payload): Json<EntryBatch>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    payload.validate().map_err(|e| to_api(e.into()))?;

    let mut tx = get_rls_connection(&app_state, &tenant, &user).await.map_err(to_api)?;
    let entries = app_state
        .ledger_service
        .append_entries(&mut tx, tenant.0, room_id, element_kind, auth, user.0.id, &payload.entries)
        .await
        .map_err(to_api)?;
    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok((StatusCode::CREATED, Json(entries)))
}

// POST /api/rooms/{room_id}/volumes
#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/volumes",
    tag = "Volumes",
    request_body = MultiKindEntryBatch,
    params(
        ("room_id" = Uuid, Path, description = "ID do cômodo"),
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 201, description = "Lançamentos gravados (piso, parede, teto)", body = Vec<WorkVolumeEntry>),
        (status = 403, description = "Diminuição não permitida para o cargo"),
        (status = 422, description = "Lançamento viola as regras do plano")
    ),
    security(("api_jwt" = []))
)]
pub async fn append_room_volumes(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermVolumesWrite>,
    auth: AuthorizationContext,
    Path(room_id): Path<Uuid>,
    Json(payload): Json<MultiKindEntryBatch>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    payload.validate().map_err(|e| to_api(e.into()))?;

    let mut tx = get_rls_connection(&app_state, &tenant, &user).await.map_err(to_api)?;
    let entries = app_state
        .ledger_service
        .append_batches(&mut tx, tenant.0, room_id, auth, user.0.id, &payload.by_kind())
        .await
        .map_err(to_api)?;
    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok((StatusCode::CREATED, Json(entries)))
}

// GET /api/rooms/{room_id}/latest
#[utoipa::path(
    get,
    path = "/api/rooms/{room_id}/latest",
    tag = "Volumes",
    params(
        ("room_id" = Uuid, Path, description = "ID do cômodo"),
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses((
        status = 200,
        description = "Último lançamento por tipo de acabamento",
        body = BTreeMap<Uuid, WorkVolumeEntry>
    )),
    security(("api_jwt" = []))
)]
pub async fn get_latest_volumes(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermRoomsRead>,
    Path(room_id): Path<Uuid>,
) -> Result<Json<BTreeMap<Uuid, WorkVolumeEntry>>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let mut tx = get_rls_connection(&app_state, &tenant, &user).await.map_err(to_api)?;
    let latest = app_state
        .ledger_service
        .latest_state(&mut tx, tenant.0, room_id)
        .await
        .map_err(to_api)?;
    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok(Json(latest))
}

// GET /api/rooms/{room_id}/history
#[utoipa::path(
    get,
    path = "/api/rooms/{room_id}/history",
    tag = "Volumes",
    params(
        ("room_id" = Uuid, Path, description = "ID do cômodo"),
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses((status = 200, description = "Todos os lançamentos, em ordem cronológica", body = Vec<WorkVolumeEntry>)),
    security(("api_jwt" = []))
)]
pub async fn get_volume_history(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermRoomsRead>,
    Path(room_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let mut tx = get_rls_connection(&app_state, &tenant, &user).await.map_err(to_api)?;
    let history = app_state
        .ledger_service
        .history(&mut tx, tenant.0, room_id)
        .await
        .map_err(to_api)?;
    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok(Json(history))
}
