// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    common::{db_utils::get_rls_connection, error::{ApiError, AppError}},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermReportsRead, RequirePermission},
        tenancy::TenantContext,
    },
    models::report::{ExportFormat, ExportMode, ExportQuery, ExportRow},
};

fn csv_filename(mode: ExportMode) -> &'static str {
    match mode {
        ExportMode::Latest => "rooms_last_volumes.csv",
        ExportMode::Full => "rooms_all_volumes.csv",
    }
}

// GET /api/reports/volumes?mode=latest|full&roomIds=...&format=json|csv
#[utoipa::path(
    get,
    path = "/api/reports/volumes",
    tag = "Reports",
    params(
        ExportQuery,
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Linhas do relatório (JSON) ou arquivo CSV", body = Vec<ExportRow>),
        (status = 400, description = "roomIds inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_volumes(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermReportsRead>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let room_ids = query
        .parse_room_ids()
        .map_err(|e| to_api(AppError::BadRequest(format!("roomIds: {}", e))))?;

    // Leitura consistente: tudo na mesma transação
    let mut tx = get_rls_connection(&app_state, &tenant, &user).await.map_err(to_api)?;
    let rows = app_state
        .report_service
        .export_rows(&mut tx, tenant.0, query.mode, room_ids.as_deref())
        .await
        .map_err(to_api)?;
    tx.commit().await.map_err(|e| to_api(e.into()))?;

    match query.format {
        ExportFormat::Json => Ok(Json(rows).into_response()),
        ExportFormat::Csv => {
            let body = app_state
                .report_service
                .render_csv(query.mode, &rows)
                .map_err(to_api)?;

            let disposition = format!("attachment; filename=\"{}\"", csv_filename(query.mode));
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response())
        }
    }
}
