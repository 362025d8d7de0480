// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::get_my_organizations,

        // --- RBAC ---
        handlers::rbac::list_permissions,

        // --- Catalog ---
        handlers::catalog::list_finish_types,
        handlers::catalog::get_finish_type,
        handlers::catalog::create_finish_type,

        // --- Projects ---
        handlers::projects::list_projects,
        handlers::projects::create_project,

        // --- Rooms ---
        handlers::rooms::list_rooms,
        handlers::rooms::create_room,
        handlers::rooms::get_room,
        handlers::rooms::list_plan,
        handlers::rooms::add_planned_finish,

        // --- Volumes ---
        handlers::rooms::append_volumes,
        handlers::rooms::append_room_volumes,
        handlers::rooms::get_latest_volumes,
        handlers::rooms::get_volume_history,

        // --- Reports ---
        handlers::reports::export_volumes,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- RBAC ---
            models::rbac::Permission,

            // --- Organizations ---
            models::organization::Organization,
            models::organization::UserOrganization,
            models::organization::Project,
            models::organization::CreateProjectPayload,

            // --- Catalog ---
            models::catalog::ElementKind,
            models::catalog::FinishLayer,
            models::catalog::FinishType,
            models::catalog::CreateFinishTypePayload,

            // --- Rooms ---
            models::room::Room,
            models::room::PlannedFinish,
            models::room::RoomDetail,
            models::room::CreateRoomPayload,
            models::room::AddPlannedFinishPayload,

            // --- Volumes ---
            models::ledger::WorkVolumeEntry,
            models::ledger::EntryRequest,
            models::ledger::EntryBatch,
            models::ledger::MultiKindEntryBatch,

            // --- Reports ---
            models::report::ExportMode,
            models::report::ExportFormat,
            models::report::ExportRow,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Dados do Usuário e suas Organizações"),
        (name = "RBAC", description = "Controle de Acesso (Permissões)"),
        (name = "Catalog", description = "Catálogo de Tipos de Acabamento"),
        (name = "Projects", description = "Projetos (Obras) da Organização"),
        (name = "Rooms", description = "Cômodos e Plano de Acabamentos"),
        (name = "Volumes", description = "Livro de Volumes Executados"),
        (name = "Reports", description = "Exportação de Progresso")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_ledger_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/rooms/{room_id}/volumes/{element_kind}"));
        assert!(paths.contains_key("/api/rooms/{room_id}/latest"));
        assert!(paths.contains_key("/api/reports/volumes"));
    }

    #[test]
    fn permission_catalog_requires_a_token() {
        let doc = ApiDoc::openapi();
        assert!(!doc.paths.paths.contains_key("/api/permissions"));

        let operation = doc.paths.paths["/api/users/permissions"].get.as_ref().unwrap();
        assert!(operation.security.as_ref().is_some_and(|s| !s.is_empty()));
    }
}
