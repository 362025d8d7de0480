// src/services/room_service.rs

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, LedgerRepository, OrganizationRepository, RoomRepository},
    models::{
        organization::{CreateProjectPayload, Project},
        room::{AddPlannedFinishPayload, CreateRoomPayload, PlannedFinish, Room, RoomDetail},
    },
    services::projection,
};

/// Projetos, cômodos e o plano de acabamentos de cada cômodo.
#[derive(Clone)]
pub struct RoomService {
    organization_repo: OrganizationRepository,
    room_repo: RoomRepository,
    catalog_repo: CatalogRepository,
    ledger_repo: LedgerRepository,
}

impl RoomService {
    pub fn new(
        organization_repo: OrganizationRepository,
        room_repo: RoomRepository,
        catalog_repo: CatalogRepository,
        ledger_repo: LedgerRepository,
    ) -> Self {
        Self { organization_repo, room_repo, catalog_repo, ledger_repo }
    }

    // ---
    // Projetos
    // ---

    pub async fn list_projects(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
    ) -> Result<Vec<Project>, AppError> {
        self.organization_repo.list_projects(conn, organization_id).await
    }

    pub async fn create_project(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        payload: &CreateProjectPayload,
    ) -> Result<Project, AppError> {
        let project = self
            .organization_repo
            .create_project(conn, organization_id, payload.name.trim())
            .await?;
        tracing::info!("🏗️ Projeto '{}' criado na organização {}", project.name, organization_id);
        Ok(project)
    }

    // ---
    // Cômodos
    // ---

    pub async fn create_room(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        payload: &CreateRoomPayload,
    ) -> Result<Room, AppError> {
        // O projeto precisa ser da organização do usuário
        self.organization_repo
            .find_project(&mut *conn, organization_id, payload.project_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Projeto {}", payload.project_id)))?;

        self.room_repo
            .create_room(
                &mut *conn,
                payload.project_id,
                payload.code.trim(),
                payload.block.trim(),
                payload.floor,
                payload.room_number.as_deref().map(str::trim),
                payload.name.trim(),
            )
            .await
    }

    pub async fn list_rooms(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        project_id: Option<Uuid>,
    ) -> Result<Vec<Room>, AppError> {
        self.room_repo.list_in_organization(conn, organization_id, project_id).await
    }

    /// Cômodo + plano + último lançamento de cada tipo de acabamento.
    pub async fn room_detail(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        room_id: Uuid,
    ) -> Result<RoomDetail, AppError> {
        let room = self.require_room(&mut *conn, organization_id, room_id).await?;

        let project = self
            .organization_repo
            .find_project(&mut *conn, organization_id, room.project_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Projeto {}", room.project_id)))?;

        let plan = self.room_repo.list_plan(&mut *conn, room_id).await?;
        let history = self.ledger_repo.list_entries(&mut *conn, &[room_id]).await?;

        Ok(RoomDetail {
            room,
            project_name: project.name,
            plan,
            latest_volumes: projection::latest_state(&history),
        })
    }

    // ---
    // Plano de acabamentos
    // ---

    pub async fn list_plan(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        room_id: Uuid,
    ) -> Result<Vec<PlannedFinish>, AppError> {
        self.require_room(&mut *conn, organization_id, room_id).await?;
        self.room_repo.list_plan(&mut *conn, room_id).await
    }

    pub async fn add_planned_finish(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        room_id: Uuid,
        payload: &AddPlannedFinishPayload,
    ) -> Result<PlannedFinish, AppError> {
        self.require_room(&mut *conn, organization_id, room_id).await?;

        let finish_type = self
            .catalog_repo
            .find_by_id(&mut *conn, payload.finish_type_id)
            .await?
            .ok_or_else(|| {
                AppError::ResourceNotFound(format!("Tipo de acabamento {}", payload.finish_type_id))
            })?;

        // Um tipo de parede não pode ser planejado como piso, etc.
        if finish_type.element_kind != payload.element_kind {
            return Err(AppError::BadRequest(format!(
                "finish type {} is a {} finish, not {}",
                finish_type.type_code,
                finish_type.element_kind.as_str(),
                payload.element_kind.as_str()
            )));
        }

        let planned = self
            .room_repo
            .add_planned_finish(
                &mut *conn,
                room_id,
                payload.finish_type_id,
                payload.element_kind,
                payload.area_finish,
            )
            .await?;

        tracing::info!(
            "Acabamento {} planejado no cômodo {} ({} m²)",
            planned.type_code,
            room_id,
            planned.area_finish
        );
        Ok(planned)
    }

    async fn require_room(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        room_id: Uuid,
    ) -> Result<Room, AppError> {
        self.room_repo
            .find_in_organization(conn, organization_id, room_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Cômodo {}", room_id)))
    }
}
