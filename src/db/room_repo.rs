// src/db/room_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::{
        catalog::ElementKind,
        room::{PlannedFinish, Room, RoomReportContext},
    },
};

const ROOM_COLUMNS: &str =
    "r.id, r.project_id, r.code, r.block, r.floor, r.room_number, r.name, r.created_at, r.updated_at";

const PLANNED_FINISH_SELECT: &str = r#"
    SELECT pf.id, pf.room_id, pf.finish_type_id, pf.element_kind, pf.area_finish,
           ft.type_code, ft.description, ft.material, ft.layer
    FROM room_planned_finishes pf
    JOIN finish_types ft ON ft.id = pf.finish_type_id
"#;

#[derive(Clone, Default)]
pub struct RoomRepository;

impl RoomRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Cômodos
    // ---
    // Toda busca passa pelo projeto para respeitar a organização do usuário.

    pub async fn create_room<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        code: &str,
        block: &str,
        floor: Option<i32>,
        room_number: Option<&str>,
        name: &str,
    ) -> Result<Room, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (project_id, code, block, floor, room_number, name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, project_id, code, block, floor, room_number, name, created_at, updated_at
            "#,
        )
            .bind(project_id)
            .bind(code)
            .bind(block)
            .bind(floor)
            .bind(room_number)
            .bind(name)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::UniqueConstraintViolation(format!("Cômodo {}", code));
                    }
                }
                e.into()
            })
    }

    pub async fn find_in_organization<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        room_id: Uuid,
    ) -> Result<Option<Room>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r
             JOIN projects p ON p.id = r.project_id
             WHERE r.id = $1 AND p.organization_id = $2"
        );
        let room = sqlx::query_as::<_, Room>(&sql)
            .bind(room_id)
            .bind(organization_id)
            .fetch_optional(executor)
            .await?;
        Ok(room)
    }

    /// Igual a `find_in_organization`, mas trava a linha até o fim da transação.
    /// Lançamentos concorrentes no mesmo cômodo ficam em fila aqui.
    pub async fn lock_in_organization<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        room_id: Uuid,
    ) -> Result<Option<Room>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r
             JOIN projects p ON p.id = r.project_id
             WHERE r.id = $1 AND p.organization_id = $2
             FOR UPDATE OF r"
        );
        let room = sqlx::query_as::<_, Room>(&sql)
            .bind(room_id)
            .bind(organization_id)
            .fetch_optional(executor)
            .await?;
        Ok(room)
    }

    pub async fn list_in_organization<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        project_id: Option<Uuid>,
    ) -> Result<Vec<Room>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r
             JOIN projects p ON p.id = r.project_id
             WHERE p.organization_id = $1 AND ($2::uuid IS NULL OR r.project_id = $2)
             ORDER BY r.block, r.floor NULLS FIRST, r.code"
        );
        let rooms = sqlx::query_as::<_, Room>(&sql)
            .bind(organization_id)
            .bind(project_id)
            .fetch_all(executor)
            .await?;
        Ok(rooms)
    }

    /// Cômodos com nome do projeto e da organização. `room_ids = None` traz todos.
    pub async fn list_report_contexts<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        room_ids: Option<&[Uuid]>,
    ) -> Result<Vec<RoomReportContext>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {ROOM_COLUMNS},
                    p.name AS project_name,
                    o.id AS organization_id,
                    o.name AS organization_name
             FROM rooms r
             JOIN projects p ON p.id = r.project_id
             JOIN organizations o ON o.id = p.organization_id
             WHERE o.id = $1 AND ($2::uuid[] IS NULL OR r.id = ANY($2))
             ORDER BY r.block, r.floor NULLS FIRST, r.code"
        );
        let rooms = sqlx::query_as::<_, RoomReportContext>(&sql)
            .bind(organization_id)
            .bind(room_ids)
            .fetch_all(executor)
            .await?;
        Ok(rooms)
    }

    // ---
    // Plano de acabamentos
    // ---

    pub async fn list_plan<'e, E>(
        &self,
        executor: E,
        room_id: Uuid,
    ) -> Result<Vec<PlannedFinish>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.list_plans(executor, &[room_id]).await
    }

    pub async fn list_plans<'e, E>(
        &self,
        executor: E,
        room_ids: &[Uuid],
    ) -> Result<Vec<PlannedFinish>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "{PLANNED_FINISH_SELECT}
             WHERE pf.room_id = ANY($1)
             ORDER BY pf.room_id, pf.element_kind, ft.type_code"
        );
        let plan = sqlx::query_as::<_, PlannedFinish>(&sql)
            .bind(room_ids)
            .fetch_all(executor)
            .await?;
        Ok(plan)
    }

    pub async fn add_planned_finish<'e, E>(
        &self,
        executor: E,
        room_id: Uuid,
        finish_type_id: Uuid,
        kind: ElementKind,
        area_finish: Decimal,
    ) -> Result<PlannedFinish, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PlannedFinish>(
            r#"
            WITH inserted AS (
                INSERT INTO room_planned_finishes (room_id, finish_type_id, element_kind, area_finish)
                VALUES ($1, $2, $3, $4)
                RETURNING id, room_id, finish_type_id, element_kind, area_finish
            )
            SELECT i.id, i.room_id, i.finish_type_id, i.element_kind, i.area_finish,
                   ft.type_code, ft.description, ft.material, ft.layer
            FROM inserted i
            JOIN finish_types ft ON ft.id = i.finish_type_id
            "#,
        )
            .bind(room_id)
            .bind(finish_type_id)
            .bind(kind)
            .bind(area_finish)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::UniqueConstraintViolation(format!(
                            "Acabamento planejado {}",
                            finish_type_id
                        ));
                    }
                }
                e.into()
            })
    }
}
