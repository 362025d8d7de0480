// src/db/organization_repo.rs

use sqlx::{PgPool, Postgres, Executor};
use uuid::Uuid;
use crate::common::error::AppError;
use crate::models::organization::{Project, UserOrganization};

#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Verifica se um utilizador é membro ativo da organização.
    /// Esta é a verificação de segurança de autorização mais importante.
    pub async fn check_user_membership(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM organization_members
                WHERE user_id = $1 AND organization_id = $2 AND is_active = TRUE
            )
            "#,
        )
            .bind(user_id)
            .bind(organization_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Organizações às quais o utilizador pertence, com o cargo de cada uma.
    pub async fn list_user_organizations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserOrganization>, AppError> {
        let organizations = sqlx::query_as::<_, UserOrganization>(
            r#"
            SELECT o.id, o.name, r.name AS role_name
            FROM organization_members m
            JOIN organizations o ON o.id = m.organization_id
            LEFT JOIN roles r ON r.id = m.role_id
            WHERE m.user_id = $1 AND m.is_active = TRUE
            ORDER BY o.name
            "#,
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(organizations)
    }

    // ---
    // Projetos
    // ---

    pub async fn list_projects<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
    ) -> Result<Vec<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE organization_id = $1 ORDER BY name ASC",
        )
            .bind(organization_id)
            .fetch_all(executor)
            .await?;
        Ok(projects)
    }

    pub async fn find_project<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let project = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE id = $1 AND organization_id = $2",
        )
            .bind(project_id)
            .bind(organization_id)
            .fetch_optional(executor)
            .await?;
        Ok(project)
    }

    pub async fn create_project<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        name: &str,
    ) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (organization_id, name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
            .bind(organization_id)
            .bind(name)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::UniqueConstraintViolation(format!("Projeto {}", name));
                    }
                }
                e.into()
            })
    }
}
