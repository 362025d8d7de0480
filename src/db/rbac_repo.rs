// src/db/rbac_repo.rs

use sqlx::PgPool;
use uuid::Uuid;
use crate::common::error::AppError;
use crate::models::rbac::Permission;

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Listar todas as permissões disponíveis (para o Frontend montar a tela)
    pub async fn list_all_permissions(&self) -> Result<Vec<Permission>, AppError> {
        let permissions = sqlx::query_as::<_, Permission>(
            "SELECT id, slug, description, module FROM permissions ORDER BY module, slug",
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(permissions)
    }

    pub async fn user_has_permission(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        permission_slug: &str,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM organization_members m
                JOIN roles r ON m.role_id = r.id
                JOIN role_permissions rp ON r.id = rp.role_id
                JOIN permissions p ON rp.permission_id = p.id
                WHERE m.user_id = $1
                  AND m.organization_id = $2
                  AND m.is_active = true
                  AND p.slug = $3
            )
            "#,
        )
            .bind(user_id)
            .bind(organization_id)
            .bind(permission_slug)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// O membro ocupa o cargo `role_name` nesta organização?
    pub async fn member_has_role(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        role_name: &str,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM organization_members m
                JOIN roles r ON m.role_id = r.id
                WHERE m.user_id = $1
                  AND m.organization_id = $2
                  AND m.is_active = true
                  AND r.name = $3
            )
            "#,
        )
            .bind(user_id)
            .bind(organization_id)
            .bind(role_name)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
