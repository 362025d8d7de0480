// src/db/catalog_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::catalog::{ElementKind, FinishLayer, FinishType},
};

// O catálogo é global (dado de referência), não depende do tenant.
#[derive(Clone, Default)]
pub struct CatalogRepository;

impl CatalogRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        kind: Option<ElementKind>,
    ) -> Result<Vec<FinishType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let types = sqlx::query_as::<_, FinishType>(
            r#"
            SELECT id, element_kind, type_code, description, material, layer, created_at
            FROM finish_types
            WHERE ($1::element_kind IS NULL OR element_kind = $1)
            ORDER BY element_kind, type_code
            "#,
        )
            .bind(kind)
            .fetch_all(executor)
            .await?;
        Ok(types)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<FinishType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let finish_type = sqlx::query_as::<_, FinishType>(
            r#"
            SELECT id, element_kind, type_code, description, material, layer, created_at
            FROM finish_types
            WHERE id = $1
            "#,
        )
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(finish_type)
    }

    /// Busca vários de uma vez (usado para montar o `FinishCatalog` de uma requisição).
    pub async fn find_many<'e, E>(
        &self,
        executor: E,
        ids: &[Uuid],
    ) -> Result<Vec<FinishType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let types = sqlx::query_as::<_, FinishType>(
            r#"
            SELECT id, element_kind, type_code, description, material, layer, created_at
            FROM finish_types
            WHERE id = ANY($1)
            "#,
        )
            .bind(ids)
            .fetch_all(executor)
            .await?;
        Ok(types)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        kind: ElementKind,
        type_code: &str,
        description: &str,
        material: &str,
        layer: FinishLayer,
    ) -> Result<FinishType, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, FinishType>(
            r#"
            INSERT INTO finish_types (element_kind, type_code, description, material, layer)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, element_kind, type_code, description, material, layer, created_at
            "#,
        )
            .bind(kind)
            .bind(type_code)
            .bind(description)
            .bind(material)
            .bind(layer)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::UniqueConstraintViolation(format!(
                            "Tipo de acabamento {} ({})",
                            type_code,
                            kind.as_str()
                        ));
                    }
                }
                e.into()
            })
    }
}
