// src/services/catalog_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{CreateFinishTypePayload, ElementKind, FinishType},
};

/// Fatia do catálogo carregada para uma requisição.
#[derive(Debug, Clone, Default)]
pub struct FinishCatalog {
    types: HashMap<Uuid, FinishType>,
}

impl FinishCatalog {
    pub fn new(types: Vec<FinishType>) -> Self {
        Self { types: types.into_iter().map(|t| (t.id, t)).collect() }
    }

    pub fn exists(&self, finish_type_id: Uuid) -> bool {
        self.types.contains_key(&finish_type_id)
    }

    pub fn get(&self, finish_type_id: Uuid) -> Option<&FinishType> {
        self.types.get(&finish_type_id)
    }
}

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository, pool: PgPool) -> Self {
        Self { catalog_repo, pool }
    }

    pub async fn list(&self, kind: Option<ElementKind>) -> Result<Vec<FinishType>, AppError> {
        self.catalog_repo.list(&self.pool, kind).await
    }

    pub async fn get(&self, finish_type_id: Uuid) -> Result<FinishType, AppError> {
        self.catalog_repo
            .find_by_id(&self.pool, finish_type_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Tipo de acabamento {}", finish_type_id)))
    }

    /// Só superusuários mantêm o catálogo (ele é global, não pertence a uma organização).
    pub async fn create(
        &self,
        is_superuser: bool,
        payload: &CreateFinishTypePayload,
    ) -> Result<FinishType, AppError> {
        if !is_superuser {
            return Err(AppError::Forbidden("superuser".to_string()));
        }

        let finish_type = self
            .catalog_repo
            .create(
                &self.pool,
                payload.element_kind,
                payload.type_code.trim(),
                payload.description.trim(),
                payload.material.trim(),
                payload.layer,
            )
            .await?;

        tracing::info!(
            "Tipo de acabamento {} ({}) criado",
            finish_type.type_code,
            finish_type.element_kind.as_str()
        );
        Ok(finish_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::FinishLayer;
    use chrono::Utc;

    #[test]
    fn catalog_lookup_by_id() {
        let id = Uuid::new_v4();
        let catalog = FinishCatalog::new(vec![FinishType {
            id,
            element_kind: ElementKind::Ceiling,
            type_code: "C-02".to_string(),
            description: "Forro de gesso".to_string(),
            material: "Gesso".to_string(),
            layer: FinishLayer::Clean,
            created_at: Utc::now(),
        }]);

        assert!(catalog.exists(id));
        assert!(!catalog.exists(Uuid::new_v4()));
        assert_eq!(catalog.get(id).map(|t| t.type_code.as_str()), Some("C-02"));
    }
}
