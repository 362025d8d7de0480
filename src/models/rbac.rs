// src/models/rbac.rs

use serde::Serialize;
use uuid::Uuid;
use sqlx::FromRow;
use utoipa::ToSchema;

// O que sai do banco (Tabela Permissions)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440001")]
    pub id: Uuid,

    #[schema(example = "volumes:write")]
    pub slug: String,

    #[schema(example = "Lançar volumes de obra")]
    pub description: String,

    #[schema(example = "VOLUMES")]
    pub module: String,
}
