// src/models/organization.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Organization (o "Tenant")
// ---
// Fronteira de isolamento: todo projeto, cômodo e volume pertence a uma.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. Organização vista pelo usuário (com o cargo que ele ocupa)
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserOrganization {
    pub id: Uuid,
    pub name: String,
    pub role_name: Option<String>,
}

// ---
// 3. Project (a "Obra")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub organization_id: Uuid,

    #[schema(example = "Residencial Aurora")]
    pub name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProjectPayload {
    #[validate(length(min = 1, max = 200, message = "O nome do projeto deve ter entre 1 e 200 caracteres."))]
    #[schema(example = "Residencial Aurora")]
    pub name: String,
}
