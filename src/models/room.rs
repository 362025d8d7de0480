// src/models/room.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    catalog::{ElementKind, FinishLayer},
    ledger::WorkVolumeEntry,
};

// --- 1. Cômodo ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,
    pub project_id: Uuid,

    #[schema(example = "B1-03-312")]
    pub code: String,

    #[schema(example = "B1")]
    pub block: String,

    pub floor: Option<i32>,
    pub room_number: Option<String>,

    #[schema(example = "Sala de estar")]
    pub name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Acabamento planejado (linha do plano + dados do catálogo) ---
// A área planejada é o denominador de todo cálculo de porcentagem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlannedFinish {
    pub id: Uuid,
    pub room_id: Uuid,
    pub finish_type_id: Uuid,
    pub element_kind: ElementKind,

    #[schema(example = 20.0)]
    pub area_finish: Decimal,

    pub type_code: String,
    pub description: String,
    pub material: String,
    pub layer: FinishLayer,
}

// --- 3. Visão de leitura do cômodo ---
// Só o registro mais recente de cada tipo de acabamento aparece em `latestVolumes`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetail {
    #[serde(flatten)]
    pub room: Room,
    pub project_name: String,
    pub plan: Vec<PlannedFinish>,
    pub latest_volumes: BTreeMap<Uuid, WorkVolumeEntry>,
}

// --- 4. Cômodo com a identidade do projeto e da organização (relatórios) ---
#[derive(Debug, Clone, FromRow)]
pub struct RoomReportContext {
    #[sqlx(flatten)]
    pub room: Room,
    pub project_name: String,
    pub organization_id: Uuid,
    pub organization_name: String,
}

// --- 5. Payloads de cadastro ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomPayload {
    pub project_id: Uuid,
    #[validate(length(min = 1, max = 50, message = "O código do cômodo é obrigatório."))]
    pub code: String,
    #[validate(length(min = 1, max = 20, message = "O bloco é obrigatório."))]
    pub block: String,
    pub floor: Option<i32>,
    pub room_number: Option<String>,
    #[validate(length(min = 1, max = 200, message = "O nome do cômodo é obrigatório."))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPlannedFinishPayload {
    pub finish_type_id: Uuid,
    pub element_kind: ElementKind,
    #[validate(custom(function = "crate::models::ledger::validate_not_negative"))]
    #[schema(example = 20.0)]
    pub area_finish: Decimal,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct RoomListQuery {
    pub project_id: Option<Uuid>,
}
