// src/models/ledger.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::catalog::ElementKind;

// --- 1. Registro do livro de volumes (imutável) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkVolumeEntry {
    pub id: i64,
    pub room_id: Uuid,
    pub finish_type_id: Uuid,
    pub element_kind: ElementKind,

    #[schema(example = 10.0)]
    pub volume: Decimal,

    #[schema(example = 50.0)]
    pub completion_percentage: Decimal,

    pub note: Option<String>,

    /// Carimbo do servidor, definido na inserção.
    pub recorded_at: DateTime<Utc>,

    /// Data efetiva informada por quem lançou (opcional).
    pub reported_at: Option<DateTime<Utc>>,

    pub created_by: Option<Uuid>,
    pub created_by_username: Option<String>,
}

impl WorkVolumeEntry {
    /// Data usada nos relatórios: a informada pelo cliente ou, na falta dela, a do servidor.
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.reported_at.unwrap_or(self.recorded_at)
    }
}

pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// --- 2. Pedido de lançamento ---
// Exatamente um entre `volume` e `completionPercentage` expressa a intenção;
// o outro é sempre derivado no servidor.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    pub finish_type_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = 8.5)]
    pub volume: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = 50.0)]
    pub completion_percentage: Option<Decimal>,

    pub note: Option<String>,
    pub reported_at: Option<DateTime<Utc>>,
}

// Lote de um único elemento: POST /rooms/{id}/volumes/{elementKind}
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryBatch {
    #[validate(nested)]
    pub entries: Vec<EntryRequest>,
}

// Lote com os três elementos; processado em uma transação, na ordem piso, parede, teto.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultiKindEntryBatch {
    #[serde(default)]
    #[validate(nested)]
    pub floor: Vec<EntryRequest>,
    #[serde(default)]
    #[validate(nested)]
    pub wall: Vec<EntryRequest>,
    #[serde(default)]
    #[validate(nested)]
    pub ceiling: Vec<EntryRequest>,
}

impl MultiKindEntryBatch {
    pub fn by_kind(&self) -> [(ElementKind, &[EntryRequest]); 3] {
        [
            (ElementKind::Floor, self.floor.as_slice()),
            (ElementKind::Wall, self.wall.as_slice()),
            (ElementKind::Ceiling, self.ceiling.as_slice()),
        ]
    }
}

// --- 3. Lançamento já reconciliado, pronto para gravar ---
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkVolume {
    pub finish_type_id: Uuid,
    pub element_kind: ElementKind,
    pub volume: Decimal,
    pub completion_percentage: Decimal,
    pub note: Option<String>,
    pub reported_at: Option<DateTime<Utc>>,
}

// --- 4. Contexto de autorização ---
// Passado explicitamente ao livro; editores (cargo "Editor" ou superusuário)
// podem diminuir valores já lançados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthorizationContext {
    pub is_editor: bool,
}

impl AuthorizationContext {
    pub const EDITOR_ROLE: &'static str = "Editor";

    pub fn editor() -> Self {
        Self { is_editor: true }
    }

    pub fn reporter() -> Self {
        Self { is_editor: false }
    }
}
