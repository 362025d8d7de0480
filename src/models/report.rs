// src/models/report.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::catalog::{ElementKind, FinishLayer};

// Modo de exportação: só o estado atual ou o histórico completo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    #[default]
    Latest,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

// Uma linha plana do relatório: (cômodo, elemento, tipo de acabamento[, lançamento])
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub room_id: Uuid,
    pub room_code: String,
    pub room_name: String,
    pub block: String,
    pub floor: Option<i32>,
    pub room_number: Option<String>,

    pub element_kind: ElementKind,
    pub layer: FinishLayer,
    pub finish_type_id: Uuid,
    pub finish_type_code: String,
    pub material: String,

    pub effective_date: Option<DateTime<Utc>>,
    pub volume: Decimal,
    pub completion_percentage: Decimal,
    pub remaining_volume: Decimal,
    pub planned_area: Decimal,

    /// Só no modo `full`: volume menos o volume do lançamento anterior do mesmo tipo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_delta: Option<Decimal>,

    pub note: Option<String>,

    pub project_id: Uuid,
    pub project_name: String,
    pub organization_id: Uuid,
    pub organization_name: String,
    pub reported_by: Option<String>,
}

// GET /api/reports/volumes?mode=full&format=csv&roomIds=a,b
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ExportQuery {
    #[serde(default)]
    pub mode: ExportMode,
    #[serde(default)]
    pub format: ExportFormat,
    /// Ids separados por vírgula; ausente ou vazio = todos os cômodos da organização.
    pub room_ids: Option<String>,
}

impl ExportQuery {
    pub fn parse_room_ids(&self) -> Result<Option<Vec<Uuid>>, uuid::Error> {
        let Some(raw) = self.room_ids.as_deref() else {
            return Ok(None);
        };
        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(Uuid::parse_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((!ids.is_empty()).then_some(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_ids_are_comma_separated() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let query = ExportQuery { room_ids: Some(format!("{a}, {b},")), ..Default::default() };

        assert_eq!(query.parse_room_ids().unwrap(), Some(vec![a, b]));
        assert_eq!(ExportQuery::default().parse_room_ids().unwrap(), None);
    }

    #[test]
    fn empty_room_ids_mean_every_room() {
        for raw in ["", " ", ",,"] {
            let query = ExportQuery { room_ids: Some(raw.to_string()), ..Default::default() };
            assert_eq!(query.parse_room_ids().unwrap(), None, "{raw:?}");
        }
    }

    #[test]
    fn malformed_room_id_is_an_error() {
        let query = ExportQuery { room_ids: Some("sala-1".to_string()), ..Default::default() };
        assert!(query.parse_room_ids().is_err());
    }
}
