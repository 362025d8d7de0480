// src/services/volume_ledger.rs
//
// Regras de reconciliação do livro de volumes. Nada aqui toca o banco: o
// serviço carrega catálogo, plano e últimos lançamentos dentro da transação,
// passa tudo para o `VolumeLedger` e grava o que ele devolver.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        catalog::ElementKind,
        ledger::{AuthorizationContext, EntryRequest, NewWorkVolume, WorkVolumeEntry},
    },
    services::{
        catalog_service::FinishCatalog,
        room_plan::{PlanLookup, RoomPlan},
    },
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("room {room_id} has no planned finishes")]
    NoPlanExists { room_id: Uuid },

    #[error("finish type {finish_type_id} does not exist")]
    UnknownFinishType { finish_type_id: Uuid },

    #[error("finish type {finish_type_id} is not planned for the room's {}", element_kind.as_str())]
    FinishTypeNotPlanned { finish_type_id: Uuid, element_kind: ElementKind },

    #[error("both volume and completion percentage supplied for finish type {finish_type_id}")]
    ConflictingInputs { finish_type_id: Uuid },

    #[error("first entry for finish type {finish_type_id} needs a volume or a completion percentage")]
    MissingValue { finish_type_id: Uuid },

    #[error("volume {volume} exceeds planned area {planned_area} for finish type {finish_type_id}")]
    VolumeExceedsPlan { finish_type_id: Uuid, volume: Decimal, planned_area: Decimal },

    #[error("completion percentage {completion_percentage} exceeds 100 for finish type {finish_type_id}")]
    PercentageExceeds100 { finish_type_id: Uuid, completion_percentage: Decimal },

    #[error("decrease not permitted for finish type {finish_type_id}")]
    DecreaseNotPermitted {
        finish_type_id: Uuid,
        previous_volume: Decimal,
        previous_percentage: Decimal,
        volume: Decimal,
        completion_percentage: Decimal,
    },
}

fn fmt2(value: Decimal) -> String {
    format!("{:.2}", value)
}

impl LedgerError {
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::NoPlanExists { .. } => "NO_PLAN_EXISTS",
            LedgerError::UnknownFinishType { .. } => "UNKNOWN_FINISH_TYPE",
            LedgerError::FinishTypeNotPlanned { .. } => "FINISH_TYPE_NOT_PLANNED",
            LedgerError::ConflictingInputs { .. } => "CONFLICTING_INPUTS",
            LedgerError::MissingValue { .. } => "MISSING_VALUE",
            LedgerError::VolumeExceedsPlan { .. } => "VOLUME_EXCEEDS_PLAN",
            LedgerError::PercentageExceeds100 { .. } => "PERCENTAGE_EXCEEDS_100",
            LedgerError::DecreaseNotPermitted { .. } => "DECREASE_NOT_PERMITTED",
        }
    }

    pub fn message_key(&self) -> &'static str {
        match self {
            LedgerError::NoPlanExists { .. } => "ledger.no_plan_exists",
            LedgerError::UnknownFinishType { .. } => "ledger.unknown_finish_type",
            LedgerError::FinishTypeNotPlanned { .. } => "ledger.finish_type_not_planned",
            LedgerError::ConflictingInputs { .. } => "ledger.conflicting_inputs",
            LedgerError::MissingValue { .. } => "ledger.missing_value",
            LedgerError::VolumeExceedsPlan { .. } => "ledger.volume_exceeds_plan",
            LedgerError::PercentageExceeds100 { .. } => "ledger.percentage_exceeds_100",
            LedgerError::DecreaseNotPermitted { .. } => "ledger.decrease_not_permitted",
        }
    }

    pub fn message_params(&self) -> Vec<(&'static str, String)> {
        match self {
            LedgerError::NoPlanExists { room_id } => vec![("roomId", room_id.to_string())],
            LedgerError::UnknownFinishType { finish_type_id }
            | LedgerError::ConflictingInputs { finish_type_id }
            | LedgerError::MissingValue { finish_type_id } => {
                vec![("finishTypeId", finish_type_id.to_string())]
            }
            LedgerError::FinishTypeNotPlanned { finish_type_id, element_kind } => vec![
                ("finishTypeId", finish_type_id.to_string()),
                ("elementKind", element_kind.as_str().to_string()),
            ],
            LedgerError::VolumeExceedsPlan { finish_type_id, volume, planned_area } => vec![
                ("finishTypeId", finish_type_id.to_string()),
                ("volume", fmt2(*volume)),
                ("plannedArea", fmt2(*planned_area)),
            ],
            LedgerError::PercentageExceeds100 { finish_type_id, completion_percentage } => vec![
                ("finishTypeId", finish_type_id.to_string()),
                ("completionPercentage", fmt2(*completion_percentage)),
            ],
            LedgerError::DecreaseNotPermitted {
                finish_type_id,
                previous_volume,
                previous_percentage,
                volume,
                completion_percentage,
            } => vec![
                ("finishTypeId", finish_type_id.to_string()),
                ("previousVolume", fmt2(*previous_volume)),
                ("previousPercentage", fmt2(*previous_percentage)),
                ("volume", fmt2(*volume)),
                ("completionPercentage", fmt2(*completion_percentage)),
            ],
        }
    }

    /// Corpo `details` da resposta: código estável + os mesmos parâmetros da mensagem.
    pub fn details(&self) -> Value {
        let mut details = serde_json::Map::new();
        details.insert("code".to_string(), json!(self.code()));
        for (name, value) in self.message_params() {
            details.insert(name.to_string(), json!(value));
        }
        Value::Object(details)
    }
}

/// `round(volume / planned * 100, 2)`; área planejada zero resulta em 0%.
///
/// `None` quando o resultado não cabe num `Decimal`, o que só acontece com
/// volume maior que a área planejada.
pub fn derive_percentage(volume: Decimal, planned_area: Decimal) -> Option<Decimal> {
    if planned_area > Decimal::ZERO {
        volume
            .checked_div(planned_area)?
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|pct| pct.round_dp(2))
    } else {
        Some(Decimal::ZERO)
    }
}

/// `round(planned * percentage / 100, 2)`
///
/// Divide antes de multiplicar: com porcentagem até 100 o produto nunca passa
/// da área planejada, então `None` implica porcentagem acima de 100.
pub fn derive_volume(planned_area: Decimal, completion_percentage: Decimal) -> Option<Decimal> {
    completion_percentage
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|ratio| planned_area.checked_mul(ratio))
        .map(|volume| volume.round_dp(2))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PriorState {
    volume: Decimal,
    completion_percentage: Decimal,
}

/// Estado de reconciliação de um cômodo durante uma requisição.
///
/// Cada lançamento aceito vira o "anterior" do próximo lançamento do mesmo
/// tipo dentro do lote, exatamente como se já estivesse gravado.
pub struct VolumeLedger<'a> {
    catalog: &'a FinishCatalog,
    plan: &'a RoomPlan,
    priors: HashMap<Uuid, PriorState>,
    auth: AuthorizationContext,
}

impl<'a> VolumeLedger<'a> {
    /// `latest` deve conter o lançamento mais recente de cada tipo de acabamento do cômodo.
    pub fn open<'e>(
        catalog: &'a FinishCatalog,
        plan: &'a RoomPlan,
        latest: impl IntoIterator<Item = &'e WorkVolumeEntry>,
        auth: AuthorizationContext,
    ) -> Result<Self, LedgerError> {
        if plan.is_empty() {
            return Err(LedgerError::NoPlanExists { room_id: plan.room_id() });
        }

        let priors = latest
            .into_iter()
            .map(|e| {
                (
                    e.finish_type_id,
                    PriorState { volume: e.volume, completion_percentage: e.completion_percentage },
                )
            })
            .collect();

        Ok(Self { catalog, plan, priors, auth })
    }

    /// Valida o lote inteiro; o primeiro erro descarta tudo.
    pub fn reconcile_batch(
        &mut self,
        kind: ElementKind,
        requests: &[EntryRequest],
    ) -> Result<Vec<NewWorkVolume>, LedgerError> {
        requests.iter().map(|r| self.reconcile(kind, r)).collect()
    }

    pub fn reconcile(
        &mut self,
        kind: ElementKind,
        request: &EntryRequest,
    ) -> Result<NewWorkVolume, LedgerError> {
        let finish_type_id = request.finish_type_id;

        // 1. Existe no catálogo?
        if !self.catalog.exists(finish_type_id) {
            return Err(LedgerError::UnknownFinishType { finish_type_id });
        }

        // 2. Está no plano do cômodo para este elemento?
        let planned_area = match self.plan.planned_area(kind, finish_type_id) {
            PlanLookup::Planned(area) => area,
            PlanLookup::NotPlanned => {
                return Err(LedgerError::FinishTypeNotPlanned { finish_type_id, element_kind: kind });
            }
        };

        // 3. Volume e porcentagem são mutuamente exclusivos
        // 4. Último lançamento deste tipo
        // 5. Deriva o valor que falta
        let prior = self.priors.get(&finish_type_id).copied();
        let (volume, completion_percentage) =
            match (request.volume, request.completion_percentage, prior) {
                (Some(_), Some(_), _) => return Err(LedgerError::ConflictingInputs { finish_type_id }),
                (Some(volume), None, _) => {
                    let pct = derive_percentage(volume, planned_area).ok_or(
                        LedgerError::VolumeExceedsPlan { finish_type_id, volume, planned_area },
                    )?;
                    (volume, pct)
                }
                (None, Some(pct), _) => {
                    let volume = derive_volume(planned_area, pct).ok_or(
                        LedgerError::PercentageExceeds100 { finish_type_id, completion_percentage: pct },
                    )?;
                    (volume, pct)
                }
                (None, None, Some(prior)) => (prior.volume, prior.completion_percentage),
                (None, None, None) => return Err(LedgerError::MissingValue { finish_type_id }),
            };

        // 6. Limites
        if volume > planned_area {
            return Err(LedgerError::VolumeExceedsPlan { finish_type_id, volume, planned_area });
        }
        if completion_percentage > Decimal::ONE_HUNDRED {
            return Err(LedgerError::PercentageExceeds100 { finish_type_id, completion_percentage });
        }

        // 7. Só editores podem diminuir
        if let Some(prior) = prior {
            let decreases = volume < prior.volume
                || completion_percentage < prior.completion_percentage;
            if decreases && !self.auth.is_editor {
                return Err(LedgerError::DecreaseNotPermitted {
                    finish_type_id,
                    previous_volume: prior.volume,
                    previous_percentage: prior.completion_percentage,
                    volume,
                    completion_percentage,
                });
            }
        }

        self.priors.insert(finish_type_id, PriorState { volume, completion_percentage });

        Ok(NewWorkVolume {
            finish_type_id,
            element_kind: kind,
            volume,
            completion_percentage,
            note: request.note.clone(),
            reported_at: request.reported_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{FinishLayer, FinishType};
    use crate::services::room_plan::tests::planned;
    use chrono::Utc;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn finish_type(id: Uuid, kind: ElementKind) -> FinishType {
        FinishType {
            id,
            element_kind: kind,
            type_code: "F1".to_string(),
            description: "Contrapiso".to_string(),
            material: "Argamassa".to_string(),
            layer: FinishLayer::Rough,
            created_at: Utc::now(),
        }
    }

    struct Fixture {
        room: Uuid,
        f1: Uuid,
        catalog: FinishCatalog,
        plan: RoomPlan,
    }

    /// Cômodo com 20 m² de piso planejados para F1.
    fn fixture() -> Fixture {
        let room = Uuid::new_v4();
        let f1 = Uuid::new_v4();
        Fixture {
            room,
            f1,
            catalog: FinishCatalog::new(vec![finish_type(f1, ElementKind::Floor)]),
            plan: RoomPlan::new(room, vec![planned(room, f1, ElementKind::Floor, dec("20"))]),
        }
    }

    fn prior_entry(room: Uuid, finish_type_id: Uuid, volume: &str, pct: &str) -> WorkVolumeEntry {
        WorkVolumeEntry {
            id: 1,
            room_id: room,
            finish_type_id,
            element_kind: ElementKind::Floor,
            volume: dec(volume),
            completion_percentage: dec(pct),
            note: None,
            recorded_at: Utc::now(),
            reported_at: None,
            created_by: None,
            created_by_username: None,
        }
    }

    fn by_volume(finish_type_id: Uuid, volume: &str) -> EntryRequest {
        EntryRequest { finish_type_id, volume: Some(dec(volume)), ..Default::default() }
    }

    fn by_percentage(finish_type_id: Uuid, pct: &str) -> EntryRequest {
        EntryRequest { finish_type_id, completion_percentage: Some(dec(pct)), ..Default::default() }
    }

    #[test]
    fn derivation_rounds_to_two_places() {
        assert_eq!(derive_percentage(dec("1"), dec("3")), Some(dec("33.33")));
        assert_eq!(derive_percentage(dec("2"), dec("3")), Some(dec("66.67")));
        assert_eq!(derive_volume(dec("3"), dec("33.33")), Some(dec("1.00")));
        assert_eq!(derive_volume(dec("12.5"), dec("37")), Some(dec("4.62")));
    }

    #[test]
    fn derivation_round_trips_within_tolerance() {
        let planned_area = dec("17.3");
        for volume in ["0", "0.5", "4.25", "9.99", "17.3"] {
            let volume = dec(volume);
            let pct = derive_percentage(volume, planned_area).unwrap();
            let back = derive_volume(planned_area, pct).unwrap();
            assert!((back - volume).abs() <= dec("0.01"), "{volume} -> {pct} -> {back}");
        }
    }

    #[test]
    fn zero_planned_area_yields_zero_percent() {
        assert_eq!(derive_percentage(dec("0"), Decimal::ZERO), Some(Decimal::ZERO));

        let room = Uuid::new_v4();
        let ft = Uuid::new_v4();
        let catalog = FinishCatalog::new(vec![finish_type(ft, ElementKind::Wall)]);
        let plan = RoomPlan::new(room, vec![planned(room, ft, ElementKind::Wall, Decimal::ZERO)]);
        let mut ledger = VolumeLedger::open(&catalog, &plan, [], AuthorizationContext::reporter()).unwrap();

        let entry = ledger.reconcile(ElementKind::Wall, &by_percentage(ft, "40")).unwrap();
        assert_eq!(entry.volume, Decimal::ZERO);
        assert_eq!(entry.completion_percentage, dec("40"));

        // 0% depois de 40% é uma diminuição
        let err = ledger.reconcile(ElementKind::Wall, &by_volume(ft, "0")).unwrap_err();
        assert!(matches!(err, LedgerError::DecreaseNotPermitted { .. }));
    }

    #[test]
    fn room_without_plan_is_rejected_before_any_entry() {
        let room = Uuid::new_v4();
        let catalog = FinishCatalog::new(vec![]);
        let plan = RoomPlan::new(room, vec![]);

        let err = VolumeLedger::open(&catalog, &plan, [], AuthorizationContext::editor())
            .err()
            .unwrap();
        assert_eq!(err, LedgerError::NoPlanExists { room_id: room });
    }

    #[test]
    fn unknown_finish_type_is_rejected() {
        let fx = fixture();
        let mut ledger = VolumeLedger::open(&fx.catalog, &fx.plan, [], AuthorizationContext::editor()).unwrap();
        let stranger = Uuid::new_v4();

        let err = ledger.reconcile(ElementKind::Floor, &by_volume(stranger, "1")).unwrap_err();
        assert_eq!(err, LedgerError::UnknownFinishType { finish_type_id: stranger });
    }

    #[test]
    fn finish_type_outside_plan_is_rejected() {
        let fx = fixture();
        let other = Uuid::new_v4();
        let catalog = FinishCatalog::new(vec![
            finish_type(fx.f1, ElementKind::Floor),
            finish_type(other, ElementKind::Floor),
        ]);
        let mut ledger = VolumeLedger::open(&catalog, &fx.plan, [], AuthorizationContext::editor()).unwrap();

        let err = ledger.reconcile(ElementKind::Floor, &by_volume(other, "1")).unwrap_err();
        assert_eq!(
            err,
            LedgerError::FinishTypeNotPlanned { finish_type_id: other, element_kind: ElementKind::Floor }
        );

        // Planejado no piso não vale para o teto
        let err = ledger.reconcile(ElementKind::Ceiling, &by_volume(fx.f1, "1")).unwrap_err();
        assert!(matches!(err, LedgerError::FinishTypeNotPlanned { element_kind: ElementKind::Ceiling, .. }));
    }

    #[test]
    fn both_values_always_conflict() {
        let fx = fixture();
        let mut ledger = VolumeLedger::open(&fx.catalog, &fx.plan, [], AuthorizationContext::editor()).unwrap();

        for (volume, pct) in [("10", "50"), ("0", "0"), ("3", "99")] {
            let request = EntryRequest {
                finish_type_id: fx.f1,
                volume: Some(dec(volume)),
                completion_percentage: Some(dec(pct)),
                ..Default::default()
            };
            let err = ledger.reconcile(ElementKind::Floor, &request).unwrap_err();
            assert_eq!(err, LedgerError::ConflictingInputs { finish_type_id: fx.f1 });
        }
    }

    #[test]
    fn empty_first_entry_is_missing_value() {
        let fx = fixture();
        let mut ledger = VolumeLedger::open(&fx.catalog, &fx.plan, [], AuthorizationContext::reporter()).unwrap();
        let request = EntryRequest { finish_type_id: fx.f1, ..Default::default() };

        let err = ledger.reconcile(ElementKind::Floor, &request).unwrap_err();
        assert_eq!(err, LedgerError::MissingValue { finish_type_id: fx.f1 });
    }

    #[test]
    fn empty_later_entry_carries_prior_forward() {
        let fx = fixture();
        let prior = prior_entry(fx.room, fx.f1, "7.25", "36.25");
        let mut ledger =
            VolumeLedger::open(&fx.catalog, &fx.plan, [&prior], AuthorizationContext::reporter()).unwrap();
        let request = EntryRequest {
            finish_type_id: fx.f1,
            note: Some("sem avanço".to_string()),
            ..Default::default()
        };

        let entry = ledger.reconcile(ElementKind::Floor, &request).unwrap();
        assert_eq!(entry.volume, dec("7.25"));
        assert_eq!(entry.completion_percentage, dec("36.25"));
        assert_eq!(entry.note.as_deref(), Some("sem avanço"));
    }

    #[test]
    fn volume_above_plan_fails_for_every_role() {
        let fx = fixture();
        for auth in [AuthorizationContext::editor(), AuthorizationContext::reporter()] {
            let mut ledger = VolumeLedger::open(&fx.catalog, &fx.plan, [], auth).unwrap();
            let err = ledger.reconcile(ElementKind::Floor, &by_volume(fx.f1, "20.01")).unwrap_err();
            assert_eq!(
                err,
                LedgerError::VolumeExceedsPlan {
                    finish_type_id: fx.f1,
                    volume: dec("20.01"),
                    planned_area: dec("20"),
                }
            );
        }
    }

    #[test]
    fn percentage_above_hundred_fails() {
        let room = Uuid::new_v4();
        let ft = Uuid::new_v4();
        let catalog = FinishCatalog::new(vec![finish_type(ft, ElementKind::Ceiling)]);
        let plan = RoomPlan::new(room, vec![planned(room, ft, ElementKind::Ceiling, Decimal::ZERO)]);
        let mut ledger = VolumeLedger::open(&catalog, &plan, [], AuthorizationContext::editor()).unwrap();

        let err = ledger.reconcile(ElementKind::Ceiling, &by_percentage(ft, "120")).unwrap_err();
        assert_eq!(
            err,
            LedgerError::PercentageExceeds100 { finish_type_id: ft, completion_percentage: dec("120") }
        );
    }

    #[test]
    fn huge_percentage_is_rejected_instead_of_overflowing() {
        let huge = dec("10000000000000000000000000000");
        let request = |finish_type_id| EntryRequest {
            finish_type_id,
            completion_percentage: Some(huge),
            ..Default::default()
        };

        // Cabe num Decimal: cai na checagem de área como qualquer porcentagem > 100
        let fx = fixture();
        let mut ledger = VolumeLedger::open(&fx.catalog, &fx.plan, [], AuthorizationContext::editor()).unwrap();
        let err = ledger.reconcile(ElementKind::Floor, &request(fx.f1)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::VolumeExceedsPlan {
                finish_type_id: fx.f1,
                volume: dec("2000000000000000000000000000"),
                planned_area: dec("20"),
            }
        );

        // Não cabe: 1000 * 1e26 estoura
        let room = Uuid::new_v4();
        let ft = Uuid::new_v4();
        let catalog = FinishCatalog::new(vec![finish_type(ft, ElementKind::Floor)]);
        let plan = RoomPlan::new(room, vec![planned(room, ft, ElementKind::Floor, dec("1000"))]);
        let mut ledger = VolumeLedger::open(&catalog, &plan, [], AuthorizationContext::editor()).unwrap();
        let err = ledger.reconcile(ElementKind::Floor, &request(ft)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::PercentageExceeds100 { finish_type_id: ft, completion_percentage: huge }
        );
    }

    #[test]
    fn huge_volume_on_tiny_plan_is_rejected_instead_of_overflowing() {
        let room = Uuid::new_v4();
        let ft = Uuid::new_v4();
        let catalog = FinishCatalog::new(vec![finish_type(ft, ElementKind::Floor)]);
        let plan = RoomPlan::new(room, vec![planned(room, ft, ElementKind::Floor, dec("0.0001"))]);
        let mut ledger = VolumeLedger::open(&catalog, &plan, [], AuthorizationContext::editor()).unwrap();

        let err = ledger
            .reconcile(ElementKind::Floor, &by_volume(ft, "1000000000000000000000000000"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::VolumeExceedsPlan { finish_type_id, .. } if finish_type_id == ft));
    }

    #[test]
    fn full_percentage_of_a_huge_plan_still_derives() {
        let room = Uuid::new_v4();
        let ft = Uuid::new_v4();
        let area = dec("1000000000000000000000000000");
        let catalog = FinishCatalog::new(vec![finish_type(ft, ElementKind::Wall)]);
        let plan = RoomPlan::new(room, vec![planned(room, ft, ElementKind::Wall, area)]);
        let mut ledger = VolumeLedger::open(&catalog, &plan, [], AuthorizationContext::editor()).unwrap();

        let entry = ledger.reconcile(ElementKind::Wall, &by_percentage(ft, "100")).unwrap();
        assert_eq!(entry.volume, area);
    }

    #[test]
    fn reporters_cannot_decrease_but_editors_can() {
        let fx = fixture();
        let prior = prior_entry(fx.room, fx.f1, "10", "50");

        let mut reporter =
            VolumeLedger::open(&fx.catalog, &fx.plan, [&prior], AuthorizationContext::reporter()).unwrap();
        let err = reporter.reconcile(ElementKind::Floor, &by_volume(fx.f1, "9.99")).unwrap_err();
        assert!(matches!(err, LedgerError::DecreaseNotPermitted { .. }));

        let mut editor =
            VolumeLedger::open(&fx.catalog, &fx.plan, [&prior], AuthorizationContext::editor()).unwrap();
        let entry = editor.reconcile(ElementKind::Floor, &by_volume(fx.f1, "9.99")).unwrap();
        assert_eq!(entry.volume, dec("9.99"));
        assert_eq!(entry.completion_percentage, dec("49.95"));
    }

    #[test]
    fn same_values_are_not_a_decrease() {
        let fx = fixture();
        let prior = prior_entry(fx.room, fx.f1, "10", "50");
        let mut ledger =
            VolumeLedger::open(&fx.catalog, &fx.plan, [&prior], AuthorizationContext::reporter()).unwrap();

        assert!(ledger.reconcile(ElementKind::Floor, &by_volume(fx.f1, "10")).is_ok());
        assert!(ledger.reconcile(ElementKind::Floor, &by_percentage(fx.f1, "50")).is_ok());
    }

    #[test]
    fn earlier_entries_in_the_batch_count_as_prior() {
        let fx = fixture();
        let mut ledger = VolumeLedger::open(&fx.catalog, &fx.plan, [], AuthorizationContext::reporter()).unwrap();

        let err = ledger
            .reconcile_batch(
                ElementKind::Floor,
                &[by_volume(fx.f1, "12"), by_volume(fx.f1, "11")],
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::DecreaseNotPermitted { .. }));

        let mut ledger = VolumeLedger::open(&fx.catalog, &fx.plan, [], AuthorizationContext::reporter()).unwrap();
        let entries = ledger
            .reconcile_batch(
                ElementKind::Floor,
                &[by_volume(fx.f1, "12"), EntryRequest { finish_type_id: fx.f1, ..Default::default() }],
            )
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].volume, dec("12"));
        assert_eq!(entries[1].completion_percentage, dec("60"));
    }

    #[test]
    fn scenario_twenty_square_metres_floor() {
        let fx = fixture();
        let mut ledger = VolumeLedger::open(&fx.catalog, &fx.plan, [], AuthorizationContext::reporter()).unwrap();

        let first = ledger.reconcile(ElementKind::Floor, &by_percentage(fx.f1, "50")).unwrap();
        assert_eq!(first.volume, dec("10.0"));
        assert_eq!(first.completion_percentage, dec("50.0"));

        let err = ledger.reconcile(ElementKind::Floor, &by_volume(fx.f1, "8")).unwrap_err();
        assert!(matches!(err, LedgerError::DecreaseNotPermitted { .. }));

        let full = ledger.reconcile(ElementKind::Floor, &by_volume(fx.f1, "20")).unwrap();
        assert_eq!(full.completion_percentage, dec("100.0"));

        let err = ledger.reconcile(ElementKind::Floor, &by_volume(fx.f1, "21")).unwrap_err();
        assert!(matches!(err, LedgerError::VolumeExceedsPlan { .. }));
    }

    #[test]
    fn error_details_carry_context() {
        let ft = Uuid::new_v4();
        let err = LedgerError::VolumeExceedsPlan {
            finish_type_id: ft,
            volume: dec("21"),
            planned_area: dec("20"),
        };
        let details = err.details();
        assert_eq!(details["code"], "VOLUME_EXCEEDS_PLAN");
        assert_eq!(details["finishTypeId"], ft.to_string());
        assert_eq!(details["volume"], "21.00");
        assert_eq!(details["plannedArea"], "20.00");
    }
}
