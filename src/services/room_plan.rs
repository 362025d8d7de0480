// src/services/room_plan.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{catalog::ElementKind, room::PlannedFinish};

/// Resultado da consulta ao plano. "Não planejado" é diferente de área zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanLookup {
    Planned(Decimal),
    NotPlanned,
}

/// Plano de acabamentos de um cômodo, carregado de uma vez para a requisição.
#[derive(Debug, Clone)]
pub struct RoomPlan {
    room_id: Uuid,
    finishes: Vec<PlannedFinish>,
}

impl RoomPlan {
    pub fn new(room_id: Uuid, finishes: Vec<PlannedFinish>) -> Self {
        Self { room_id, finishes }
    }

    pub fn room_id(&self) -> Uuid {
        self.room_id
    }

    /// Nenhum acabamento planejado em nenhum elemento.
    pub fn is_empty(&self) -> bool {
        self.finishes.is_empty()
    }

    pub fn planned_area(&self, kind: ElementKind, finish_type_id: Uuid) -> PlanLookup {
        self.finishes
            .iter()
            .find(|f| f.element_kind == kind && f.finish_type_id == finish_type_id)
            .map_or(PlanLookup::NotPlanned, |f| PlanLookup::Planned(f.area_finish))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::catalog::FinishLayer;

    pub(crate) fn planned(room_id: Uuid, finish_type_id: Uuid, kind: ElementKind, area: Decimal) -> PlannedFinish {
        PlannedFinish {
            id: Uuid::new_v4(),
            room_id,
            finish_type_id,
            element_kind: kind,
            area_finish: area,
            type_code: format!("{}-{}", kind.as_str(), &finish_type_id.to_string()[..4]),
            description: "teste".to_string(),
            material: "Gesso".to_string(),
            layer: FinishLayer::Rough,
        }
    }

    #[test]
    fn zero_area_is_planned_not_missing() {
        let room = Uuid::new_v4();
        let ft = Uuid::new_v4();
        let plan = RoomPlan::new(room, vec![planned(room, ft, ElementKind::Wall, Decimal::ZERO)]);

        assert_eq!(plan.planned_area(ElementKind::Wall, ft), PlanLookup::Planned(Decimal::ZERO));
    }

    #[test]
    fn lookup_is_scoped_by_element_kind() {
        let room = Uuid::new_v4();
        let ft = Uuid::new_v4();
        let plan = RoomPlan::new(room, vec![planned(room, ft, ElementKind::Floor, Decimal::new(20, 0))]);

        assert_eq!(plan.planned_area(ElementKind::Floor, ft), PlanLookup::Planned(Decimal::new(20, 0)));
        assert_eq!(plan.planned_area(ElementKind::Ceiling, ft), PlanLookup::NotPlanned);
        assert_eq!(plan.planned_area(ElementKind::Floor, Uuid::new_v4()), PlanLookup::NotPlanned);
        assert!(!plan.is_empty());
    }
}
