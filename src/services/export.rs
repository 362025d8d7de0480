// src/services/export.rs
//
// Monta as linhas planas do relatório de volumes. Puro: recebe o que o
// serviço de relatórios leu do banco e devolve as linhas já ordenadas.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    models::{
        catalog::ElementKind,
        ledger::WorkVolumeEntry,
        report::{ExportMode, ExportRow},
        room::{PlannedFinish, RoomReportContext},
    },
    services::projection::latest_state,
};

/// Linhas por (cômodo, elemento, tipo de acabamento). Tipos planejados sem
/// lançamento aparecem zerados. Ordenadas pela data efetiva; sem data primeiro.
pub fn build_rows(
    mode: ExportMode,
    rooms: &[RoomReportContext],
    plans: &[PlannedFinish],
    entries: &[WorkVolumeEntry],
) -> Vec<ExportRow> {
    let mut plan_by_room: HashMap<Uuid, Vec<&PlannedFinish>> = HashMap::new();
    for finish in plans {
        plan_by_room.entry(finish.room_id).or_default().push(finish);
    }

    let mut entries_by_finish: HashMap<(Uuid, Uuid), Vec<&WorkVolumeEntry>> = HashMap::new();
    for entry in entries {
        entries_by_finish
            .entry((entry.room_id, entry.finish_type_id))
            .or_default()
            .push(entry);
    }

    let mut rows = Vec::new();

    for room in rooms {
        let Some(plan) = plan_by_room.get(&room.room.id) else {
            continue;
        };

        for kind in ElementKind::ALL {
            for finish in plan.iter().filter(|f| f.element_kind == kind) {
                let history = entries_by_finish
                    .get(&(room.room.id, finish.finish_type_id))
                    .map(Vec::as_slice)
                    .unwrap_or_default();

                match mode {
                    ExportMode::Latest => {
                        let latest = latest_state(history.iter().copied());
                        let row = match latest.get(&finish.finish_type_id) {
                            Some(entry) => entry_row(room, finish, entry, None),
                            None => empty_row(room, finish, None),
                        };
                        rows.push(row);
                    }
                    ExportMode::Full => {
                        if history.is_empty() {
                            rows.push(empty_row(room, finish, Some(Decimal::ZERO)));
                            continue;
                        }

                        let mut ordered = history.to_vec();
                        ordered.sort_by_key(|e| (e.recorded_at, e.id));

                        let mut previous_volume = Decimal::ZERO;
                        for entry in ordered {
                            let delta = entry.volume - previous_volume;
                            previous_volume = entry.volume;
                            rows.push(entry_row(room, finish, entry, Some(delta)));
                        }
                    }
                }
            }
        }
    }

    // `Option` ordena `None` antes de `Some`; a ordenação é estável.
    rows.sort_by_key(|row| row.effective_date);
    rows
}

fn remaining(planned_area: Decimal, volume: Decimal) -> Decimal {
    (planned_area - volume).max(Decimal::ZERO)
}

fn entry_row(
    room: &RoomReportContext,
    finish: &PlannedFinish,
    entry: &WorkVolumeEntry,
    volume_delta: Option<Decimal>,
) -> ExportRow {
    ExportRow {
        effective_date: Some(entry.effective_date()),
        volume: entry.volume,
        completion_percentage: entry.completion_percentage,
        remaining_volume: remaining(finish.area_finish, entry.volume),
        volume_delta,
        note: entry.note.clone(),
        reported_by: entry.created_by_username.clone(),
        ..empty_row(room, finish, None)
    }
}

fn empty_row(room: &RoomReportContext, finish: &PlannedFinish, volume_delta: Option<Decimal>) -> ExportRow {
    ExportRow {
        room_id: room.room.id,
        room_code: room.room.code.clone(),
        room_name: room.room.name.clone(),
        block: room.room.block.clone(),
        floor: room.room.floor,
        room_number: room.room.room_number.clone(),
        element_kind: finish.element_kind,
        layer: finish.layer,
        finish_type_id: finish.finish_type_id,
        finish_type_code: finish.type_code.clone(),
        material: finish.material.clone(),
        effective_date: None,
        volume: Decimal::ZERO,
        completion_percentage: Decimal::ZERO,
        remaining_volume: remaining(finish.area_finish, Decimal::ZERO),
        planned_area: finish.area_finish,
        volume_delta,
        note: None,
        project_id: room.room.project_id,
        project_name: room.project_name.clone(),
        organization_id: room.organization_id,
        organization_name: room.organization_name.clone(),
        reported_by: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::room::Room;
    use crate::services::room_plan::tests::planned;
    use chrono::{Duration, TimeZone, Utc};

    fn context(room_id: Uuid) -> RoomReportContext {
        let now = Utc::now();
        RoomReportContext {
            room: Room {
                id: room_id,
                project_id: Uuid::new_v4(),
                code: "B1-01-101".to_string(),
                block: "B1".to_string(),
                floor: Some(1),
                room_number: Some("101".to_string()),
                name: "Quarto".to_string(),
                created_at: now,
                updated_at: now,
            },
            project_name: "Residencial Aurora".to_string(),
            organization_id: Uuid::new_v4(),
            organization_name: "Construtora Norte".to_string(),
        }
    }

    fn entry(id: i64, room: Uuid, ft: Uuid, minutes: i64, volume: i64) -> WorkVolumeEntry {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        WorkVolumeEntry {
            id,
            room_id: room,
            finish_type_id: ft,
            element_kind: ElementKind::Floor,
            volume: Decimal::new(volume, 0),
            completion_percentage: Decimal::new(volume * 5, 0),
            note: None,
            recorded_at: base + Duration::minutes(minutes),
            reported_at: None,
            created_by: None,
            created_by_username: Some("mestre".to_string()),
        }
    }

    #[test]
    fn full_mode_reports_volume_deltas() {
        let room = Uuid::new_v4();
        let ft = Uuid::new_v4();
        let plans = vec![planned(room, ft, ElementKind::Floor, Decimal::new(20, 0))];
        let entries = vec![entry(1, room, ft, 0, 5), entry(2, room, ft, 10, 8), entry(3, room, ft, 20, 8)];

        let rows = build_rows(ExportMode::Full, &[context(room)], &plans, &entries);

        let deltas: Vec<Option<Decimal>> = rows.iter().map(|r| r.volume_delta).collect();
        assert_eq!(
            deltas,
            vec![Some(Decimal::new(5, 0)), Some(Decimal::new(3, 0)), Some(Decimal::ZERO)]
        );
        assert_eq!(rows[2].remaining_volume, Decimal::new(12, 0));
    }

    #[test]
    fn latest_mode_keeps_only_newest_entry_without_delta() {
        let room = Uuid::new_v4();
        let ft = Uuid::new_v4();
        let plans = vec![planned(room, ft, ElementKind::Floor, Decimal::new(20, 0))];
        let entries = vec![entry(1, room, ft, 0, 5), entry(2, room, ft, 10, 8)];

        let rows = build_rows(ExportMode::Latest, &[context(room)], &plans, &entries);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].volume, Decimal::new(8, 0));
        assert_eq!(rows[0].volume_delta, None);
        assert_eq!(rows[0].reported_by.as_deref(), Some("mestre"));
    }

    #[test]
    fn planned_finish_without_entries_is_zeroed_and_sorted_first() {
        let room = Uuid::new_v4();
        let floor = Uuid::new_v4();
        let wall = Uuid::new_v4();
        let plans = vec![
            planned(room, floor, ElementKind::Floor, Decimal::new(20, 0)),
            planned(room, wall, ElementKind::Wall, Decimal::new(35, 0)),
        ];
        let entries = vec![entry(1, room, floor, 0, 5)];

        let rows = build_rows(ExportMode::Latest, &[context(room)], &plans, &entries);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].finish_type_id, wall);
        assert_eq!(rows[0].effective_date, None);
        assert_eq!(rows[0].volume, Decimal::ZERO);
        assert_eq!(rows[0].remaining_volume, Decimal::new(35, 0));
        assert_eq!(rows[1].finish_type_id, floor);
    }

    #[test]
    fn reported_at_drives_ordering() {
        let room = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let plans = vec![
            planned(room, a, ElementKind::Floor, Decimal::new(20, 0)),
            planned(room, b, ElementKind::Floor, Decimal::new(20, 0)),
        ];
        let first = entry(1, room, a, 0, 5);
        let mut second = entry(2, room, b, 10, 5);
        // Informado como anterior ao primeiro lançamento
        second.reported_at = Some(first.recorded_at - Duration::days(1));

        let rows = build_rows(ExportMode::Latest, &[context(room)], &plans, &[first, second]);

        assert_eq!(rows[0].finish_type_id, b);
        assert_eq!(rows[1].finish_type_id, a);
    }

    #[test]
    fn remaining_volume_never_negative() {
        assert_eq!(remaining(Decimal::new(10, 0), Decimal::new(12, 0)), Decimal::ZERO);
    }
}
