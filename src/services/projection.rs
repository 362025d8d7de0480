// src/services/projection.rs

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::models::ledger::WorkVolumeEntry;

/// Estado atual de um cômodo: o lançamento mais recente de cada tipo de acabamento.
///
/// "Mais recente" é o maior `recorded_at`; empate fica com o maior id.
/// Recalculado a cada leitura, nunca guardado.
pub fn latest_state<'a>(
    entries: impl IntoIterator<Item = &'a WorkVolumeEntry>,
) -> BTreeMap<Uuid, WorkVolumeEntry> {
    let mut latest: BTreeMap<Uuid, &WorkVolumeEntry> = BTreeMap::new();

    for entry in entries {
        latest
            .entry(entry.finish_type_id)
            .and_modify(|current| {
                if (entry.recorded_at, entry.id) > (current.recorded_at, current.id) {
                    *current = entry;
                }
            })
            .or_insert(entry);
    }

    latest.into_iter().map(|(id, entry)| (id, entry.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::ElementKind;
    use chrono::{DateTime, Duration, Utc};
    use rust_decimal::Decimal;

    fn entry(id: i64, finish_type_id: Uuid, recorded_at: DateTime<Utc>, volume: i64) -> WorkVolumeEntry {
        WorkVolumeEntry {
            id,
            room_id: Uuid::nil(),
            finish_type_id,
            element_kind: ElementKind::Wall,
            volume: Decimal::new(volume, 0),
            completion_percentage: Decimal::ZERO,
            note: None,
            recorded_at,
            reported_at: None,
            created_by: None,
            created_by_username: None,
        }
    }

    #[test]
    fn one_entry_per_finish_type() {
        let now = Utc::now();
        let types: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let entries: Vec<WorkVolumeEntry> = types
            .iter()
            .enumerate()
            .flat_map(|(i, ft)| {
                (0..3).map(move |n| entry((i * 3 + n) as i64, *ft, now + Duration::minutes(n as i64), n as i64))
            })
            .collect();

        let state = latest_state(&entries);

        assert_eq!(state.len(), types.len());
        for ft in &types {
            assert_eq!(state[ft].volume, Decimal::new(2, 0));
        }
    }

    #[test]
    fn later_recorded_at_wins_over_higher_id() {
        let now = Utc::now();
        let ft = Uuid::new_v4();
        let entries = vec![entry(9, ft, now, 1), entry(3, ft, now + Duration::seconds(1), 2)];

        assert_eq!(latest_state(&entries)[&ft].id, 3);
    }

    #[test]
    fn same_timestamp_tie_goes_to_highest_id() {
        let now = Utc::now();
        let ft = Uuid::new_v4();
        let entries = vec![entry(7, ft, now, 7), entry(8, ft, now, 8), entry(6, ft, now, 6)];

        assert_eq!(latest_state(&entries)[&ft].id, 8);
    }

    #[test]
    fn empty_history_projects_nothing() {
        assert!(latest_state(&[]).is_empty());
    }
}
