// src/db/ledger_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::ledger::{NewWorkVolume, WorkVolumeEntry},
};

const ENTRY_COLUMNS: &str = r#"
    w.id, w.room_id, w.finish_type_id, w.element_kind, w.volume, w.completion_percentage,
    w.note, w.recorded_at, w.reported_at, w.created_by, u.username AS created_by_username
"#;

// `recorded_at` é lido do relógio no momento do INSERT, já com o cômodo travado
// (NOW() seria o início da transação). Nunca fica antes do último lançamento do
// cômodo; empate é resolvido pelo id.
const INSERT_ENTRY: &str = r#"
    INSERT INTO work_volumes
        (room_id, finish_type_id, element_kind, volume, completion_percentage,
         note, reported_at, created_by, recorded_at)
    SELECT $1, $2, $3, $4, $5, $6, $7, $8,
           GREATEST(clock_timestamp(), MAX(prev.recorded_at))
    FROM (SELECT recorded_at FROM work_volumes WHERE room_id = $1) prev
"#;

// Livro de volumes: só INSERT e SELECT. A tabela tem trigger contra UPDATE/DELETE.
#[derive(Clone, Default)]
pub struct LedgerRepository;

impl LedgerRepository {
    pub fn new() -> Self {
        Self
    }

    /// Último lançamento de cada tipo de acabamento do cômodo.
    pub async fn latest_entries<'e, E>(
        &self,
        executor: E,
        room_id: Uuid,
    ) -> Result<Vec<WorkVolumeEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT DISTINCT ON (w.finish_type_id) {ENTRY_COLUMNS}
             FROM work_volumes w
             LEFT JOIN users u ON u.id = w.created_by
             WHERE w.room_id = $1
             ORDER BY w.finish_type_id, w.recorded_at DESC, w.id DESC"
        );
        let entries = sqlx::query_as::<_, WorkVolumeEntry>(&sql)
            .bind(room_id)
            .fetch_all(executor)
            .await?;
        Ok(entries)
    }

    /// Histórico completo, em ordem cronológica.
    pub async fn list_entries<'e, E>(
        &self,
        executor: E,
        room_ids: &[Uuid],
    ) -> Result<Vec<WorkVolumeEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS}
             FROM work_volumes w
             LEFT JOIN users u ON u.id = w.created_by
             WHERE w.room_id = ANY($1)
             ORDER BY w.recorded_at, w.id"
        );
        let entries = sqlx::query_as::<_, WorkVolumeEntry>(&sql)
            .bind(room_ids)
            .fetch_all(executor)
            .await?;
        Ok(entries)
    }

    pub async fn insert_entry<'e, E>(
        &self,
        executor: E,
        room_id: Uuid,
        entry: &NewWorkVolume,
        created_by: Uuid,
    ) -> Result<WorkVolumeEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "WITH w AS (
                {INSERT_ENTRY}
                RETURNING *
             )
             SELECT {ENTRY_COLUMNS}
             FROM w
             LEFT JOIN users u ON u.id = w.created_by"
        );
        let inserted = sqlx::query_as::<_, WorkVolumeEntry>(&sql)
            .bind(room_id)
            .bind(entry.finish_type_id)
            .bind(entry.element_kind)
            .bind(entry.volume)
            .bind(entry.completion_percentage)
            .bind(entry.note.as_deref())
            .bind(entry.reported_at)
            .bind(created_by)
            .fetch_one(executor)
            .await?;
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_at_is_taken_at_insert_time() {
        assert!(INSERT_ENTRY.contains("clock_timestamp()"));
        assert!(INSERT_ENTRY.contains("recorded_at)"));
        assert!(!INSERT_ENTRY.to_lowercase().contains("now()"));
    }

    #[test]
    fn ledger_table_default_does_not_use_transaction_start() {
        let migration = include_str!("../../migrations/20241202000000_initial.sql");
        let column = migration
            .lines()
            .find(|line| line.trim_start().starts_with("recorded_at"))
            .unwrap();
        assert!(column.contains("clock_timestamp()"), "{column}");
    }
}
