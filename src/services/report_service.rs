// src/services/report_service.rs

use chrono::{DateTime, FixedOffset, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LedgerRepository, RoomRepository},
    models::report::{ExportMode, ExportRow},
    services::export,
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const NO_DATE: &str = "N/A";

const CSV_HEADER: [&str; 13] = [
    "Room Name",
    "Room Code",
    "Constructive Element",
    "Layer",
    "Finish Type Code",
    "Material",
    "Date",
    "Work Volume (m²)",
    "Completion (%)",
    "Remaining Volume (m²)",
    "Project",
    "Organization",
    "User",
];
const CSV_DELTA_HEADER: &str = "Volume Delta (m²)";

#[derive(Clone)]
pub struct ReportService {
    room_repo: RoomRepository,
    ledger_repo: LedgerRepository,
    utc_offset: FixedOffset,
}

impl ReportService {
    pub fn new(room_repo: RoomRepository, ledger_repo: LedgerRepository, utc_offset: FixedOffset) -> Self {
        Self { room_repo, ledger_repo, utc_offset }
    }

    /// Linhas do relatório. `room_ids = None` exporta todos os cômodos da organização.
    ///
    /// Deve rodar dentro de uma transação para ler um retrato consistente.
    pub async fn export_rows(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        mode: ExportMode,
        room_ids: Option<&[Uuid]>,
    ) -> Result<Vec<ExportRow>, AppError> {
        let rooms = self
            .room_repo
            .list_report_contexts(&mut *conn, organization_id, room_ids)
            .await?;

        let ids: Vec<Uuid> = rooms.iter().map(|r| r.room.id).collect();
        let plans = self.room_repo.list_plans(&mut *conn, &ids).await?;
        let entries = self.ledger_repo.list_entries(&mut *conn, &ids).await?;

        let rows = export::build_rows(mode, &rooms, &plans, &entries);
        tracing::debug!("Relatório ({:?}): {} cômodo(s), {} linha(s)", mode, rooms.len(), rows.len());
        Ok(rows)
    }

    pub fn render_csv(&self, mode: ExportMode, rows: &[ExportRow]) -> Result<Vec<u8>, AppError> {
        render_csv(mode, rows, self.utc_offset)
    }
}

fn format_date(date: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    match date {
        Some(date) => date.with_timezone(&offset).format("%d.%m.%Y %H:%M").to_string(),
        None => NO_DATE.to_string(),
    }
}

/// CSV separado por ponto e vírgula, UTF-8 com BOM (abre direto no Excel).
pub fn render_csv(mode: ExportMode, rows: &[ExportRow], offset: FixedOffset) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(UTF8_BOM.to_vec());

    let mut header: Vec<&str> = CSV_HEADER.to_vec();
    if mode == ExportMode::Full {
        header.push(CSV_DELTA_HEADER);
    }
    writer
        .write_record(&header)
        .map_err(|e| anyhow::anyhow!("Falha ao escrever o CSV: {}", e))?;

    for row in rows {
        let mut record = vec![
            row.room_name.clone(),
            row.room_code.clone(),
            row.element_kind.label().to_string(),
            row.layer.label().to_string(),
            row.finish_type_code.clone(),
            row.material.clone(),
            format_date(row.effective_date, offset),
            row.volume.to_string(),
            row.completion_percentage.to_string(),
            row.remaining_volume.to_string(),
            row.project_name.clone(),
            row.organization_name.clone(),
            row.reported_by.clone().unwrap_or_default(),
        ];
        if mode == ExportMode::Full {
            record.push(row.volume_delta.map(|d| d.to_string()).unwrap_or_default());
        }
        writer
            .write_record(&record)
            .map_err(|e| anyhow::anyhow!("Falha ao escrever o CSV: {}", e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Falha ao finalizar o CSV: {}", e))?;
    Ok(bytes)
}
