// src/services/ledger_service.rs

use std::collections::BTreeMap;

use sqlx::{Acquire, PgConnection};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, LedgerRepository, RoomRepository},
    models::{
        catalog::ElementKind,
        ledger::{AuthorizationContext, EntryRequest, WorkVolumeEntry},
        room::Room,
    },
    services::{
        catalog_service::FinishCatalog,
        projection,
        room_plan::RoomPlan,
        volume_ledger::VolumeLedger,
    },
};

#[derive(Clone, Default)]
pub struct LedgerService {
    room_repo: RoomRepository,
    catalog_repo: CatalogRepository,
    ledger_repo: LedgerRepository,
}

impl LedgerService {
    pub fn new(
        room_repo: RoomRepository,
        catalog_repo: CatalogRepository,
        ledger_repo: LedgerRepository,
    ) -> Self {
        Self { room_repo, catalog_repo, ledger_repo }
    }

    /// Lança volumes de um único elemento (piso, parede ou teto).
    pub async fn append_entries(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        room_id: Uuid,
        kind: ElementKind,
        auth: AuthorizationContext,
        acting_user: Uuid,
        entries: &[EntryRequest],
    ) -> Result<Vec<WorkVolumeEntry>, AppError> {
        self.append_batches(conn, organization_id, room_id, auth, acting_user, &[(kind, entries)])
            .await
    }

    /// Lança vários elementos numa só transação. Um erro em qualquer lançamento
    /// descarta o pedido inteiro.
    pub async fn append_batches(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        room_id: Uuid,
        auth: AuthorizationContext,
        acting_user: Uuid,
        batches: &[(ElementKind, &[EntryRequest])],
    ) -> Result<Vec<WorkVolumeEntry>, AppError> {
        let mut tx = conn.begin().await?;

        // 1. Trava o cômodo: lançamentos concorrentes esperam aqui
        self.room_repo
            .lock_in_organization(&mut *tx, organization_id, room_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Cômodo {}", room_id)))?;

        // 2. Plano, catálogo e último estado, lidos já com o cômodo travado
        let plan = RoomPlan::new(room_id, self.room_repo.list_plan(&mut *tx, room_id).await?);

        let mut finish_type_ids: Vec<Uuid> = batches
            .iter()
            .flat_map(|(_, entries)| entries.iter().map(|e| e.finish_type_id))
            .collect();
        finish_type_ids.sort_unstable();
        finish_type_ids.dedup();
        let catalog = FinishCatalog::new(self.catalog_repo.find_many(&mut *tx, &finish_type_ids).await?);

        let latest = self.ledger_repo.latest_entries(&mut *tx, room_id).await?;

        // 3. Reconciliação (pura)
        let mut ledger = VolumeLedger::open(&catalog, &plan, &latest, auth)?;
        let mut accepted = Vec::new();
        for (kind, entries) in batches {
            match ledger.reconcile_batch(*kind, entries) {
                Ok(batch) => accepted.extend(batch),
                Err(err) => {
                    tracing::warn!(
                        "Lançamento rejeitado no cômodo {} ({}): {}",
                        room_id,
                        kind.as_str(),
                        err
                    );
                    return Err(err.into());
                }
            }
        }

        // 4. Grava
        let mut inserted = Vec::with_capacity(accepted.len());
        for entry in &accepted {
            inserted.push(
                self.ledger_repo
                    .insert_entry(&mut *tx, room_id, entry, acting_user)
                    .await?,
            );
        }

        tx.commit().await?;

        tracing::info!(
            "📐 {} lançamento(s) gravado(s) no cômodo {} por {}",
            inserted.len(),
            room_id,
            acting_user
        );
        Ok(inserted)
    }

    /// Todos os lançamentos do cômodo, em ordem cronológica.
    pub async fn history(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        room_id: Uuid,
    ) -> Result<Vec<WorkVolumeEntry>, AppError> {
        self.require_room(&mut *conn, organization_id, room_id).await?;
        self.ledger_repo.list_entries(&mut *conn, &[room_id]).await
    }

    /// Último lançamento de cada tipo de acabamento, recalculado a partir do histórico.
    pub async fn latest_state(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        room_id: Uuid,
    ) -> Result<BTreeMap<Uuid, WorkVolumeEntry>, AppError> {
        let history = self.history(conn, organization_id, room_id).await?;
        Ok(projection::latest_state(&history))
    }

    async fn require_room(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        room_id: Uuid,
    ) -> Result<Room, AppError> {
        self.room_repo
            .find_in_organization(&mut *conn, organization_id, room_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Cômodo {}", room_id)))
    }
}
