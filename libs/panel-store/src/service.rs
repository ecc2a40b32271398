//! Panel Service - transactional breaker operations
//!
//! Each operation reads the panel's breakers, runs the pure position
//! model and writes the outcome inside one SQLite transaction, so two
//! concurrent writers cannot both see a slot as free.

use panel_model::{
    check_conflict, classify, default_poles, split_combined_tandem, validate_breaker_fields,
    warn_on_pole_mismatch, Breaker, BreakerId, BreakerUpdate, ConflictResult, ModelError,
    PanelId, PositionKind,
};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::repository;
use crate::types::{
    BreakerWrite, Device, MigrationReport, NewBreakerRequest, Panel, SkippedSplit,
};

/// Breaker operations over a SQLite pool
#[derive(Clone)]
pub struct PanelService {
    pool: SqlitePool,
}

impl PanelService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ------------------------------------------------------------------------
    // Panels and reads
    // ------------------------------------------------------------------------

    pub async fn create_panel(&self, name: &str) -> Result<Panel> {
        if name.trim().is_empty() {
            return Err(ModelError::validation("Panel name cannot be empty").into());
        }
        let mut conn = self.pool.acquire().await?;
        let panel = repository::create_panel(&mut *conn, name.trim()).await?;
        info!("Created panel {} ({})", panel.name, panel.id);
        Ok(panel)
    }

    pub async fn list_panels(&self) -> Result<Vec<Panel>> {
        let mut conn = self.pool.acquire().await?;
        repository::list_panels(&mut *conn).await
    }

    /// Breakers on a panel; fails with `NotFound` for an unknown panel
    pub async fn list_breakers(&self, panel_id: PanelId) -> Result<Vec<Breaker>> {
        let mut conn = self.pool.acquire().await?;
        repository::get_panel(&mut *conn, panel_id).await?;
        repository::fetch_breakers_for_panel(&mut *conn, panel_id).await
    }

    pub async fn get_breaker(&self, id: BreakerId) -> Result<Breaker> {
        let mut conn = self.pool.acquire().await?;
        repository::fetch_breaker(&mut *conn, id).await
    }

    /// Preview a position without writing anything
    pub async fn check_position(
        &self,
        panel_id: PanelId,
        position: &str,
        exclude: Option<BreakerId>,
    ) -> Result<ConflictResult> {
        let mut conn = self.pool.acquire().await?;
        repository::get_panel(&mut *conn, panel_id).await?;
        let breakers = repository::fetch_breakers_for_panel(&mut *conn, panel_id).await?;
        Ok(check_conflict(&breakers, position, exclude))
    }

    // ------------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------------

    /// Create a breaker after format, field and conflict checks
    ///
    /// A combined tandem token is split in the same transaction and both
    /// halves are returned.
    pub async fn create_breaker(
        &self,
        panel_id: PanelId,
        req: NewBreakerRequest,
    ) -> Result<BreakerWrite> {
        let info = classify(&req.position).require_valid()?;
        let poles = req.poles.unwrap_or_else(|| default_poles(&info));
        validate_breaker_fields(req.amperage, poles, &req.label)?;
        warn_on_pole_mismatch(poles, &info);

        let mut tx = self.pool.begin().await?;

        repository::get_panel(&mut *tx, panel_id).await?;
        let existing = repository::fetch_breakers_for_panel(&mut *tx, panel_id).await?;
        check_conflict(&existing, &info.normalized, None).into_result(&info.normalized)?;

        let new = req.into_new_breaker(panel_id, &info, poles);
        let created = repository::insert_breaker(&mut *tx, &new).await?;

        let write = if matches!(info.kind, PositionKind::CombinedTandem { .. }) {
            split_in_tx(&mut *tx, &created).await?
        } else {
            BreakerWrite::single(created)
        };

        tx.commit().await?;

        info!(
            "Created breaker {} at {} on panel {}",
            write.breaker.id, write.breaker.position, panel_id
        );
        Ok(write)
    }

    /// Update a breaker; a position change is re-validated against the
    /// panel with the breaker itself excluded
    pub async fn update_breaker(
        &self,
        id: BreakerId,
        update: BreakerUpdate,
    ) -> Result<BreakerWrite> {
        let mut tx = self.pool.begin().await?;

        let current = repository::fetch_breaker(&mut *tx, id).await?;
        if update.is_empty() {
            return Ok(BreakerWrite::single(current));
        }

        let mut updated = update.apply_to(&current);
        let position_changed = updated.position != current.position;
        let info = classify(&updated.position);

        if position_changed {
            let info = info.clone().require_valid()?;
            updated.position = info.normalized.clone();
            let existing =
                repository::fetch_breakers_for_panel(&mut *tx, current.panel_id).await?;
            check_conflict(&existing, &updated.position, Some(id))
                .into_result(&updated.position)?;
        }

        validate_breaker_fields(updated.amperage, updated.poles, &updated.label)?;
        warn_on_pole_mismatch(updated.poles, &info);

        let saved = repository::save_breaker(&mut *tx, &updated).await?;

        let is_combined = matches!(info.kind, PositionKind::CombinedTandem { .. });
        let write = if position_changed && is_combined {
            split_in_tx(&mut *tx, &saved).await?
        } else {
            BreakerWrite::single(saved)
        };

        tx.commit().await?;

        if position_changed {
            info!(
                "Moved breaker {} from {} to {}",
                id, current.position, write.breaker.position
            );
        } else {
            debug!("Updated breaker {}", id);
        }
        Ok(write)
    }

    /// Delete a breaker and release its position
    pub async fn delete_breaker(&self, id: BreakerId) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        repository::delete_breaker(&mut *conn, id).await?;
        info!("Deleted breaker {}", id);
        Ok(())
    }

    /// Split a combined tandem breaker into two halves atomically
    pub async fn split_breaker(&self, id: BreakerId) -> Result<BreakerWrite> {
        let mut tx = self.pool.begin().await?;
        let breaker = repository::fetch_breaker(&mut *tx, id).await?;
        let write = split_in_tx(&mut *tx, &breaker).await?;
        tx.commit().await?;
        Ok(write)
    }

    /// Split every combined tandem on a panel
    ///
    /// Each breaker is split in its own transaction. Breakers whose halves
    /// are already occupied are skipped and reported; earlier splits stay
    /// committed if a later one fails.
    pub async fn migrate_panel(&self, panel_id: PanelId) -> Result<MigrationReport> {
        let candidates: Vec<BreakerId> = {
            let mut conn = self.pool.acquire().await?;
            repository::get_panel(&mut *conn, panel_id).await?;
            let breakers = repository::fetch_breakers_for_panel(&mut *conn, panel_id).await?;
            panel_model::combined_tandem_breakers(&breakers)
                .map(|b| b.id)
                .collect()
        };

        let mut report = MigrationReport {
            panel_id,
            ..Default::default()
        };

        for id in candidates {
            let mut tx = self.pool.begin().await?;
            let breaker = repository::fetch_breaker(&mut *tx, id).await?;

            match split_in_tx(&mut *tx, &breaker).await {
                Ok(_) => {
                    tx.commit().await?;
                    report.migrated += 1;
                },
                Err(StoreError::Model(
                    err @ (ModelError::PositionOccupied { .. } | ModelError::NotCombinedTandem(_)),
                )) => {
                    warn!(
                        "Skipping combined tandem {} (breaker {}): {}",
                        breaker.position, breaker.id, err
                    );
                    tx.rollback().await?;
                    report.skipped.push(SkippedSplit {
                        breaker_id: breaker.id,
                        position: breaker.position.clone(),
                        reason: err.to_string(),
                    });
                },
                Err(e) => return Err(e),
            }
        }

        info!(
            "Panel {} migration: {} split, {} skipped",
            panel_id,
            report.migrated,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Ingest breakers as given, e.g. from an export file
    ///
    /// Positions are normalized and must classify as valid, combined
    /// tandems included. Overlap rules are not applied; literal duplicates
    /// still fail the whole import. Run [`Self::migrate_panel`] afterwards
    /// to split combined tandems.
    pub async fn import_breakers(
        &self,
        panel_id: PanelId,
        requests: Vec<NewBreakerRequest>,
    ) -> Result<Vec<Breaker>> {
        let mut tx = self.pool.begin().await?;
        repository::get_panel(&mut *tx, panel_id).await?;

        let mut imported = Vec::with_capacity(requests.len());
        for req in requests {
            let info = classify(&req.position).require_valid()?;
            let poles = req.poles.unwrap_or_else(|| default_poles(&info));
            validate_breaker_fields(req.amperage, poles, &req.label)?;
            let new = req.into_new_breaker(panel_id, &info, poles);
            imported.push(repository::insert_breaker(&mut *tx, &new).await?);
        }

        tx.commit().await?;
        info!("Imported {} breakers into panel {}", imported.len(), panel_id);
        Ok(imported)
    }

    // ------------------------------------------------------------------------
    // Devices
    // ------------------------------------------------------------------------

    pub async fn create_device(
        &self,
        panel_id: PanelId,
        name: &str,
        room: Option<&str>,
    ) -> Result<Device> {
        let mut conn = self.pool.acquire().await?;
        repository::get_panel(&mut *conn, panel_id).await?;
        repository::create_device(&mut *conn, panel_id, name, room).await
    }

    /// Wire a device to a breaker on the same panel
    pub async fn assign_device(&self, device_id: i64, breaker_id: BreakerId) -> Result<Device> {
        let mut tx = self.pool.begin().await?;
        let device = repository::get_device(&mut *tx, device_id).await?;
        let breaker = repository::fetch_breaker(&mut *tx, breaker_id).await?;
        if device.panel_id != breaker.panel_id {
            return Err(ModelError::validation(format!(
                "Device {} is on panel {}, breaker {} is on panel {}",
                device.id, device.panel_id, breaker.id, breaker.panel_id
            ))
            .into());
        }
        repository::assign_device(&mut *tx, device_id, Some(breaker_id)).await?;
        let device = repository::get_device(&mut *tx, device_id).await?;
        tx.commit().await?;
        Ok(device)
    }

    pub async fn devices_for_breaker(&self, breaker_id: BreakerId) -> Result<Vec<Device>> {
        let mut conn = self.pool.acquire().await?;
        repository::devices_for_breaker(&mut *conn, breaker_id).await
    }
}

/// Split `breaker` using the caller's transaction
///
/// Devices keep pointing at `breaker.id`, which becomes the first half.
async fn split_in_tx(conn: &mut SqliteConnection, breaker: &Breaker) -> Result<BreakerWrite> {
    let panel_breakers = repository::fetch_breakers_for_panel(conn, breaker.panel_id).await?;
    let split = split_combined_tandem(breaker, &panel_breakers)?;

    let first = repository::apply_patch(conn, &split.breaker_a).await?;
    let second = repository::insert_breaker(conn, &split.breaker_b).await?;

    info!(
        "Split breaker {} ({}) into {} and {} (new breaker {})",
        breaker.id, breaker.position, first.position, second.position, second.id
    );

    Ok(BreakerWrite {
        breaker: first,
        sibling: Some(second),
    })
}
