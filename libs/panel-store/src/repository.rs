//! Breaker Repository - SQLite persistence for panels, breakers and devices
//!
//! Every function takes a `&mut SqliteConnection`, so the same calls run
//! against a pooled connection or inside a caller's transaction
//! (`&mut *tx`).

use panel_model::{Breaker, BreakerId, BreakerPatch, ModelError, NewBreaker, PanelId};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use crate::error::{Result, StoreError};
use crate::types::{Device, Panel};

const BREAKER_COLUMNS: &str = "id, panel_id, position, amperage, poles, label, circuit_type, \
                               protection_type, is_on, notes, sort_order";

// ============================================================================
// Panels
// ============================================================================

pub async fn create_panel(conn: &mut SqliteConnection, name: &str) -> Result<Panel> {
    let result = sqlx::query("INSERT INTO panels (name) VALUES (?)")
        .bind(name)
        .execute(&mut *conn)
        .await?;

    Ok(Panel {
        id: result.last_insert_rowid(),
        name: name.to_string(),
    })
}

pub async fn get_panel(conn: &mut SqliteConnection, id: PanelId) -> Result<Panel> {
    let row = sqlx::query("SELECT id, name FROM panels WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => Ok(Panel {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        }),
        None => Err(StoreError::not_found("Panel", id)),
    }
}

pub async fn list_panels(conn: &mut SqliteConnection) -> Result<Vec<Panel>> {
    let rows = sqlx::query("SELECT id, name FROM panels ORDER BY id ASC")
        .fetch_all(&mut *conn)
        .await?;

    let mut panels = Vec::with_capacity(rows.len());
    for row in rows {
        panels.push(Panel {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        });
    }
    Ok(panels)
}

// ============================================================================
// Breakers
// ============================================================================

/// All breakers on a panel, in display order
pub async fn fetch_breakers_for_panel(
    conn: &mut SqliteConnection,
    panel_id: PanelId,
) -> Result<Vec<Breaker>> {
    let sql = format!(
        "SELECT {} FROM breakers WHERE panel_id = ? ORDER BY sort_order ASC, id ASC",
        BREAKER_COLUMNS
    );
    let rows = sqlx::query(&sql)
        .bind(panel_id)
        .fetch_all(&mut *conn)
        .await?;

    let mut breakers = Vec::with_capacity(rows.len());
    for row in rows {
        breakers.push(hydrate_breaker(row)?);
    }
    Ok(breakers)
}

pub async fn fetch_breaker(conn: &mut SqliteConnection, id: BreakerId) -> Result<Breaker> {
    let sql = format!("SELECT {} FROM breakers WHERE id = ?", BREAKER_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => hydrate_breaker(row),
        None => Err(StoreError::not_found("Breaker", id)),
    }
}

/// Insert a breaker as given; no position rules beyond the unique index
pub async fn insert_breaker(conn: &mut SqliteConnection, new: &NewBreaker) -> Result<Breaker> {
    let result = sqlx::query(
        r#"
        INSERT INTO breakers (panel_id, position, amperage, poles, label, circuit_type,
                              protection_type, is_on, notes, sort_order)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new.panel_id)
    .bind(&new.position)
    .bind(i64::from(new.amperage))
    .bind(i64::from(new.poles))
    .bind(&new.label)
    .bind(&new.circuit_type)
    .bind(&new.protection_type)
    .bind(new.is_on)
    .bind(&new.notes)
    .bind(new.sort_order)
    .execute(&mut *conn)
    .await
    .map_err(|e| position_conflict(e, &new.position))?;

    fetch_breaker(conn, result.last_insert_rowid()).await
}

/// Rewrite position and label (tandem split, first half)
pub async fn apply_patch(conn: &mut SqliteConnection, patch: &BreakerPatch) -> Result<Breaker> {
    let result = sqlx::query(
        r#"
        UPDATE breakers
        SET position = ?, label = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&patch.position)
    .bind(&patch.label)
    .bind(patch.id)
    .execute(&mut *conn)
    .await
    .map_err(|e| position_conflict(e, &patch.position))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::not_found("Breaker", patch.id));
    }

    fetch_breaker(conn, patch.id).await
}

/// Overwrite every mutable column of an existing breaker
pub async fn save_breaker(conn: &mut SqliteConnection, breaker: &Breaker) -> Result<Breaker> {
    let result = sqlx::query(
        r#"
        UPDATE breakers
        SET position = ?, amperage = ?, poles = ?, label = ?, circuit_type = ?,
            protection_type = ?, is_on = ?, notes = ?, sort_order = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&breaker.position)
    .bind(i64::from(breaker.amperage))
    .bind(i64::from(breaker.poles))
    .bind(&breaker.label)
    .bind(&breaker.circuit_type)
    .bind(&breaker.protection_type)
    .bind(breaker.is_on)
    .bind(&breaker.notes)
    .bind(breaker.sort_order)
    .bind(breaker.id)
    .execute(&mut *conn)
    .await
    .map_err(|e| position_conflict(e, &breaker.position))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::not_found("Breaker", breaker.id));
    }

    fetch_breaker(conn, breaker.id).await
}

/// Delete a breaker; devices on it become unassigned
pub async fn delete_breaker(conn: &mut SqliteConnection, id: BreakerId) -> Result<()> {
    let result = sqlx::query("DELETE FROM breakers WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::not_found("Breaker", id));
    }

    Ok(())
}

// ============================================================================
// Devices
// ============================================================================

pub async fn create_device(
    conn: &mut SqliteConnection,
    panel_id: PanelId,
    name: &str,
    room: Option<&str>,
) -> Result<Device> {
    let result = sqlx::query("INSERT INTO devices (panel_id, name, room) VALUES (?, ?, ?)")
        .bind(panel_id)
        .bind(name)
        .bind(room)
        .execute(&mut *conn)
        .await?;

    Ok(Device {
        id: result.last_insert_rowid(),
        panel_id,
        name: name.to_string(),
        room: room.map(str::to_string),
        breaker_id: None,
    })
}

/// Point a device at a breaker (or clear it with `None`)
pub async fn assign_device(
    conn: &mut SqliteConnection,
    device_id: i64,
    breaker_id: Option<BreakerId>,
) -> Result<()> {
    let result = sqlx::query("UPDATE devices SET breaker_id = ? WHERE id = ?")
        .bind(breaker_id)
        .bind(device_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::not_found("Device", device_id));
    }

    Ok(())
}

pub async fn get_device(conn: &mut SqliteConnection, id: i64) -> Result<Device> {
    let row = sqlx::query("SELECT id, panel_id, name, room, breaker_id FROM devices WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => hydrate_device(row),
        None => Err(StoreError::not_found("Device", id)),
    }
}

pub async fn devices_for_breaker(
    conn: &mut SqliteConnection,
    breaker_id: BreakerId,
) -> Result<Vec<Device>> {
    let rows = sqlx::query(
        "SELECT id, panel_id, name, room, breaker_id FROM devices WHERE breaker_id = ? ORDER BY id",
    )
    .bind(breaker_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut devices = Vec::with_capacity(rows.len());
    for row in rows {
        devices.push(hydrate_device(row)?);
    }
    Ok(devices)
}

// ============================================================================
// Row hydration
// ============================================================================

fn hydrate_breaker(row: SqliteRow) -> Result<Breaker> {
    let amperage: i64 = row.try_get("amperage")?;
    let poles: i64 = row.try_get("poles")?;
    let is_on: i64 = row.try_get("is_on")?;

    Ok(Breaker {
        id: row.try_get("id")?,
        panel_id: row.try_get("panel_id")?,
        position: row.try_get("position")?,
        amperage: amperage as u32,
        poles: poles as u8,
        label: row.try_get("label")?,
        circuit_type: row.try_get("circuit_type")?,
        protection_type: row.try_get("protection_type")?,
        is_on: is_on != 0,
        notes: row.try_get("notes")?,
        sort_order: row.try_get("sort_order")?,
    })
}

fn hydrate_device(row: SqliteRow) -> Result<Device> {
    Ok(Device {
        id: row.try_get("id")?,
        panel_id: row.try_get("panel_id")?,
        name: row.try_get("name")?,
        room: row.try_get("room")?,
        breaker_id: row.try_get("breaker_id")?,
    })
}

/// Unique index hit on (panel_id, position) -> duplicate position
fn position_conflict(err: sqlx::Error, position: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return ModelError::ExactDuplicatePosition {
                position: position.to_string(),
            }
            .into();
        }
    }
    err.into()
}
