//! Database schema
//!
//! `UNIQUE (panel_id, position)` only catches literal duplicates; overlap
//! rules are enforced by the service before writing.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::Result;

pub const PANELS_TABLE: &str = "panels";
pub const BREAKERS_TABLE: &str = "breakers";
pub const DEVICES_TABLE: &str = "devices";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS panels (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS breakers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        panel_id INTEGER NOT NULL REFERENCES panels(id) ON DELETE CASCADE,
        position TEXT NOT NULL,
        amperage INTEGER NOT NULL,
        poles INTEGER NOT NULL DEFAULT 1 CHECK (poles BETWEEN 1 AND 3),
        label TEXT NOT NULL DEFAULT '',
        circuit_type TEXT NOT NULL DEFAULT 'general',
        protection_type TEXT NOT NULL DEFAULT 'standard',
        is_on INTEGER NOT NULL DEFAULT 1,
        notes TEXT,
        sort_order INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (panel_id, position)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS devices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        panel_id INTEGER NOT NULL REFERENCES panels(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        room TEXT,
        breaker_id INTEGER REFERENCES breakers(id) ON DELETE SET NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_breakers_panel ON breakers(panel_id, sort_order)",
    "CREATE INDEX IF NOT EXISTS idx_devices_breaker ON devices(breaker_id)",
];

/// Create all tables and indexes if they do not exist
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!(
        "Schema ready: {}, {}, {}",
        PANELS_TABLE, BREAKERS_TABLE, DEVICES_TABLE
    );
    Ok(())
}
