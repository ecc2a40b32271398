//! Panel Store - SQLite persistence for breaker panels
//!
//! Wraps the pure rules in `panel-model` with storage:
//! - Schema and connection pool (`SqliteClient`)
//! - Row-level repository functions usable inside a transaction
//! - `PanelService`, which runs every check-then-write as one transaction
//!
//! # Flow
//!
//! ```text
//! request ──▶ classify ──▶ validate fields ──▶ BEGIN
//!                                               │
//!              fetch panel breakers ◀───────────┘
//!                      │
//!                      ▼
//!              check_conflict ──▶ insert / update ──▶ split? ──▶ COMMIT
//! ```

mod client;
mod error;
pub mod repository;
mod schema;
mod service;
pub mod types;

// Re-export public API
pub use client::{ClientOptions, SqliteClient};
pub use error::{Result, StoreError};
pub use schema::{init_schema, BREAKERS_TABLE, DEVICES_TABLE, PANELS_TABLE};
pub use service::PanelService;

pub use types::{BreakerWrite, Device, MigrationReport, NewBreakerRequest, Panel, SkippedSplit};
