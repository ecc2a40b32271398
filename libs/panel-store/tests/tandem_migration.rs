//! Combined tandem split and panel migration

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use panel_model::{BreakerUpdate, ModelError, PositionKind};
use panel_store::{NewBreakerRequest, PanelService, SqliteClient, StoreError};

async fn setup() -> (PanelService, i64) {
    let client = SqliteClient::in_memory().await.unwrap();
    let service = PanelService::new(client.pool().clone());
    let panel = service.create_panel("Main").await.unwrap();
    (service, panel.id)
}

fn imported(position: &str, label: &str) -> NewBreakerRequest {
    NewBreakerRequest {
        position: position.to_string(),
        amperage: 15,
        label: label.to_string(),
        circuit_type: Some("lighting".to_string()),
        protection_type: Some("afci".to_string()),
        notes: Some("from export".to_string()),
        sort_order: Some(3),
        ..Default::default()
    }
}

fn positions(breakers: &[panel_model::Breaker]) -> Vec<String> {
    let mut all: Vec<String> = breakers.iter().map(|b| b.position.clone()).collect();
    all.sort();
    all
}

#[tokio::test]
async fn test_create_combined_tandem_splits() {
    let (service, panel_id) = setup().await;

    let write = service
        .create_breaker(
            panel_id,
            NewBreakerRequest {
                position: "14a/14b".to_string(),
                amperage: 20,
                label: "Kitchen".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(write.breaker.position, "14A");
    assert_eq!(write.breaker.label, "Kitchen (A)");
    let sibling = write.sibling.as_ref().unwrap();
    assert_eq!(sibling.position, "14B");
    assert_eq!(sibling.label, "Kitchen (B)");
    assert_eq!(sibling.amperage, 20);
    assert_eq!(write.records().len(), 2);

    let stored = service.list_breakers(panel_id).await.unwrap();
    assert_eq!(positions(&stored), vec!["14A", "14B"]);
}

#[tokio::test]
async fn test_create_combined_over_existing_half_rolls_back() {
    let (service, panel_id) = setup().await;
    service
        .create_breaker(
            panel_id,
            NewBreakerRequest {
                position: "14A".to_string(),
                amperage: 15,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = service
        .create_breaker(
            panel_id,
            NewBreakerRequest {
                position: "14A/14B".to_string(),
                amperage: 20,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.as_model(),
        Some(&ModelError::PositionOccupied {
            positions: vec!["14A".to_string()]
        })
    );

    let stored = service.list_breakers(panel_id).await.unwrap();
    assert_eq!(positions(&stored), vec!["14A"]);
}

#[tokio::test]
async fn test_split_keeps_carried_fields_and_devices() {
    let (service, panel_id) = setup().await;
    let rows = service
        .import_breakers(panel_id, vec![imported("3b/3a", "Bath")])
        .await
        .unwrap();
    let original = &rows[0];
    assert_eq!(original.position, "3B/3A");

    let device = service.create_device(panel_id, "Fan", None).await.unwrap();
    service.assign_device(device.id, original.id).await.unwrap();

    let write = service.split_breaker(original.id).await.unwrap();
    assert_eq!(write.breaker.id, original.id);
    assert_eq!(write.breaker.position, "3B");
    assert_eq!(write.breaker.label, "Bath (B)");

    let second = write.sibling.unwrap();
    assert_ne!(second.id, original.id);
    assert_eq!(second.position, "3A");
    assert_eq!(second.label, "Bath (A)");
    assert_eq!(second.circuit_type, "lighting");
    assert_eq!(second.protection_type, "afci");
    assert_eq!(second.notes.as_deref(), Some("from export"));
    assert_eq!(second.sort_order, 3);

    let on_first = service.devices_for_breaker(original.id).await.unwrap();
    assert_eq!(on_first.len(), 1);
    assert!(service.devices_for_breaker(second.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_split_rejects_non_combined() {
    let (service, panel_id) = setup().await;
    let rows = service
        .import_breakers(panel_id, vec![imported("7", "Hall")])
        .await
        .unwrap();

    let err = service.split_breaker(rows[0].id).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Model(ModelError::NotCombinedTandem(_))
    ));
}

#[tokio::test]
async fn test_migrate_panel() {
    let (service, panel_id) = setup().await;
    service
        .import_breakers(
            panel_id,
            vec![
                imported("14A/14B", "Kitchen"),
                imported("7", "Hall"),
                imported("2A/2B", "Porch"),
            ],
        )
        .await
        .unwrap();

    let report = service.migrate_panel(panel_id).await.unwrap();
    assert_eq!(report.panel_id, panel_id);
    assert_eq!(report.migrated, 2);
    assert!(report.skipped.is_empty());

    let stored = service.list_breakers(panel_id).await.unwrap();
    assert_eq!(positions(&stored), vec!["14A", "14B", "2A", "2B", "7"]);
    for breaker in &stored {
        let info = panel_model::classify(&breaker.position);
        assert!(!matches!(info.kind, PositionKind::CombinedTandem { .. }));
    }

    // Idempotent once nothing is left to split
    let again = service.migrate_panel(panel_id).await.unwrap();
    assert_eq!(again.migrated, 0);
}

#[tokio::test]
async fn test_migrate_skips_occupied_and_continues() {
    let (service, panel_id) = setup().await;
    service
        .import_breakers(
            panel_id,
            vec![
                imported("14A/14B", "Kitchen"),
                imported("14B", "Dishwasher"),
                imported("2A/2B", "Porch"),
            ],
        )
        .await
        .unwrap();

    let report = service.migrate_panel(panel_id).await.unwrap();
    assert_eq!(report.migrated, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].position, "14A/14B");
    assert!(report.skipped[0].reason.contains("14B"));

    let stored = service.list_breakers(panel_id).await.unwrap();
    assert_eq!(positions(&stored), vec!["14A/14B", "14B", "2A", "2B"]);
}

#[tokio::test]
async fn test_move_to_combined_tandem_splits() {
    let (service, panel_id) = setup().await;
    let created = service
        .create_breaker(
            panel_id,
            NewBreakerRequest {
                position: "9".to_string(),
                amperage: 15,
                label: "Office".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let write = service
        .update_breaker(
            created.breaker.id,
            BreakerUpdate {
                position: Some("9A/9B".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(write.breaker.id, created.breaker.id);
    assert_eq!(write.breaker.position, "9A");
    assert_eq!(write.sibling.unwrap().position, "9B");
}

#[tokio::test]
async fn test_import_rejects_invalid_and_duplicates() {
    let (service, panel_id) = setup().await;

    let err = service
        .import_breakers(panel_id, vec![imported("1-9", "Bad")])
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_model(),
        Some(ModelError::InvalidPositionFormat { .. })
    ));

    let err = service
        .import_breakers(
            panel_id,
            vec![imported("5", "One"), imported(" 5 ", "Two")],
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_model(),
        Some(ModelError::ExactDuplicatePosition { .. })
    ));

    // Whole import rolled back
    assert!(service.list_breakers(panel_id).await.unwrap().is_empty());
}
