use std::time::Duration;

use phonebook::{
    contact::{Contact, ContactDraft, ContactPatch},
    core::store::{ContactStore, StoreError},
    runtime::{
        events::PhonebookEvent,
        handle::{RuntimeConfig, RuntimeError, spawn_phonebook},
    },
};

fn contact(name: &str, phone: &str, category: &str) -> Contact {
    Contact::new(ContactDraft::new(name, phone).category(category)).expect("valid contact")
}

#[tokio::test]
async fn runtime_insert_update_delete_and_events_ordered() {
    let handle = spawn_phonebook(ContactStore::new(), RuntimeConfig::default());
    let mut sub = handle.subscribe();

    handle.insert(contact("Ana", "0994444444", "Familia")).await.expect("insert");
    let updated = handle
        .update(
            "0994444444",
            ContactPatch {
                phone: Some("0995555555".to_string()),
                ..ContactPatch::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.phone(), "0995555555");
    handle.delete("0995555555").await.expect("delete");

    let mut seen = Vec::new();
    for _ in 0..3 {
        let evt = tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("event")
            .expect("recv");
        seen.push(evt);
    }

    assert_eq!(
        seen,
        vec![
            PhonebookEvent::Inserted {
                phone: "0994444444".to_string()
            },
            PhonebookEvent::Updated {
                phone: "0995555555".to_string(),
                previous_phone: "0994444444".to_string(),
            },
            PhonebookEvent::Deleted {
                phone: "0995555555".to_string()
            },
        ]
    );

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn rejected_mutations_surface_store_errors_without_events() {
    let handle = spawn_phonebook(ContactStore::new(), RuntimeConfig::default());
    handle.insert(contact("Ana", "0993333333", "Familia")).await.expect("insert");
    let mut sub = handle.subscribe();

    let err = handle
        .insert(contact("Otra", "0993333333", "Trabajo"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RuntimeError::Store(StoreError::DuplicatePhone("0993333333".to_string()))
    );
    assert_eq!(handle.len().await.expect("len"), 1);

    let err = handle.delete("0990000000").await.unwrap_err();
    assert_eq!(
        err,
        RuntimeError::Store(StoreError::NotFound("0990000000".to_string()))
    );
    assert!(sub.try_recv().is_err());

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn queries_and_reports_through_handle() {
    let handle = spawn_phonebook(ContactStore::new(), RuntimeConfig::default());
    handle.insert(contact("Luis", "0992222222", "Trabajo")).await.expect("insert");
    handle.insert(contact("Ana", "0991111111", "Familia")).await.expect("insert");

    let familia = handle.by_category("Familia").await.expect("by_category");
    assert_eq!(familia.len(), 1);
    assert_eq!(familia[0].phone(), "0991111111");
    assert_eq!(
        handle.categories().await.expect("categories"),
        vec!["Familia", "Trabajo"]
    );
    assert_eq!(handle.search("trabajo").await.expect("search").len(), 1);
    assert_eq!(handle.by_name("an").await.expect("by_name").len(), 1);

    let listed = handle.list_by_name().await.expect("list");
    assert_eq!(listed[0].name(), "Ana");

    let summary = handle.report().await.expect("report");
    assert_eq!(summary.total, 2);
    assert_eq!(handle.export().await.expect("export").len(), 2);

    let mut sub = handle.subscribe();
    assert_eq!(handle.clear().await.expect("clear"), 2);
    assert_eq!(
        sub.recv().await.expect("recv"),
        PhonebookEvent::Cleared { removed: 2 }
    );
    assert!(handle.get("0991111111").await.expect("get").is_none());

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn requests_after_shutdown_report_closed_channel() {
    let handle = spawn_phonebook(ContactStore::new(), RuntimeConfig::default());
    handle.shutdown().await.expect("shutdown");

    let res = tokio::time::timeout(Duration::from_secs(1), handle.len())
        .await
        .expect("no hang");
    assert_eq!(res, Err(RuntimeError::ChannelClosed));
}
