use phonebook::{
    contact::{Contact, ContactDraft},
    core::store::ContactStore,
    views::{
        query::ContactQuery,
        report::{self, CategoryCount, EXPORT_COLUMNS, StoreReport},
    },
};

fn seeded() -> ContactStore {
    let mut store = ContactStore::new();
    let drafts = [
        (
            ContactDraft::new("maria Gonzalez", "0987654321")
                .email("maria@email.com")
                .category("Familia"),
            10,
        ),
        (
            ContactDraft::new("Juan Perez", "0991234567")
                .address("Av. 10 de Agosto")
                .category("Trabajo"),
            30,
        ),
        (ContactDraft::new("Ana Rodriguez", "0998765432").category("Amigos"), 20),
        (ContactDraft::new("Carlos Martinez", "0992345678").category("Trabajo"), 30),
        (ContactDraft::new("Laura Sanchez", "0993456789").category("Familia"), 5),
    ];
    for (draft, ts) in drafts {
        store.insert(Contact::new_at(draft, ts).unwrap()).unwrap();
    }
    store
}

fn names(contacts: &[Contact]) -> Vec<&str> {
    contacts.iter().map(Contact::name).collect()
}

#[test]
fn listing_is_sorted_by_name_case_insensitively() {
    let store = seeded();
    let q = ContactQuery::new(&store);
    assert_eq!(
        names(&q.all_by_name()),
        vec!["Ana Rodriguez", "Carlos Martinez", "Juan Perez", "Laura Sanchez", "maria Gonzalez"]
    );
    assert_eq!(
        names(&q.category_by_name("Familia")),
        vec!["Laura Sanchez", "maria Gonzalez"]
    );
    assert_eq!(
        names(&q.search_by_name("trabajo")),
        vec!["Carlos Martinez", "Juan Perez"]
    );
    assert_eq!(
        names(&q.name_matches_by_name("ez")),
        vec!["Ana Rodriguez", "Carlos Martinez", "Juan Perez", "Laura Sanchez", "maria Gonzalez"]
    );
}

#[test]
fn equal_names_keep_insertion_order() {
    let mut store = ContactStore::new();
    store.insert(Contact::new(ContactDraft::new("Ana", "0991111111")).unwrap()).unwrap();
    store.insert(Contact::new(ContactDraft::new("ana", "0992222222")).unwrap()).unwrap();
    let listed: Vec<String> = ContactQuery::new(&store)
        .all_by_name()
        .iter()
        .map(|c| c.phone().to_string())
        .collect();
    assert_eq!(listed, vec!["0991111111", "0992222222"]);
}

#[test]
fn category_counts_order_by_count_then_key() {
    let store = seeded();
    let counts = report::category_counts(&store);
    let expected = [("Familia", 2), ("Trabajo", 2), ("Amigos", 1)]
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        });
    assert_eq!(counts, expected.to_vec());
}

#[test]
fn most_recent_prefers_later_insert_on_ties() {
    let store = seeded();
    let latest = report::most_recent(&store).unwrap();
    assert_eq!(latest.phone(), "0992345678");

    assert!(report::most_recent(&ContactStore::new()).is_none());
}

#[test]
fn summary_matches_store() {
    let store = seeded();
    let summary = report::summarize(&store);
    assert_eq!(summary.total, 5);
    assert_eq!(summary.categories.len(), 3);
    assert_eq!(summary.most_recent_name.as_deref(), Some("Carlos Martinez"));
    assert_eq!(summary.most_recent_created_ms, Some(30));

    let json = serde_json::to_string(&summary).unwrap();
    let back: StoreReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, summary);
}

#[test]
fn export_keeps_insertion_order_and_fixed_columns() {
    let store = seeded();
    let table = report::export(&store);
    assert_eq!(table.header(), EXPORT_COLUMNS);
    assert_eq!(table.len(), 5);
    assert_eq!(
        table.rows[0],
        ["maria Gonzalez", "0987654321", "maria@email.com", "", "Familia"].map(String::from)
    );
    assert_eq!(
        table.rows[1],
        ["Juan Perez", "0991234567", "", "Av. 10 de Agosto", "Trabajo"].map(String::from)
    );
    assert!(report::export(&ContactStore::new()).is_empty());
}
