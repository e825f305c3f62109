use serde::{Deserialize, Serialize};

use crate::{contact::Contact, core::store::ContactStore};

/// Column headers of [`ExportTable`].
pub const EXPORT_COLUMNS: [&str; 5] = ["Name", "Phone", "Email", "Address", "Category"];

/// Number of contacts in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Category key.
    pub category: String,
    /// Contacts in it.
    pub count: usize,
}

/// Summary of a store at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreReport {
    /// Total contacts.
    pub total: usize,
    /// Per-category tallies, largest first, ties by category key.
    pub categories: Vec<CategoryCount>,
    /// Name of the most recently created contact.
    pub most_recent_name: Option<String>,
    /// Phone of the most recently created contact.
    pub most_recent_phone: Option<String>,
    /// Creation time of the most recently created contact.
    pub most_recent_created_ms: Option<u64>,
}

/// Fixed-width tabular projection of every contact in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportTable {
    /// One row per contact, columns as in [`EXPORT_COLUMNS`].
    pub rows: Vec<[String; 5]>,
}

impl ExportTable {
    /// Column headers.
    pub fn header(&self) -> [&'static str; 5] {
        EXPORT_COLUMNS
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds the full summary for `store`.
pub fn summarize(store: &ContactStore) -> StoreReport {
    let most_recent = most_recent(store);
    StoreReport {
        total: store.len(),
        categories: category_counts(store),
        most_recent_name: most_recent.map(|c| c.name().to_string()),
        most_recent_phone: most_recent.map(|c| c.phone().to_string()),
        most_recent_created_ms: most_recent.map(Contact::created_ms),
    }
}

/// Category tallies ordered by descending count, then category key.
pub fn category_counts(store: &ContactStore) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = store
        .category_sizes()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.category.cmp(&b.category))
    });
    counts
}

/// Contact with the greatest `created_ms`; the later insert wins a tie.
pub fn most_recent(store: &ContactStore) -> Option<&Contact> {
    store
        .iter()
        .fold(None, |best: Option<&Contact>, c| match best {
            Some(b) if b.created_ms() > c.created_ms() => Some(b),
            _ => Some(c),
        })
}

/// Projects every contact into a five-column row; absent fields are empty.
pub fn export(store: &ContactStore) -> ExportTable {
    let rows = store
        .iter()
        .map(|c| {
            [
                c.name().to_string(),
                c.phone().to_string(),
                c.email().unwrap_or_default().to_string(),
                c.address().unwrap_or_default().to_string(),
                c.category().to_string(),
            ]
        })
        .collect();
    ExportTable { rows }
}
