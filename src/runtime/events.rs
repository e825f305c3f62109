//! Runtime event stream payloads.

use serde::{Deserialize, Serialize};

/// Events emitted from the single-writer runtime loop after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhonebookEvent {
    /// A new contact was inserted.
    Inserted {
        /// Phone of the inserted contact.
        phone: String,
    },
    /// An existing contact was updated.
    Updated {
        /// Phone after the update.
        phone: String,
        /// Phone before the update; equal to `phone` unless it was re-keyed.
        previous_phone: String,
    },
    /// A contact was deleted.
    Deleted {
        /// Phone of the deleted contact.
        phone: String,
    },
    /// The store was emptied.
    Cleared {
        /// Number of contacts dropped.
        removed: usize,
    },
}
