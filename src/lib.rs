//! In-memory phone book with a unique phone index and a category index.
//!
//! # Examples
//!
//! Direct usage with [`core::store::ContactStore`]:
//! ```
//! use phonebook::{
//!     contact::{Contact, ContactDraft, ContactPatch},
//!     core::store::ContactStore,
//! };
//!
//! let mut store = ContactStore::new();
//! let contact = Contact::new(
//!     ContactDraft::new("Maria Gonzalez", "0987654321")
//!         .email("maria@example.com")
//!         .category("Familia"),
//! )
//! .expect("valid contact");
//! store.insert(contact).expect("insert");
//!
//! store
//!     .update(
//!         "0987654321",
//!         ContactPatch {
//!             category: Some("Trabajo".to_string()),
//!             ..ContactPatch::default()
//!         },
//!     )
//!     .expect("update");
//! assert_eq!(store.categories(), vec!["Trabajo".to_string()]);
//! ```
//!
//! Shared usage through the single-writer runtime:
//! ```no_run
//! use phonebook::{
//!     contact::{Contact, ContactDraft},
//!     core::store::ContactStore,
//!     runtime::handle::{spawn_phonebook, RuntimeConfig},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handle = spawn_phonebook(ContactStore::new(), RuntimeConfig::default());
//! let contact = Contact::new(ContactDraft::new("Juan Perez", "0991234567")).expect("valid");
//! handle.insert(contact).await.expect("insert");
//! let found = handle.get("0991234567").await.expect("get");
//! assert!(found.is_some());
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Contact records, drafts, patches, and validation.
pub mod contact;
/// Core in-memory store and index helpers.
pub mod core;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Shared primitive types, constants, and clocks.
pub mod types;
/// Read-only query and reporting views.
pub mod views;
