use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use crate::{
    contact::{Contact, ContactPatch},
    core::store::{ContactStore, StoreError},
    views::{
        query::sorted_by_name,
        report::{self, ExportTable, StoreReport},
    },
};

use super::events::PhonebookEvent;

/// Failure of a runtime request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The runtime task has stopped.
    #[error("phonebook runtime is not running")]
    ChannelClosed,
}

/// Channel sizing for [`spawn_phonebook`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pending commands allowed before senders wait.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber before the slowest one lags.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable handle to a store owned by a runtime task.
///
/// The task processes one command at a time, so every operation sees the
/// store exclusively.
#[derive(Clone)]
pub struct PhonebookHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<PhonebookEvent>,
}

enum Command {
    Insert {
        contact: Contact,
        resp: oneshot::Sender<Result<(), StoreError>>,
    },
    Update {
        phone: String,
        patch: ContactPatch,
        resp: oneshot::Sender<Result<Contact, StoreError>>,
    },
    Delete {
        phone: String,
        resp: oneshot::Sender<Result<Contact, StoreError>>,
    },
    Get {
        phone: String,
        resp: oneshot::Sender<Option<Contact>>,
    },
    ByName {
        fragment: String,
        resp: oneshot::Sender<Vec<Contact>>,
    },
    ByCategory {
        category: String,
        resp: oneshot::Sender<Vec<Contact>>,
    },
    Search {
        term: String,
        resp: oneshot::Sender<Vec<Contact>>,
    },
    ListByName {
        resp: oneshot::Sender<Vec<Contact>>,
    },
    Categories {
        resp: oneshot::Sender<Vec<String>>,
    },
    Len {
        resp: oneshot::Sender<usize>,
    },
    Clear {
        resp: oneshot::Sender<usize>,
    },
    Report {
        resp: oneshot::Sender<StoreReport>,
    },
    Export {
        resp: oneshot::Sender<ExportTable>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `store` into a new task and returns a handle to it.
///
/// Must be called from within a tokio runtime.
pub fn spawn_phonebook(store: ContactStore, config: RuntimeConfig) -> PhonebookHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<PhonebookEvent>(config.event_capacity.max(1));

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut store = store;
        info!(target: "phonebook::runtime", contacts = store.len(), "runtime started");
        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut store, &events_tx_loop) {
                break;
            }
        }
        info!(target: "phonebook::runtime", contacts = store.len(), "runtime stopped");
    });

    PhonebookHandle { cmd_tx, events_tx }
}

impl PhonebookHandle {
    /// Receives events for mutations applied after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PhonebookEvent> {
        self.events_tx.subscribe()
    }

    /// See [`ContactStore::insert`].
    pub async fn insert(&self, contact: Contact) -> Result<(), RuntimeError> {
        Ok(self.request(|resp| Command::Insert { contact, resp }).await??)
    }

    /// See [`ContactStore::update`]; returns the updated contact.
    pub async fn update(
        &self,
        phone: impl Into<String>,
        patch: ContactPatch,
    ) -> Result<Contact, RuntimeError> {
        let phone = phone.into();
        Ok(self.request(|resp| Command::Update { phone, patch, resp }).await??)
    }

    /// See [`ContactStore::delete`].
    pub async fn delete(&self, phone: impl Into<String>) -> Result<Contact, RuntimeError> {
        let phone = phone.into();
        Ok(self.request(|resp| Command::Delete { phone, resp }).await??)
    }

    /// See [`ContactStore::find_by_phone`].
    pub async fn get(&self, phone: impl Into<String>) -> Result<Option<Contact>, RuntimeError> {
        let phone = phone.into();
        self.request(|resp| Command::Get { phone, resp }).await
    }

    /// See [`ContactStore::find_by_name`].
    pub async fn by_name(&self, fragment: impl Into<String>) -> Result<Vec<Contact>, RuntimeError> {
        let fragment = fragment.into();
        self.request(|resp| Command::ByName { fragment, resp }).await
    }

    /// See [`ContactStore::find_by_category`].
    pub async fn by_category(
        &self,
        category: impl Into<String>,
    ) -> Result<Vec<Contact>, RuntimeError> {
        let category = category.into();
        self.request(|resp| Command::ByCategory { category, resp }).await
    }

    /// See [`ContactStore::search`].
    pub async fn search(&self, term: impl Into<String>) -> Result<Vec<Contact>, RuntimeError> {
        let term = term.into();
        self.request(|resp| Command::Search { term, resp }).await
    }

    /// Every contact, alphabetical by name.
    pub async fn list_by_name(&self) -> Result<Vec<Contact>, RuntimeError> {
        self.request(|resp| Command::ListByName { resp }).await
    }

    /// See [`ContactStore::categories`].
    pub async fn categories(&self) -> Result<Vec<String>, RuntimeError> {
        self.request(|resp| Command::Categories { resp }).await
    }

    /// See [`ContactStore::len`].
    pub async fn len(&self) -> Result<usize, RuntimeError> {
        self.request(|resp| Command::Len { resp }).await
    }

    /// See [`ContactStore::clear`].
    pub async fn clear(&self) -> Result<usize, RuntimeError> {
        self.request(|resp| Command::Clear { resp }).await
    }

    /// See [`report::summarize`].
    pub async fn report(&self) -> Result<StoreReport, RuntimeError> {
        self.request(|resp| Command::Report { resp }).await
    }

    /// See [`report::export`].
    pub async fn export(&self) -> Result<ExportTable, RuntimeError> {
        self.request(|resp| Command::Export { resp }).await
    }

    /// Stops the runtime task after the commands queued before this one.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Shutdown { resp }).await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command(
    cmd: Command,
    store: &mut ContactStore,
    events_tx: &broadcast::Sender<PhonebookEvent>,
) -> bool {
    match cmd {
        Command::Insert { contact, resp } => {
            let phone = contact.phone().to_string();
            let res = store.insert(contact);
            if res.is_ok() {
                let _ = events_tx.send(PhonebookEvent::Inserted { phone });
            }
            let _ = resp.send(res);
        }
        Command::Update { phone, patch, resp } => {
            let previous_phone = store
                .find_by_phone(&phone)
                .map(|c| c.phone().to_string())
                .unwrap_or_default();
            let res = store.update(&phone, patch).map(Contact::clone);
            if let Ok(updated) = &res {
                let _ = events_tx.send(PhonebookEvent::Updated {
                    phone: updated.phone().to_string(),
                    previous_phone,
                });
            }
            let _ = resp.send(res);
        }
        Command::Delete { phone, resp } => {
            let res = store.delete(&phone);
            if let Ok(removed) = &res {
                let _ = events_tx.send(PhonebookEvent::Deleted {
                    phone: removed.phone().to_string(),
                });
            }
            let _ = resp.send(res);
        }
        Command::Get { phone, resp } => {
            let _ = resp.send(store.find_by_phone_cloned(&phone));
        }
        Command::ByName { fragment, resp } => {
            let hits = store.find_by_name(&fragment);
            let _ = resp.send(hits.into_iter().cloned().collect());
        }
        Command::ByCategory { category, resp } => {
            let _ = resp.send(store.find_by_category_cloned(&category));
        }
        Command::Search { term, resp } => {
            let hits = store.search(&term);
            let _ = resp.send(hits.into_iter().cloned().collect());
        }
        Command::ListByName { resp } => {
            let _ = resp.send(sorted_by_name(store.iter()));
        }
        Command::Categories { resp } => {
            let _ = resp.send(store.categories());
        }
        Command::Len { resp } => {
            let _ = resp.send(store.len());
        }
        Command::Clear { resp } => {
            let removed = store.clear();
            let _ = events_tx.send(PhonebookEvent::Cleared { removed });
            let _ = resp.send(removed);
        }
        Command::Report { resp } => {
            let _ = resp.send(report::summarize(store));
        }
        Command::Export { resp } => {
            let _ = resp.send(report::export(store));
        }
        Command::Shutdown { resp } => {
            debug!(target: "phonebook::runtime", "shutdown requested");
            let _ = resp.send(());
            return true;
        }
    }

    false
}
