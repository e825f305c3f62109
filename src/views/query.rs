use crate::{contact::Contact, core::store::ContactStore};

/// Borrowing query view that returns owned, name-sorted results.
#[derive(Debug, Clone, Copy)]
pub struct ContactQuery<'a> {
    store: &'a ContactStore,
}

impl<'a> ContactQuery<'a> {
    /// Wraps `store`.
    pub fn new(store: &'a ContactStore) -> Self {
        Self { store }
    }

    /// Every contact, alphabetical by name.
    pub fn all_by_name(&self) -> Vec<Contact> {
        sorted_by_name(self.store.iter())
    }

    /// One category, alphabetical by name.
    pub fn category_by_name(&self, category: &str) -> Vec<Contact> {
        sorted_by_name(self.store.find_by_category(category))
    }

    /// Name substring matches, alphabetical by name.
    pub fn name_matches_by_name(&self, fragment: &str) -> Vec<Contact> {
        sorted_by_name(self.store.find_by_name(fragment))
    }

    /// Global search hits, alphabetical by name.
    pub fn search_by_name(&self, term: &str) -> Vec<Contact> {
        sorted_by_name(self.store.search(term))
    }
}

/// Clones and stable-sorts by lowercase name; equal names keep their input order.
pub fn sorted_by_name<'c>(contacts: impl IntoIterator<Item = &'c Contact>) -> Vec<Contact> {
    let mut out: Vec<Contact> = contacts.into_iter().cloned().collect();
    out.sort_by_cached_key(|c| c.name().to_lowercase());
    out
}
