use std::fmt;

use hashbrown::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    contact::{Contact, ContactPatch, ValidationError, phone_key},
    types::{Clock, SystemClock},
};

use super::indices::{self, BucketIndex, SlotId};

/// Failure of a store operation. The store is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A field in the submitted patch failed validation.
    #[error("invalid contact: {0}")]
    Validation(#[from] ValidationError),
    /// The phone is already the key of another contact.
    #[error("a contact with phone {0:?} already exists")]
    DuplicatePhone(String),
    /// No contact is keyed by this phone.
    #[error("no contact with phone {0:?}")]
    NotFound(String),
}

/// Contact collection with an insertion-ordered sequence, a unique phone
/// index, and a category index.
///
/// Records live in `records` under an internal slot id; the three access
/// structures hold slots, so a phone change only re-keys `by_phone`.
/// Every bucket in `by_category` is non-empty.
pub struct ContactStore {
    records: HashMap<SlotId, Contact>,
    order: Vec<SlotId>,
    by_phone: HashMap<String, SlotId>,
    by_category: BucketIndex,
    next_slot: SlotId,
    clock: Box<dyn Clock>,
}

impl fmt::Debug for ContactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactStore")
            .field("len", &self.order.len())
            .field("categories", &self.by_category.len())
            .finish_non_exhaustive()
    }
}

impl Default for ContactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactStore {
    /// Empty store stamping updates with the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Empty store stamping updates with `clock`.
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
            by_phone: HashMap::new(),
            by_category: BucketIndex::new(),
            next_slot: 1,
            clock,
        }
    }

    /// Takes ownership of `contact`, rejecting it if its phone is taken.
    pub fn insert(&mut self, contact: Contact) -> Result<(), StoreError> {
        if self.by_phone.contains_key(contact.phone()) {
            warn!(
                target: "phonebook::store",
                phone = %contact.phone(),
                "insert rejected: duplicate phone"
            );
            return Err(StoreError::DuplicatePhone(contact.phone().to_string()));
        }

        let slot = self.next_slot;
        self.next_slot += 1;

        self.by_phone.insert(contact.phone().to_string(), slot);
        indices::link(&mut self.by_category, contact.category(), slot);
        self.order.push(slot);
        debug!(
            target: "phonebook::store",
            phone = %contact.phone(),
            category = %contact.category(),
            "contact inserted"
        );
        self.records.insert(slot, contact);
        Ok(())
    }

    /// Exact lookup on the trimmed phone.
    pub fn find_by_phone(&self, phone: &str) -> Option<&Contact> {
        self.by_phone
            .get(phone_key(phone))
            .and_then(|slot| self.records.get(slot))
    }

    /// Owned copy of [`Self::find_by_phone`].
    pub fn find_by_phone_cloned(&self, phone: &str) -> Option<Contact> {
        self.find_by_phone(phone).cloned()
    }

    /// Case-insensitive name substring match, in insertion order.
    pub fn find_by_name(&self, fragment: &str) -> Vec<&Contact> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Vec::new();
        }
        let needle = fragment.to_lowercase();
        self.iter().filter(|c| c.name_contains(&needle)).collect()
    }

    /// Members of one category bucket, in the order they joined it.
    pub fn find_by_category(&self, category: &str) -> Vec<&Contact> {
        self.by_category
            .get(category.trim())
            .into_iter()
            .flat_map(|slots| slots.iter())
            .filter_map(|slot| self.records.get(slot))
            .collect()
    }

    /// Owned copy of [`Self::find_by_category`].
    pub fn find_by_category_cloned(&self, category: &str) -> Vec<Contact> {
        self.find_by_category(category).into_iter().cloned().collect()
    }

    /// Matches `term` case-insensitively against name, email, address and
    /// category, and verbatim against the phone.
    pub fn search(&self, term: &str) -> Vec<&Contact> {
        let term = term.trim();
        if term.is_empty() {
            return Vec::new();
        }
        let term_lower = term.to_lowercase();
        self.iter()
            .filter(|c| c.matches_term(term, &term_lower))
            .collect()
    }

    /// Applies `patch` to the contact keyed by `phone`.
    ///
    /// The patch is validated and the new phone checked for collisions
    /// before any index is touched. An empty patch is a no-op and leaves
    /// `updated_ms` alone.
    pub fn update(&mut self, phone: &str, patch: ContactPatch) -> Result<&Contact, StoreError> {
        let key = phone_key(phone);
        let slot = self.slot_of(key)?;

        if !patch.is_empty() {
            let (old_phone, old_category, next) = {
                let current = self
                    .records
                    .get(&slot)
                    .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
                let next = match patch.apply_to(current, self.clock.now_ms()) {
                    Ok(next) => next,
                    Err(err) => {
                        warn!(
                            target: "phonebook::store",
                            phone = %key,
                            error = %err,
                            "update rejected"
                        );
                        return Err(err.into());
                    }
                };
                (current.phone().to_string(), current.category().to_string(), next)
            };

            if next.phone() != old_phone && self.by_phone.contains_key(next.phone()) {
                warn!(
                    target: "phonebook::store",
                    phone = %key,
                    new_phone = %next.phone(),
                    "update rejected: duplicate phone"
                );
                return Err(StoreError::DuplicatePhone(next.phone().to_string()));
            }

            if next.phone() != old_phone {
                self.by_phone.remove(old_phone.as_str());
                self.by_phone.insert(next.phone().to_string(), slot);
            }
            if next.category() != old_category {
                indices::unlink(&mut self.by_category, &old_category, slot);
                indices::link(&mut self.by_category, next.category(), slot);
            }

            debug!(
                target: "phonebook::store",
                phone = %next.phone(),
                previous_phone = %old_phone,
                category = %next.category(),
                "contact updated"
            );
            self.records.insert(slot, next);
        }

        self.records
            .get(&slot)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Removes the contact keyed by `phone` from every structure and returns it.
    pub fn delete(&mut self, phone: &str) -> Result<Contact, StoreError> {
        let key = phone_key(phone);
        let slot = self.slot_of(key)?;
        let contact = self
            .records
            .remove(&slot)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        self.by_phone.remove(contact.phone());
        indices::unlink(&mut self.by_category, contact.category(), slot);
        if let Some(pos) = self.order.iter().position(|x| *x == slot) {
            self.order.remove(pos);
        }

        debug!(target: "phonebook::store", phone = %contact.phone(), "contact deleted");
        Ok(contact)
    }

    /// Drops every contact; returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.order.len();
        self.records.clear();
        self.order.clear();
        self.by_phone.clear();
        self.by_category.clear();
        debug!(target: "phonebook::store", removed, "store cleared");
        removed
    }

    /// Number of contacts.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the store holds no contacts.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Current category keys, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.by_category.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Contacts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Contact> + '_ {
        self.order.iter().filter_map(|slot| self.records.get(slot))
    }

    /// The last `n` contacts inserted, oldest first.
    pub fn recent(&self, n: usize) -> Vec<&Contact> {
        let start = self.order.len().saturating_sub(n);
        self.order[start..]
            .iter()
            .filter_map(|slot| self.records.get(slot))
            .collect()
    }

    /// Bucket sizes keyed by category, in no particular order.
    pub fn category_sizes(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.by_category
            .iter()
            .map(|(category, slots)| (category.as_str(), slots.len()))
    }

    fn slot_of(&self, key: &str) -> Result<SlotId, StoreError> {
        self.by_phone.get(key).copied().ok_or_else(|| {
            warn!(target: "phonebook::store", phone = %key, "contact not found");
            StoreError::NotFound(key.to_string())
        })
    }
}
