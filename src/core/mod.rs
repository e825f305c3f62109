//! In-memory authoritative store and index helpers.

/// Bucket index helpers shared by the store.
pub mod indices;
/// Contact store keeping the sequence, phone index, and category index in step.
pub mod store;
