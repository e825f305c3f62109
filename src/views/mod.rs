//! Read-only projections over a [`crate::core::store::ContactStore`].

/// Name-sorted listings and searches.
pub mod query;
/// Counts, category tallies, most-recent contact, and the export table.
pub mod report;
