//! Data module - listing table loading and derived columns

pub mod derive;
mod loader;

pub use loader::{ListingTable, LoaderError};

#[cfg(test)]
pub(crate) use loader::tests::sample_table;
