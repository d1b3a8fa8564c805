//! # Revenue Store
//!
//! Project-scoped revenue history and a time-to-live cache for derived
//! results.
//!
//! History only ever grows by merging: a fresh scrape is folded into what
//! was stored before, keyed by date, with the newer value winning. Stores
//! are interchangeable through the [`SeriesStore`] trait.

pub mod cache;
pub mod config;
pub mod error;
pub mod merge;
pub mod store;

pub use cache::TtlCache;
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use merge::merge_by_date;
pub use store::{JsonFileStore, MemoryStore, SeriesStore};
