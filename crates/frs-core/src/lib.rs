//! Persisted FRS data and the per-year session accessor.
//!
//! [`save_release`] indexes a downloaded release into an [`FrsStore`];
//! [`Frs`] serves tables from the store for a requested year, uprating them
//! when only an earlier year is stored.

pub mod dataset;
pub mod error;
pub mod save;
pub mod store;

pub use dataset::{Frs, base_year_for, codebook_for, describe_variable};
pub use error::{FrsError, Result};
pub use save::{SaveOptions, SaveSummary, SavedTable, save_release, save_tables};
pub use store::{CODEBOOK_FILE, FrsStore, StagedYear};
