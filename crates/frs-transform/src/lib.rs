//! Entity-level transformations over FRS tables.
//!
//! The pipeline runs raw table → [`index_table`] → (persisted) →
//! [`consolidate`] for one-to-many tables → [`join_frames`] when combining →
//! [`Uprater::apply`] when serving a year other than the stored one.

pub mod error;
pub mod frame;
pub mod ids;
pub mod indexer;
pub mod join;
pub mod reshape;
pub mod uprating;

pub use error::{Result, TransformError};
pub use frame::EntityFrame;
pub use ids::derive_ids;
pub use indexer::{index_table, infer_level, resolve_level};
pub use join::join_frames;
pub use reshape::consolidate;
pub use uprating::{GroupMultiplier, Uprater};
