//! Trip loading.
//!
//! - [`types`]: `TripRecord`, `FilteredTripSet`, `LoadError`
//! - [`loader`]: CSV parsing, derived fields, filter application

pub mod loader;
pub mod types;

pub use loader::{TIMESTAMP_FORMAT, load, load_from_reader};
pub use types::{FilteredTripSet, LoadError, TripRecord};
