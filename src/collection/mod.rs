//! Client-side list state: the canonical list, the filter engine, and the
//! envelope handling for list payloads.

mod envelope;
mod filter;
mod store;

pub use envelope::extract_list;
pub use filter::{recompute_filtered, FilterCriteria, StatusFilter};
pub use store::{EntityCollection, LoadState};
