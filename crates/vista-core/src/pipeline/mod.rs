//! Image acquisition pipeline components.
//!
//! Candidates flow through these stages strictly in order:
//! - **fetch**: Download the bytes behind a URL
//! - **validate**: Size, format, dimension, and aspect-ratio gates
//! - **name**: Deterministic filename from the URL
//! - **dedup**: Skip URLs already stored in this run
//! - **persist**: Write accepted bytes under `images/`
//! - **collector**: Orchestrates the stages for one source

pub mod collector;
pub mod dedup;
pub mod fetch;
pub mod name;
pub mod persist;
pub mod validate;

// Re-exports for convenient access
pub use collector::{Collector, Outcome, Pipeline};
pub use dedup::SeenUrls;
pub use fetch::Fetcher;
pub use persist::Persister;
pub use validate::{Rejection, Validation, Validator};
