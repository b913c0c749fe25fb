#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! JSON configuration for the case-log pipeline.
//!
//! Configuration is loaded once at startup and shared read-only afterwards.
//! The default location is `~/caselog/config.json`; every field has a
//! default so a missing file only matters when the user asked for one.

mod schema;

pub use schema::{ColumnMap, Config, EngineSettings};
