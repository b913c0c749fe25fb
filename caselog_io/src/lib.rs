#![warn(
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
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]

//! Thin I/O glue around the classification engine.
//!
//! CSV pair ingestion, output writing, validation reporting and the JSON
//! export consumed by the external form-filling client. Nothing in here
//! classifies anything; it moves rows in and typed results out.

pub mod csv_io;
pub mod export;
pub mod report;

pub use csv_io::{discover_csv_pairs, read_csv_pairs, write_output_csv};
pub use export::{export_to_json, generate_import_template};
pub use report::ValidationReport;
