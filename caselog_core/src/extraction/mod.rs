//! Pattern-based finding extraction.
//!
//! This module applies compiled concept pattern sets to clinical free text
//! and emits typed, confidence-scored findings with evidence snippets.

pub mod engine;
