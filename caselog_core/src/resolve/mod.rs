//! Ordered-rule resolvers for structured fields.
//!
//! Simpler siblings of the category engine: the age band resolver and the
//! anesthesia type mapper both scan an ordered table and stop at the first
//! match.

pub mod age;
pub mod anesthesia;
