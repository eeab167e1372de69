//! AVVO Reviews Library
//!
//! Fetches lawyer reviews from the AVVO API through a read-through cache. The
//! modules are exposed for the binary and for integration tests.

pub mod cache;
pub mod cli;
pub mod data;
