//! chipdex: electronic component catalog lookup
//!
//! Resolves part numbers, filters components by structured constraints,
//! lists classified replacement parts, reverse-looks-up package markings and
//! drives category drill-down, all over an immutable in-memory catalog.

pub mod cli;
pub mod core;
pub mod entities;
pub mod yaml;
