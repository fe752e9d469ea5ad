//! CLI command implementations

pub mod alt;
pub mod categories;
pub mod completions;
pub mod marking;
pub mod resolve;
pub mod search;
pub mod show;
