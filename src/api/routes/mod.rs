//! Route handlers, grouped by resource.

pub mod auth;
pub mod checklists;
pub mod process;
