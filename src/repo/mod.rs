/// Repository module
///
/// This module provides the data access layer for the application. Each
/// submodule owns the queries for one aggregate: users and tokens, sets,
/// cards, links, progress, and the metric event log with its read-side
/// aggregations.
///
/// The repository pattern abstracts away the details of database access
/// and provides a clean API for the rest of the application to use.

mod user_repo;
mod set_repo;
mod card_repo;
mod link_repo;
mod progress_repo;
mod metric_repo;

// Re-export all repository functions
pub use user_repo::*;
pub use set_repo::*;
pub use card_repo::*;
pub use link_repo::*;
pub use progress_repo::*;
pub use metric_repo::*;
