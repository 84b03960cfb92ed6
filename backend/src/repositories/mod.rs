//! Persistence repositories.
//!
//! Repositories own the SQL for one entity each and report "no matching
//! row" as `Ok(None)`, distinct from query failures.

pub mod user_repository;
