//! Authentication module: the login flow and the per-resource owner guard.

pub mod guard;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;
