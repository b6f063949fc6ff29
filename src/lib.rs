//! Report upload server library.
//!
//! Upload pipeline (parse, validate against column mappings, store),
//! report lookups, contact form proxy and the HTTP layer around them.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
