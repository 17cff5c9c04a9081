//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain ports backed by PostgreSQL via
//! Diesel with async support through `diesel-async` and `bb8` pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel rows and domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and schema definitions
//!   (`schema.rs`) never leak to the domain layer.
//! - **Strongly typed errors**: database failures are mapped to the port
//!   error types before they leave this module.

mod diesel_follow_graph;
mod diesel_user_directory;
mod models;
mod pool;
mod schema;

pub use diesel_follow_graph::DieselFollowGraph;
pub use diesel_user_directory::DieselUserDirectory;
pub use pool::{DbPool, PoolConfig, PoolError};
