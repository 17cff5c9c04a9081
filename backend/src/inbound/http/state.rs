//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{FollowGraph, UserDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User listing, lookup, and lifecycle.
    pub directory: Arc<dyn UserDirectory>,
    /// Directed follow relationships.
    pub follow_graph: Arc<dyn FollowGraph>,
}

impl HttpState {
    /// Bundle the port implementations handlers depend on.
    pub fn new(directory: Arc<dyn UserDirectory>, follow_graph: Arc<dyn FollowGraph>) -> Self {
        Self {
            directory,
            follow_graph,
        }
    }
}
