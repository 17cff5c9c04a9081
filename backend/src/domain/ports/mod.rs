//! Port traits decoupling the domain from persistence adapters.

mod follow_graph;
mod user_directory;

pub use follow_graph::{FollowGraph, FollowGraphError};
pub use user_directory::{DirectoryError, UserDirectory};
