//! Flash notices carried across a redirect in the session.
//!
//! A flash is written by the request that redirects and consumed by the next
//! request that renders, mirroring the classic post/redirect/get flow.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message class for a flash notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    /// A completed action worth celebrating.
    Success,
    /// Guidance for the requester.
    Notice,
}

/// A one-shot notice for the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Flash {
    /// Message class.
    pub kind: FlashKind,
    /// Human-readable text.
    pub message: String,
}

impl Flash {
    /// Build a success flash.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    /// Build a notice flash.
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Notice,
            message: message.into(),
        }
    }
}
