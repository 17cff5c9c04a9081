//! Request and response payload shapes for the users API.

use pagination::{Page, PageRequest, DEFAULT_PER_PAGE};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ApiResult, Error, Post, User};

use super::flash::Flash;

/// Pagination query parameters accepted by listing endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number; defaults to 1.
    pub page: Option<u32>,
    /// Window size; defaults to 30.
    pub per_page: Option<u32>,
}

impl PageQuery {
    /// Validate the query into a page window.
    pub fn window(&self) -> ApiResult<PageRequest> {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
        .map_err(|error| Error::invalid_request(error.to_string()))
    }
}

/// Window metadata reported alongside every listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Page number this window covers (1-based).
    pub page: u32,
    /// Window size the listing was fetched with.
    pub per_page: u32,
    /// Total items in the listing, independent of the window.
    pub total_count: u64,
    /// Number of pages covering the listing.
    pub total_pages: u64,
    /// Whether a further page exists.
    pub has_next: bool,
    /// Whether a previous page exists.
    pub has_previous: bool,
}

impl PaginationMeta {
    /// Derive the metadata from a page envelope.
    pub fn of<T>(page: &Page<T>) -> Self {
        Self {
            page: page.page(),
            per_page: page.per_page(),
            total_count: page.total(),
            total_pages: page.total_pages(),
            has_next: page.has_next(),
            has_previous: page.has_previous(),
        }
    }
}

/// `GET /users` response body.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    /// One window of users, ordered by id ascending.
    pub users: Vec<User>,
    /// Window metadata.
    pub pagination: PaginationMeta,
}

/// `GET /users/{id}` response body.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// The profiled user.
    pub user: User,
    /// Total posts authored, independent of the feed window.
    pub post_count: u64,
    /// Users this user follows.
    pub following_count: u64,
    /// Users following this user.
    pub followers_count: u64,
    /// One window of the user's posts, newest first.
    pub posts: Vec<Post>,
    /// Feed window metadata.
    pub pagination: PaginationMeta,
}

/// `GET /users/{id}/following` and `/followers` response body.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowListResponse {
    /// One window of related users, most recent relationship first.
    pub users: Vec<User>,
    /// Users the subject follows.
    pub following_count: u64,
    /// Users following the subject.
    pub followers_count: u64,
    /// Window metadata.
    pub pagination: PaginationMeta,
}

/// Registration form fields, echoed back for redisplay on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    /// Submitted (or current) name.
    pub name: String,
    /// Submitted (or current) email.
    pub email: String,
}

/// `GET /users/new` and `GET /users/{id}/edit` response body.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    /// Values to prefill the form with.
    pub user: FormValues,
    /// Pending flash notice, consumed by this render.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

/// `POST /users` request body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    /// Requested display name.
    pub name: String,
    /// Requested email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Plaintext password confirmation.
    pub password_confirmation: String,
}

/// `PUT /users/{id}` request body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRequest {
    /// Requested display name.
    pub name: String,
    /// Requested email address.
    pub email: String,
    /// Replacement plaintext password; blank keeps the current one.
    pub password: String,
    /// Confirmation for the replacement password.
    pub password_confirmation: String,
}

/// `POST /signin` request body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SigninRequest {
    /// Account email address.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// `GET /signin` and `GET /` response body.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageShell {
    /// Pending flash notice, consumed by this render.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}
