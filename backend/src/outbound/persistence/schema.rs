//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// User accounts.
    ///
    /// `email` carries a unique index on its lower-cased stored form; the
    /// adapter lower-cases values before they reach this table.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name (max 50 characters).
        name -> Varchar,
        /// Lower-cased unique email address (max 255 characters).
        email -> Varchar,
        /// Argon2id PHC string for the account credential.
        password_digest -> Varchar,
        /// Whether the account may destroy users.
        admin -> Bool,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Posts authored by users.
    posts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Authoring user; posts cascade when the author is destroyed.
        author_id -> Uuid,
        /// Post body.
        content -> Text,
        /// Authoring timestamp; profile feeds order by this, newest first.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow edges.
    ///
    /// The composite primary key makes an ordered pair unique, so a repeated
    /// follow is an `ON CONFLICT DO NOTHING` no-op.
    follows (follower_id, followed_id) {
        /// The user doing the following.
        follower_id -> Uuid,
        /// The user being followed.
        followed_id -> Uuid,
        /// Relationship timestamp; listings order by this, newest first.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, posts, follows);
