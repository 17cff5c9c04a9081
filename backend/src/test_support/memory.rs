//! In-memory implementations of the directory and follow graph ports.
//!
//! Shares one store between both ports so cascade semantics (destroying a
//! user removes their posts and edges) behave like the transactional
//! adapter. Orderings match the port contracts: users by id ascending,
//! posts newest first, follow listings by edge recency then user id.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::ports::{DirectoryError, FollowGraph, FollowGraphError, UserDirectory};
use crate::domain::{
    EmailAddress, FollowEdge, NewUser, PasswordDigest, Post, PostId, User, UserChanges, UserId,
    UserName,
};
use crate::inbound::http::state::HttpState;

struct StoredUser {
    user: User,
    digest: PasswordDigest,
}

struct StoredEdge {
    follower: UserId,
    followed: UserId,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct StoreInner {
    users: Vec<StoredUser>,
    posts: Vec<Post>,
    edges: Vec<StoredEdge>,
}

/// Shared in-memory store backing both ports.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle this store's ports into handler state.
    pub fn http_state(&self) -> HttpState {
        HttpState::new(
            Arc::new(InMemoryDirectory(self.clone())),
            Arc::new(InMemoryFollowGraph(self.clone())),
        )
    }

    /// Insert a user fixture, hashing the given password.
    ///
    /// # Panics
    /// Panics on invalid fixture input; tests supply well-formed values.
    pub fn seed_user(&self, name: &str, email: &str, password: &str, admin: bool) -> User {
        let password = crate::domain::Password::try_from_parts(password, password)
            .expect("fixture password");
        let digest = PasswordDigest::hash(&password).expect("fixture digest");
        let user = User {
            id: UserId::random(),
            name: UserName::new(name).expect("fixture name"),
            email: EmailAddress::new(email).expect("fixture email"),
            admin,
            created_at: Utc::now(),
        };
        let mut inner = self.inner.lock().expect("store lock");
        inner.users.push(StoredUser {
            user: user.clone(),
            digest,
        });
        user
    }

    /// Insert a post fixture authored by `author`.
    ///
    /// # Panics
    /// Panics when the store mutex is poisoned.
    pub fn seed_post(&self, author: &UserId, content: &str, created_at: DateTime<Utc>) -> Post {
        let post = Post {
            id: PostId::random(),
            author_id: *author,
            content: content.to_owned(),
            created_at,
        };
        let mut inner = self.inner.lock().expect("store lock");
        inner.posts.push(post.clone());
        post
    }

    /// Insert a follow edge fixture with an explicit timestamp.
    ///
    /// # Panics
    /// Panics when the store mutex is poisoned.
    pub fn seed_edge(&self, follower: &UserId, followed: &UserId, created_at: DateTime<Utc>) {
        let mut inner = self.inner.lock().expect("store lock");
        inner.edges.push(StoredEdge {
            follower: *follower,
            followed: *followed,
            created_at,
        });
    }

    /// Number of stored users.
    ///
    /// # Panics
    /// Panics when the store mutex is poisoned.
    pub fn user_count(&self) -> usize {
        self.inner.lock().expect("store lock").users.len()
    }

    /// Number of stored edges, regardless of direction.
    ///
    /// # Panics
    /// Panics when the store mutex is poisoned.
    pub fn edge_count(&self) -> usize {
        self.inner.lock().expect("store lock").edges.len()
    }

    /// Number of stored posts.
    ///
    /// # Panics
    /// Panics when the store mutex is poisoned.
    pub fn post_count(&self) -> usize {
        self.inner.lock().expect("store lock").posts.len()
    }

    /// Fetch a stored user by id.
    ///
    /// # Panics
    /// Panics when the store mutex is poisoned.
    pub fn user(&self, id: &UserId) -> Option<User> {
        let inner = self.inner.lock().expect("store lock");
        inner
            .users
            .iter()
            .find(|stored| stored.user.id == *id)
            .map(|stored| stored.user.clone())
    }
}

fn window_items<T: Clone>(sorted: &[T], window: PageRequest) -> Vec<T> {
    let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
    sorted
        .iter()
        .skip(offset)
        .take(window.per_page() as usize)
        .cloned()
        .collect()
}

/// In-memory [`UserDirectory`] implementation.
pub struct InMemoryDirectory(InMemoryStore);

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn list(&self, window: PageRequest) -> Result<Page<User>, DirectoryError> {
        let inner = self.0.inner.lock().map_err(|_| poisoned_directory())?;
        let mut users: Vec<User> = inner.users.iter().map(|stored| stored.user.clone()).collect();
        users.sort_by_key(|user| *user.id.as_uuid());
        let total = users.len() as u64;
        Ok(Page::new(window_items(&users, window), window, total))
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DirectoryError> {
        let inner = self.0.inner.lock().map_err(|_| poisoned_directory())?;
        Ok(inner
            .users
            .iter()
            .find(|stored| stored.user.id == *id)
            .map(|stored| stored.user.clone()))
    }

    async fn authenticate(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Option<User>, DirectoryError> {
        let inner = self.0.inner.lock().map_err(|_| poisoned_directory())?;
        Ok(inner
            .users
            .iter()
            .find(|stored| stored.user.email == *email)
            .filter(|stored| stored.digest.verify(password))
            .map(|stored| stored.user.clone()))
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DirectoryError> {
        let mut inner = self.0.inner.lock().map_err(|_| poisoned_directory())?;
        if inner
            .users
            .iter()
            .any(|stored| stored.user.email == new_user.email)
        {
            return Err(DirectoryError::EmailTaken);
        }
        let user = User {
            id: new_user.id,
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            admin: false,
            created_at: Utc::now(),
        };
        inner.users.push(StoredUser {
            user: user.clone(),
            digest: new_user.digest.clone(),
        });
        Ok(user)
    }

    async fn update(&self, id: &UserId, changes: &UserChanges) -> Result<User, DirectoryError> {
        let mut inner = self.0.inner.lock().map_err(|_| poisoned_directory())?;
        if inner
            .users
            .iter()
            .any(|stored| stored.user.id != *id && stored.user.email == changes.email)
        {
            return Err(DirectoryError::EmailTaken);
        }
        let stored = inner
            .users
            .iter_mut()
            .find(|stored| stored.user.id == *id)
            .ok_or(DirectoryError::NotFound)?;
        stored.user.name = changes.name.clone();
        stored.user.email = changes.email.clone();
        if let Some(digest) = &changes.digest {
            stored.digest = digest.clone();
        }
        Ok(stored.user.clone())
    }

    async fn destroy(&self, id: &UserId) -> Result<(), DirectoryError> {
        let mut inner = self.0.inner.lock().map_err(|_| poisoned_directory())?;
        let before = inner.users.len();
        inner.users.retain(|stored| stored.user.id != *id);
        if inner.users.len() == before {
            return Err(DirectoryError::NotFound);
        }
        inner.posts.retain(|post| post.author_id != *id);
        inner
            .edges
            .retain(|edge| edge.follower != *id && edge.followed != *id);
        Ok(())
    }

    async fn posts(
        &self,
        author: &UserId,
        window: PageRequest,
    ) -> Result<Page<Post>, DirectoryError> {
        let inner = self.0.inner.lock().map_err(|_| poisoned_directory())?;
        let mut posts: Vec<Post> = inner
            .posts
            .iter()
            .filter(|post| post.author_id == *author)
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        let total = posts.len() as u64;
        Ok(Page::new(window_items(&posts, window), window, total))
    }

    async fn post_count(&self, author: &UserId) -> Result<u64, DirectoryError> {
        let inner = self.0.inner.lock().map_err(|_| poisoned_directory())?;
        Ok(inner
            .posts
            .iter()
            .filter(|post| post.author_id == *author)
            .count() as u64)
    }
}

fn poisoned_directory() -> DirectoryError {
    DirectoryError::query("store mutex poisoned")
}

fn poisoned_graph() -> FollowGraphError {
    FollowGraphError::query("store mutex poisoned")
}

/// In-memory [`FollowGraph`] implementation.
pub struct InMemoryFollowGraph(InMemoryStore);

impl InMemoryFollowGraph {
    fn related_users(
        &self,
        user: &UserId,
        window: PageRequest,
        by_followed: bool,
    ) -> Result<Page<User>, FollowGraphError> {
        let inner = self.0.inner.lock().map_err(|_| poisoned_graph())?;
        let mut related: Vec<(DateTime<Utc>, UserId)> = inner
            .edges
            .iter()
            .filter_map(|edge| {
                if by_followed && edge.followed == *user {
                    Some((edge.created_at, edge.follower))
                } else if !by_followed && edge.follower == *user {
                    Some((edge.created_at, edge.followed))
                } else {
                    None
                }
            })
            .collect();
        related.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.as_uuid().cmp(b.1.as_uuid())));
        let users: Vec<User> = related
            .iter()
            .filter_map(|(_, id)| {
                inner
                    .users
                    .iter()
                    .find(|stored| stored.user.id == *id)
                    .map(|stored| stored.user.clone())
            })
            .collect();
        let total = users.len() as u64;
        Ok(Page::new(window_items(&users, window), window, total))
    }
}

#[async_trait]
impl FollowGraph for InMemoryFollowGraph {
    async fn follow(&self, edge: &FollowEdge) -> Result<(), FollowGraphError> {
        let mut inner = self.0.inner.lock().map_err(|_| poisoned_graph())?;
        let both_exist = [edge.follower(), edge.followed()].iter().all(|id| {
            inner
                .users
                .iter()
                .any(|stored| stored.user.id == **id)
        });
        if !both_exist {
            return Err(FollowGraphError::UnknownUser);
        }
        let already = inner
            .edges
            .iter()
            .any(|stored| stored.follower == *edge.follower() && stored.followed == *edge.followed());
        if !already {
            inner.edges.push(StoredEdge {
                follower: *edge.follower(),
                followed: *edge.followed(),
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn unfollow(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<(), FollowGraphError> {
        let mut inner = self.0.inner.lock().map_err(|_| poisoned_graph())?;
        inner
            .edges
            .retain(|edge| !(edge.follower == *follower && edge.followed == *followed));
        Ok(())
    }

    async fn is_following(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<bool, FollowGraphError> {
        let inner = self.0.inner.lock().map_err(|_| poisoned_graph())?;
        Ok(inner
            .edges
            .iter()
            .any(|edge| edge.follower == *follower && edge.followed == *followed))
    }

    async fn followers(
        &self,
        user: &UserId,
        window: PageRequest,
    ) -> Result<Page<User>, FollowGraphError> {
        self.related_users(user, window, true)
    }

    async fn following(
        &self,
        user: &UserId,
        window: PageRequest,
    ) -> Result<Page<User>, FollowGraphError> {
        self.related_users(user, window, false)
    }

    async fn followers_count(&self, user: &UserId) -> Result<u64, FollowGraphError> {
        let inner = self.0.inner.lock().map_err(|_| poisoned_graph())?;
        Ok(inner.edges.iter().filter(|edge| edge.followed == *user).count() as u64)
    }

    async fn following_count(&self, user: &UserId) -> Result<u64, FollowGraphError> {
        let inner = self.0.inner.lock().map_err(|_| poisoned_graph())?;
        Ok(inner.edges.iter().filter(|edge| edge.follower == *user).count() as u64)
    }
}
