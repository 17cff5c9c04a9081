//! Resolves the session into an explicit [`Identity`] value.

use crate::domain::ports::UserDirectory;
use crate::domain::{ApiResult, Identity};

use super::error::map_directory_error;
use super::session::SessionContext;

/// Resolve the request's identity from its session.
///
/// A missing session, a malformed session value, or a session naming a user
/// that no longer exists all resolve to [`Identity::Anonymous`]; only store
/// failures surface as errors.
pub async fn resolve_identity(
    session: &SessionContext,
    directory: &dyn UserDirectory,
) -> ApiResult<Identity> {
    let Some(id) = session.user_id()? else {
        return Ok(Identity::Anonymous);
    };
    let user = directory.get(&id).await.map_err(map_directory_error)?;
    Ok(user.as_ref().map_or(Identity::Anonymous, Identity::of))
}
