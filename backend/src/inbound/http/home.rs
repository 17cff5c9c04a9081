//! Application root shell; the post-signup and forbidden-denial target.

use actix_web::{get, HttpResponse};

use crate::domain::ApiResult;

use super::dto::PageShell;
use super::session::SessionContext;

/// Root shell, consuming any pending flash notice.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Root shell with any pending notice", body = PageShell)),
    tags = ["home"],
    operation_id = "home"
)]
#[get("/")]
pub async fn home(session: SessionContext) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(PageShell {
        flash: session.take_flash()?,
    }))
}
