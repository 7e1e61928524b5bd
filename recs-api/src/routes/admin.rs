use super::{chrome, pages, PageResult};
use crate::views::render_admin_page;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use recs_app::AppContext;
use tower_sessions::Session;

/// Debug builds only; production answers 404.
pub async fn dashboard(State(ctx): State<AppContext>, session: Session) -> PageResult {
    if !ctx.config.debug {
        return Ok(pages::not_found().await);
    }
    let data = ctx.manage_trips.dashboard().await?;
    Ok(Html(render_admin_page(&chrome(&session).await, &data)).into_response())
}
