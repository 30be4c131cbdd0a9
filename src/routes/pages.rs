use askama::Template;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::AppResult;
use crate::extractors::SessionUser;
use crate::flash::{self, Flash, FlashMessage};
use crate::routes::Html;

#[derive(Template)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub user: Option<String>,
    pub messages: Vec<FlashMessage>,
}

#[derive(Template)]
#[template(path = "pages/404.html")]
pub struct NotFoundTemplate {
    pub user: Option<String>,
    pub messages: Vec<FlashMessage>,
}

/// GET /about
pub async fn about(SessionUser(user): SessionUser, Flash(messages): Flash) -> AppResult<Response> {
    let had_messages = !messages.is_empty();
    Ok(flash::displayed(
        had_messages,
        Html(AboutTemplate { user, messages }),
    ))
}

/// Fallback for unmatched routes: the custom 404 page.
pub async fn not_found(SessionUser(user): SessionUser, Flash(messages): Flash) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(NotFoundTemplate { user, messages }),
    )
        .into_response()
}
