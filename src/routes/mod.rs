pub mod assets;
pub mod auth;
pub mod pages;
pub mod posts;
pub mod shop;
pub mod uploads;

use askama::Template;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::uploads::MAX_UPLOAD_BYTES;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(posts::index))
        .route("/create", get(posts::create_form).post(posts::create))
        .route("/{id}/edit/", get(posts::edit_form).post(posts::edit))
        .route("/{id}/delete/", post(posts::delete))
        .route("/about", get(pages::about))
        .route("/for_her", get(shop::for_her).post(shop::for_her_convert))
        .route("/for_him", get(shop::for_him).post(shop::for_him_convert))
        .route("/sign_in", get(auth::sign_in_form).post(auth::sign_in))
        .route("/sign_out", get(auth::sign_out))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/uploads/{filename}", get(uploads::serve))
        .route("/assets/{*path}", get(assets::serve))
        .fallback(pages::not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
