use askama::Template;
use axum::extract::{Form, State};
use axum::http::{header, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use serde::Deserialize;

use crate::auth::{self, session};
use crate::db::{users, StoreError};
use crate::error::{AppError, AppResult};
use crate::extractors::{SessionToken, SessionUser};
use crate::flash::{self, Flash, FlashMessage};
use crate::routes::Html;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/sign_in.html")]
pub struct SignInTemplate {
    pub user: Option<String>,
    pub messages: Vec<FlashMessage>,
}

#[derive(Template)]
#[template(path = "pages/register.html")]
pub struct RegisterTemplate {
    pub user: Option<String>,
    pub messages: Vec<FlashMessage>,
}

#[derive(Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

fn session_cookie(name: &str, token: &str, max_age_hours: u64) -> String {
    let max_age_secs = max_age_hours * 3600;
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        name, token, max_age_secs
    )
}

fn clear_session_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", name)
}

/// GET /sign_in
pub async fn sign_in_form(
    SessionUser(user): SessionUser,
    Flash(messages): Flash,
) -> AppResult<Response> {
    let had_messages = !messages.is_empty();
    Ok(flash::displayed(
        had_messages,
        Html(SignInTemplate { user, messages }),
    ))
}

/// POST /sign_in - verify credentials against the stored hash and open a
/// session holding the signed-in email
pub async fn sign_in(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Response> {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return Ok(flash::redirect(
            "/sign_in",
            vec![flash::error("Please fill in all fields.")],
        ));
    }

    let user = users::find_by_email(&state.db, email)?;

    match user {
        Some(user) if auth::verify_password(&form.password, &user.password_hash) => {
            let token =
                session::create_session(&state.db, &user.email, state.config.auth.session_hours)?;

            Ok((
                StatusCode::SEE_OTHER,
                AppendHeaders([
                    (header::LOCATION, "/".to_string()),
                    (
                        header::SET_COOKIE,
                        session_cookie(
                            &state.config.auth.cookie_name,
                            &token,
                            state.config.auth.session_hours,
                        ),
                    ),
                    (
                        header::SET_COOKIE,
                        flash::set_cookie(&[flash::success("Login successful!")]),
                    ),
                ]),
            )
                .into_response())
        }
        _ => Ok(flash::redirect(
            "/sign_in",
            vec![flash::error("Invalid email or password.")],
        )),
    }
}

/// GET /sign_out - drop the server-side session and clear the cookie
pub async fn sign_out(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> AppResult<Response> {
    if let Some(token) = token {
        if let Err(e) = session::delete_session(&state.db, &token) {
            tracing::warn!("Failed to delete session: {}", e);
        }
    }

    Ok((
        StatusCode::SEE_OTHER,
        AppendHeaders([
            (header::LOCATION, "/".to_string()),
            (
                header::SET_COOKIE,
                clear_session_cookie(&state.config.auth.cookie_name),
            ),
            (
                header::SET_COOKIE,
                flash::set_cookie(&[flash::success("You have been signed out.")]),
            ),
        ]),
    )
        .into_response())
}

/// GET /register
pub async fn register_form(
    SessionUser(user): SessionUser,
    Flash(messages): Flash,
) -> AppResult<Response> {
    let had_messages = !messages.is_empty();
    Ok(flash::displayed(
        had_messages,
        Html(RegisterTemplate { user, messages }),
    ))
}

/// POST /register - create an account with a hashed password
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Response> {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return Ok(flash::redirect(
            "/register",
            vec![flash::error("Please fill in all fields.")],
        ));
    }

    let hash = auth::hash_password(&form.password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    match users::create(&state.db, email, &hash) {
        Ok(_) => Ok(flash::redirect(
            "/sign_in",
            vec![flash::success(
                "Registration successful! You can now sign in.",
            )],
        )),
        Err(StoreError::DuplicateEmail) => Ok(flash::redirect(
            "/register",
            vec![flash::error(
                "Email already registered. Please choose another.",
            )],
        )),
        Err(e) => Err(e.into()),
    }
}
