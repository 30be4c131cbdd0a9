use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::extractors::cookie_value;

pub const FLASH_COOKIE: &str = "vitrine_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: Level,
    pub text: String,
}

pub fn success(text: impl Into<String>) -> FlashMessage {
    FlashMessage {
        level: Level::Success,
        text: text.into(),
    }
}

pub fn error(text: impl Into<String>) -> FlashMessage {
    FlashMessage {
        level: Level::Error,
        text: text.into(),
    }
}

/// Messages queued by the previous request, read from the flash cookie.
/// A request may queue several (the original flow flashes "file type not
/// allowed" and "post created" from one submit).
pub struct Flash(pub Vec<FlashMessage>);

impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let messages = cookie_value(parts, FLASH_COOKIE)
            .map(decode)
            .unwrap_or_default();
        Ok(Flash(messages))
    }
}

/// Set-Cookie value carrying `messages` to the next rendered page.
/// The JSON payload is hex-encoded to stay within RFC 6265 cookie-octets.
pub fn set_cookie(messages: &[FlashMessage]) -> String {
    let payload = hex::encode(serde_json::to_vec(messages).unwrap_or_default());
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age=60",
        FLASH_COOKIE, payload
    )
}

pub fn clear_cookie() -> String {
    format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
        FLASH_COOKIE
    )
}

fn decode(raw: &str) -> Vec<FlashMessage> {
    hex::decode(raw)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

/// 303 redirect carrying flash messages for the next page.
pub fn redirect(to: &str, messages: Vec<FlashMessage>) -> Response {
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, to.to_string()),
            (header::SET_COOKIE, set_cookie(&messages)),
        ],
        "",
    )
        .into_response()
}

/// Wrap a rendered page, clearing the flash cookie when messages were shown.
pub fn displayed(had_messages: bool, body: impl IntoResponse) -> Response {
    if had_messages {
        ([(header::SET_COOKIE, clear_cookie())], body).into_response()
    } else {
        body.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_roundtrips_multiple_messages() {
        let messages = vec![error("File type not allowed."), success("Post created!")];
        let cookie = set_cookie(&messages);

        let value = cookie
            .strip_prefix("vitrine_flash=")
            .unwrap()
            .split(';')
            .next()
            .unwrap();
        assert_eq!(decode(value), messages);
    }

    #[test]
    fn cookie_value_is_hex_only() {
        let cookie = set_cookie(&[success("hello, world; \"quoted\"")]);
        let value = cookie
            .strip_prefix("vitrine_flash=")
            .unwrap()
            .split(';')
            .next()
            .unwrap();
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn garbage_cookie_decodes_to_empty() {
        assert!(decode("zzzz").is_empty());
        assert!(decode("deadbeef").is_empty());
    }

    #[test]
    fn redirect_sets_location_and_flash() {
        let response = redirect("/", vec![success("ok")]);
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[test]
    fn displayed_clears_cookie_only_when_shown() {
        let with = displayed(true, "body");
        assert!(with.headers().contains_key(header::SET_COOKIE));

        let without = displayed(false, "body");
        assert!(!without.headers().contains_key(header::SET_COOKIE));
    }
}
