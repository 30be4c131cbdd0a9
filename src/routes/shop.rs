use askama::Template;
use axum::extract::{Form, State};
use axum::response::Response;
use serde::Deserialize;

use crate::catalog::{round2, with_conversion, PricedProduct};
use crate::error::AppResult;
use crate::extractors::SessionUser;
use crate::flash::{self, Flash, FlashMessage};
use crate::routes::Html;
use crate::state::AppState;

const API_ERROR: &str =
    "Failed to retrieve the exchange rate. Conversion is not available at the moment.";
const YEN_RATE_ERROR: &str = "Could not retrieve the Yen exchange rate. Please try again later.";
const EURO_RATE_ERROR: &str = "Could not retrieve the Euro exchange rate. Please try again later.";
const PARSE_ERROR: &str = "Please enter a valid number for Yen or Euro amount.";

#[derive(Clone, Copy)]
enum Section {
    Bags,
    Watches,
}

impl Section {
    fn heading(&self) -> &'static str {
        match self {
            Section::Bags => "For Her",
            Section::Watches => "For Him",
        }
    }
}

#[derive(Template)]
#[template(path = "pages/shop.html")]
pub struct ShopTemplate {
    pub user: Option<String>,
    pub messages: Vec<FlashMessage>,
    pub heading: &'static str,
    pub action: &'static str,
    pub products: Vec<PricedProduct>,
    pub api_error: Option<String>,
    pub error: Option<String>,
    pub hkd_amount_yen: Option<f64>,
    pub hkd_amount_euro: Option<f64>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ConvertForm {
    pub yen_amount: String,
    pub euro_amount: String,
}

/// GET /for_her
pub async fn for_her(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Flash(messages): Flash,
) -> AppResult<Response> {
    render_shop(state, user, messages, Section::Bags, None).await
}

/// POST /for_her - same page with the submitted amounts converted
pub async fn for_her_convert(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Flash(messages): Flash,
    Form(form): Form<ConvertForm>,
) -> AppResult<Response> {
    render_shop(state, user, messages, Section::Bags, Some(form)).await
}

/// GET /for_him
pub async fn for_him(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Flash(messages): Flash,
) -> AppResult<Response> {
    render_shop(state, user, messages, Section::Watches, None).await
}

/// POST /for_him
pub async fn for_him_convert(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Flash(messages): Flash,
    Form(form): Form<ConvertForm>,
) -> AppResult<Response> {
    render_shop(state, user, messages, Section::Watches, Some(form)).await
}

async fn render_shop(
    state: AppState,
    user: Option<String>,
    messages: Vec<FlashMessage>,
    section: Section,
    form: Option<ConvertForm>,
) -> AppResult<Response> {
    let rates = state.rates.fetch().await;

    let items = match section {
        Section::Bags => &state.catalog.bags,
        Section::Watches => &state.catalog.watches,
    };
    let products = with_conversion(items, &rates);

    let api_error = rates.incomplete().then(|| API_ERROR.to_string());

    let mut error = None;
    let mut hkd_amount_yen = None;
    let mut hkd_amount_euro = None;

    if let Some(form) = form {
        match parse_amounts(&form) {
            Ok((yen_amount, euro_amount)) => {
                if yen_amount > 0.0 {
                    match rates.yen {
                        Some(rate) => hkd_amount_yen = Some(round2(yen_amount * rate)),
                        None => error = Some(YEN_RATE_ERROR.to_string()),
                    }
                }
                if euro_amount > 0.0 {
                    match rates.euro {
                        Some(rate) => hkd_amount_euro = Some(round2(euro_amount * rate)),
                        None => error = Some(EURO_RATE_ERROR.to_string()),
                    }
                }
            }
            Err(_) => error = Some(PARSE_ERROR.to_string()),
        }
    }

    let had_messages = !messages.is_empty();
    Ok(flash::displayed(
        had_messages,
        Html(ShopTemplate {
            user,
            messages,
            heading: section.heading(),
            action: match section {
                Section::Bags => "/for_her",
                Section::Watches => "/for_him",
            },
            products,
            api_error,
            error,
            hkd_amount_yen,
            hkd_amount_euro,
        }),
    ))
}

/// Empty inputs count as zero; anything else must parse as a float.
fn parse_amounts(form: &ConvertForm) -> Result<(f64, f64), std::num::ParseFloatError> {
    let yen = match form.yen_amount.trim() {
        "" => 0.0,
        raw => raw.parse()?,
    };
    let euro = match form.euro_amount.trim() {
        "" => 0.0,
        raw => raw.parse()?,
    };
    Ok((yen, euro))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_amounts_parse_as_zero() {
        let form = ConvertForm::default();
        assert_eq!(parse_amounts(&form).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn numeric_amounts_parse() {
        let form = ConvertForm {
            yen_amount: "980000".to_string(),
            euro_amount: " 12.5 ".to_string(),
        };
        assert_eq!(parse_amounts(&form).unwrap(), (980000.0, 12.5));
    }

    #[test]
    fn garbage_amounts_fail_to_parse() {
        let form = ConvertForm {
            yen_amount: "lots".to_string(),
            euro_amount: "".to_string(),
        };
        assert!(parse_amounts(&form).is_err());
    }
}
