use serde::Deserialize;

use crate::rates::ExchangeRates;

/// Import-duty approximation applied to Yen-sourced goods.
pub const YEN_TAX: f64 = 0.9;
/// Import-duty approximation applied to Euro-sourced goods.
pub const EURO_TAX: f64 = 0.88;

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub name: String,
    pub image: String,
    pub price_euro: f64,
    pub price_yen: f64,
    pub price_hkd: f64,
}

/// The fixed list of sellable items, parsed once at startup from the
/// embedded catalog file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Catalog {
    pub bags: Vec<Product>,
    pub watches: Vec<Product>,
}

impl Catalog {
    pub fn load() -> anyhow::Result<Self> {
        Ok(toml::from_str(include_str!("../catalog.toml"))?)
    }
}

/// A catalog entry with per-request HKD conversions. Absent fields mean
/// the corresponding rate was unavailable.
#[derive(Debug, Clone)]
pub struct PricedProduct {
    pub name: String,
    pub image: String,
    pub price_euro: f64,
    pub price_yen: f64,
    pub price_hkd: f64,
    pub hkd_from_yen: Option<f64>,
    pub hkd_from_yen_tax: Option<f64>,
    pub hkd_from_euro: Option<f64>,
    pub hkd_from_euro_tax: Option<f64>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Pure function of (catalog, rates): derives HKD prices and their taxed
/// variants for every entry. Never touches the network or the store.
pub fn with_conversion(products: &[Product], rates: &ExchangeRates) -> Vec<PricedProduct> {
    products
        .iter()
        .map(|p| {
            let hkd_from_yen = rates.yen.map(|rate| round2(p.price_yen * rate));
            let hkd_from_yen_tax = hkd_from_yen.map(|hkd| round2(hkd * YEN_TAX));
            let hkd_from_euro = rates.euro.map(|rate| round2(p.price_euro * rate));
            let hkd_from_euro_tax = hkd_from_euro.map(|hkd| round2(hkd * EURO_TAX));
            PricedProduct {
                name: p.name.clone(),
                image: p.image.clone(),
                price_euro: p.price_euro,
                price_yen: p.price_yen,
                price_hkd: p.price_hkd,
                hkd_from_yen,
                hkd_from_yen_tax,
                hkd_from_euro,
                hkd_from_euro_tax,
            }
        })
        .collect()
}
