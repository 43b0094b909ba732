//! Pricing — area, load-class multiplier, accessory costs, financing.
//!
//! `price = (base + volume × rate) × load multiplier + accessories`.
//! The commercial figures live in [`PriceList`], a plain serializable struct
//! with sensible defaults that can also be loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::accessory::AccessoryKind;
use crate::config::{Configuration, LoadClass};
use crate::error::PersistError;
use crate::geometry::floor_area;

/// Unit prices and financing terms. Amounts are in the quote currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceList {
    pub base_price: f64,
    /// Applied to the platform volume (length × width × height).
    pub price_per_cubic_meter: f64,
    pub straight_stair: f64,
    /// Higher than a straight stair; covers the extension platform.
    pub corner_stair: f64,
    pub railing_per_meter: f64,
    pub pallet_gate: f64,
    pub load_multiplier_250: f64,
    pub load_multiplier_350: f64,
    pub load_multiplier_500: f64,
    /// Nominal annual interest rate for the financing figures (0.069 = 6.9 %).
    pub annual_rate: f64,
}

impl Default for PriceList {
    fn default() -> Self {
        Self {
            base_price: 4500.0,
            price_per_cubic_meter: 42.0,
            straight_stair: 1650.0,
            corner_stair: 4200.0,
            railing_per_meter: 120.0,
            pallet_gate: 980.0,
            load_multiplier_250: 1.0,
            load_multiplier_350: 1.2,
            load_multiplier_500: 1.5,
            annual_rate: 0.069,
        }
    }
}

impl PriceList {
    /// Parse a price list; missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_multiplier(&self, class: LoadClass) -> f64 {
        match class {
            LoadClass::Light => self.load_multiplier_250,
            LoadClass::Medium => self.load_multiplier_350,
            LoadClass::Heavy => self.load_multiplier_500,
        }
    }
}

/// Financing terms, months.
pub const SHORT_TERM_MONTHS: u32 = 36;
pub const LONG_TERM_MONTHS: u32 = 60;

/// One priced accessory group, for quotes and exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}

/// Full price breakdown for a configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub area_m2: f64,
    pub volume_m3: f64,
    pub base_price: f64,
    pub dimension_price: f64,
    pub load_multiplier: f64,
    pub accessories_price: f64,
    pub price: f64,
    pub price_per_square_meter: f64,
    pub monthly_36: f64,
    pub monthly_60: f64,
    pub line_items: Vec<LineItem>,
}

/// Floor area in m², including the extension when a corner stair is present.
pub fn area(config: &Configuration) -> f64 {
    floor_area(config.length(), config.width(), config.has_corner_stair())
}

/// Volume of the main platform in m³.
pub fn volume(config: &Configuration) -> f64 {
    config.length() as f64 * config.width() as f64 * config.height() as f64 / 1e9
}

/// Level monthly payment for `principal` over `months` at `annual_rate`.
pub fn monthly_payment(principal: f64, annual_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return principal;
    }
    let n = months as f64;
    let r = annual_rate / 12.0;
    if r.abs() < 1e-12 {
        return principal / n;
    }
    principal * r / (1.0 - (1.0 + r).powf(-n))
}

/// Price with the default [`PriceList`].
pub fn compute_pricing(config: &Configuration) -> Pricing {
    compute_pricing_with(config, &PriceList::default())
}

pub fn compute_pricing_with(config: &Configuration, prices: &PriceList) -> Pricing {
    let mut straight = 0u32;
    let mut corner = 0u32;
    let mut gates = 0u32;
    for a in config.accessories() {
        match a.kind {
            AccessoryKind::Stair { variant } if variant.is_corner() => corner += a.quantity,
            AccessoryKind::Stair { .. } => straight += a.quantity,
            AccessoryKind::PalletGate { .. } => gates += a.quantity,
            AccessoryKind::Railing { .. } => {}
        }
    }
    let railing_m = config.railing_meters();

    let line_items: Vec<LineItem> = [
        ("Straight stair", straight as f64, prices.straight_stair),
        ("Corner stair with platform", corner as f64, prices.corner_stair),
        ("Railing (m)", railing_m as f64, prices.railing_per_meter),
        ("Pallet gate", gates as f64, prices.pallet_gate),
    ]
    .into_iter()
    .filter(|(_, quantity, _)| *quantity > 0.0)
    .map(|(label, quantity, unit_price)| LineItem {
        label: label.to_string(),
        quantity,
        unit_price,
        total: quantity * unit_price,
    })
    .collect();
    let accessories_price: f64 = line_items.iter().map(|i| i.total).sum();

    let area_m2 = area(config);
    let volume_m3 = volume(config);
    let dimension_price = volume_m3 * prices.price_per_cubic_meter;
    let load_multiplier = prices.load_multiplier(config.load_class());
    let price = (prices.base_price + dimension_price) * load_multiplier + accessories_price;
    let price_per_square_meter = if area_m2 > 0.0 { price / area_m2 } else { 0.0 };

    Pricing {
        area_m2,
        volume_m3,
        base_price: prices.base_price,
        dimension_price,
        load_multiplier,
        accessories_price,
        price,
        price_per_square_meter,
        monthly_36: monthly_payment(price, prices.annual_rate, SHORT_TERM_MONTHS),
        monthly_60: monthly_payment(price, prices.annual_rate, LONG_TERM_MONTHS),
        line_items,
    }
}
