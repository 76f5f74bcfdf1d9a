use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical unit tag for a parsed package size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Oz,
    Lb,
    Ct,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Oz => write!(f, "oz"),
            Unit::Lb => write!(f, "lb"),
            Unit::Ct => write!(f, "ct"),
        }
    }
}

/// A single advertised product price at a store, normalized for storage and
/// comparison across retailers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    /// Retailer/location identifier, e.g. `"food-lion-24503"`.
    pub store_id: String,
    /// Display name, trimmed, at most 120 characters.
    pub item: String,
    /// Free-form size/unit hint as seen on the page (e.g. `"per lb"`).
    #[serde(default)]
    pub size_text: String,
    /// Absolute shelf price as advertised, not the per-unit price.
    pub price: Decimal,
    /// Parsed quantity component of the size (e.g. `32` for `"32 oz"`).
    pub unit_qty: Option<Decimal>,
    pub unit: Option<Unit>,
    /// Promo validity window; defaults to today through today + 7 days when
    /// the source page gives no explicit dates.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Campaign label, e.g. `"Weekly Ad"`.
    pub promo_text: String,
    /// Origin URL of the advertisement page.
    pub source: String,
    /// Capture timestamp, UTC.
    pub fetched_at: DateTime<Utc>,
}

impl Deal {
    /// Price divided by parsed quantity, used to compare differently-sized
    /// packages of the same item. `None` when no positive quantity is known.
    ///
    /// Computed on demand and never stored.
    #[must_use]
    pub fn unit_price(&self) -> Option<Decimal> {
        match self.unit_qty {
            Some(qty) if qty > Decimal::ZERO => Some(self.price / qty),
            _ => None,
        }
    }
}
