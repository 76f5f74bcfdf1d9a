//! Free-form price text parsing.
//!
//! Retail pages advertise the same price a dozen ways: `"$5.99"`,
//! `"2 for $5"`, `"2/$5"`, `"99¢"`, or a bare JSON number. This module turns
//! any of them into an exact [`Decimal`], or `None` when nothing price-like is
//! present. Unparseable input is a normal outcome here, never an error —
//! extraction strategies probe thousands of low-quality candidates.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

static MULTI_BUY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:for|/)\s*\$\s*(\d+(?:\.\d{1,2})?)").expect("valid regex")
});

static DOLLAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s*(\d+(?:\.\d{1,2})?)").expect("valid regex"));

static BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d{1,2})?").expect("valid regex"));

static CENTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*¢").expect("valid regex"));

/// Parse a free-form price string into a decimal unit price.
///
/// Rules are tried in order, first match wins:
/// 1. Multi-buy `"<N> for $<T>"` / `"<N>/$<T>"` → `T / N` rounded to 2dp
///    (`N` must be a positive integer).
/// 2. Plain currency amount, `$`-prefixed preferred over a bare number; a
///    bare number immediately followed by `¢` is left to the cents rule.
/// 3. Cents `"<N>¢"` → `N / 100`.
///
/// Non-breaking spaces are normalized and thousands separators stripped
/// before matching. Returns `None` when no rule matches.
#[must_use]
pub fn parse(text: &str) -> Option<Decimal> {
    let text = text.replace('\u{a0}', " ").replace(',', "");

    if let Some(value) = parse_multi_buy(&text) {
        return Some(value);
    }
    if let Some(value) = parse_plain(&text) {
        return Some(value);
    }
    parse_cents(&text)
}

/// Parse a price out of a JSON value, as found in captured network payloads.
///
/// Numbers are cast directly; strings go through [`parse`]; an object is
/// probed for a nested `amount`/`value` field (the common
/// `"price": {"amount": 5.99}` shape). Anything else is `None`.
#[must_use]
pub fn from_json(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => decimal_from_number(n),
        serde_json::Value::String(s) => parse(s),
        serde_json::Value::Object(map) => {
            let nested = map.get("amount").or_else(|| map.get("value"))?;
            match nested {
                serde_json::Value::Number(n) => decimal_from_number(n),
                serde_json::Value::String(s) => parse(s),
                _ => None,
            }
        }
        _ => None,
    }
}

fn decimal_from_number(n: &serde_json::Number) -> Option<Decimal> {
    let repr = n.to_string();
    repr.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&repr))
        .ok()
}

fn parse_multi_buy(text: &str) -> Option<Decimal> {
    let caps = MULTI_BUY_RE.captures(text)?;
    let count: u32 = caps[1].parse().ok()?;
    if count == 0 {
        return None;
    }
    let total: Decimal = caps[2].parse().ok()?;
    Some((total / Decimal::from(count)).round_dp(2))
}

fn parse_plain(text: &str) -> Option<Decimal> {
    if let Some(caps) = DOLLAR_RE.captures(text) {
        return caps[1].parse().ok();
    }

    let m = BARE_RE.find(text)?;
    // A bare number that is really a cents amount ("99¢") belongs to the
    // cents rule, not this one.
    if text[m.end()..].trim_start().starts_with('¢') {
        return None;
    }
    m.as_str().parse().ok()
}

fn parse_cents(text: &str) -> Option<Decimal> {
    let caps = CENTS_RE.captures(text)?;
    let cents: Decimal = caps[1].parse().ok()?;
    Some(cents / Decimal::from(100))
}
