//! Package-size heuristics over free-form size and promo text.
//!
//! Best effort only: the output is advisory and downstream consumers treat
//! quantity/unit as hints, never as a verified conversion.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use cartwise_core::Unit;

static QTY_OZ_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*oz\b").expect("valid regex"));

static QTY_LB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*lbs?\b").expect("valid regex"));

static QTY_CT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:count|ct)\b").expect("valid regex"));

static QTY_PK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:pkg|pack|pk)\b").expect("valid regex"));

static DOZEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdozen\b").expect("valid regex"));

static EACH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:each|ea)\b").expect("valid regex"));

static PER_LB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:per\s+)?lbs?\b").expect("valid regex"));

/// Infer a `(quantity, unit)` pair from free-form size text.
///
/// Checks run in a fixed order, first match wins: explicit ounce/pound/count
/// quantities, pack sizes, `dozen` (12 ct), `each` (1 ct), then a bare
/// `per lb`/`lb` with no quantity. `(None, None)` when nothing matches.
#[must_use]
pub fn extract(text: &str) -> (Option<Decimal>, Option<Unit>) {
    if let Some(qty) = capture_qty(&QTY_OZ_RE, text) {
        return (Some(qty), Some(Unit::Oz));
    }
    if let Some(qty) = capture_qty(&QTY_LB_RE, text) {
        return (Some(qty), Some(Unit::Lb));
    }
    if let Some(qty) = capture_qty(&QTY_CT_RE, text) {
        return (Some(qty), Some(Unit::Ct));
    }
    if let Some(qty) = capture_qty(&QTY_PK_RE, text) {
        return (Some(qty), Some(Unit::Ct));
    }
    if DOZEN_RE.is_match(text) {
        return (Some(Decimal::from(12)), Some(Unit::Ct));
    }
    if EACH_RE.is_match(text) {
        return (Some(Decimal::ONE), Some(Unit::Ct));
    }
    if PER_LB_RE.is_match(text) {
        return (None, Some(Unit::Lb));
    }
    (None, None)
}

fn capture_qty(re: &Regex, text: &str) -> Option<Decimal> {
    re.captures(text)?[1].parse().ok()
}

/// First size-hint keyword present in a card's flattened text, used to fill
/// `size_text` when the page offers no dedicated size field.
#[must_use]
pub fn size_hint(text: &str) -> Option<&'static str> {
    static HINTS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
        [
            ("per lb", r"(?i)\bper\s+lb\b"),
            ("lb", r"(?i)\blb\b"),
            ("oz", r"(?i)\boz\b"),
            ("dozen", r"(?i)\bdozen\b"),
            ("each", r"(?i)\beach\b"),
            ("ea", r"(?i)\bea\b"),
            ("ct", r"(?i)\bct\b"),
            ("pk", r"(?i)\bpk\b"),
            ("pack", r"(?i)\bpack\b"),
        ]
        .into_iter()
        .map(|(hint, pattern)| (hint, Regex::new(pattern).expect("valid regex")))
        .collect()
    });

    HINTS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(hint, _)| *hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn ounces_with_space() {
        assert_eq!(extract("32 oz"), (Some(dec("32")), Some(Unit::Oz)));
    }

    #[test]
    fn ounces_without_space() {
        assert_eq!(extract("16oz jar"), (Some(dec("16")), Some(Unit::Oz)));
    }

    #[test]
    fn fractional_ounces() {
        assert_eq!(extract("14.5 oz can"), (Some(dec("14.5")), Some(Unit::Oz)));
    }

    #[test]
    fn pounds_singular_and_plural() {
        assert_eq!(extract("5 lb bag"), (Some(dec("5")), Some(Unit::Lb)));
        assert_eq!(extract("3 lbs"), (Some(dec("3")), Some(Unit::Lb)));
    }

    #[test]
    fn count_spelled_out() {
        assert_eq!(extract("12 count"), (Some(dec("12")), Some(Unit::Ct)));
    }

    #[test]
    fn count_abbreviated() {
        assert_eq!(extract("6 ct"), (Some(dec("6")), Some(Unit::Ct)));
    }

    #[test]
    fn pack_maps_to_count() {
        assert_eq!(extract("4 pack"), (Some(dec("4")), Some(Unit::Ct)));
        assert_eq!(extract("6 pk"), (Some(dec("6")), Some(Unit::Ct)));
        assert_eq!(extract("2 pkg"), (Some(dec("2")), Some(Unit::Ct)));
    }

    #[test]
    fn dozen_is_twelve_count() {
        assert_eq!(extract("dozen"), (Some(dec("12")), Some(Unit::Ct)));
    }

    #[test]
    fn each_is_one_count() {
        assert_eq!(extract("each"), (Some(dec("1")), Some(Unit::Ct)));
        assert_eq!(extract("89¢ ea"), (Some(dec("1")), Some(Unit::Ct)));
    }

    #[test]
    fn per_lb_has_unit_without_quantity() {
        assert_eq!(extract("per lb"), (None, Some(Unit::Lb)));
    }

    #[test]
    fn standalone_lb_has_unit_without_quantity() {
        assert_eq!(extract("price / lb"), (None, Some(Unit::Lb)));
    }

    #[test]
    fn empty_text_matches_nothing() {
        assert_eq!(extract(""), (None, None));
    }

    #[test]
    fn plain_name_matches_nothing() {
        assert_eq!(extract("Boneless Chicken Breast"), (None, None));
    }

    #[test]
    fn quantity_beats_bare_unit_regardless_of_position() {
        // "per lb" appears first in the text, but the explicit ounce quantity
        // rule runs earlier in the check order.
        assert_eq!(
            extract("per lb or 24 oz tub"),
            (Some(dec("24")), Some(Unit::Oz))
        );
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(extract("32 OZ"), (Some(dec("32")), Some(Unit::Oz)));
    }

    #[test]
    fn size_hint_finds_first_keyword() {
        assert_eq!(size_hint("Fresh Atlantic Salmon $9.99 per lb"), Some("per lb"));
        assert_eq!(size_hint("Shredded Cheese 8 oz"), Some("oz"));
        assert_eq!(size_hint("Eggs, one dozen"), Some("dozen"));
        assert_eq!(size_hint("Boneless Chicken Breast"), None);
    }
}
