use std::fmt::Write;

pub const ASK_PRICE_LABEL: &str = "Price on Request";
pub const CURRENCY_SYMBOL: &str = "\u{20B9}";
pub const AREA_UNIT: &str = "sq.ft";

/// Price line for a popup: rupees with Indian digit grouping when the price
/// is positive, the "ask" label otherwise.
pub fn price_label(price: Option<f64>) -> String {
    match price.filter(|p| p.is_finite() && *p > 0.0) {
        Some(amount) => format_inr(amount),
        None => ASK_PRICE_LABEL.to_string(),
    }
}

/// Whole rupees, e.g. `2500000.0` -> `₹25,00,000`.
pub fn format_inr(amount: f64) -> String {
    let rupees = amount.max(0.0).round() as u64;
    let mut out = String::from(CURRENCY_SYMBOL);
    out.push_str(&group_indian(&rupees.to_string()));
    out
}

pub fn format_area(area: f64) -> String {
    let mut out = String::new();
    if area.fract().abs() < f64::EPSILON {
        out.push_str(&group_indian(&(area.max(0.0) as u64).to_string()));
    } else {
        let fixed = format!("{:.2}", area.max(0.0));
        let fixed = fixed.trim_end_matches('0').trim_end_matches('.');
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed, ""));
        out.push_str(&group_indian(int_part));
        if !frac_part.is_empty() {
            let _ = write!(out, ".{frac_part}");
        }
    }
    let _ = write!(out, " {AREA_UNIT}");
    out
}

/// Group a run of ASCII digits the Indian way: last three, then pairs.
pub fn group_indian(digits: &str) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(len - 3);
    let mut out = String::with_capacity(len + len / 2);
    let lead = head.len() % 2;
    for (i, c) in head.chars().enumerate() {
        if i > 0 && (i + 2 - lead) % 2 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push(',');
    out.push_str(tail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_like_en_in() {
        assert_eq!(group_indian("0"), "0");
        assert_eq!(group_indian("999"), "999");
        assert_eq!(group_indian("1000"), "1,000");
        assert_eq!(group_indian("25000"), "25,000");
        assert_eq!(group_indian("250000"), "2,50,000");
        assert_eq!(group_indian("2500000"), "25,00,000");
        assert_eq!(group_indian("123456789"), "12,34,56,789");
    }

    #[test]
    fn positive_price_is_formatted_in_rupees() {
        assert_eq!(price_label(Some(2_500_000.0)), "\u{20B9}25,00,000");
        assert_eq!(price_label(Some(1_499.6)), "\u{20B9}1,500");
    }

    #[test]
    fn missing_or_non_positive_price_asks() {
        assert_eq!(price_label(None), ASK_PRICE_LABEL);
        assert_eq!(price_label(Some(0.0)), ASK_PRICE_LABEL);
        assert_eq!(price_label(Some(-5.0)), ASK_PRICE_LABEL);
        assert_eq!(price_label(Some(f64::NAN)), ASK_PRICE_LABEL);
    }

    #[test]
    fn formats_area() {
        assert_eq!(format_area(1200.0), "1,200 sq.ft");
        assert_eq!(format_area(2400.5), "2,400.5 sq.ft");
        assert_eq!(format_area(150000.25), "1,50,000.25 sq.ft");
    }
}
