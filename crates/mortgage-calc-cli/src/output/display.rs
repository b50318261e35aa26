//! Human-facing number formatting: pounds and pence with thousands
//! separators.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Result and assumption keys holding sterling amounts.
const MONEY_FIELDS: [&str; 3] = ["monthly_payment", "total_repaid", "amount"];

pub fn is_money_field(key: &str) -> bool {
    MONEY_FIELDS.contains(&key)
}

/// Insert `,` between every group of three integer digits. A leading sign
/// and any fractional part are left alone.
pub fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Round to pence (midpoint away from zero).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `£1,234.57`
pub fn format_money(value: Decimal) -> String {
    format!("£{}", group_thousands(&format!("{:.2}", round_money(value))))
}

/// Money formatting for a JSON value if it holds a decimal string or number.
pub fn money_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("166749.74"), "166,749.74");
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("-1234567.891"), "-1,234,567.891");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(555.83247796)), "£555.83");
        assert_eq!(format_money(dec!(112500)), "£112,500.00");
        assert_eq!(format_money(dec!(0.005)), "£0.01");
    }

    #[test]
    fn test_money_fields() {
        assert!(is_money_field("monthly_payment"));
        assert!(is_money_field("total_repaid"));
        assert!(!is_money_field("years"));
    }

    #[test]
    fn test_money_value() {
        assert_eq!(money_value(&Value::String("375.5".into())), Some(dec!(375.5)));
        assert_eq!(money_value(&Value::Bool(true)), None);
    }
}
