use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Parses a percentage such as `"12.5%"`, `" -3 "` or `"1.2e1"`.
///
/// Returns `None` for empty text, spreadsheet error tokens (`#N/A`, `#VALUE!`,
/// `#NAME?`, ...) and anything that is not a decimal number. Callers that need a
/// value substitute zero.
pub fn parse_percent(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() || is_error_token(trimmed) {
        return None;
    }

    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    if number.is_empty() {
        return None;
    }

    Decimal::from_str(number)
        .or_else(|_| Decimal::from_scientific(number))
        .ok()
}

/// Parses a JSON cell holding either a number or percentage text.
pub fn parse_percent_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_percent(&number.to_string()),
        Value::String(text) => parse_percent(text),
        _ => None,
    }
}

pub(crate) fn is_error_token(text: &str) -> bool {
    text.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn strips_percent_sign_and_whitespace() {
        assert_eq!(parse_percent("12.5%"), Some(dec!(12.5)));
        assert_eq!(parse_percent("  -3.25 % "), Some(dec!(-3.25)));
        assert_eq!(parse_percent("7"), Some(dec!(7)));
    }

    #[test]
    fn spreadsheet_error_tokens_are_missing() {
        assert_eq!(parse_percent("#N/A"), None);
        assert_eq!(parse_percent("#VALUE!"), None);
        assert_eq!(parse_percent("#NAME?"), None);
        assert_eq!(parse_percent("#DIV/0!"), None);
    }

    #[test]
    fn non_numeric_and_empty_text_is_missing() {
        assert_eq!(parse_percent(""), None);
        assert_eq!(parse_percent("   "), None);
        assert_eq!(parse_percent("%"), None);
        assert_eq!(parse_percent("abc"), None);
        assert_eq!(parse_percent("12.5abc"), None);
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(parse_percent("1.5e1"), Some(dec!(15)));
    }

    #[test]
    fn json_cells() {
        assert_eq!(parse_percent_value(&json!(4.25)), Some(dec!(4.25)));
        assert_eq!(parse_percent_value(&json!(-2)), Some(dec!(-2)));
        assert_eq!(parse_percent_value(&json!("8%")), Some(dec!(8)));
        assert_eq!(parse_percent_value(&json!(null)), None);
        assert_eq!(parse_percent_value(&json!(["1"])), None);
    }
}
