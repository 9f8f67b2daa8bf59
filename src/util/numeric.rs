//! Parsing for free-text numeric form fields.
//!
//! Users type prices and quantities with either `.` or `,` as the decimal
//! separator, and fields are often mid-edit (empty, `"-"`, `"3,"`). The rule
//! everywhere in the app: normalize the comma, try to parse, and fall back to
//! the field's default instead of erroring.

/// Parse a decimal field, defaulting to `0.0` for anything unparseable.
pub fn parse_decimal(input: &str) -> f64 {
    parse_decimal_or(input, 0.0)
}

/// Parse a decimal field with an explicit default. Non-finite parses
/// (overflowing exponents and the like) also fall back to the default.
pub fn parse_decimal_or(input: &str, default: f64) -> f64 {
    let normalized = input.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => default,
    }
}

/// Parse a count field that must stay at least 1 (package sizes, planned
/// batch quantities used as denominators).
pub fn parse_count(input: &str) -> u32 {
    let normalized = input.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 1.0 => value as u32,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimals() {
        assert_eq!(parse_decimal("4.50"), 4.5);
        assert_eq!(parse_decimal("  12 "), 12.0);
    }

    #[test]
    fn normalizes_comma_separator() {
        assert_eq!(parse_decimal("4,50"), 4.5);
        assert_eq!(parse_decimal("0,05"), 0.05);
    }

    #[test]
    fn unparseable_text_yields_default() {
        assert_eq!(parse_decimal(""), 0.0);
        assert_eq!(parse_decimal("abc"), 0.0);
        assert_eq!(parse_decimal("3,2,1"), 0.0);
        assert_eq!(parse_decimal_or("", 1.0), 1.0);
        assert_eq!(parse_decimal_or("oops", 1.0), 1.0);
    }

    #[test]
    fn negative_values_pass_through() {
        assert_eq!(parse_decimal("-2,5"), -2.5);
    }

    #[test]
    fn non_finite_parses_fall_back() {
        assert_eq!(parse_decimal("inf"), 0.0);
        assert_eq!(parse_decimal("NaN"), 0.0);
        assert_eq!(parse_decimal("1e999"), 0.0);
    }

    #[test]
    fn counts_floor_at_one() {
        assert_eq!(parse_count("6"), 6);
        assert_eq!(parse_count("2,9"), 2);
        assert_eq!(parse_count("0"), 1);
        assert_eq!(parse_count("-3"), 1);
        assert_eq!(parse_count(""), 1);
    }
}
