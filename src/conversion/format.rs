//! Amount formatting

/// Format an amount with at most two decimals, dropping trailing zeros
///
/// `2.50` renders as `2.5`, `3.00` as `3`. Amounts that round to zero never
/// render as `-0`.
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };

    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_whole_numbers() {
        assert_eq!(format_amount(3.0), "3");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(768.0), "768");
        assert_eq!(format_amount(100.0), "100");
    }

    #[test]
    fn test_format_strips_trailing_zeros() {
        assert_eq!(format_amount(2.5), "2.5");
        assert_eq!(format_amount(2.50), "2.5");
        assert_eq!(format_amount(1.75), "1.75");
        assert_eq!(format_amount(10.10), "10.1");
    }

    #[test]
    fn test_format_rounds_to_two_decimals() {
        assert_eq!(format_amount(1.0 / 3.0), "0.33");
        assert_eq!(format_amount(2.0 / 3.0), "0.67");
        assert_eq!(format_amount(0.5999999999998806), "0.6");
        assert_eq!(format_amount(1.999), "2");
        assert_eq!(format_amount(0.001), "0");
        assert_eq!(format_amount(-0.001), "0");
    }

    #[test]
    fn test_format_stays_within_half_a_hundredth() {
        for amount in [0.004, 0.126, 1.0 / 7.0, 12.3456, 99.995, 1234.5678] {
            let formatted = format_amount(amount);
            assert!(!formatted.ends_with('.'), "{}", formatted);
            let parsed: f64 = formatted.parse().unwrap();
            assert!((parsed - amount).abs() <= 0.005 + 1e-12, "{} -> {}", amount, formatted);
        }
    }

    #[test]
    fn test_format_is_idempotent() {
        for amount in [0.0, 0.125, 1.0 / 3.0, 2.5, 3.0, 47.999, 1234.5678] {
            let once = format_amount(amount);
            let twice = format_amount(once.parse().unwrap());
            assert_eq!(once, twice);
        }
    }
}
