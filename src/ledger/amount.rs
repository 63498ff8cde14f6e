//! Lenient numeric parsing for operator-entered strings.
//!
//! Every record keeps what the operator typed. Numbers are only produced at
//! consumption time, and anything that does not start with a number counts as
//! zero instead of raising an error.

/// Parses the leading decimal number of `input`, or `0.0` when there is none.
pub fn parse_amount(input: &str) -> f64 {
    parse_decimal_prefix(input).unwrap_or(0.0)
}

/// Parses the leading decimal number of `input`.
///
/// Leading whitespace is skipped, an optional sign, digits with an optional
/// fraction, and an optional exponent are consumed, and whatever follows is
/// ignored. Returns `None` when no digit was found.
pub fn parse_decimal_prefix(input: &str) -> Option<f64> {
    let text = input.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}

/// Parses the leading integer of `input` (`"12.7"` yields 12).
pub fn parse_counter(input: &str) -> Option<i64> {
    let text = input.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digit_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digit_start {
        return None;
    }
    text[..end].parse::<i64>().ok()
}

/// Formats `value` with exactly two decimals; negative zero prints as `0.00`.
pub fn format_fixed2(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.2}")
}

/// Sums the lenient parse of every value.
pub fn sum_amounts<'a>(values: impl IntoIterator<Item = &'a str>) -> f64 {
    values.into_iter().map(parse_amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_garbage_are_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("   "), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("."), 0.0);
        assert_eq!(parse_amount("-"), 0.0);
    }

    #[test]
    fn leading_number_is_kept() {
        assert_eq!(parse_amount("12.5"), 12.5);
        assert_eq!(parse_amount("  42abc"), 42.0);
        assert_eq!(parse_amount("-3.25"), -3.25);
        assert_eq!(parse_amount(".5"), 0.5);
        assert_eq!(parse_amount("7."), 7.0);
        assert_eq!(parse_amount("1e3"), 1000.0);
        assert_eq!(parse_amount("2e"), 2.0);
    }

    #[test]
    fn counter_truncates_fraction() {
        assert_eq!(parse_counter("12.7"), Some(12));
        assert_eq!(parse_counter(" -4"), Some(-4));
        assert_eq!(parse_counter("x1"), None);
        assert_eq!(parse_counter(""), None);
    }

    #[test]
    fn fixed_two_decimals() {
        assert_eq!(format_fixed2(120.0), "120.00");
        assert_eq!(format_fixed2(-0.0), "0.00");
        assert_eq!(format_fixed2(3.14159), "3.14");
    }

    #[test]
    fn sum_skips_unparseable_values() {
        assert_eq!(sum_amounts(["10", "", "oops", "2.5"]), 12.5);
    }
}
