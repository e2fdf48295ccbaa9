//! Locale-aware number parsing, working-day arithmetic and labeled-value
//! extraction.
//!
//! Source documents come from Scandinavian ERP exports, so numbers use `,`
//! as the decimal separator and `.` as a thousands separator. None of the
//! functions here fail: unparseable input degrades to `0` or an empty string.
use chrono::{Datelike, Days, NaiveDate, Weekday};
use regex::Regex;

/// Parses a number written with `.`/`,` separators.
///
/// Whitespace is stripped and the Unicode minus sign (U+2212) is treated as
/// `-`. Separator rules, applied in order:
///
/// 1. Both `.` and `,` present: every `.` is a thousands separator and the
///    first `,` is the decimal separator.
/// 2. Only `.` present: every `.` is a thousands separator, so `"1.900"`
///    is `1900`. Source values never carry a fraction written with `.`.
/// 3. Only `,` present: the first `,` is the decimal separator.
/// 4. Otherwise the string is parsed as is.
///
/// The longest numeric prefix is used, and `0.0` is returned when there is
/// none.
///
/// # Examples
///
/// ```
/// use docsheet_core::normalize::parse_locale_number;
///
/// assert_eq!(parse_locale_number("1.900,455"), 1900.455);
/// assert_eq!(parse_locale_number("1.900"), 1900.0);
/// assert_eq!(parse_locale_number("\u{2212}12,5"), -12.5);
/// assert_eq!(parse_locale_number(""), 0.0);
/// ```
pub fn parse_locale_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .collect();

    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };

    let normalized = match (body.contains('.'), body.contains(',')) {
        (true, true) => body.replace('.', "").replacen(',', ".", 1),
        (true, false) => body.replace('.', ""),
        (false, true) => body.replacen(',', ".", 1),
        (false, false) => body.to_owned(),
    };

    let value = parse_float_prefix(&normalized).unwrap_or(0.0);
    if negative { -value } else { value }
}

/// Parses the longest floating-point prefix of `raw`.
///
/// Leading whitespace is skipped and an optional sign, digits, a `.`
/// fraction and an exponent are accepted. Returns `None` when the prefix
/// holds no digit at all.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if frac_digits > 0 || int_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Parses the longest integer prefix of `raw` (optional sign, then digits).
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign..]);
    if digits == 0 {
        return None;
    }
    s[..sign + digits].parse::<i64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Returns the next weekday after `date`.
///
/// One day is added. A Saturday result moves on to Monday (+2) and a Sunday
/// result moves on to Monday (+1). Dates at the end of chrono's range are
/// returned unchanged.
pub fn next_working_day(date: NaiveDate) -> NaiveDate {
    let Some(next) = date.checked_add_days(Days::new(1)) else {
        return date;
    };
    let extra = match next.weekday() {
        Weekday::Sat => 2,
        Weekday::Sun => 1,
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu | Weekday::Fri => 0,
    };
    next.checked_add_days(Days::new(extra)).unwrap_or(next)
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns the word token after `"<label>:"` in `text`, or `""`.
///
/// Whitespace between the colon and the token is skipped. A token is a run
/// of ASCII letters, digits and underscores.
///
/// ```
/// use docsheet_core::normalize::extract_labeled_value;
///
/// let cell = "Customer order no: 4500123 (web)";
/// assert_eq!(extract_labeled_value(cell, "Customer order no"), "4500123");
/// assert_eq!(extract_labeled_value(cell, "Customer order ref"), "");
/// ```
pub fn extract_labeled_value(text: &str, label: &str) -> String {
    let pattern = format!(r"{}:\s*([A-Za-z0-9_]+)", regex::escape(label));
    let Ok(re) = Regex::new(&pattern) else {
        return String::new();
    };
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
        .unwrap_or_default()
}

/// Compiles a pattern literal.
///
/// Patterns passed here are string literals known to be valid; the
/// never-matching fallback only satisfies the type checker.
pub(crate) fn literal_regex(pattern: &str) -> Regex {
    Regex::new(pattern)
        .or_else(|_| Regex::new("a^"))
        .unwrap_or_else(|_| unreachable!("regex engine broken"))
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
    }

    #[test]
    fn dot_and_comma_use_comma_as_decimal() {
        assert_eq!(parse_locale_number("1.900,455"), 1900.455);
        assert_eq!(parse_locale_number("12.345.678,9"), 12_345_678.9);
    }

    #[test]
    fn dot_only_is_thousands_separator() {
        assert_eq!(parse_locale_number("1.900"), 1900.0);
        assert_eq!(parse_locale_number("1.234.567"), 1_234_567.0);
    }

    #[test]
    fn comma_only_is_decimal_separator() {
        assert_eq!(parse_locale_number("1,455"), 1.455);
        assert_eq!(parse_locale_number("0,5"), 0.5);
    }

    #[test]
    fn plain_numbers_parse_as_is() {
        assert_eq!(parse_locale_number("880"), 880.0);
        assert_eq!(parse_locale_number("-3"), -3.0);
    }

    #[test]
    fn whitespace_and_unicode_minus_are_normalized() {
        assert_eq!(parse_locale_number(" 1 900,50 "), 1900.5);
        assert_eq!(parse_locale_number("\u{2212}1.900,455"), -1900.455);
        assert_eq!(parse_locale_number("1\u{a0}000"), 1000.0);
    }

    #[test]
    fn garbage_yields_zero() {
        assert_eq!(parse_locale_number(""), 0.0);
        assert_eq!(parse_locale_number("   "), 0.0);
        assert_eq!(parse_locale_number("n/a"), 0.0);
        assert_eq!(parse_locale_number("-"), 0.0);
    }

    #[test]
    fn trailing_junk_is_ignored() {
        assert_eq!(parse_locale_number("12,5 SEK"), 12.5);
    }

    #[test]
    fn float_prefix_handles_edge_shapes() {
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("1e3x"), Some(1000.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("  -2.25abc"), Some(-2.25));
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("abc"), None);
    }

    #[test]
    fn int_prefix_stops_at_first_non_digit() {
        assert_eq!(parse_int_prefix("45,0"), Some(45));
        assert_eq!(parse_int_prefix(" 7 "), Some(7));
        assert_eq!(parse_int_prefix("-12x"), Some(-12));
        assert_eq!(parse_int_prefix(",5"), None);
        assert_eq!(parse_int_prefix(""), None);
    }

    #[test]
    fn friday_rolls_to_monday() {
        assert_eq!(next_working_day(date("2026-10-16")), date("2026-10-19"));
    }

    #[test]
    fn saturday_rolls_to_monday() {
        assert_eq!(next_working_day(date("2026-10-17")), date("2026-10-19"));
    }

    #[test]
    fn sunday_rolls_to_monday() {
        assert_eq!(next_working_day(date("2026-10-18")), date("2026-10-19"));
    }

    #[test]
    fn midweek_is_next_day() {
        assert_eq!(next_working_day(date("2026-10-14")), date("2026-10-15"));
        assert_eq!(next_working_day(date("2026-12-31")), date("2027-01-01"));
    }

    #[test]
    fn iso_format_is_zero_padded() {
        assert_eq!(format_iso_date(date("2026-01-05")), "2026-01-05");
    }

    #[test]
    fn labeled_value_takes_first_token() {
        assert_eq!(
            extract_labeled_value("Customer order no:   PO_778 extra", "Customer order no"),
            "PO_778"
        );
        assert_eq!(
            extract_labeled_value("Customer order ref:BZ991", "Customer order ref"),
            "BZ991"
        );
    }

    #[test]
    fn labeled_value_missing_label_is_empty() {
        assert_eq!(extract_labeled_value("Order: 1", "Customer order no"), "");
        assert_eq!(extract_labeled_value("Customer order no: ", "Customer order no"), "");
    }

    #[test]
    fn labeled_value_escapes_label() {
        assert_eq!(extract_labeled_value("Ref (a): X1", "Ref (a)"), "X1");
    }

    #[test]
    fn round_to_two_decimals() {
        assert_eq!(round_to(4.46000001, 2), 4.46);
        assert_eq!(round_to(2.345, 1), 2.3);
        assert_eq!(round_to(-1.005, 0), -1.0);
    }

    fn group_thousands(n: u64, sep: char) -> String {
        let digits = n.to_string();
        let mut out = String::new();
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(sep);
            }
            out.push(ch);
        }
        out
    }

    proptest! {
        #[test]
        fn dotted_thousands_round_trip(n in 0u64..10_000_000_000) {
            let text = group_thousands(n, '.');
            prop_assert_eq!(parse_locale_number(&text), n as f64);
        }

        #[test]
        fn dotted_thousands_with_comma_decimals(n in 0u64..1_000_000_000, cents in 0u64..100) {
            let text = format!("{},{cents:02}", group_thousands(n, '.'));
            let expected: f64 = format!("{n}.{cents:02}").parse().expect("float");
            prop_assert_eq!(parse_locale_number(&text), expected);
        }

        #[test]
        fn never_panics(s in ".{0,40}") {
            let _value = parse_locale_number(&s);
        }

        #[test]
        fn next_working_day_is_weekday_within_three_days(offset in 0u64..3650) {
            let start = date("2020-01-01") + Days::new(offset);
            let next = next_working_day(start);
            prop_assert!(!matches!(next.weekday(), Weekday::Sat | Weekday::Sun));
            let gap = (next - start).num_days();
            prop_assert!((1..=3).contains(&gap));
        }
    }
}
