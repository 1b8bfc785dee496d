//! URL fragment key/value codec.
//!
//! Fragments look like `#x=10&z=-4&zoom=2`. Values are kept verbatim (no
//! percent-decoding) so whatever encoding the producer used survives.

use std::collections::BTreeMap;

pub type FragmentArgs = BTreeMap<String, String>;

/// Splits a fragment into its arguments.
///
/// A leading `#` is optional. Each `&`-separated part is split on its first
/// `=`; a part without `=` maps to the empty string. Later duplicates win.
pub fn parse(fragment: &str) -> FragmentArgs {
    let mut args = FragmentArgs::new();
    let body = fragment.strip_prefix('#').unwrap_or(fragment);
    if body.is_empty() {
        return args;
    }

    for part in body.split('&') {
        let (key, value) = part.split_once('=').unwrap_or((part, ""));
        args.insert(key.to_string(), value.to_string());
    }
    args
}

/// Parses the leading integer of `s`, ignoring any trailing garbage.
///
/// `"2.7"` yields 2, `"0x1f"` yields 31 and `"abc"` yields `None`, as
/// browsers' `parseInt` does without an explicit radix.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = split_sign(s);
    let (radix, digits) = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, rest),
    };
    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Overlong digit runs saturate instead of failing.
    let magnitude = i64::from_str_radix(&digits[..end], radix).unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses the leading decimal number of `s`, ignoring any trailing garbage.
///
/// Accepts an optional sign, a fractional part and an exponent. Non-finite
/// results are rejected.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
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

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_equals_only() {
        let args = parse("#a=1&b=x=y&c");
        assert_eq!(args.get("a").map(String::as_str), Some("1"));
        assert_eq!(args.get("b").map(String::as_str), Some("x=y"));
        assert_eq!(args.get("c").map(String::as_str), Some(""));
    }

    #[test]
    fn empty_fragment_has_no_args() {
        assert!(parse("").is_empty());
        assert!(parse("#").is_empty());
    }

    #[test]
    fn values_are_not_decoded() {
        let args = parse("name=a%20b");
        assert_eq!(args["name"], "a%20b");
    }

    #[test]
    fn later_duplicates_override() {
        let args = parse("#x=1&x=2");
        assert_eq!(args["x"], "2");
    }

    #[test]
    fn int_prefix_behaves_like_parse_int() {
        assert_eq!(parse_int_prefix("2"), Some(2));
        assert_eq!(parse_int_prefix("2.7"), Some(2));
        assert_eq!(parse_int_prefix(" -3px"), Some(-3));
        assert_eq!(parse_int_prefix("+4"), Some(4));
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn int_prefix_reads_hex() {
        assert_eq!(parse_int_prefix("0x1"), Some(1));
        assert_eq!(parse_int_prefix("0X1f"), Some(31));
        assert_eq!(parse_int_prefix("-0xAzz"), Some(-10));
        assert_eq!(parse_int_prefix("0x"), None);
        assert_eq!(parse_int_prefix("0xg"), None);
        assert_eq!(parse_int_prefix("010"), Some(10));
    }

    #[test]
    fn float_prefix_behaves_like_parse_float() {
        assert_eq!(parse_float_prefix("10"), Some(10.0));
        assert_eq!(parse_float_prefix("-12.5abc"), Some(-12.5));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("3."), Some(3.0));
        assert_eq!(parse_float_prefix("1e3"), Some(1000.0));
        assert_eq!(parse_float_prefix("2e"), Some(2.0));
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("x1"), None);
        assert_eq!(parse_float_prefix("1e999"), None);
    }
}
