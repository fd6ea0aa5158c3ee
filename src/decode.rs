//! Scalar decoders shared by the getters and the serde deserializer.
//!
//! Errors are short static reasons; callers attach the key and value.

/// Only these exact strings are false.
const FALSE_LITERALS: [&str; 4] = ["", "no", "false", "0"];

pub(crate) fn decode_bool(value: &str) -> bool {
    !FALSE_LITERALS.contains(&value)
}

/// Parse a C-style integer literal: optional leading ASCII whitespace, an
/// optional sign, then `0x`/`0X` hex, a leading-`0` octal, or decimal digits.
/// The whole string must be consumed.
pub(crate) fn parse_integer<T: TryFrom<i128>>(value: &str) -> Result<T, &'static str> {
    let s = value.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };

    if digits.is_empty() {
        return Err("expected an integer");
    }
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err("invalid integer literal");
    }

    let magnitude = u128::from_str_radix(digits, radix).map_err(|_| "integer out of range")?;
    let magnitude = i128::try_from(magnitude).map_err(|_| "integer out of range")?;
    let signed = if negative { -magnitude } else { magnitude };
    T::try_from(signed).map_err(|_| "integer out of range")
}

/// Parse a decimal or scientific floating point literal, with optional
/// leading ASCII whitespace.
pub(crate) fn parse_float<T: std::str::FromStr>(value: &str) -> Result<T, &'static str> {
    let s = value.trim_start_matches(|c: char| c.is_ascii_whitespace());
    s.parse::<T>().map_err(|_| "invalid floating point literal")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_false_set_is_exact() {
        for s in ["", "no", "false", "0"] {
            assert!(!decode_bool(s), "{s:?}");
        }
        for s in ["No", "FALSE", "0.0", "00", " 0", "off", "yes", "1"] {
            assert!(decode_bool(s), "{s:?}");
        }
    }

    #[test]
    fn decimal() {
        assert_eq!(parse_integer::<i32>("123"), Ok(123));
        assert_eq!(parse_integer::<i32>("-123"), Ok(-123));
        assert_eq!(parse_integer::<i32>("+7"), Ok(7));
        assert_eq!(parse_integer::<i32>("0"), Ok(0));
    }

    #[test]
    fn hex_and_octal() {
        assert_eq!(parse_integer::<i32>("0x123"), Ok(0x123));
        assert_eq!(parse_integer::<i32>("0XfF"), Ok(255));
        assert_eq!(parse_integer::<i32>("-0x10"), Ok(-16));
        assert_eq!(parse_integer::<u32>("0755"), Ok(0o755));
        assert_eq!(parse_integer::<u32>("00"), Ok(0));
    }

    #[test]
    fn leading_whitespace_allowed_trailing_not() {
        assert_eq!(parse_integer::<i64>("  \t42"), Ok(42));
        assert!(parse_integer::<i64>("42 ").is_err());
    }

    #[test]
    fn rejects_malformed() {
        assert!(parse_integer::<i32>("").is_err());
        assert!(parse_integer::<i32>("-").is_err());
        assert!(parse_integer::<i32>("0x").is_err());
        assert!(parse_integer::<i32>("08").is_err());
        assert!(parse_integer::<i32>("12abc").is_err());
        assert!(parse_integer::<i32>("1_000").is_err());
        assert!(parse_integer::<i32>("--1").is_err());
        assert!(parse_integer::<i32>("+-1").is_err());
    }

    #[test]
    fn range_is_checked_per_type() {
        assert_eq!(parse_integer::<i32>("2147483647"), Ok(i32::MAX));
        assert!(parse_integer::<i32>("2147483648").is_err());
        assert_eq!(parse_integer::<i32>("-2147483648"), Ok(i32::MIN));
        assert_eq!(parse_integer::<u64>("0xffffffffffffffff"), Ok(u64::MAX));
        assert!(parse_integer::<u64>("-1").is_err());
        assert!(parse_integer::<u8>("256").is_err());
        assert!(parse_integer::<i64>("999999999999999999999999999999999999999999").is_err());
    }

    #[test]
    fn floats() {
        assert_eq!(parse_float::<f64>("1.5"), Ok(1.5));
        assert_eq!(parse_float::<f64>(" -2.5e2"), Ok(-250.0));
        assert_eq!(parse_float::<f64>("3"), Ok(3.0));
        assert!(parse_float::<f64>("inf").unwrap().is_infinite());
        assert!(parse_float::<f64>("1.5x").is_err());
        assert!(parse_float::<f64>("").is_err());
    }
}
