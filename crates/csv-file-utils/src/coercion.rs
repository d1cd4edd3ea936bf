//! Scalar coercion applied to every decoded field on the read path.

use crate::values::CsvValue;

/// Decides how a raw field token becomes a [`CsvValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercionPolicy {
    /// Strip surrounding whitespace before anything else
    pub trim: bool,

    /// `true` / `false` (exact, case-sensitive) become booleans
    pub parse_booleans: bool,

    /// Tokens that are entirely a decimal literal become numbers
    pub parse_numbers: bool,

    /// Keep tokens such as `007` as strings instead of numbers
    pub preserve_leading_zeros: bool,
}

impl Default for CoercionPolicy {
    fn default() -> Self {
        Self {
            trim: true,
            parse_booleans: true,
            parse_numbers: true,
            preserve_leading_zeros: false,
        }
    }
}

impl CoercionPolicy {
    /// Every token is kept verbatim as a string
    pub fn none() -> Self {
        Self {
            trim: false,
            parse_booleans: false,
            parse_numbers: false,
            preserve_leading_zeros: false,
        }
    }

    pub fn coerce(&self, token: &str) -> CsvValue {
        let token = if self.trim { token.trim() } else { token };

        if self.parse_booleans {
            match token {
                "true" => return CsvValue::Bool(true),
                "false" => return CsvValue::Bool(false),
                _ => {}
            }
        }

        if self.parse_numbers && is_numeric_literal(token, self.preserve_leading_zeros) {
            if let Ok(n) = token.parse::<f64>() {
                return CsvValue::Number(n);
            }
        }

        CsvValue::String(token.to_string())
    }
}

/// `[+-]?(digits[.digits?]|.digits)([eE][+-]?digits)?`
///
/// Rejects what `f64::from_str` would otherwise accept (`inf`, `NaN`, ...).
fn is_numeric_literal(token: &str, preserve_leading_zeros: bool) -> bool {
    let bytes = token.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    if preserve_leading_zeros && int_digits > 1 && bytes[int_start] == b'0' {
        return false;
    }

    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }

    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = CoercionPolicy::default();
        assert_eq!(policy.coerce(" 30 "), CsvValue::Number(30.0));
        assert_eq!(policy.coerce("-1.5e3"), CsvValue::Number(-1500.0));
        assert_eq!(policy.coerce(".5"), CsvValue::Number(0.5));
        assert_eq!(policy.coerce("5."), CsvValue::Number(5.0));
        assert_eq!(policy.coerce("true"), CsvValue::Bool(true));
        assert_eq!(policy.coerce(" false"), CsvValue::Bool(false));
        assert_eq!(policy.coerce(" Alice "), CsvValue::from("Alice"));
    }

    #[test]
    fn test_non_numeric_tokens_stay_strings() {
        let policy = CoercionPolicy::default();
        for token in ["", "inf", "NaN", "infinity", "0x1F", "1e", "1.2.3", "+", ".", "12abc", "TRUE"] {
            assert_eq!(policy.coerce(token), CsvValue::from(token), "token {:?}", token);
        }
    }

    #[test]
    fn test_leading_zeros() {
        assert_eq!(CoercionPolicy::default().coerce("007"), CsvValue::Number(7.0));

        let policy = CoercionPolicy {
            preserve_leading_zeros: true,
            ..Default::default()
        };
        assert_eq!(policy.coerce("007"), CsvValue::from("007"));
        assert_eq!(policy.coerce("0"), CsvValue::Number(0.0));
        assert_eq!(policy.coerce("0.25"), CsvValue::Number(0.25));
    }

    #[test]
    fn test_none_policy() {
        let policy = CoercionPolicy::none();
        assert_eq!(policy.coerce(" 1 "), CsvValue::from(" 1 "));
        assert_eq!(policy.coerce("true"), CsvValue::from("true"));
    }
}
