//! Lenient numeric tokens
//!
//! Numbers are read the way C's `atof`/`atoi` read them: the longest numeric
//! prefix of the token counts, and a token with no numeric prefix reads as
//! zero. Anything short of a clean parse is logged.

/// Parse a float token, falling back to its numeric prefix or zero.
pub fn parse_float(token: &str) -> f32 {
    if let Ok(value) = token.parse::<f32>() {
        return value;
    }
    let value = float_prefix(token).parse::<f32>().unwrap_or(0.0);
    tracing::warn!("\"{}\" is not a clean number; read as {}", token, value);
    value
}

/// Parse an integer token, falling back to its numeric prefix or zero.
pub fn parse_int(token: &str) -> i64 {
    if let Ok(value) = token.parse::<i64>() {
        return value;
    }
    let value = int_prefix(token).parse::<i64>().unwrap_or(0);
    tracing::warn!("\"{}\" is not a clean integer; read as {}", token, value);
    value
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

fn int_prefix(token: &str) -> &str {
    let bytes = token.as_bytes();
    let sign = sign_len(bytes);
    let digits = count_digits(&bytes[sign..]);
    if digits == 0 {
        return "";
    }
    &token[..sign + digits]
}

// [sign] digits [. digits] [e [sign] digits], at least one mantissa digit
fn float_prefix(token: &str) -> &str {
    let bytes = token.as_bytes();
    let mut end = sign_len(bytes);

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = end + 1;
        let exp_sign = sign_len(&bytes[exp_start..]);
        let exp_digits = count_digits(&bytes[exp_start + exp_sign..]);
        if exp_digits > 0 {
            end = exp_start + exp_sign + exp_digits;
        }
    }
    &token[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_floats() {
        assert_eq!(parse_float("0.5"), 0.5);
        assert_eq!(parse_float("1"), 1.0);
        assert_eq!(parse_float("-0.25"), -0.25);
        assert_eq!(parse_float(".75"), 0.75);
        assert_eq!(parse_float("2.5e-1"), 0.25);
    }

    #[test]
    fn test_float_prefixes() {
        assert_eq!(parse_float("0.5}"), 0.5);
        assert_eq!(parse_float("1e-1x"), 0.1);
        assert_eq!(parse_float("3e"), 3.0);
        assert_eq!(parse_float("7.}"), 7.0);
    }

    #[test]
    fn test_non_numeric_floats_read_as_zero() {
        assert_eq!(parse_float("abc"), 0.0);
        assert_eq!(parse_float("-"), 0.0);
        assert_eq!(parse_float("."), 0.0);
        assert_eq!(parse_float(""), 0.0);
    }

    #[test]
    fn test_ints() {
        assert_eq!(parse_int("3"), 3);
        assert_eq!(parse_int("-12"), -12);
        assert_eq!(parse_int("12abc"), 12);
        assert_eq!(parse_int("x12"), 0);
        assert_eq!(parse_int("+"), 0);
    }
}
