/// Parses a whole token as `f32`.
///
/// Accepts an optional sign, a decimal mantissa, an optional exponent, and
/// `inf`/`nan`. Trailing garbage makes the token invalid.
#[inline]
pub(crate) fn parse(token: &str) -> Option<f32> {
    fast_float::parse::<f32, _>(token).ok()
}

/// Returns `true` if `token` matches `[-+]?[0-9]*\.?[0-9]+`.
///
/// This is narrower than [`parse`]: no exponent, no special values, and a
/// trailing `.` is rejected.
pub(crate) fn is_signed_decimal(token: &str) -> bool {
    let mut s = token.as_bytes();
    if let [b'-' | b'+', rest @ ..] = s {
        s = rest;
    }
    let int_len = s.iter().take_while(|b| b.is_ascii_digit()).count();
    s = &s[int_len..];
    match s {
        [] => int_len != 0,
        [b'.', frac @ ..] => !frac.is_empty() && frac.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/float.rs"]
mod tests;
