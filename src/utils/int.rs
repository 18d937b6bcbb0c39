/// Parses a whole token as a signed index.
#[inline]
pub(crate) fn parse(token: &str) -> Option<i32> {
    token.parse().ok()
}

#[cfg(test)]
#[path = "tests/int.rs"]
mod tests;
