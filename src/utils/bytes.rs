use std::mem;

/// Iterator over `\n`-separated lines of a text, yielding 1-based line numbers.
///
/// A trailing `\r` is left on the line; callers trim it with the rest of the
/// surrounding whitespace.
pub(crate) struct Lines<'a> {
    text: &'a str,
    iter: memchr::Memchr<'a>,
    next_start: usize,
    line_number: usize,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            iter: memchr::memchr_iter(b'\n', text.as_bytes()),
            next_start: 0,
            line_number: 0,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let end = match self.iter.next() {
            Some(end) => end,
            None => {
                if self.next_start >= self.text.len() {
                    return None;
                }
                self.text.len()
            }
        };
        let start = mem::replace(&mut self.next_start, end + 1);
        self.line_number += 1;
        // `\n` is ASCII, so both ends are on char boundaries.
        Some((self.line_number, &self.text[start..end]))
    }
}

/// Returns the part of `line` after its leading `tag`, trimmed.
pub(crate) fn rest_of_line<'a>(line: &'a str, tag: &str) -> &'a str {
    line.get(tag.len()..).unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines() {
        let v: Vec<_> = Lines::new("v 1\r\n\nf 1 2 3").collect();
        assert_eq!(v, [(1, "v 1\r"), (2, ""), (3, "f 1 2 3")]);
        let v: Vec<_> = Lines::new("a\n").collect();
        assert_eq!(v, [(1, "a")]);
        assert_eq!(Lines::new("").count(), 0);
        let v: Vec<_> = Lines::new("\u{e9}\n\u{e8}").collect();
        assert_eq!(v, [(1, "\u{e9}"), (2, "\u{e8}")]);
    }

    #[test]
    fn rest() {
        assert_eq!(rest_of_line("mtllib  my file.mtl ", "mtllib"), "my file.mtl");
        assert_eq!(rest_of_line("mtllib", "mtllib"), "");
    }
}
