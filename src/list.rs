//! `;`-separated list values.
//!
//! Splitting is not escape-aware: an element can never contain `;`. A single
//! trailing `;` is a terminator, not an empty last element. Interior empty
//! elements are kept.

/// Iterator over the trimmed elements of a list value.
#[derive(Debug, Clone)]
pub(crate) struct Items<'a> {
    inner: Option<std::str::Split<'a, char>>,
}

pub(crate) fn items(value: &str) -> Items<'_> {
    let body = value.strip_suffix(';').unwrap_or(value);
    Items {
        inner: (!value.is_empty()).then(|| body.split(';')),
    }
}

impl<'a> Iterator for Items<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.inner
            .as_mut()?
            .next()
            .map(|item| item.trim_matches(|c: char| c.is_ascii_whitespace()))
    }
}
