//!
//! List marker grammar for item text that was never parsed as a list.
//!
//! Two marker classes are recognized:
//!
//! - bullets: `-`, `+` or `*`
//! - ordinals: one or more ASCII digits followed by `.`
//!
//! A marker may be indented and must be followed by exactly one whitespace character,
//! which belongs to the marker. `"- item"` carries a bullet, `"-item"` does not.

/// A single list marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Bullet(char),
    /// Number written before the `.`; saturates on overflow
    Ordinal(u64),
}

/// Marker classes a caller is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerSet {
    Bullets,
    Ordinals,
    Any,
}

impl MarkerSet {
    pub fn admits(self, marker: Marker) -> bool {
        matches!(
            (self, marker),
            (MarkerSet::Any, _) | (MarkerSet::Bullets, Marker::Bullet(_)) | (MarkerSet::Ordinals, Marker::Ordinal(_))
        )
    }
}

/// A marker found at the start of a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerMatch {
    pub marker: Marker,
    /// Bytes of leading whitespace before the marker
    pub indent: usize,
    /// Bytes consumed including indent, marker and the following whitespace character
    pub len: usize,
}

/// Parse a marker at the start of `text`, allowing leading whitespace.
pub fn parse_marker(text: &str) -> Option<MarkerMatch> {
    let body = text.trim_start();
    let indent = text.len() - body.len();

    let (marker, marker_len) = match body.chars().next()? {
        c @ ('-' | '+' | '*') => (Marker::Bullet(c), 1),
        c if c.is_ascii_digit() => {
            let digits = body.bytes().take_while(u8::is_ascii_digit).count();
            if body.as_bytes().get(digits) != Some(&b'.') {
                return None;
            }
            let value = body.as_bytes()[..digits]
                .iter()
                .fold(0u64, |acc, b| acc.saturating_mul(10).saturating_add(u64::from(b - b'0')));
            (Marker::Ordinal(value), digits + 1)
        }
        _ => return None,
    };

    let gap = body[marker_len..].chars().next().filter(|c| c.is_whitespace())?;
    Some(MarkerMatch {
        marker,
        indent,
        len: indent + marker_len + gap.len_utf8(),
    })
}

/// Whether `text` starts with a marker from `set`, at any indentation.
pub fn starts_with_marker(text: &str, set: MarkerSet) -> bool {
    parse_marker(text).is_some_and(|m| set.admits(m.marker))
}

/// Whether `text` reads as a numbered item: an ordinal marker at column zero.
pub fn is_ordinal_item(text: &str) -> bool {
    parse_marker(text).is_some_and(|m| m.indent == 0 && matches!(m.marker, Marker::Ordinal(_)))
}

/// Remove the whole leading run of markers from `set`.
///
/// `"- 1. item"` stripped with [`MarkerSet::Any`] yields `"item"`. Stripping stops at the
/// first marker outside `set`, so `"- 1. item"` stripped of bullets yields `"1. item"`.
/// Applying the function to its own output returns that output unchanged.
pub fn strip_markers(text: &str, set: MarkerSet) -> &str {
    let mut rest = text;
    while let Some(found) = parse_marker(rest).filter(|m| set.admits(m.marker)) {
        rest = &rest[found.len..];
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bullets() {
        let found = parse_marker("- item A").unwrap();
        assert_eq!(found.marker, Marker::Bullet('-'));
        assert_eq!(found.indent, 0);
        assert_eq!(found.len, 2);

        let found = parse_marker("  * item").unwrap();
        assert_eq!(found.marker, Marker::Bullet('*'));
        assert_eq!(found.indent, 2);
        assert_eq!(found.len, 4);

        assert!(parse_marker("-item").is_none());
        assert!(parse_marker("-").is_none());
        assert!(parse_marker("").is_none());
        assert!(parse_marker("item - A").is_none());
    }

    #[test]
    fn test_parse_ordinals() {
        let found = parse_marker("12. item").unwrap();
        assert_eq!(found.marker, Marker::Ordinal(12));
        assert_eq!(found.len, 4);

        assert!(parse_marker("1) item").is_none());
        assert!(parse_marker("1.item").is_none());
        assert!(parse_marker("3.14 is pi").is_none());
        assert!(parse_marker(". item").is_none());
    }

    #[test]
    fn test_ordinal_overflow_saturates() {
        let found = parse_marker("99999999999999999999999. huge").unwrap();
        assert_eq!(found.marker, Marker::Ordinal(u64::MAX));
    }

    #[test]
    fn test_ordinal_item_requires_column_zero() {
        assert!(is_ordinal_item("1. first"));
        assert!(!is_ordinal_item(" 1. first"));
        assert!(!is_ordinal_item("- 1. first"));
        assert!(!is_ordinal_item("first"));
    }

    #[test]
    fn test_strip_run_of_markers() {
        assert_eq!(strip_markers("- item A", MarkerSet::Any), "item A");
        assert_eq!(strip_markers("1. item A", MarkerSet::Any), "item A");
        assert_eq!(strip_markers("- 1. item A", MarkerSet::Any), "item A");
        assert_eq!(strip_markers("  + item", MarkerSet::Bullets), "item");
        assert_eq!(strip_markers("- 1. item A", MarkerSet::Bullets), "1. item A");
        assert_eq!(strip_markers("1. - item A", MarkerSet::Bullets), "1. - item A");
        assert_eq!(strip_markers("item A", MarkerSet::Any), "item A");
    }

    #[test]
    fn test_strip_is_idempotent() {
        for input in ["- - x", "1. 2. - x", "  *\tx", "-x", ""] {
            let once = strip_markers(input, MarkerSet::Any);
            assert_eq!(strip_markers(once, MarkerSet::Any), once, "input {input:?}");
        }
    }

    #[test]
    fn test_marker_set_admits() {
        assert!(MarkerSet::Any.admits(Marker::Ordinal(1)));
        assert!(MarkerSet::Bullets.admits(Marker::Bullet('+')));
        assert!(!MarkerSet::Bullets.admits(Marker::Ordinal(1)));
        assert!(!MarkerSet::Ordinals.admits(Marker::Bullet('-')));
        assert!(starts_with_marker("  - x", MarkerSet::Bullets));
        assert!(!starts_with_marker("  - x", MarkerSet::Ordinals));
    }
}
