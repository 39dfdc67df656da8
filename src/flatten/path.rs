//! Path segmentation and compilation
//!
//! Descriptor paths are split into typed segments once, before any descent,
//! so the extractor works on segment slices instead of re-splitting strings.

use crate::flatten::types::ExtractConfig;

/// One step of a compiled path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Look up an object key
    Key(String),
    /// Expand an array; as the last segment it captures the whole array
    Array,
    /// Zero-based element index (only directly after `Array`, only terminal)
    Index,
    /// Element count (only directly after `Array`, only terminal)
    Count,
}

/// Split a path at the first separator.
///
/// Without a separator the whole path is the head and the tail is empty.
pub fn split_path(path: &str, separator: char) -> (&str, &str) {
    path.split_once(separator).unwrap_or((path, ""))
}

/// Compile a path string into segments.
///
/// An empty path compiles to no segments, meaning "capture the value here".
pub fn compile_path(path: &str, config: &ExtractConfig) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = path;

    while !rest.is_empty() {
        let (head, tail) = split_path(rest, config.separator);
        let after_array = segments.last() == Some(&Segment::Array);

        let segment = if head == config.array_marker {
            Segment::Array
        } else if after_array && rest == config.index_field {
            Segment::Index
        } else if after_array && rest == config.count_field {
            Segment::Count
        } else {
            Segment::Key(head.to_string())
        };

        segments.push(segment);
        rest = tail;
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> Segment {
        Segment::Key(k.to_string())
    }

    fn compile(path: &str) -> Vec<Segment> {
        compile_path(path, &ExtractConfig::default())
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("a.b.c", '.'), ("a", "b.c"));
        assert_eq!(split_path("a", '.'), ("a", ""));
        assert_eq!(split_path("", '.'), ("", ""));
        assert_eq!(split_path("[].", '.'), ("[]", ""));
        assert_eq!(split_path("a/b", '/'), ("a", "b"));
    }

    #[test]
    fn test_compile_nested_arrays() {
        assert_eq!(
            compile("[].UL.branches.[].kpp"),
            vec![Segment::Array, key("UL"), key("branches"), Segment::Array, key("kpp")]
        );
    }

    #[test]
    fn test_compile_pseudo_fields() {
        assert_eq!(compile("items.[].@"), vec![key("items"), Segment::Array, Segment::Index]);
        assert_eq!(compile("items.[].#"), vec![key("items"), Segment::Array, Segment::Count]);
        assert_eq!(compile("items.[]"), vec![key("items"), Segment::Array]);
    }

    #[test]
    fn test_pseudo_fields_elsewhere_are_keys() {
        assert_eq!(compile("@"), vec![key("@")]);
        assert_eq!(compile("a.#"), vec![key("a"), key("#")]);
        assert_eq!(compile("[].@.x"), vec![Segment::Array, key("@"), key("x")]);
    }

    #[test]
    fn test_empty_and_trailing_segments() {
        assert!(compile("").is_empty());
        // a single trailing separator is absorbed
        assert_eq!(compile("a."), vec![key("a")]);
        assert_eq!(compile("[]."), vec![Segment::Array]);
        // interior empty segment is the empty key
        assert_eq!(compile("a..b"), vec![key("a"), key(""), key("b")]);
        // a pseudo-field must be the whole remaining path
        assert_eq!(compile("[].#."), vec![Segment::Array, key("#")]);
        assert_eq!(compile("[].@."), vec![Segment::Array, key("@")]);
    }

    #[test]
    fn test_custom_syntax() {
        let config = ExtractConfig {
            separator: '/',
            array_marker: String::from("*"),
            index_field: String::from("$i"),
            count_field: String::from("$n"),
        };
        assert_eq!(
            compile_path("rows/*/$i", &config),
            vec![key("rows"), Segment::Array, Segment::Index]
        );
        assert_eq!(compile_path("rows/[]", &config), vec![key("rows"), key("[]")]);
    }
}
