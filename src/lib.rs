//! # jflat - flatten JSON documents into records
//!
//! Resolves a list of dotted paths against a JSON document and flattens the
//! matches into key → raw-fragment records. Every array a path expands with
//! `[]` turns into one record per element; independent arrays combine into
//! their cartesian product.
//!
//! ## Path syntax
//!
//! - `a.b.c` - object keys
//! - `[]` - expand the array at this point
//! - `x.[]` - capture the whole array `x` unexpanded
//! - `x.[].@` - zero-based element index
//! - `x.[].#` - element count
//!
//! ## Quick Start
//!
//! ```rust
//! use jflat::{parse_params, Descriptor};
//!
//! # fn main() -> anyhow::Result<()> {
//! let document = br#"{"name": "Alice", "posts": [{"id": 10}, {"id": 11}]}"#;
//! let descriptors = vec![
//!     Descriptor::new("name", "user"),
//!     Descriptor::new("posts.[].id", "post"),
//!     Descriptor::new("posts.[].@", "position"),
//! ];
//!
//! let records = parse_params(document, &descriptors)?;
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].get("user").unwrap().get(), r#""Alice""#);
//! assert_eq!(records[1].get("post").unwrap().get(), "11");
//! assert_eq!(records[1].get("position").unwrap().get(), "1");
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::io::BufRead;

pub mod flatten;

// Re-export commonly used types for convenience
pub use flatten::{
    cartesian_product, Descriptor, ExtractConfig, ExtractPlan, Extractor, Fragment, Record,
    ResultSet, UnmarshalError,
};

/// Main entry point: resolve `descriptors` against one JSON document.
///
/// An empty document or an empty descriptor list yields a single empty record.
pub fn parse_params(
    document: &[u8],
    descriptors: &[Descriptor],
) -> Result<ResultSet, UnmarshalError> {
    Extractor::new(descriptors, ExtractConfig::default()).extract(document)
}

/// Extract every line of a newline-delimited JSON stream.
///
/// Blank lines are skipped; records of all lines are returned in line order.
pub fn extract_lines<R: BufRead>(reader: R, extractor: &Extractor) -> Result<ResultSet> {
    let mut records = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }

        let res = extractor
            .extract(line.as_bytes())
            .with_context(|| format!("Failed to extract line {}", number + 1))?;
        records.extend(res);
    }

    Ok(records)
}
