//! JSON flattening - resolve dotted paths into flat records
//!
//! Descriptors are compiled once into an `ExtractPlan`; the `Extractor` then
//! descends the document, expanding every array it is asked to and combining
//! independent branches into their cartesian product.

pub mod types;
pub mod error;
pub mod path;
pub mod plan;
pub mod combine;
pub mod extractor;

pub use types::{Descriptor, ExtractConfig, Fragment, Record, ResultSet};
pub use error::{DecodeCause, JsonKind, UnmarshalError};
pub use path::{compile_path, split_path, Segment};
pub use plan::{CompiledDescriptor, ExtractPlan};
pub use combine::cartesian_product;
pub use extractor::Extractor;
