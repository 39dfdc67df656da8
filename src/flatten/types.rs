use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A path to look up in the document and the key its value is stored under
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Descriptor {
    /// Dotted path, e.g. `"[].UL.branches.[].kpp"`
    pub path: String,

    /// Output identifier used as the record key
    pub id: String,
}

impl Descriptor {
    pub fn new(path: impl Into<String>, id: impl Into<String>) -> Self {
        Descriptor {
            path: path.into(),
            id: id.into(),
        }
    }
}

/// An undecoded span of JSON text taken verbatim from the input document.
///
/// Holds valid JSON, except for a whole-document capture, which is never
/// parsed. Cloning is cheap, so the same fragment can sit in many records of
/// a result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment(Arc<str>);

impl Fragment {
    /// The raw JSON text
    pub fn get(&self) -> &str {
        &self.0
    }

    pub(crate) fn verbatim(text: &str) -> Self {
        Fragment(Arc::from(text))
    }
}

impl From<&RawValue> for Fragment {
    fn from(raw: &RawValue) -> Self {
        Fragment(Arc::from(raw.get()))
    }
}

impl From<usize> for Fragment {
    fn from(n: usize) -> Self {
        Fragment(Arc::from(n.to_string()))
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Fragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Emit the text as-is rather than as a quoted string
        let raw = RawValue::from_string(self.0.to_string()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

/// One flattened output row: output identifier -> fragment.
///
/// A key is present only when its path resolved to a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Fragment>);

/// All flattened alternatives produced by one resolution step
pub type ResultSet = Vec<Record>;

impl Record {
    pub fn new() -> Self {
        Record(BTreeMap::new())
    }

    /// A record mapping every id in `ids` to the same fragment
    pub(crate) fn capture(ids: &[&str], fragment: &Fragment) -> Self {
        Record(
            ids.iter()
                .map(|id| (id.to_string(), fragment.clone()))
                .collect(),
        )
    }

    /// Build a new record holding the keys of `self` then `other`; `other` wins on collision
    pub fn merged(&self, other: &Record) -> Record {
        let mut data = self.0.clone();
        data.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Record(data)
    }

    pub fn get(&self, id: &str) -> Option<&Fragment> {
        self.0.get(id)
    }

    pub fn contains_key(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Fragment> {
        self.0.iter()
    }
}

/// The single-empty-record result set: the neutral element of combination
pub(crate) fn single_empty() -> ResultSet {
    vec![Record::new()]
}

/// Path syntax tokens
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Separator between path segments
    pub separator: char,

    /// Segment that expands an array
    pub array_marker: String,

    /// Terminal pseudo-field after an array marker: zero-based element index
    pub index_field: String,

    /// Terminal pseudo-field after an array marker: element count
    pub count_field: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            separator: '.',
            array_marker: String::from("[]"),
            index_field: String::from("@"),
            count_field: String::from("#"),
        }
    }
}
