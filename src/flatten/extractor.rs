use crate::flatten::combine::cartesian_product;
use crate::flatten::error::{JsonKind, UnmarshalError};
use crate::flatten::path::Segment;
use crate::flatten::plan::{group_by_head, ArrayBranch, ExtractPlan, Meta};
use crate::flatten::types::{single_empty, Descriptor, ExtractConfig, Fragment, Record, ResultSet};
use serde_json::value::RawValue;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A fragment decoded one level deep; children stay raw
struct Node<'a> {
    raw: &'a RawValue,
    shape: Shape<'a>,
}

enum Shape<'a> {
    Object(HashMap<String, &'a RawValue>),
    Array(Vec<&'a RawValue>),
    Null,
    Scalar(JsonKind),
}

impl<'a> Node<'a> {
    fn decode(raw: &'a RawValue) -> Result<Self, serde_json::Error> {
        let shape = match JsonKind::of(raw.get()) {
            JsonKind::Object => Shape::Object(serde_json::from_str(raw.get())?),
            JsonKind::Array => Shape::Array(serde_json::from_str(raw.get())?),
            JsonKind::Null => Shape::Null,
            kind => Shape::Scalar(kind),
        };
        Ok(Node { raw, shape })
    }

    fn kind(&self) -> JsonKind {
        match &self.shape {
            Shape::Object(_) => JsonKind::Object,
            Shape::Array(_) => JsonKind::Array,
            Shape::Null => JsonKind::Null,
            Shape::Scalar(kind) => *kind,
        }
    }
}

fn first_id<'p>(group: &[Meta<'p>]) -> &'p str {
    group.first().map_or("", |meta| meta.id)
}

/// Flattens JSON documents into records according to a compiled plan
pub struct Extractor {
    plan: ExtractPlan,
}

impl Extractor {
    pub fn new(descriptors: &[Descriptor], config: ExtractConfig) -> Self {
        Self::from_plan(ExtractPlan::new(descriptors, config))
    }

    pub fn from_plan(plan: ExtractPlan) -> Self {
        Extractor { plan }
    }

    pub fn plan(&self) -> &ExtractPlan {
        &self.plan
    }

    /// Resolve every descriptor against `document`.
    ///
    /// Always yields at least one record. The first decode failure aborts the
    /// whole call.
    pub fn extract(&self, document: &[u8]) -> Result<ResultSet, UnmarshalError> {
        let Some(first) = self.plan.descriptors().first() else {
            return Ok(single_empty());
        };
        if document.is_empty() {
            return Ok(single_empty());
        }
        // A lone empty path takes the document as given, unparsed
        if let [only] = self.plan.descriptors() {
            if only.segments.is_empty() {
                if let Ok(text) = std::str::from_utf8(document) {
                    return Ok(vec![Record::capture(&[only.id.as_str()], &Fragment::verbatim(text))]);
                }
            }
        }

        let raw: &RawValue = serde_json::from_slice(document)
            .map_err(|e| UnmarshalError::new(first.id.as_str(), e))?;

        let res = Self::resolve(raw, &self.plan.metas())?;
        debug!(
            descriptors = self.plan.descriptors().len(),
            records = res.len(),
            "extracted records"
        );
        Ok(res)
    }

    /// Group descriptors by next segment, resolve each group and fold the
    /// results together in first-seen group order
    fn resolve(raw: &RawValue, metas: &[Meta<'_>]) -> Result<ResultSet, UnmarshalError> {
        match metas {
            [] => return Ok(single_empty()),
            [only] if only.rest.is_empty() => {
                return Ok(vec![Record::capture(&[only.id], &Fragment::from(raw))]);
            }
            _ => {}
        }

        let node = Node::decode(raw).map_err(|e| UnmarshalError::new(first_id(metas), e))?;

        let mut res = single_empty();
        for (head, group) in &group_by_head(metas) {
            trace!(?head, descriptors = group.len(), "resolving group");
            let part = Self::resolve_level(&node, head, group)?;
            res = cartesian_product(&res, &part);
        }

        Ok(res)
    }

    fn resolve_level(
        node: &Node<'_>,
        head: &Segment,
        group: &[Meta<'_>],
    ) -> Result<ResultSet, UnmarshalError> {
        match head {
            Segment::Array => Self::expand_array(node, group),
            Segment::Key(key) => match &node.shape {
                Shape::Object(fields) => match fields.get(key) {
                    Some(&value) => Self::resolve(value, group),
                    None => Ok(single_empty()),
                },
                Shape::Null => Ok(single_empty()),
                _ => Err(UnmarshalError::shape(
                    first_id(group),
                    JsonKind::Object,
                    node.kind(),
                )),
            },
            // Pseudo-fields only ever terminate an array segment
            Segment::Index | Segment::Count => Ok(single_empty()),
        }
    }

    /// Expand an array: elements are alternatives of one another, while the
    /// whole-array capture and the count hold for every element
    fn expand_array(node: &Node<'_>, group: &[Meta<'_>]) -> Result<ResultSet, UnmarshalError> {
        let items: &[&RawValue] = match &node.shape {
            Shape::Array(items) => items.as_slice(),
            Shape::Null => &[],
            _ => {
                return Err(UnmarshalError::shape(
                    first_id(group),
                    JsonKind::Array,
                    node.kind(),
                ))
            }
        };

        let branch = ArrayBranch::split(group);
        trace!(
            elements = items.len(),
            base = branch.base.len(),
            "expanding array"
        );

        let mut res_all = if branch.all.is_empty() {
            single_empty()
        } else {
            vec![Record::capture(&branch.all, &Fragment::from(node.raw))]
        };
        if !branch.count.is_empty() {
            let count = Record::capture(&branch.count, &Fragment::from(items.len()));
            res_all = cartesian_product(&res_all, &[count]);
        }

        let res_list = if items.is_empty() || (branch.index.is_empty() && branch.base.is_empty()) {
            single_empty()
        } else {
            let mut list = Vec::new();
            for (i, &item) in items.iter().enumerate() {
                let per_item = Self::resolve(item, &branch.base)?;
                let index = Record::capture(&branch.index, &Fragment::from(i));
                list.extend(cartesian_product(&per_item, &[index]));
            }
            list
        };

        Ok(cartesian_product(&res_list, &res_all))
    }
}
