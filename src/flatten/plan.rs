//! Pre-compiled extraction plans
//!
//! An `ExtractPlan` holds every descriptor with its path already split into
//! segments. During descent the extractor groups the remaining suffixes by
//! their first segment so each distinct branch of the document is visited once.

use crate::flatten::path::{compile_path, Segment};
use crate::flatten::types::{Descriptor, ExtractConfig};

/// A descriptor whose path has been compiled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDescriptor {
    pub id: String,
    pub segments: Vec<Segment>,
}

/// Compiled descriptors, in input order
#[derive(Debug, Clone)]
pub struct ExtractPlan {
    descriptors: Vec<CompiledDescriptor>,
    config: ExtractConfig,
}

impl ExtractPlan {
    pub fn new(descriptors: &[Descriptor], config: ExtractConfig) -> Self {
        let descriptors = descriptors
            .iter()
            .map(|d| CompiledDescriptor {
                id: d.id.clone(),
                segments: compile_path(&d.path, &config),
            })
            .collect();

        ExtractPlan {
            descriptors,
            config,
        }
    }

    pub fn descriptors(&self) -> &[CompiledDescriptor] {
        &self.descriptors
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Full-path views of every descriptor, the starting point of a descent
    pub(crate) fn metas(&self) -> Vec<Meta<'_>> {
        self.descriptors
            .iter()
            .map(|d| Meta {
                rest: &d.segments,
                id: &d.id,
            })
            .collect()
    }
}

/// A descriptor part-way through descent: the segments not yet consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Meta<'p> {
    pub rest: &'p [Segment],
    pub id: &'p str,
}

/// Stands in for the head of an exhausted path when it shares a node with others
static EMPTY_KEY: Segment = Segment::Key(String::new());

/// Remaining descriptors keyed by their next segment, in first-seen order.
/// Each group holds the suffixes with that segment stripped.
pub(crate) type Groups<'p> = Vec<(&'p Segment, Vec<Meta<'p>>)>;

/// Group descriptors by their first segment.
///
/// A descriptor with nothing left to consume groups under the empty key.
pub(crate) fn group_by_head<'p>(metas: &[Meta<'p>]) -> Groups<'p> {
    let mut groups: Groups<'p> = Vec::new();

    for meta in metas {
        let (head, rest) = meta.rest.split_first().unwrap_or((&EMPTY_KEY, &[][..]));

        let stripped = Meta { rest, id: meta.id };
        match groups.iter_mut().find(|(h, _)| *h == head) {
            Some((_, group)) => group.push(stripped),
            None => groups.push((head, vec![stripped])),
        }
    }

    groups
}

/// Descriptors below an array marker, bucketed by suffix
#[derive(Debug, Default)]
pub(crate) struct ArrayBranch<'p> {
    /// Deeper paths, resolved once per element
    pub base: Vec<Meta<'p>>,
    /// Empty suffix: capture the whole array
    pub all: Vec<&'p str>,
    /// Element index
    pub index: Vec<&'p str>,
    /// Element count
    pub count: Vec<&'p str>,
}

impl<'p> ArrayBranch<'p> {
    pub fn split(metas: &[Meta<'p>]) -> Self {
        let mut branch = ArrayBranch::default();

        for meta in metas {
            match meta.rest {
                [] => branch.all.push(meta.id),
                [Segment::Index] => branch.index.push(meta.id),
                [Segment::Count] => branch.count.push(meta.id),
                _ => branch.base.push(*meta),
            }
        }

        branch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(descriptors: &[(&str, &str)]) -> ExtractPlan {
        let descriptors: Vec<Descriptor> = descriptors
            .iter()
            .map(|(path, id)| Descriptor::new(*path, *id))
            .collect();
        ExtractPlan::new(&descriptors, ExtractConfig::default())
    }

    #[test]
    fn test_plan_compiles_in_order() {
        let plan = plan(&[("a.b", "x"), ("[].@", "i")]);

        assert_eq!(plan.descriptors().len(), 2);
        assert_eq!(plan.descriptors()[0].id, "x");
        assert_eq!(plan.descriptors()[1].segments, vec![Segment::Array, Segment::Index]);
    }

    #[test]
    fn test_group_by_head_first_seen_order() {
        let plan = plan(&[("b.x", "1"), ("a", "2"), ("b.y", "3")]);
        let metas = plan.metas();

        let groups = group_by_head(&metas);

        let heads: Vec<&Segment> = groups.iter().map(|(h, _)| *h).collect();
        assert_eq!(
            heads,
            vec![&Segment::Key("b".to_string()), &Segment::Key("a".to_string())]
        );

        let b_group = &groups[0].1;
        assert_eq!(b_group.len(), 2);
        assert_eq!(b_group[0].id, "1");
        assert_eq!(b_group[0].rest, &[Segment::Key("x".to_string())]);
        assert_eq!(b_group[1].id, "3");

        // a path consumed to its end is empty one level down
        assert!(groups[1].1[0].rest.is_empty());
    }

    #[test]
    fn test_exhausted_paths_group_under_empty_key() {
        let plan = plan(&[("", "doc"), ("a", "x"), ("", "again")]);
        let metas = plan.metas();

        let groups = group_by_head(&metas);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, &Segment::Key(String::new()));
        let ids: Vec<&str> = groups[0].1.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["doc", "again"]);
        assert!(groups[0].1.iter().all(|m| m.rest.is_empty()));
    }

    #[test]
    fn test_plan_keeps_config() {
        let config = ExtractConfig {
            separator: '/',
            ..ExtractConfig::default()
        };
        let plan = ExtractPlan::new(&[Descriptor::new("a/[]/@", "i")], config);

        assert_eq!(plan.config().separator, '/');
        assert_eq!(
            plan.descriptors()[0].segments,
            vec![Segment::Key("a".to_string()), Segment::Array, Segment::Index]
        );
    }

    #[test]
    fn test_array_branch_buckets() {
        let plan = plan(&[
            ("[].name", "name"),
            ("[]", "all"),
            ("[].@", "idx"),
            ("[].#", "cnt"),
            ("[].[].@", "inner"),
        ]);
        let metas = plan.metas();
        let groups = group_by_head(&metas);
        assert_eq!(groups.len(), 1);

        let array = ArrayBranch::split(&groups[0].1);

        assert_eq!(array.all, vec!["all"]);
        assert_eq!(array.index, vec!["idx"]);
        assert_eq!(array.count, vec!["cnt"]);
        let base_ids: Vec<&str> = array.base.iter().map(|m| m.id).collect();
        assert_eq!(base_ids, vec!["name", "inner"]);
    }
}
