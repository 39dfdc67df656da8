use crate::flatten::types::{Record, ResultSet};

/// Positional cross product of two result sets.
///
/// Outer loop over `left`, inner loop over `right`; each pair is merged into a
/// fresh record with `right` winning on key collision.
pub fn cartesian_product(left: &[Record], right: &[Record]) -> ResultSet {
    let mut res = Vec::with_capacity(left.len() * right.len());

    for a in left {
        for b in right {
            res.push(a.merged(b));
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::types::{single_empty, Fragment};

    fn rec(pairs: &[(&str, usize)]) -> Record {
        pairs.iter().fold(Record::new(), |acc, (k, v)| {
            acc.merged(&Record::capture(&[*k], &Fragment::from(*v)))
        })
    }

    fn values(set: &[Record], key: &str) -> Vec<Option<String>> {
        set.iter()
            .map(|r| r.get(key).map(|f| f.get().to_string()))
            .collect()
    }

    #[test]
    fn test_outer_left_inner_right_order() {
        let left = vec![rec(&[("a", 0)]), rec(&[("a", 1)])];
        let right = vec![rec(&[("b", 0)]), rec(&[("b", 1)]), rec(&[("b", 2)])];

        let res = cartesian_product(&left, &right);

        assert_eq!(res.len(), 6);
        let a: Vec<_> = values(&res, "a");
        let b: Vec<_> = values(&res, "b");
        let s = |v: &str| Some(v.to_string());
        assert_eq!(a, vec![s("0"), s("0"), s("0"), s("1"), s("1"), s("1")]);
        assert_eq!(b, vec![s("0"), s("1"), s("2"), s("0"), s("1"), s("2")]);
    }

    #[test]
    fn test_right_wins_on_collision() {
        let res = cartesian_product(&[rec(&[("k", 1), ("x", 7)])], &[rec(&[("k", 2)])]);

        assert_eq!(res.len(), 1);
        assert_eq!(res[0].get("k").unwrap().get(), "2");
        assert_eq!(res[0].get("x").unwrap().get(), "7");
    }

    #[test]
    fn test_single_empty_is_neutral() {
        let set = vec![rec(&[("a", 0)]), rec(&[("a", 1)])];

        assert_eq!(cartesian_product(&single_empty(), &set), set);
        assert_eq!(cartesian_product(&set, &single_empty()), set);
    }

    #[test]
    fn test_empty_side_yields_nothing() {
        assert!(cartesian_product(&[], &single_empty()).is_empty());
    }
}
