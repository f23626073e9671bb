//! Predicate filtering and selector union.

use crate::error::ResolveResult;
use crate::lookup::Lookup;
use crate::selector::{Predicate, Selector};

use super::{resolve_mode, IndexResult};

/// Keep every position whose raw value satisfies the predicate. Works on any
/// lookup, ordered or not, since it never consults the metadata.
pub(crate) fn resolve_where(lookup: &Lookup, predicate: &Predicate) -> IndexResult {
    let indices = lookup
        .values()
        .iter()
        .enumerate()
        .filter(|(_, v)| predicate.eval(v))
        .map(|(i, _)| i)
        .collect();
    IndexResult::Indices(indices)
}

/// Union of the child selectors' results, sorted and deduplicated. A child
/// that merely misses contributes nothing; structural errors still abort.
pub(crate) fn resolve_all(lookup: &Lookup, children: &[Selector]) -> ResolveResult<IndexResult> {
    let mut indices: Vec<usize> = Vec::new();
    for child in children {
        if let Some(result) = resolve_mode(lookup, child, false)? {
            indices.extend(result.iter());
        }
    }
    indices.sort_unstable();
    indices.dedup();
    Ok(IndexResult::Indices(indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::scalar::Scalar;

    fn points(v: &[i64]) -> Lookup {
        Lookup::points_regular(v.iter().copied().map(Scalar::I64).collect(), Scalar::I64(10))
            .unwrap()
    }

    #[test]
    fn where_scans_raw_values() {
        let l = points(&[10, 20, 30, 40, 50]);
        let p = Predicate::new(|v| matches!(v, Scalar::I64(x) if *x > 25));
        assert_eq!(
            resolve_where(&l, &p),
            IndexResult::Indices(vec![2, 3, 4])
        );
    }

    #[test]
    fn where_works_unordered() {
        let l = Lookup::categorical(vec![
            Scalar::from("b"),
            Scalar::from("a"),
            Scalar::from("c"),
        ])
        .unwrap();
        let p = Predicate::new(|v| matches!(v, Scalar::Str(s) if s.as_str() >= "b"));
        assert_eq!(resolve_where(&l, &p), IndexResult::Indices(vec![0, 2]));
    }

    #[test]
    fn all_unions_sorted_and_deduped() {
        let l = points(&[10, 20, 30, 40, 50]);
        let sel = [
            Selector::between(30, 50),
            Selector::at(20),
            Selector::at(30),
        ];
        assert_eq!(
            resolve_all(&l, &sel).unwrap(),
            IndexResult::Indices(vec![1, 2, 3, 4])
        );
    }

    #[test]
    fn all_skips_missing_children() {
        let l = points(&[10, 20, 30]);
        let sel = [Selector::at(999), Selector::at(20)];
        assert_eq!(
            resolve_all(&l, &sel).unwrap(),
            IndexResult::Indices(vec![1])
        );
    }

    #[test]
    fn all_propagates_structural_errors() {
        let l = points(&[10, 20, 30]);
        let sel = [Selector::at(20), Selector::contains(15)];
        assert!(matches!(
            resolve_all(&l, &sel).unwrap_err(),
            ResolveError::UnsupportedCombination { .. }
        ));
    }

    #[test]
    fn empty_union() {
        let l = points(&[10, 20, 30]);
        assert_eq!(
            resolve_all(&l, &[]).unwrap(),
            IndexResult::Indices(vec![])
        );
    }
}
