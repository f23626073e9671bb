//! Selector resolution: the decision table from lookup metadata and selector
//! kind to integer index positions.
//!
//! Single-value selectors resolve to one index and raise when they miss;
//! range selectors resolve to a half-open index range and return it empty
//! when they miss. A selector the lookup's metadata cannot support raises
//! [`ResolveError::UnsupportedCombination`](crate::error::ResolveError)
//! regardless of the query value.

mod at;
mod contains;
mod filter;
mod near;
mod range;

use std::ops::Range;

use smallvec::SmallVec;

use crate::error::ResolveResult;
use crate::lookup::Lookup;
use crate::scalar::Scalar;
use crate::selector::{Selector, SelectorValues};

/// Resolved index positions along one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexResult {
    /// Exactly one position.
    Single(usize),
    /// A contiguous half-open span of positions.
    Range(Range<usize>),
    /// Arbitrary positions, sorted for `Where` and `All`, in query order for
    /// vector-valued selectors.
    Indices(Vec<usize>),
}

impl IndexResult {
    pub fn len(&self) -> usize {
        match self {
            IndexResult::Single(_) => 1,
            IndexResult::Range(r) => r.len(),
            IndexResult::Indices(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the selected positions in order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match self {
            IndexResult::Single(i) => Box::new(std::iter::once(*i)),
            IndexResult::Range(r) => Box::new(r.clone()),
            IndexResult::Indices(v) => Box::new(v.iter().copied()),
        }
    }

    pub fn into_vec(self) -> Vec<usize> {
        match self {
            IndexResult::Single(i) => vec![i],
            IndexResult::Range(r) => r.collect(),
            IndexResult::Indices(v) => v,
        }
    }
}

/// Resolve a selector against a lookup.
pub fn resolve(lookup: &Lookup, selector: &Selector) -> ResolveResult<IndexResult> {
    Ok(resolve_mode(lookup, selector, true)?.unwrap_or(IndexResult::Indices(Vec::new())))
}

/// Whether the selector matches anything at all, without distinguishing how
/// it fails: misses and resolution errors both count as no selection.
pub fn has_selection(lookup: &Lookup, selector: &Selector) -> bool {
    matches!(resolve_mode(lookup, selector, false), Ok(Some(r)) if !r.is_empty())
}

/// Resolve one selector per axis, failing on the first axis that errors.
pub fn resolve_axes<'a>(
    axes: impl IntoIterator<Item = (&'a Lookup, &'a Selector)>,
) -> ResolveResult<SmallVec<[IndexResult; 4]>> {
    axes.into_iter().map(|(l, s)| resolve(l, s)).collect()
}

/// Dispatch a selector, optionally suppressing misses.
///
/// In strict mode every error propagates. In soft mode a plain miss
/// (`NotFound` or `OutOfBounds`) becomes `Ok(None)` for single values and is
/// dropped per-element for vector values; structural errors propagate in
/// both modes. Soft mode is what `All` and [`has_selection`] build on.
pub(crate) fn resolve_mode(
    lookup: &Lookup,
    selector: &Selector,
    strict: bool,
) -> ResolveResult<Option<IndexResult>> {
    match selector {
        Selector::At { value, atol, rtol } => {
            resolve_point(value, strict, |v| at::resolve_at(lookup, v, *atol, *rtol))
        }
        Selector::Near { value } => resolve_point(value, strict, |v| near::resolve_near(lookup, v)),
        Selector::Contains { value } => {
            resolve_point(value, strict, |v| contains::resolve_contains(lookup, v))
        }
        Selector::Between { start, end } => Ok(Some(IndexResult::Range(range::resolve_between(
            lookup,
            start,
            end,
            true,
            true,
            selector.kind_name(),
        )?))),
        Selector::Interval {
            start,
            end,
            closed_start,
            closed_end,
        } => Ok(Some(IndexResult::Range(range::resolve_between(
            lookup,
            start,
            end,
            *closed_start,
            *closed_end,
            selector.kind_name(),
        )?))),
        Selector::Touches { start, end } => Ok(Some(IndexResult::Range(range::resolve_touches(
            lookup, start, end,
        )?))),
        Selector::Where(predicate) => Ok(Some(filter::resolve_where(lookup, predicate))),
        Selector::All(children) => Ok(Some(filter::resolve_all(lookup, children)?)),
    }
}

fn resolve_point(
    value: &SelectorValues,
    strict: bool,
    mut resolve_one: impl FnMut(&Scalar) -> ResolveResult<usize>,
) -> ResolveResult<Option<IndexResult>> {
    match value {
        SelectorValues::One(v) => match resolve_one(v) {
            Ok(i) => Ok(Some(IndexResult::Single(i))),
            Err(e) if !strict && e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        },
        SelectorValues::Many(vs) => {
            let mut out = Vec::with_capacity(vs.len());
            for v in vs {
                match resolve_one(v) {
                    Ok(i) => out.push(i),
                    Err(e) if !strict && e.is_not_found() => {}
                    Err(e) => return Err(e),
                }
            }
            Ok(Some(IndexResult::Indices(out)))
        }
    }
}
