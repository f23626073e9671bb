//! Lookup metadata: ordering, sampling mode, span, and cell geometry.
//!
//! A [`Lookup`] labels one array axis with a coordinate sequence plus the
//! metadata the resolution engine needs to pick the right search algorithm:
//! which direction the values run, whether they are zero-width samples or
//! interval cells, how cell spacing is described, and where within a cell
//! the published value sits.

use std::cmp::Ordering as CmpOrdering;

use crate::error::{
    BoundsLengthMismatchSnafu, IncompatibleSpanSnafu, LookupError, MalformedSelectorSnafu,
    NotMonotonicSnafu, OutOfBoundsSnafu, ResolveResult, StepOrderMismatchSnafu,
    StepSpacingMismatchSnafu, UnsupportedCombinationSnafu,
};
use crate::scalar::{midpoint, Scalar};
use snafu::prelude::*;

/// Direction of a lookup's coordinate sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    ForwardOrdered,
    ReverseOrdered,
    Unordered,
}

impl Order {
    pub fn is_ordered(&self) -> bool {
        !matches!(self, Order::Unordered)
    }

    /// Detect the ordering of a value sequence. Equal adjacent values do not
    /// break a direction; incomparable values force `Unordered`.
    pub fn detect(values: &[Scalar]) -> Order {
        let mut dir: Option<Order> = None;
        for w in values.windows(2) {
            match w[0].partial_cmp(&w[1]) {
                Some(CmpOrdering::Less) => match dir {
                    None => dir = Some(Order::ForwardOrdered),
                    Some(Order::ForwardOrdered) => {}
                    _ => return Order::Unordered,
                },
                Some(CmpOrdering::Greater) => match dir {
                    None => dir = Some(Order::ReverseOrdered),
                    Some(Order::ReverseOrdered) => {}
                    _ => return Order::Unordered,
                },
                Some(CmpOrdering::Equal) => {}
                None => return Order::Unordered,
            }
        }
        dir.unwrap_or(Order::ForwardOrdered)
    }
}

/// Where within a sampled cell the published coordinate value sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locus {
    Start,
    Center,
    End,
}

/// Whether lookup values denote zero-width points, finite interval cells, or
/// uncompared categorical codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    NoSampling,
    Points,
    Intervals(Locus),
}

impl Sampling {
    /// Locus used for tie-breaking and query adjustment. Points sample at
    /// their own position, which behaves like a center.
    pub(crate) fn locus(&self) -> Locus {
        match self {
            Sampling::Intervals(locus) => *locus,
            _ => Locus::Center,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Sampling::NoSampling => "no-sampling",
            Sampling::Points => "points",
            Sampling::Intervals(_) => "intervals",
        }
    }
}

/// How cell width and spacing is described.
#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    /// Constant spacing. The step has the same sign as the order.
    Regular(Scalar),
    /// Variable spacing; the outer bounds of the first and last cell may be
    /// unknown.
    Irregular {
        lo: Option<Scalar>,
        hi: Option<Scalar>,
    },
    /// Per-cell lower/upper bound pairs, one per lookup element.
    Explicit {
        lower: Vec<Scalar>,
        upper: Vec<Scalar>,
    },
    /// No span concept applies (categorical lookups).
    NoSpan,
}

impl Span {
    fn kind_name(&self) -> &'static str {
        match self {
            Span::Regular(_) => "regular",
            Span::Irregular { .. } => "irregular",
            Span::Explicit { .. } => "explicit",
            Span::NoSpan => "no-span",
        }
    }
}

/// An immutable coordinate sequence for one array axis, plus the metadata
/// that drives selector resolution.
#[derive(Debug, Clone)]
pub struct Lookup {
    values: Vec<Scalar>,
    order: Order,
    sampling: Sampling,
    span: Span,
}

impl Lookup {
    /// Build a lookup, validating that the metadata is coherent: the values
    /// must be monotonic in the stated order, a regular step must match the
    /// order's direction, and explicit bounds rows must match the value
    /// count.
    pub fn new(
        values: Vec<Scalar>,
        order: Order,
        sampling: Sampling,
        span: Span,
    ) -> Result<Lookup, LookupError> {
        if order.is_ordered() {
            for (i, w) in values.windows(2).enumerate() {
                let ok = match (order, w[0].partial_cmp(&w[1])) {
                    (_, Some(CmpOrdering::Equal)) => true,
                    (Order::ForwardOrdered, Some(CmpOrdering::Less)) => true,
                    (Order::ReverseOrdered, Some(CmpOrdering::Greater)) => true,
                    _ => false,
                };
                ensure!(ok, NotMonotonicSnafu { index: i + 1 });
            }
        }

        match (&sampling, &span) {
            (Sampling::NoSampling, Span::NoSpan) => {}
            (Sampling::NoSampling, s) => {
                return IncompatibleSpanSnafu {
                    sampling: sampling.kind_name(),
                    span: s.kind_name(),
                }
                .fail()
            }
            (Sampling::Points, Span::Regular(_) | Span::Irregular { .. }) => {}
            (Sampling::Points, s) => {
                return IncompatibleSpanSnafu {
                    sampling: sampling.kind_name(),
                    span: s.kind_name(),
                }
                .fail()
            }
            (Sampling::Intervals(_), Span::NoSpan) => {
                return IncompatibleSpanSnafu {
                    sampling: sampling.kind_name(),
                    span: span.kind_name(),
                }
                .fail()
            }
            (Sampling::Intervals(_), _) => {}
        }

        if let Span::Regular(step) = &span {
            let sign = step.as_f64().context(StepOrderMismatchSnafu { step: step.clone() })?;
            let ok = match order {
                Order::ForwardOrdered => sign > 0.0,
                Order::ReverseOrdered => sign < 0.0,
                Order::Unordered => sign != 0.0,
            };
            ensure!(ok, StepOrderMismatchSnafu { step: step.clone() });
            for (i, w) in values.windows(2).enumerate() {
                let spaced = matches!(w[1].sub(&w[0]), Some(d) if d == *step);
                ensure!(
                    spaced,
                    StepSpacingMismatchSnafu {
                        step: step.clone(),
                        index: i + 1,
                    }
                );
            }
        }

        if let Span::Explicit { lower, upper } = &span {
            ensure!(
                lower.len() == values.len(),
                BoundsLengthMismatchSnafu {
                    values: values.len(),
                    bounds: lower.len(),
                }
            );
            ensure!(
                upper.len() == values.len(),
                BoundsLengthMismatchSnafu {
                    values: values.len(),
                    bounds: upper.len(),
                }
            );
        }

        Ok(Lookup {
            values,
            order,
            sampling,
            span,
        })
    }

    /// Point samples with no known spacing. Order is detected from the data.
    pub fn points(values: Vec<Scalar>) -> Result<Lookup, LookupError> {
        let order = Order::detect(&values);
        Lookup::new(
            values,
            order,
            Sampling::Points,
            Span::Irregular { lo: None, hi: None },
        )
    }

    /// Point samples with constant spacing.
    pub fn points_regular(values: Vec<Scalar>, step: Scalar) -> Result<Lookup, LookupError> {
        let order = Order::detect(&values);
        Lookup::new(values, order, Sampling::Points, Span::Regular(step))
    }

    /// Interval cells with constant width.
    pub fn intervals_regular(
        values: Vec<Scalar>,
        locus: Locus,
        step: Scalar,
    ) -> Result<Lookup, LookupError> {
        let order = Order::detect(&values);
        Lookup::new(
            values,
            order,
            Sampling::Intervals(locus),
            Span::Regular(step),
        )
    }

    /// Interval cells with variable width and optionally known outer bounds.
    pub fn intervals_irregular(
        values: Vec<Scalar>,
        locus: Locus,
        lo: Option<Scalar>,
        hi: Option<Scalar>,
    ) -> Result<Lookup, LookupError> {
        let order = Order::detect(&values);
        Lookup::new(
            values,
            order,
            Sampling::Intervals(locus),
            Span::Irregular { lo, hi },
        )
    }

    /// Interval cells with per-cell bound rows.
    pub fn intervals_explicit(
        values: Vec<Scalar>,
        locus: Locus,
        lower: Vec<Scalar>,
        upper: Vec<Scalar>,
    ) -> Result<Lookup, LookupError> {
        let order = Order::detect(&values);
        Lookup::new(
            values,
            order,
            Sampling::Intervals(locus),
            Span::Explicit { lower, upper },
        )
    }

    /// Categorical codes: no order, no sampling, no span.
    pub fn categorical(values: Vec<Scalar>) -> Result<Lookup, LookupError> {
        Lookup::new(values, Order::Unordered, Sampling::NoSampling, Span::NoSpan)
    }

    /// The degenerate unlabeled axis: integer identity values `0..n` with
    /// unit step, so positional queries go through the same decision table
    /// as every other lookup.
    pub fn identity(len: usize) -> Lookup {
        Lookup {
            values: (0..len as i64).map(Scalar::I64).collect(),
            order: Order::ForwardOrdered,
            sampling: Sampling::Points,
            span: Span::Regular(Scalar::I64(1)),
        }
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn val_at(&self, index: usize) -> Option<&Scalar> {
        self.values.get(index)
    }

    /// The regular step, if the span is regular.
    pub fn step(&self) -> Option<&Scalar> {
        match &self.span {
            Span::Regular(step) => Some(step),
            _ => None,
        }
    }

    pub(crate) fn first(&self) -> Option<&Scalar> {
        self.values.first()
    }

    /// Short metadata summary for error messages.
    pub(crate) fn describe(&self) -> String {
        let order = match self.order {
            Order::ForwardOrdered => "forward-ordered",
            Order::ReverseOrdered => "reverse-ordered",
            Order::Unordered => "unordered",
        };
        format!(
            "{}/{}/{}",
            self.sampling.kind_name(),
            order,
            self.span.kind_name()
        )
    }

    /// Whether an interval cell's closed edge is the upper one after
    /// normalization. The cell's closed edge bears the published value:
    /// start and center cells own the edge facing the preceding index, end
    /// cells the one facing the following index, so reverse order flips
    /// which normalized edge that is.
    pub(crate) fn upper_edge_closed(&self) -> bool {
        let end_locus = matches!(self.sampling.locus(), Locus::End);
        match self.order {
            Order::ReverseOrdered => !end_locus,
            _ => end_locus,
        }
    }

    pub(crate) fn unsupported(&self, selector: &'static str) -> crate::error::ResolveError {
        UnsupportedCombinationSnafu {
            selector,
            lookup: self.describe(),
        }
        .build()
    }

    /// Outer value-space bounds of the whole lookup: the outer cell edges
    /// for interval sampling, the extreme values otherwise. `None` for
    /// unordered or empty lookups.
    pub fn bounds(&self) -> Option<(Scalar, Scalar)> {
        if !self.order.is_ordered() || self.is_empty() {
            return None;
        }
        match self.sampling {
            Sampling::Intervals(_) => {
                let first = self.cell_bounds(0).ok()?;
                let last = self.cell_bounds(self.len() - 1).ok()?;
                match self.order {
                    Order::ForwardOrdered => Some((first.0, last.1)),
                    Order::ReverseOrdered => Some((last.0, first.1)),
                    Order::Unordered => None,
                }
            }
            _ => {
                let first = self.values.first()?.clone();
                let last = self.values.last()?.clone();
                match self.order {
                    Order::ForwardOrdered => Some((first, last)),
                    Order::ReverseOrdered => Some((last, first)),
                    Order::Unordered => None,
                }
            }
        }
    }

    /// Value-space bounds `(lo, hi)` of cell `index`, with `lo <= hi`
    /// regardless of order. For interval sampling the cell is reconstructed
    /// from the span (arithmetic for `Regular`, stored rows for `Explicit`,
    /// neighbor values or midpoints for `Irregular`); for points the cell is
    /// the zero-width point itself.
    pub(crate) fn cell_bounds(&self, index: usize) -> ResolveResult<(Scalar, Scalar)> {
        let value = match self.values.get(index) {
            Some(v) => v,
            None => {
                return OutOfBoundsSnafu {
                    value: Scalar::I64(index as i64),
                    len: self.len(),
                }
                .fail()
            }
        };
        match (&self.sampling, &self.span) {
            (Sampling::NoSampling, _) => Err(self.unsupported("cell-bounds")),
            (Sampling::Points, _) => Ok((value.clone(), value.clone())),
            (Sampling::Intervals(locus), Span::Regular(step)) => {
                let (a, b) = match locus {
                    Locus::Start => (value.clone(), arith(value.add(step))?),
                    Locus::End => (arith(value.sub(step))?, value.clone()),
                    Locus::Center => {
                        let half = arith(step.half())?;
                        (arith(value.sub(&half))?, arith(value.add(&half))?)
                    }
                };
                Ok(normalize(a, b))
            }
            (Sampling::Intervals(_), Span::Explicit { lower, upper }) => {
                // Row lengths are validated at construction.
                match (lower.get(index), upper.get(index)) {
                    (Some(lo), Some(hi)) => Ok(normalize(lo.clone(), hi.clone())),
                    _ => OutOfBoundsSnafu {
                        value: Scalar::I64(index as i64),
                        len: self.len(),
                    }
                    .fail(),
                }
            }
            (Sampling::Intervals(locus), Span::Irregular { lo, hi }) => {
                self.irregular_cell(index, value, *locus, lo.as_ref(), hi.as_ref())
            }
            (Sampling::Intervals(_), Span::NoSpan) => Err(self.unsupported("cell-bounds")),
        }
    }

    /// Like [`Lookup::cell_bounds`], but under points sampling each point
    /// buffers half the gap to each neighbor (half a step for regular
    /// spans), so range overlap has something to touch. Edge cells mirror
    /// the adjacent gap outward. This is the crate's convention for range
    /// overlap on pure point lookups; the alternative, exact point
    /// inclusion, would make `touches` equal `between` there.
    pub(crate) fn touch_bounds(&self, index: usize) -> ResolveResult<(Scalar, Scalar)> {
        match (&self.sampling, &self.span) {
            (Sampling::Points, Span::Regular(step)) => {
                let value = self.value_checked(index)?;
                let half = arith(step.half())?;
                Ok(normalize(
                    arith(value.sub(&half))?,
                    arith(value.add(&half))?,
                ))
            }
            (Sampling::Points, _) => {
                let value = self.value_checked(index)?;
                let prev_mid = match index.checked_sub(1).and_then(|i| self.values.get(i)) {
                    Some(prev) => Some(arith(midpoint(prev, value))?),
                    None => None,
                };
                let next_mid = match self.values.get(index + 1) {
                    Some(next) => Some(arith(midpoint(value, next))?),
                    None => None,
                };
                let (a, b) = match (prev_mid, next_mid) {
                    (Some(p), Some(n)) => (p, n),
                    // Mirror the single known gap outward at the edges.
                    (Some(p), None) => {
                        let d = arith(value.sub(&p))?;
                        (p, arith(value.add(&d))?)
                    }
                    (None, Some(n)) => {
                        let d = arith(n.sub(value))?;
                        (arith(value.sub(&d))?, n)
                    }
                    (None, None) => (value.clone(), value.clone()),
                };
                Ok(normalize(a, b))
            }
            (Sampling::NoSampling, _) => {
                let value = self.value_checked(index)?;
                Ok((value.clone(), value.clone()))
            }
            (Sampling::Intervals(_), _) => self.cell_bounds(index),
        }
    }

    fn value_checked(&self, index: usize) -> ResolveResult<&Scalar> {
        match self.values.get(index) {
            Some(v) => Ok(v),
            None => OutOfBoundsSnafu {
                value: Scalar::I64(index as i64),
                len: self.len(),
            }
            .fail(),
        }
    }

    fn irregular_cell(
        &self,
        index: usize,
        value: &Scalar,
        locus: Locus,
        lo: Option<&Scalar>,
        hi: Option<&Scalar>,
    ) -> ResolveResult<(Scalar, Scalar)> {
        if !self.order.is_ordered() {
            return Err(self.unsupported("cell-bounds"));
        }
        let prev = index.checked_sub(1).and_then(|i| self.values.get(i));
        let next = self.values.get(index + 1);
        // Which outer bound backs a missing neighbor depends on direction.
        let (at_index_start, at_index_end) = match self.order {
            Order::ReverseOrdered => (hi, lo),
            _ => (lo, hi),
        };
        let (a, b) = match locus {
            Locus::Start => {
                let end = match next {
                    Some(n) => n.clone(),
                    None => at_index_end.cloned().unwrap_or_else(|| value.clone()),
                };
                (value.clone(), end)
            }
            Locus::End => {
                let start = match prev {
                    Some(p) => p.clone(),
                    None => at_index_start.cloned().unwrap_or_else(|| value.clone()),
                };
                (start, value.clone())
            }
            Locus::Center => {
                let start = match prev {
                    Some(p) => arith(midpoint(p, value))?,
                    None => at_index_start.cloned().unwrap_or_else(|| value.clone()),
                };
                let end = match next {
                    Some(n) => arith(midpoint(value, n))?,
                    None => at_index_end.cloned().unwrap_or_else(|| value.clone()),
                };
                (start, end)
            }
        };
        Ok(normalize(a, b))
    }
}

fn normalize(a: Scalar, b: Scalar) -> (Scalar, Scalar) {
    if matches!(a.partial_cmp(&b), Some(CmpOrdering::Greater)) {
        (b, a)
    } else {
        (a, b)
    }
}

fn arith(value: Option<Scalar>) -> ResolveResult<Scalar> {
    value.context(MalformedSelectorSnafu {
        reason: "cell arithmetic requires numeric or time-typed values",
    })
}
