//! Selector variants: how a coordinate query maps to index positions.
//!
//! Selectors are pure data, independent of any lookup. The closed enum keeps
//! the resolution engine's decision table total: adding a variant breaks
//! every dispatch site at compile time instead of silently falling through.

use std::fmt;
use std::sync::Arc;

use crate::scalar::Scalar;

/// One query value or a batch resolved element-wise.
#[derive(Debug, Clone)]
pub enum SelectorValues {
    One(Scalar),
    Many(Vec<Scalar>),
}

impl SelectorValues {
    fn one(value: impl Into<Scalar>) -> SelectorValues {
        SelectorValues::One(value.into())
    }

    fn many<V: Into<Scalar>>(values: impl IntoIterator<Item = V>) -> SelectorValues {
        SelectorValues::Many(values.into_iter().map(Into::into).collect())
    }
}

/// Predicate over raw lookup values, used by [`Selector::Where`].
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Scalar) -> bool + Send + Sync>);

impl Predicate {
    pub fn new(f: impl Fn(&Scalar) -> bool + Send + Sync + 'static) -> Predicate {
        Predicate(Arc::new(f))
    }

    pub fn eval(&self, value: &Scalar) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// A coordinate query.
#[derive(Debug, Clone)]
pub enum Selector {
    /// Exact match within tolerance. `atol` and `rtol` must not be combined.
    At {
        value: SelectorValues,
        atol: Option<f64>,
        rtol: Option<f64>,
    },
    /// Nearest neighbor, by cell center under interval sampling.
    Near { value: SelectorValues },
    /// The cell whose interval contains the value.
    Contains { value: SelectorValues },
    /// All positions whose cell lies inside the closed bounds.
    Between { start: Scalar, end: Scalar },
    /// [`Selector::Between`] with per-endpoint closure flags.
    Interval {
        start: Scalar,
        end: Scalar,
        closed_start: bool,
        closed_end: bool,
    },
    /// All positions whose cell overlaps the bounds at all.
    Touches { start: Scalar, end: Scalar },
    /// Positions where the predicate holds on the raw value. Ignores all
    /// lookup metadata.
    Where(Predicate),
    /// Sorted, deduplicated union of the child selectors' results.
    All(Vec<Selector>),
}

impl Selector {
    pub fn at(value: impl Into<Scalar>) -> Selector {
        Selector::At {
            value: SelectorValues::one(value),
            atol: None,
            rtol: None,
        }
    }

    pub fn at_tolerant(value: impl Into<Scalar>, atol: f64) -> Selector {
        Selector::At {
            value: SelectorValues::one(value),
            atol: Some(atol),
            rtol: None,
        }
    }

    pub fn at_many<V: Into<Scalar>>(values: impl IntoIterator<Item = V>) -> Selector {
        Selector::At {
            value: SelectorValues::many(values),
            atol: None,
            rtol: None,
        }
    }

    pub fn near(value: impl Into<Scalar>) -> Selector {
        Selector::Near {
            value: SelectorValues::one(value),
        }
    }

    pub fn near_many<V: Into<Scalar>>(values: impl IntoIterator<Item = V>) -> Selector {
        Selector::Near {
            value: SelectorValues::many(values),
        }
    }

    pub fn contains(value: impl Into<Scalar>) -> Selector {
        Selector::Contains {
            value: SelectorValues::one(value),
        }
    }

    pub fn contains_many<V: Into<Scalar>>(values: impl IntoIterator<Item = V>) -> Selector {
        Selector::Contains {
            value: SelectorValues::many(values),
        }
    }

    pub fn between(start: impl Into<Scalar>, end: impl Into<Scalar>) -> Selector {
        Selector::Between {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn interval(
        start: impl Into<Scalar>,
        end: impl Into<Scalar>,
        closed_start: bool,
        closed_end: bool,
    ) -> Selector {
        Selector::Interval {
            start: start.into(),
            end: end.into(),
            closed_start,
            closed_end,
        }
    }

    pub fn touches(start: impl Into<Scalar>, end: impl Into<Scalar>) -> Selector {
        Selector::Touches {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn where_values(predicate: impl Fn(&Scalar) -> bool + Send + Sync + 'static) -> Selector {
        Selector::Where(Predicate::new(predicate))
    }

    pub fn all(selectors: impl IntoIterator<Item = Selector>) -> Selector {
        Selector::All(selectors.into_iter().collect())
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Selector::At { .. } => "at",
            Selector::Near { .. } => "near",
            Selector::Contains { .. } => "contains",
            Selector::Between { .. } => "between",
            Selector::Interval { .. } => "interval",
            Selector::Touches { .. } => "touches",
            Selector::Where(_) => "where",
            Selector::All(_) => "all",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_wrap_values() {
        assert!(matches!(
            Selector::at(30),
            Selector::At {
                value: SelectorValues::One(Scalar::I64(30)),
                atol: None,
                rtol: None,
            }
        ));
        match Selector::near_many([1.5, 2.5]) {
            Selector::Near {
                value: SelectorValues::Many(v),
            } => assert_eq!(v, vec![Scalar::F64(1.5), Scalar::F64(2.5)]),
            other => panic!("unexpected selector: {other:?}"),
        }
    }

    #[test]
    fn predicate_evaluates() {
        let p = Predicate::new(|v| matches!(v, Scalar::I64(x) if *x > 2));
        assert!(p.eval(&Scalar::I64(3)));
        assert!(!p.eval(&Scalar::I64(1)));
        assert!(!p.eval(&Scalar::Str("a".into())));
    }
}
