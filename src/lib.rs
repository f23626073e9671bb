//! Coordinate lookups and selector resolution for labeled array axes.
//!
//! A [`Lookup`] pairs one axis's coordinate values with the metadata that
//! gives them meaning: ordering direction, point versus interval sampling,
//! cell span, and the locus of the published value within its cell. A
//! [`Selector`] is a pure-data query against such an axis. [`resolve`] maps
//! the pair to integer index positions, picking the cheapest correct search
//! the metadata allows.
//!
//! ```
//! use coordsel::{resolve, IndexResult, Lookup, Scalar, Selector};
//!
//! let time = Lookup::points_regular(
//!     (1..=5).map(|i| Scalar::I64(i * 10)).collect(),
//!     Scalar::I64(10),
//! )?;
//! assert_eq!(resolve(&time, &Selector::at(30))?, IndexResult::Single(2));
//! assert_eq!(
//!     resolve(&time, &Selector::between(15, 35))?,
//!     IndexResult::Range(1..3)
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod lookup;
pub mod resolve;
pub mod scalar;
pub mod selector;

mod search;

pub use error::{LookupError, ResolveError, ResolveResult};
pub use lookup::{Locus, Lookup, Order, Sampling, Span};
pub use resolve::{has_selection, resolve, resolve_axes, IndexResult};
pub use scalar::Scalar;
pub use selector::{Predicate, Selector, SelectorValues};
