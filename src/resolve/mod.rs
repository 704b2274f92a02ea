//! Ordered fallback chains for single-field extraction.
//!
//! A field is resolved by walking a [`FieldChain`] of [`Strategy`] objects in
//! declared order. Each strategy looks for its own anchor in a context and
//! returns a candidate or `None`; the chain hands every candidate to the
//! field's [`Field::validate`] and stops at the first one that survives.
//!
//! # Architecture
//!
//! - [`Strategy`]: side-effect-free attempt to read one value from a context
//! - [`Field`]: the value domain (year window, rating range, genre list shape)
//! - [`FieldChain`]: ordered strategies, inspectable via [`FieldChain::names`]
//! - [`Resolution`]: the winning value plus which strategies were tried
//!
//! A missing anchor and a rejected candidate are both quiet outcomes: they are
//! traced and the next strategy runs.
//!
//! # Example
//!
//! ```rust
//! use nowshowing::resolve::{FieldChain, Strategy, YearField, YearWindow};
//!
//! struct Fixed(i32);
//!
//! impl Strategy<str> for Fixed {
//!     type Output = i32;
//!     fn name(&self) -> &'static str {
//!         "fixed"
//!     }
//!     fn attempt(&self, _ctx: &str) -> Option<i32> {
//!         Some(self.0)
//!     }
//! }
//!
//! let chain = FieldChain::new().then(Fixed(1850)).then(Fixed(2019));
//! let field = YearField::new(YearWindow::ending(2026));
//! let resolution = chain.resolve(&field, "");
//! assert_eq!(resolution.value(), Some(&2019));
//! assert_eq!(resolution.attempted(), ["fixed", "fixed"]);
//! ```

pub mod fields;
pub mod text;

pub use fields::{GenreField, RatingField, YearField, YearWindow};

use tracing::trace;

/// One ordered attempt at extracting a field value from a context.
///
/// Implementations must not have side effects. Failing to find an anchor is
/// not an error: return `None` and the chain moves on.
pub trait Strategy<C: ?Sized>: Send + Sync {
    type Output;

    /// Short identifier used in traces and ordering assertions.
    fn name(&self) -> &'static str;

    /// Try to produce a candidate value.
    fn attempt(&self, ctx: &C) -> Option<Self::Output>;
}

/// Value domain for one field.
pub trait Field {
    type Value;

    fn name(&self) -> &'static str;

    /// Normalize and accept a candidate, or reject it with `None`.
    fn validate(&self, candidate: Self::Value) -> Option<Self::Value>;
}

pub type BoxedStrategy<C, T> = Box<dyn Strategy<C, Output = T>>;

/// Outcome of running a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<T> {
    value: Option<T>,
    winner: Option<(usize, &'static str)>,
    attempted: Vec<&'static str>,
}

impl<T> Resolution<T> {
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// Name of the strategy that produced the value.
    pub fn winner(&self) -> Option<&'static str> {
        self.winner.map(|(_, name)| name)
    }

    /// Position of the winning strategy in its chain; lower is more reliable.
    pub fn rank(&self) -> Option<usize> {
        self.winner.map(|(rank, _)| rank)
    }

    /// Every strategy that ran, in order.
    pub fn attempted(&self) -> &[&'static str] {
        &self.attempted
    }
}

/// An ordered list of strategies for one field.
pub struct FieldChain<C: ?Sized, T> {
    strategies: Vec<BoxedStrategy<C, T>>,
}

impl<C: ?Sized, T> FieldChain<C, T> {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a lower-priority strategy.
    #[must_use]
    pub fn then<S>(mut self, strategy: S) -> Self
    where
        S: Strategy<C, Output = T> + 'static,
    {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run the chain against `ctx`, stopping at the first valid candidate.
    pub fn resolve<F>(&self, field: &F, ctx: &C) -> Resolution<T>
    where
        F: Field<Value = T>,
    {
        run(field, &self.strategies, ctx)
    }
}

impl<C: ?Sized, T> Default for FieldChain<C, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve one field: first valid candidate from `strategies`, in order.
pub fn resolve<F, C>(field: &F, strategies: &[BoxedStrategy<C, F::Value>], ctx: &C) -> Option<F::Value>
where
    F: Field,
    C: ?Sized,
{
    run(field, strategies, ctx).into_value()
}

fn run<F, C>(field: &F, strategies: &[BoxedStrategy<C, F::Value>], ctx: &C) -> Resolution<F::Value>
where
    F: Field,
    C: ?Sized,
{
    let mut attempted = Vec::with_capacity(strategies.len());

    for (rank, strategy) in strategies.iter().enumerate() {
        attempted.push(strategy.name());

        let Some(candidate) = strategy.attempt(ctx) else {
            trace!(field = field.name(), strategy = strategy.name(), "no candidate");
            continue;
        };

        match field.validate(candidate) {
            Some(value) => {
                trace!(field = field.name(), strategy = strategy.name(), rank, "resolved");
                return Resolution {
                    value: Some(value),
                    winner: Some((rank, strategy.name())),
                    attempted,
                };
            }
            None => {
                trace!(field = field.name(), strategy = strategy.name(), "candidate rejected");
            }
        }
    }

    Resolution {
        value: None,
        winner: None,
        attempted,
    }
}
