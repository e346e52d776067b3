//! Named predicates attached to a parameter

use std::fmt::{Debug, Display};
use std::sync::Arc;

/// A named pure predicate over a parameter value.
///
/// The description is what users see when a value is rejected, so it should
/// read as a condition on `v`, e.g. `v > 0`.
pub struct Constraint<T> {
    description: String,
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Constraint<T> {
    pub fn new(
        description: impl Into<String>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn check(&self, value: &T) -> bool {
        (self.predicate)(value)
    }
}

impl<T> Clone for Constraint<T> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> Debug for Constraint<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constraint")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<T> Constraint<T>
where
    T: PartialOrd + Display + Send + Sync + 'static,
{
    pub fn greater_than(bound: T) -> Self {
        Self::new(format!("v > {bound}"), move |v| *v > bound)
    }

    pub fn at_least(bound: T) -> Self {
        Self::new(format!("v >= {bound}"), move |v| *v >= bound)
    }

    pub fn at_most(bound: T) -> Self {
        Self::new(format!("v <= {bound}"), move |v| *v <= bound)
    }

    /// Inclusive on both ends
    pub fn between(low: T, high: T) -> Self {
        Self::new(format!("{low} <= v <= {high}"), move |v| {
            *v >= low && *v <= high
        })
    }
}

impl<T> Constraint<T>
where
    T: PartialOrd + Display + Default + Send + Sync + 'static,
{
    pub fn positive() -> Self {
        Self::new("v > 0", |v: &T| *v > T::default())
    }
}

impl<T> Constraint<T>
where
    T: PartialEq + Debug + Send + Sync + 'static,
{
    pub fn one_of(allowed: Vec<T>) -> Self {
        Self::new(format!("v in {allowed:?}"), move |v| allowed.contains(v))
    }
}

/// Values with a meaningful length
pub trait Measured {
    fn measure(&self) -> usize;
}

impl Measured for String {
    fn measure(&self) -> usize {
        self.chars().count()
    }
}

impl Measured for Vec<String> {
    fn measure(&self) -> usize {
        self.len()
    }
}

impl<T> Constraint<T>
where
    T: Measured + Send + Sync + 'static,
{
    pub fn non_empty() -> Self {
        Self::new("v is not empty", |v: &T| v.measure() > 0)
    }

    /// Length must be one of `lengths`
    pub fn length_in(lengths: &[usize]) -> Self {
        let lengths = lengths.to_vec();
        Self::new(format!("len(v) in {lengths:?}"), move |v: &T| {
            lengths.contains(&v.measure())
        })
    }
}
