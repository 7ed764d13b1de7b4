//! Specification pattern for composable filter rules
//!
//! A specification is a predicate object. Search filters are built as a set
//! of independent specifications joined with AND, so a filter dimension that
//! is not in use simply contributes a specification that always passes.

/// Core specification trait for filter rules
pub trait Specification<T>: Send + Sync {
    /// Check if the candidate satisfies this specification
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    /// Combine with another specification using AND
    fn and<'a, S>(self, other: S) -> AllOf<'a, T>
    where
        Self: Sized + 'a,
        S: Specification<T> + 'a,
    {
        AllOf::new().with(self).with(other)
    }
}

/// Conjunction of any number of specifications
///
/// Evaluates in insertion order and stops at the first failure. An empty
/// conjunction is satisfied by everything.
pub struct AllOf<'a, T> {
    specs: Vec<Box<dyn Specification<T> + 'a>>,
}

impl<'a, T> AllOf<'a, T> {
    /// Create an empty conjunction
    pub fn new() -> Self {
        Self { specs: Vec::new() }
    }

    /// Append a specification
    pub fn with<S: Specification<T> + 'a>(mut self, spec: S) -> Self {
        self.specs.push(Box::new(spec));
        self
    }

    /// Number of joined specifications
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<T> Default for AllOf<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Specification<T> for AllOf<'_, T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.specs.iter().all(|spec| spec.is_satisfied_by(candidate))
    }
}

/// A specification backed by a closure
pub struct PredicateSpec<F> {
    predicate: F,
}

impl<T, F> Specification<T> for PredicateSpec<F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (self.predicate)(candidate)
    }
}

/// Helper function to create a specification from a closure
pub fn spec<T, F>(predicate: F) -> PredicateSpec<F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    PredicateSpec { predicate }
}
