//! Generic criterion engine
//!
//! Builds typed field predicates and combines them into AND-queries. The
//! engine knows nothing about any concrete entity: a criterion pairs a
//! value extractor with a value matcher, and an entity without a value for
//! the field simply does not match. Field and operator tags are carried for
//! introspection only, matching is decided by the closure alone.

use std::fmt;
use std::sync::Arc;

/// Structural field a criterion inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    DeletionDate,
    DeliveryDate,
    RecipientList,
    Sender,
    HasAttachment,
    OriginMailboxList,
    Subject,
}

/// Comparison applied to the field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    BeforeOrEquals,
    AfterOrEquals,
    Equals,
    EqualsIgnoreCase,
    Contains,
    ContainsIgnoreCase,
}

/// A single typed field/operator/value predicate over entities of type `E`.
pub struct Criterion<E> {
    field: FieldName,
    operator: Operator,
    expected: String,
    predicate: Arc<dyn Fn(&E) -> bool + Send + Sync>,
}

impl<E> Criterion<E> {
    pub fn matches(&self, entity: &E) -> bool {
        (self.predicate)(entity)
    }

    pub fn field(&self) -> FieldName {
        self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Display form of the expected value, for introspection and logging.
    pub fn expected_value(&self) -> &str {
        &self.expected
    }
}

impl<E> Clone for Criterion<E> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            operator: self.operator,
            expected: self.expected.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<E> fmt::Debug for Criterion<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criterion")
            .field("field", &self.field)
            .field("operator", &self.operator)
            .field("expected", &self.expected)
            .finish()
    }
}

/// Start building a criterion for one field of `E`.
///
/// The extractor borrows the field value from the entity; returning `None`
/// makes the resulting criterion evaluate to "does not match".
pub fn for_field<E, T, X>(field: FieldName, extractor: X) -> CriterionBuilder<E, T>
where
    T: ?Sized + 'static,
    X: for<'a> Fn(&'a E) -> Option<&'a T> + Send + Sync + 'static,
{
    CriterionBuilder {
        field,
        extractor: Box::new(extractor),
    }
}

/// Intermediate holding the field and its extractor, waiting for a matcher.
pub struct CriterionBuilder<E, T: ?Sized> {
    field: FieldName,
    extractor: Box<dyn for<'a> Fn(&'a E) -> Option<&'a T> + Send + Sync>,
}

impl<E: 'static, T: ?Sized + 'static> CriterionBuilder<E, T> {
    pub fn matching<M>(
        self,
        operator: Operator,
        expected: impl Into<String>,
        matcher: M,
    ) -> Criterion<E>
    where
        M: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let extractor = self.extractor;
        Criterion {
            field: self.field,
            operator,
            expected: expected.into(),
            predicate: Arc::new(move |entity| {
                extractor(entity).map(|value| matcher(value)).unwrap_or(false)
            }),
        }
    }
}

/// Conjunction of criteria; the empty query matches everything.
pub struct Query<E> {
    criteria: Vec<Criterion<E>>,
}

impl<E> Query<E> {
    pub fn of(criteria: Vec<Criterion<E>>) -> Self {
        Self { criteria }
    }

    /// The always-true query.
    pub fn all() -> Self {
        Self {
            criteria: Vec::new(),
        }
    }

    pub fn and(mut self, criterion: Criterion<E>) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// Evaluate all criteria, short-circuiting on the first miss.
    pub fn matches(&self, entity: &E) -> bool {
        self.criteria.iter().all(|criterion| criterion.matches(entity))
    }

    pub fn criteria(&self) -> &[Criterion<E>] {
        &self.criteria
    }
}

impl<E> Clone for Query<E> {
    fn clone(&self) -> Self {
        Self {
            criteria: self.criteria.clone(),
        }
    }
}

impl<E> fmt::Debug for Query<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query").field("criteria", &self.criteria).finish()
    }
}

// Matcher families. Each returns a closure deciding one comparison; the
// operator tag passed alongside is documentation, not behavior.

pub fn contains(expected: &str) -> impl Fn(&String) -> bool {
    let needle = expected.to_string();
    move |value| value.contains(&needle)
}

pub fn contains_ignore_case(expected: &str) -> impl Fn(&String) -> bool {
    let needle = expected.to_lowercase();
    move |value| value.to_lowercase().contains(&needle)
}

pub fn equals(expected: &str) -> impl Fn(&String) -> bool {
    let expected = expected.to_string();
    move |value| *value == expected
}

pub fn equals_ignore_case(expected: &str) -> impl Fn(&String) -> bool {
    let expected = expected.to_lowercase();
    move |value| value.to_lowercase() == expected
}

pub fn before_or_equals<T: PartialOrd>(bound: T) -> impl Fn(&T) -> bool {
    move |value| value <= &bound
}

pub fn after_or_equals<T: PartialOrd>(bound: T) -> impl Fn(&T) -> bool {
    move |value| value >= &bound
}

pub fn list_contains<T: PartialEq>(item: T) -> impl Fn(&Vec<T>) -> bool {
    move |list| list.contains(&item)
}
