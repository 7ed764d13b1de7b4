//! Search specifications
//!
//! One specification per filter dimension. Each passes when its query field
//! is empty, and when the entity lacks the attribute being filtered on, so
//! dimensions compose by plain AND without special cases.

use std::collections::BTreeSet;

use crate::domain::specification::{AllOf, Specification};

use super::entity::{Entity, EntityType};
use super::query::{DateRange, Query, TextMatch};

/// Status value hidden unless the query opts in
pub const ARCHIVED_STATUS: &str = "archived";

/// Entity type must be one of the selected types
pub struct TypeMembershipSpec<'a> {
    selected: &'a BTreeSet<EntityType>,
}

impl<'a> TypeMembershipSpec<'a> {
    pub fn new(selected: &'a BTreeSet<EntityType>) -> Self {
        Self { selected }
    }
}

impl Specification<Entity> for TypeMembershipSpec<'_> {
    fn is_satisfied_by(&self, entity: &Entity) -> bool {
        // Empty selection searches nothing
        self.selected.contains(&entity.entity_type)
    }
}

/// Some text field must match the free text under the configured mode
pub struct TextMatchSpec {
    needle: String,
    mode: TextMatch,
}

impl TextMatchSpec {
    pub fn new(free_text: &str, mode: TextMatch) -> Self {
        Self {
            needle: free_text.to_lowercase(),
            mode,
        }
    }
}

impl Specification<Entity> for TextMatchSpec {
    fn is_satisfied_by(&self, entity: &Entity) -> bool {
        if self.needle.is_empty() {
            return true;
        }

        entity
            .text_fields()
            .any(|field| self.mode.matches(&field.to_lowercase(), &self.needle))
    }
}

/// Creation date must fall within the range; undated entities pass
pub struct DateRangeSpec<'a> {
    range: Option<&'a DateRange>,
}

impl<'a> DateRangeSpec<'a> {
    pub fn new(range: Option<&'a DateRange>) -> Self {
        Self { range }
    }
}

impl Specification<Entity> for DateRangeSpec<'_> {
    fn is_satisfied_by(&self, entity: &Entity) -> bool {
        match (self.range, entity.created_at) {
            (Some(range), Some(created_at)) => range.contains(created_at),
            _ => true,
        }
    }
}

/// Owner must be one of the requested owners
pub struct OwnerSpec<'a> {
    owners: &'a BTreeSet<String>,
}

impl<'a> OwnerSpec<'a> {
    pub fn new(owners: &'a BTreeSet<String>) -> Self {
        Self { owners }
    }
}

impl Specification<Entity> for OwnerSpec<'_> {
    fn is_satisfied_by(&self, entity: &Entity) -> bool {
        match &entity.owner {
            Some(owner) if !self.owners.is_empty() => self.owners.contains(owner),
            _ => true,
        }
    }
}

/// Entity must share at least one tag with the query
pub struct TagSpec<'a> {
    tags: &'a BTreeSet<String>,
}

impl<'a> TagSpec<'a> {
    pub fn new(tags: &'a BTreeSet<String>) -> Self {
        Self { tags }
    }
}

impl Specification<Entity> for TagSpec<'_> {
    fn is_satisfied_by(&self, entity: &Entity) -> bool {
        match &entity.tags {
            Some(tags) if !tags.is_empty() && !self.tags.is_empty() => {
                !tags.is_disjoint(self.tags)
            }
            _ => true,
        }
    }
}

/// Status must be one of the requested statuses
pub struct StatusSpec<'a> {
    statuses: &'a BTreeSet<String>,
}

impl<'a> StatusSpec<'a> {
    pub fn new(statuses: &'a BTreeSet<String>) -> Self {
        Self { statuses }
    }
}

impl Specification<Entity> for StatusSpec<'_> {
    fn is_satisfied_by(&self, entity: &Entity) -> bool {
        match &entity.status {
            Some(status) if !self.statuses.is_empty() => self.statuses.contains(status),
            _ => true,
        }
    }
}

/// Hides archived entities unless the query shows them
///
/// Applies even when `archived` is one of the requested statuses.
pub struct ArchivedPolicySpec {
    show_archived: bool,
}

impl ArchivedPolicySpec {
    pub fn new(show_archived: bool) -> Self {
        Self { show_archived }
    }
}

impl Specification<Entity> for ArchivedPolicySpec {
    fn is_satisfied_by(&self, entity: &Entity) -> bool {
        self.show_archived || entity.status.as_deref() != Some(ARCHIVED_STATUS)
    }
}

/// Every filter dimension of a query, joined with AND
pub struct QuerySpec<'a> {
    inner: AllOf<'a, Entity>,
}

impl<'a> QuerySpec<'a> {
    /// Build the full conjunction for a query
    ///
    /// Cheap checks go first so most rejections short-circuit before text
    /// matching lower-cases any fields.
    pub fn from_query(query: &'a Query) -> Self {
        let inner = AllOf::new()
            .with(TypeMembershipSpec::new(&query.selected_types))
            .with(ArchivedPolicySpec::new(query.show_archived))
            .with(StatusSpec::new(&query.statuses))
            .with(OwnerSpec::new(&query.owners))
            .with(TagSpec::new(&query.tags))
            .with(DateRangeSpec::new(query.date_range.as_ref()))
            .with(TextMatchSpec::new(&query.free_text, query.text_match));

        Self { inner }
    }

    /// Keep the entities that satisfy the query, preserving their order
    pub fn filter<'e, I>(&self, entities: I) -> Vec<&'e Entity>
    where
        I: IntoIterator<Item = &'e Entity>,
    {
        entities
            .into_iter()
            .filter(|entity| self.is_satisfied_by(entity))
            .collect()
    }
}

impl Specification<Entity> for QuerySpec<'_> {
    fn is_satisfied_by(&self, entity: &Entity) -> bool {
        self.inner.is_satisfied_by(entity)
    }
}

/// Decide whether a single entity is included by a query
pub fn matches(query: &Query, entity: &Entity) -> bool {
    QuerySpec::from_query(query).is_satisfied_by(entity)
}
