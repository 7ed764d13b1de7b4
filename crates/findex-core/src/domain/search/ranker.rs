//! Result ordering
//!
//! Sorting is always stable. Descending order flips the comparison, never
//! the sequence, so entities with equal keys keep their corpus order in both
//! directions.

use std::borrow::Cow;

use super::dates::format_iso_date;
use super::entity::Entity;
use super::query::{Query, SortBy, SortOrder};

/// Comparable key for an entity; absent values compare as the empty string
pub fn sort_key(entity: &Entity, sort_by: SortBy) -> Cow<'_, str> {
    match sort_by {
        SortBy::Relevance => Cow::Borrowed(""),
        SortBy::Name => Cow::Borrowed(entity.name.as_str()),
        SortBy::Date => entity
            .created_at
            .map(|date| Cow::Owned(format_iso_date(date)))
            .unwrap_or(Cow::Borrowed("")),
        SortBy::Status => Cow::Borrowed(entity.status.as_deref().unwrap_or("")),
    }
}

/// Order entities by an explicit key and direction
pub fn rank_by(entities: Vec<&Entity>, sort_by: SortBy, sort_order: SortOrder) -> Vec<&Entity> {
    if sort_by == SortBy::Relevance {
        return entities;
    }

    let mut keyed: Vec<(Cow<'_, str>, &Entity)> = entities
        .into_iter()
        .map(|entity| (sort_key(entity, sort_by), entity))
        .collect();
    keyed.sort_by(|(left, _), (right, _)| sort_order.apply(left.cmp(right)));

    keyed.into_iter().map(|(_, entity)| entity).collect()
}

/// Order entities per the query's sort directive
pub fn rank<'e>(entities: Vec<&'e Entity>, query: &Query) -> Vec<&'e Entity> {
    rank_by(entities, query.sort_by, query.sort_order)
}
