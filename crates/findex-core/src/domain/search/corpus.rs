//! In-memory corpus of searchable entities
//!
//! Entities are partitioned by type. Iteration walks the partitions in
//! [`EntityType`] order and each partition in insertion order; that order is
//! what "relevance" sorting preserves.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::entity::{Entity, EntityType};

/// Per-value entity counts for each facet dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetCounts {
    pub owners: BTreeMap<String, usize>,
    pub tags: BTreeMap<String, usize>,
    pub statuses: BTreeMap<String, usize>,
}

/// Snapshot of every entity available to search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    partitions: BTreeMap<EntityType, Vec<Entity>>,
}

impl Corpus {
    /// Create an empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from entities; a later duplicate `(type, id)` replaces
    /// the earlier one in place
    pub fn from_entities<I: IntoIterator<Item = Entity>>(entities: I) -> Self {
        let mut corpus = Self::new();
        corpus.extend(entities);
        corpus
    }

    /// Insert an entity, returning the one it replaced, if any
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        let partition = self.partitions.entry(entity.entity_type).or_default();
        match partition.iter_mut().find(|existing| existing.id == entity.id) {
            Some(existing) => Some(std::mem::replace(existing, entity)),
            None => {
                partition.push(entity);
                None
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = Entity>>(&mut self, entities: I) {
        for entity in entities {
            self.insert(entity);
        }
    }

    pub fn get(&self, entity_type: EntityType, id: i64) -> Option<&Entity> {
        self.all_entities_of_type(entity_type)
            .iter()
            .find(|entity| entity.id == id)
    }

    /// Entities of one type, in insertion order
    pub fn all_entities_of_type(&self, entity_type: EntityType) -> &[Entity] {
        self.partitions
            .get(&entity_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All entities in corpus order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.partitions.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entities per type, omitting empty types
    pub fn type_counts(&self) -> BTreeMap<EntityType, usize> {
        self.partitions
            .iter()
            .filter(|(_, entities)| !entities.is_empty())
            .map(|(kind, entities)| (*kind, entities.len()))
            .collect()
    }

    /// Every owner that appears on any entity
    pub fn distinct_owners(&self) -> BTreeSet<String> {
        self.iter().filter_map(|entity| entity.owner.clone()).collect()
    }

    /// Every tag that appears on any entity
    pub fn distinct_tags(&self) -> BTreeSet<String> {
        self.iter()
            .filter_map(|entity| entity.tags.as_ref())
            .flatten()
            .cloned()
            .collect()
    }

    /// Every status that appears on any entity
    pub fn distinct_statuses(&self) -> BTreeSet<String> {
        self.iter().filter_map(|entity| entity.status.clone()).collect()
    }

    /// Count entities per owner, tag and status value
    pub fn facet_counts(&self) -> FacetCounts {
        let mut counts = FacetCounts::default();
        for entity in self.iter() {
            if let Some(owner) = &entity.owner {
                *counts.owners.entry(owner.clone()).or_default() += 1;
            }
            for tag in entity.tags.iter().flatten() {
                *counts.tags.entry(tag.clone()).or_default() += 1;
            }
            if let Some(status) = &entity.status {
                *counts.statuses.entry(status.clone()).or_default() += 1;
            }
        }
        counts
    }
}

impl FromIterator<Entity> for Corpus {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self::from_entities(iter)
    }
}
