//! Search entity and related types
//!
//! Every searchable record, whatever its kind, is projected into one
//! [`Entity`] shape: a type tag plus the common fields the filters and the
//! ranker read. Kind-specific fields ride along in `extra` and only take
//! part in free-text matching for the kinds that declare them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use super::dates;
use crate::error::Error;

/// Kinds of records that can be searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Categories,
    Priorities,
    Contacts,
    Groups,
    Teams,
    Tasks,
    Profiles,
    PermissionSets,
    PermissionSetGroups,
    Users,
}

impl EntityType {
    const ALL: [Self; 10] = [
        Self::Categories,
        Self::Priorities,
        Self::Contacts,
        Self::Groups,
        Self::Teams,
        Self::Tasks,
        Self::Profiles,
        Self::PermissionSets,
        Self::PermissionSetGroups,
        Self::Users,
    ];

    /// Convert to the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Priorities => "priorities",
            Self::Contacts => "contacts",
            Self::Groups => "groups",
            Self::Teams => "teams",
            Self::Tasks => "tasks",
            Self::Profiles => "profiles",
            Self::PermissionSets => "permission-sets",
            Self::PermissionSetGroups => "permission-set-groups",
            Self::Users => "users",
        }
    }

    /// Human-readable label for result headers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Categories => "Categories",
            Self::Priorities => "Priorities",
            Self::Contacts => "Contacts",
            Self::Groups => "Groups",
            Self::Teams => "Teams",
            Self::Tasks => "Tasks",
            Self::Profiles => "Profiles",
            Self::PermissionSets => "Permission Sets",
            Self::PermissionSetGroups => "Permission Set Groups",
            Self::Users => "Users",
        }
    }

    /// All entity types, in corpus iteration order
    pub fn all() -> &'static [Self] {
        &Self::ALL
    }

    /// Kind-specific fields that take part in free-text matching
    pub fn extra_text_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Contacts | Self::Users => &["email", "role"],
            _ => &[],
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    /// Accepts the wire form as well as snake_case and camelCase spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().replace('-', "") == folded)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown entity type '{}'. Valid types: {}",
                    s,
                    Self::ALL.map(|kind| kind.as_str()).join(", ")
                ))
            })
    }
}

/// A searchable record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Identifier, unique within `entity_type` only
    pub id: i64,

    #[serde(rename = "type")]
    pub entity_type: EntityType,

    /// Primary display and match field
    pub name: String,

    /// Secondary match field
    #[serde(default)]
    pub description: String,

    /// Open-vocabulary status; `None` exempts the entity from status filters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(
        default,
        with = "dates::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,

    /// Kind-specific fields such as `email` or `role`
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Entity {
    /// Create a new entity with only the required fields
    pub fn new(entity_type: EntityType, id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            entity_type,
            name: name.into(),
            description: String::new(),
            status: None,
            created_at: None,
            owner: None,
            tags: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_created_at(mut self, created_at: NaiveDate) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a kind-specific string field
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra
            .insert(key.into(), serde_json::Value::String(value.into()));
        self
    }

    /// Display identity of this entity
    pub fn key(&self) -> (EntityType, i64) {
        (self.entity_type, self.id)
    }

    /// Look up a kind-specific string field
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(serde_json::Value::as_str)
    }

    /// Fields searched by free text: name, description, then any
    /// kind-specific fields this entity's type declares
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        [self.name.as_str(), self.description.as_str()]
            .into_iter()
            .chain(
                self.entity_type
                    .extra_text_fields()
                    .iter()
                    .filter_map(|field| self.extra_str(field)),
            )
    }

    pub fn has_tags(&self) -> bool {
        self.tags.as_ref().is_some_and(|tags| !tags.is_empty())
    }
}

/// A single search result row
///
/// Carries what a host needs to render the row and to navigate to the
/// underlying record by `(entity_type, id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(with = "dates::option", skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
}

impl From<&Entity> for SearchResult {
    fn from(entity: &Entity) -> Self {
        Self {
            entity_type: entity.entity_type,
            id: entity.id,
            name: entity.name.clone(),
            description: entity.description.clone(),
            status: entity.status.clone(),
            created_at: entity.created_at,
            owner: entity.owner.clone(),
            tags: entity.tags.clone(),
        }
    }
}
