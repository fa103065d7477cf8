//! Invalidation tags and the tag-to-query index.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::QueryKey;

/// Entity family a cached result depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKind {
    Product,
    Category,
    Cart,
    Wishlist,
    Session,
    Order,
    Address,
    Cms,
}

/// Which member of a [`TagKind`] a result depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagId {
    /// A specific entity.
    Entity(String),
    /// The collection as a whole.
    List,
    /// The signed-in user's single instance (cart, wishlist, session).
    Current,
    /// A lookup that found nothing.
    Unknown,
    /// A CMS page lookup that found nothing.
    Page,
}

/// A (kind, id) invalidation label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    pub kind: TagKind,
    pub id: TagId,
}

impl Tag {
    #[must_use]
    pub const fn new(kind: TagKind, id: TagId) -> Self {
        Self { kind, id }
    }

    pub fn entity(kind: TagKind, id: impl Into<String>) -> Self {
        Self::new(kind, TagId::Entity(id.into()))
    }

    #[must_use]
    pub const fn list(kind: TagKind) -> Self {
        Self::new(kind, TagId::List)
    }

    #[must_use]
    pub const fn current(kind: TagKind) -> Self {
        Self::new(kind, TagId::Current)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            TagId::Entity(id) => write!(f, "{:?}:{id}", self.kind),
            TagId::List => write!(f, "{:?}:LIST", self.kind),
            TagId::Current => write!(f, "{:?}:CURRENT", self.kind),
            TagId::Unknown => write!(f, "{:?}:UNKNOWN", self.kind),
            TagId::Page => write!(f, "{:?}:PAGE", self.kind),
        }
    }
}

/// Maps tags to the cached queries that provided them.
#[derive(Debug, Default)]
pub(crate) struct TagIndex {
    by_tag: HashMap<TagKind, HashMap<TagId, HashSet<QueryKey>>>,
    by_key: HashMap<QueryKey, Vec<Tag>>,
}

impl TagIndex {
    /// Record the tags `key` provides, replacing any earlier set.
    pub(crate) fn insert(&mut self, key: QueryKey, tags: Vec<Tag>) {
        self.remove(&key);
        for tag in &tags {
            self.by_tag
                .entry(tag.kind)
                .or_default()
                .entry(tag.id.clone())
                .or_default()
                .insert(key.clone());
        }
        self.by_key.insert(key, tags);
    }

    pub(crate) fn remove(&mut self, key: &QueryKey) {
        let Some(tags) = self.by_key.remove(key) else {
            return;
        };
        for tag in tags {
            if let Some(ids) = self.by_tag.get_mut(&tag.kind) {
                if let Some(keys) = ids.get_mut(&tag.id) {
                    keys.remove(key);
                    if keys.is_empty() {
                        ids.remove(&tag.id);
                    }
                }
                if ids.is_empty() {
                    self.by_tag.remove(&tag.kind);
                }
            }
        }
    }

    /// Remove and return every key providing at least one of `tags`.
    pub(crate) fn take_matching(&mut self, tags: &[Tag]) -> HashSet<QueryKey> {
        let matched: HashSet<QueryKey> = tags
            .iter()
            .filter_map(|tag| self.by_tag.get(&tag.kind)?.get(&tag.id))
            .flatten()
            .cloned()
            .collect();
        for key in &matched {
            self.remove(key);
        }
        matched
    }

    pub(crate) fn tags_for(&self, key: &QueryKey) -> Option<&[Tag]> {
        self.by_key.get(key).map(Vec::as_slice)
    }

    pub(crate) fn clear(&mut self) {
        self.by_tag.clear();
        self.by_key.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }
}
