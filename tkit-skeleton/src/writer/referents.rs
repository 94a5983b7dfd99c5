//! Referent cache
//!
//! Resources flagged as referents are parked here instead of being written at their own
//! position. Each entry carries a remaining-use count: every successful [`ReferentCache::take`]
//! consumes one use and the entry is evicted once none remain.
//!
//! One cache belongs to one document's writer. Entries are shared through `Rc` so a referent
//! can be rendered while the cache is mutated again by nested lookups.

use super::storage::GroupBuffer;
use crate::model::{DocumentPart, ResourceRef, TextUnit};
use crate::skeleton::Skeleton;
use std::collections::HashMap;
use std::rc::Rc;

/// A parked resource, resolved differently per kind.
#[derive(Debug, Clone)]
pub enum Referent {
    TextUnit(TextUnit),
    DocumentPart(DocumentPart),
    Group(GroupBuffer),
    /// Bare skeleton with no resource around it.
    Other(Skeleton),
}

impl Referent {
    /// The resource markers owned by this referent resolve against.
    pub fn as_resource(&self) -> Option<ResourceRef<'_>> {
        match self {
            Referent::TextUnit(tu) => Some(ResourceRef::TextUnit(tu)),
            Referent::DocumentPart(dp) => Some(ResourceRef::DocumentPart(dp)),
            Referent::Group(buffer) => Some(ResourceRef::Group(&buffer.start)),
            Referent::Other(_) => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Referent::TextUnit(_) => "text unit",
            Referent::DocumentPart(_) => "document part",
            Referent::Group(_) => "group",
            Referent::Other(_) => "skeleton",
        }
    }
}

#[derive(Debug)]
struct Entry {
    referent: Rc<Referent>,
    remaining: usize,
}

#[derive(Debug, Default)]
pub struct ReferentCache {
    entries: HashMap<String, Entry>,
}

impl ReferentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parks `referent` under `id` for `uses` resolutions (at least one). Replaces any
    /// previous entry with the same id.
    pub fn put(&mut self, id: &str, referent: Referent, uses: usize) {
        log::debug!("caching {} '{id}' for {uses} use(s)", referent.kind_name());
        self.entries.insert(
            id.to_string(),
            Entry {
                referent: Rc::new(referent),
                remaining: uses.max(1),
            },
        );
    }

    /// Consumes one use of `id`. `None` when absent or exhausted.
    pub fn take(&mut self, id: &str) -> Option<Rc<Referent>> {
        let entry = self.entries.get_mut(id)?;
        entry.remaining -= 1;
        let referent = Rc::clone(&entry.referent);
        if entry.remaining == 0 {
            self.entries.remove(id);
        }
        Some(referent)
    }

    /// Looks at `id` without consuming a use.
    pub fn peek(&self, id: &str) -> Option<Rc<Referent>> {
        self.entries.get(id).map(|entry| Rc::clone(&entry.referent))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn remaining_uses(&self, id: &str) -> Option<usize> {
        self.entries.get(id).map(|entry| entry.remaining)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dp(id: &str) -> Referent {
        Referent::DocumentPart(DocumentPart::new(id, Skeleton::from_text("x")))
    }

    #[test]
    fn take_consumes_uses_then_evicts() {
        let mut cache = ReferentCache::new();
        cache.put("dp1", dp("dp1"), 2);
        assert!(cache.take("dp1").is_some());
        assert_eq!(cache.remaining_uses("dp1"), Some(1));
        assert!(cache.take("dp1").is_some());
        assert!(!cache.contains("dp1"));
        assert!(cache.take("dp1").is_none());
    }

    #[test]
    fn zero_uses_means_one() {
        let mut cache = ReferentCache::new();
        cache.put("dp1", dp("dp1"), 0);
        assert_eq!(cache.remaining_uses("dp1"), Some(1));
    }

    #[test]
    fn peek_does_not_consume() {
        let mut cache = ReferentCache::new();
        cache.put("dp1", dp("dp1"), 1);
        assert!(cache.peek("dp1").is_some());
        assert!(cache.peek("dp1").is_some());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn group_referent_resolves_to_its_start() {
        let buffer = GroupBuffer::new(
            crate::model::StartGroup::new("g1", None),
            super::super::storage::GroupKind::Group,
        );
        let referent = Referent::Group(buffer);
        assert_eq!(referent.as_resource().map(|r| r.id()), Some("g1"));
    }
}
