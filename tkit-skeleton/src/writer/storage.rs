//! Group buffers
//!
//! A group that must be pulled in later (or that sits inside one) cannot be written as its
//! events arrive. Its events are collected into a [`GroupBuffer`] instead, using a stack of open
//! buffers:
//!
//! 1. **Start:** a referent group, or any group while a buffer is open, pushes a new buffer.
//! 2. **Content:** every event while a buffer is open is appended to the top buffer.
//! 3. **End:** the ending is appended and the buffer popped. A referent buffer is registered
//!    in the referent cache under its group id; a plain nested buffer becomes an item of the
//!    buffer below it.
//!
//! A closed buffer resolves to the group's own skeleton followed by each item in append order.

use super::referents::{Referent, ReferentCache};
use crate::model::{DocumentPart, Ending, StartGroup, StartSubDocument, TextUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Group,
    Subfilter,
}

/// One item of a buffered scope.
#[derive(Debug, Clone)]
pub enum StoredItem {
    TextUnit(TextUnit),
    DocumentPart(DocumentPart),
    SubDocument(StartSubDocument),
    Ending(Ending),
    Group(GroupBuffer),
}

#[derive(Debug, Clone)]
pub struct GroupBuffer {
    pub start: StartGroup,
    pub kind: GroupKind,
    pub items: Vec<StoredItem>,
    /// Encoded output of the nested writer, for sub-filtered regions.
    pub subfilter_output: Option<String>,
}

impl GroupBuffer {
    pub fn new(start: StartGroup, kind: GroupKind) -> Self {
        Self {
            start,
            kind,
            items: Vec::new(),
            subfilter_output: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.start.id
    }

    /// The last ending appended, which closes a sub-filtered region.
    pub fn last_ending(&self) -> Option<&Ending> {
        self.items.iter().rev().find_map(|item| match item {
            StoredItem::Ending(end) => Some(end),
            _ => None,
        })
    }
}

/// Stack of open group buffers.
#[derive(Debug, Default)]
pub struct StorageStack {
    stack: Vec<GroupBuffer>,
}

impl StorageStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self, buffer: GroupBuffer) {
        log::debug!("buffering group '{}'", buffer.id());
        self.stack.push(buffer);
    }

    pub fn top_mut(&mut self) -> Option<&mut GroupBuffer> {
        self.stack.last_mut()
    }

    /// Appends to the top buffer. Hands the item back when no buffer is open.
    pub fn append(&mut self, item: StoredItem) -> Option<StoredItem> {
        match self.stack.last_mut() {
            Some(top) => {
                top.items.push(item);
                None
            }
            None => Some(item),
        }
    }

    /// Closes the top buffer. Returns the id of the closed group, `None` if nothing was open.
    pub fn pop(&mut self, cache: &mut ReferentCache, uses: usize) -> Option<String> {
        let buffer = self.stack.pop()?;
        let id = buffer.id().to_string();
        if buffer.start.is_referent() {
            cache.put(&id, Referent::Group(buffer), uses);
        } else if let Some(parent) = self.stack.last_mut() {
            parent.items.push(StoredItem::Group(buffer));
        } else {
            log::warn!("group '{id}' was buffered without a referent or an enclosing group");
        }
        Some(id)
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}
