//! Skeleton model
//!
//!     A [`Skeleton`] is the ordered template around a resource's content. Each [`SkeletonPart`]
//!     is either opaque literal text or text embedding reference markers (see [`marker`]).
//!
//!     Parts refer to their owner by resource id, never by pointer. The writer resolves the id
//!     against the resource being rendered first and the referent cache second.
//!
//!     Filters build skeletons incrementally: literal text is appended to the current part, and
//!     every placeholder closes the current part so the next literal starts a fresh one. That
//!     keeps each placeholder alone in its part, which is what the classifier expects.

pub mod classify;
pub mod marker;
pub mod util;

use crate::locale::LocaleId;
use marker::{make_property_marker, make_ref_marker, make_segment_marker, SELF_ID};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One template unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletonPart {
    pub data: String,
    /// Id of the resource a self, property or segment marker stands for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Absent means source, the empty locale means resource level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<LocaleId>,
}

impl SkeletonPart {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            owner: None,
            locale: None,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_locale(mut self, locale: LocaleId) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn is_owned_by(&self, id: &str) -> bool {
        self.owner.as_deref() == Some(id)
    }

    fn starts_with_self_marker(&self) -> bool {
        self.data
            .strip_prefix(marker::REF_MARKER_START)
            .is_some_and(|rest| rest.starts_with(SELF_ID))
    }
}

impl fmt::Display for SkeletonPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data)
    }
}

/// Ordered template owned by one resource at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Skeleton {
    #[serde(default)]
    parts: Vec<SkeletonPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<String>,
    /// Whether the next `append` may extend the last part.
    #[serde(skip)]
    extend_last: bool,
}

impl PartialEq for Skeleton {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts && self.owner == other.owner
    }
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skeleton made of one literal part (or none for empty text).
    pub fn from_text(data: &str) -> Self {
        let mut skeleton = Self::new();
        skeleton.add(data);
        skeleton
    }

    pub fn from_parts(parts: Vec<SkeletonPart>) -> Self {
        Self {
            parts,
            owner: None,
            extend_last: false,
        }
    }

    pub fn parts(&self) -> &[SkeletonPart] {
        &self.parts
    }

    pub fn parts_mut(&mut self) -> &mut Vec<SkeletonPart> {
        &mut self.parts
    }

    pub fn into_parts(self) -> Vec<SkeletonPart> {
        self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// True when no part holds anything but whitespace.
    pub fn is_blank(&self) -> bool {
        self.parts
            .iter()
            .all(|part| part.data.chars().all(char::is_whitespace))
    }

    pub fn first_part(&self) -> Option<&SkeletonPart> {
        self.parts.first()
    }

    pub fn last_part(&self) -> Option<&SkeletonPart> {
        self.parts.last()
    }

    /// Adds a new literal part. Empty text is ignored.
    pub fn add(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }
        self.parts.push(SkeletonPart::new(data));
        self.extend_last = true;
    }

    pub fn add_part(&mut self, part: SkeletonPart) {
        self.parts.push(part);
        self.extend_last = false;
    }

    /// Copies the parts of another skeleton after the existing ones.
    pub fn extend(&mut self, other: &Skeleton) {
        self.parts.extend(other.parts.iter().cloned());
        self.extend_last = false;
    }

    /// Forces the next `append` to start a new part.
    pub fn flush_part(&mut self) {
        self.extend_last = false;
    }

    /// Appends literal text to the current part, or starts a new one after a placeholder.
    pub fn append(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }
        match self.parts.last_mut() {
            Some(last) if self.extend_last => last.data.push_str(data),
            _ => self.add(data),
        }
    }

    pub fn append_to_first_part(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }
        match self.parts.first_mut() {
            Some(first) => first.data.push_str(data),
            None => self.add(data),
        }
    }

    /// Placeholder for the content of text unit `owner`, for `locale` (none = source).
    pub fn add_content_placeholder(&mut self, owner: &str, locale: Option<LocaleId>) {
        self.add_part(SkeletonPart {
            data: make_ref_marker(SELF_ID),
            owner: Some(owner.to_string()),
            locale,
        });
    }

    /// Placeholder for the value of `property` on `owner`.
    pub fn add_value_placeholder(&mut self, owner: &str, property: &str, locale: Option<LocaleId>) {
        self.add_part(SkeletonPart {
            data: make_property_marker(SELF_ID, property),
            owner: Some(owner.to_string()),
            locale,
        });
    }

    /// Placeholder for segment `segment_id` of text unit `owner`.
    pub fn add_segment_placeholder(
        &mut self,
        owner: &str,
        segment_id: &str,
        locale: Option<LocaleId>,
    ) {
        self.add_part(SkeletonPart {
            data: make_segment_marker(segment_id),
            owner: Some(owner.to_string()),
            locale,
        });
    }

    /// Placeholder for the referent `id`, resolved through the referent cache.
    pub fn add_reference(&mut self, id: &str) {
        self.add_part(SkeletonPart::new(make_ref_marker(id)));
    }

    /// Sets the owner of the current part, opening an empty one if needed.
    pub fn attach_owner(&mut self, owner: &str) {
        if !self.extend_last || self.parts.is_empty() {
            self.parts.push(SkeletonPart::new(""));
            self.extend_last = true;
        }
        if let Some(last) = self.parts.last_mut() {
            last.owner = Some(owner.to_string());
        }
    }

    /// Points every part starting with a self-marker at `owner`.
    pub fn change_self_referents(&mut self, owner: &str) {
        for part in &mut self.parts {
            if part.starts_with_self_marker() {
                part.owner = Some(owner.to_string());
            }
        }
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Re-parents the skeleton. Self-marker parts that pointed at the previous owner follow.
    pub fn set_owner(&mut self, owner: &str) {
        if let Some(previous) = self.owner.take() {
            for part in &mut self.parts {
                if part.starts_with_self_marker() && part.is_owned_by(&previous) {
                    part.owner = Some(owner.to_string());
                }
            }
        }
        self.owner = Some(owner.to_string());
    }
}

impl fmt::Display for Skeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            f.write_str(&part.data)?;
        }
        Ok(())
    }
}
