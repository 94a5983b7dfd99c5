//! Skeleton part classification
//!
//! Pure predicates over a part and the id of the resource under consideration. A part is
//! *internal* when its owner is that resource, *external* when it has another owner, and a
//! plain *reference* when it has neither owner nor locale.

use super::marker::{self_marker, REF_MARKER_SEP, SEGMENT_PROPERTY};
use super::SkeletonPart;
use once_cell::sync::Lazy;
use regex::Regex;

static PROPERTY_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\[#\$\$self\${}.+\]$",
        regex::escape(REF_MARKER_SEP)
    ))
    .expect("property marker pattern is valid")
});

static ANY_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[#\$.+\]").expect("reference marker pattern is valid"));

static SEGMENT_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\[#\$.+{}{}\]$",
        regex::escape(REF_MARKER_SEP),
        regex::escape(SEGMENT_PROPERTY)
    ))
    .expect("segment marker pattern is valid")
});

/// What a part stands for, relative to one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Text,
    Segment,
    ExtSegment,
    Reference,
    Source,
    Target,
    Property,
    ExtSource,
    ExtTarget,
    ExtProperty,
    Unknown,
}

/// The part text is exactly a content self-marker.
pub fn is_self_ref(part: &SkeletonPart) -> bool {
    part.data == self_marker()
}

/// The part text contains some marker other than a bare self-marker.
pub fn is_ref(part: &SkeletonPart) -> bool {
    !is_self_ref(part) && ANY_REF.is_match(&part.data)
}

pub fn is_property_ref(part: &SkeletonPart) -> bool {
    !is_self_ref(part) && PROPERTY_REF.is_match(&part.data)
}

pub fn is_segment_ref(part: &SkeletonPart) -> bool {
    !is_self_ref(part) && SEGMENT_REF.is_match(&part.data)
}

pub fn is_text(part: &SkeletonPart) -> bool {
    !is_self_ref(part) && !is_property_ref(part) && !is_ref(part) && !is_segment_ref(part)
}

fn is_external(part: &SkeletonPart, resource_id: &str) -> bool {
    part.owner.as_deref().is_some_and(|owner| owner != resource_id)
}

pub fn is_source_placeholder(part: &SkeletonPart, resource_id: &str) -> bool {
    is_self_ref(part) && part.is_owned_by(resource_id) && part.locale.is_none()
}

pub fn is_target_placeholder(part: &SkeletonPart, resource_id: &str) -> bool {
    is_self_ref(part) && part.is_owned_by(resource_id) && part.locale.is_some()
}

pub fn is_property_placeholder(part: &SkeletonPart, resource_id: &str) -> bool {
    is_property_ref(part) && part.is_owned_by(resource_id)
}

pub fn is_segment_placeholder(part: &SkeletonPart, resource_id: &str) -> bool {
    is_segment_ref(part) && part.is_owned_by(resource_id)
}

pub fn is_ext_source_placeholder(part: &SkeletonPart, resource_id: &str) -> bool {
    is_self_ref(part) && is_external(part, resource_id) && part.locale.is_none()
}

pub fn is_ext_target_placeholder(part: &SkeletonPart, resource_id: &str) -> bool {
    is_self_ref(part) && is_external(part, resource_id) && part.locale.is_some()
}

pub fn is_ext_property_placeholder(part: &SkeletonPart, resource_id: &str) -> bool {
    is_property_ref(part) && is_external(part, resource_id)
}

pub fn is_ext_segment_placeholder(part: &SkeletonPart, resource_id: &str) -> bool {
    is_segment_ref(part) && is_external(part, resource_id)
}

/// A marker to a referent looked up by id in the cache.
pub fn is_reference(part: &SkeletonPart) -> bool {
    is_ref(part) && part.owner.is_none() && part.locale.is_none()
}

/// Applies the predicates in the order the simplifier branches on them.
pub fn classify(part: &SkeletonPart, resource_id: &str) -> PartKind {
    if is_text(part) {
        PartKind::Text
    } else if is_segment_placeholder(part, resource_id) {
        PartKind::Segment
    } else if is_ext_segment_placeholder(part, resource_id) {
        PartKind::ExtSegment
    } else if is_reference(part) {
        PartKind::Reference
    } else if is_source_placeholder(part, resource_id) {
        PartKind::Source
    } else if is_target_placeholder(part, resource_id) {
        PartKind::Target
    } else if is_property_placeholder(part, resource_id) {
        PartKind::Property
    } else if is_ext_source_placeholder(part, resource_id) {
        PartKind::ExtSource
    } else if is_ext_target_placeholder(part, resource_id) {
        PartKind::ExtTarget
    } else if is_ext_property_placeholder(part, resource_id) {
        PartKind::ExtProperty
    } else {
        PartKind::Unknown
    }
}
