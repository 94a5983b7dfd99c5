//! Reference marker grammar
//!
//! Markers are embedded in skeleton text and in the outer data of inline codes:
//!
//!     [#$<id>]                 external reference to the resource <id>
//!     [#$$self$]               content of the resource owning the part
//!     [#$$self$@%<name>]       value of property <name> of the owning resource
//!     [#$<segId>@%$segment$]   content of segment <segId> of the owning text unit
//!
//! Scanning is strictly left to right: a marker ends at the first end token after its start
//! token, so markers never nest or overlap.

pub const REF_MARKER_START: &str = "[#$";
pub const REF_MARKER_END: &str = "]";
pub const REF_MARKER_SEP: &str = "@%";

/// Id of a marker pointing at the resource owning the part.
pub const SELF_ID: &str = "$self$";
/// Property name turning a marker into a segment reference.
pub const SEGMENT_PROPERTY: &str = "$segment$";

pub fn make_ref_marker(id: &str) -> String {
    format!("{REF_MARKER_START}{id}{REF_MARKER_END}")
}

pub fn make_property_marker(id: &str, property: &str) -> String {
    format!("{REF_MARKER_START}{id}{REF_MARKER_SEP}{property}{REF_MARKER_END}")
}

pub fn make_segment_marker(segment_id: &str) -> String {
    make_property_marker(segment_id, SEGMENT_PROPERTY)
}

/// The exact text of a content self-marker.
pub fn self_marker() -> String {
    make_ref_marker(SELF_ID)
}

pub fn contains_marker(text: &str) -> bool {
    text.contains(REF_MARKER_START)
}

/// One marker found in a piece of text. `start..end` covers the whole marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefMarker<'a> {
    pub id: &'a str,
    pub property: Option<&'a str>,
    pub start: usize,
    pub end: usize,
}

impl RefMarker<'_> {
    pub fn is_self(&self) -> bool {
        self.id == SELF_ID
    }

    pub fn is_segment(&self) -> bool {
        self.property == Some(SEGMENT_PROPERTY)
    }
}

/// Outcome of looking for the next marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerScan<'a> {
    Found(RefMarker<'a>),
    /// A start token at this byte offset has no end token after it.
    Unterminated(usize),
    None,
}

/// Finds the first marker starting at or after byte offset `from`.
pub fn find_marker(text: &str, from: usize) -> MarkerScan<'_> {
    let Some(rest) = text.get(from..) else {
        return MarkerScan::None;
    };
    let Some(offset) = rest.find(REF_MARKER_START) else {
        return MarkerScan::None;
    };
    let start = from + offset;
    let body_start = start + REF_MARKER_START.len();
    let Some(body_len) = text[body_start..].find(REF_MARKER_END) else {
        return MarkerScan::Unterminated(start);
    };
    let body = &text[body_start..body_start + body_len];
    let (id, property) = match body.find(REF_MARKER_SEP) {
        Some(sep) => (&body[..sep], Some(&body[sep + REF_MARKER_SEP.len()..])),
        None => (body, None),
    };
    MarkerScan::Found(RefMarker {
        id,
        property,
        start,
        end: body_start + body_len + REF_MARKER_END.len(),
    })
}

/// Convenience over [`find_marker`] for callers that only care about well-formed markers.
pub fn first_marker(text: &str) -> Option<RefMarker<'_>> {
    match find_marker(text, 0) {
        MarkerScan::Found(marker) => Some(marker),
        _ => None,
    }
}
