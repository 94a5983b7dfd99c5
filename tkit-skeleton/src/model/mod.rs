//! Event and resource model
//!
//! Filters emit a flat stream of [`Event`]s; each wraps one resource. Two synthetic kinds exist
//! besides the filter ones: [`Event::Multi`], a composite produced by the simplifier, and
//! [`Event::Noop`], what a swallowed event turns into.

pub mod resources;
pub mod text;

pub use resources::{
    DocumentPart, Ending, Nameable, Properties, PropertyMap, StartDocument, StartGroup,
    StartSubDocument, TextUnit, WriterKind, PROP_ENCODING, PROP_LANGUAGE,
};
pub use text::{
    AltTranslation, Code, Segment, TagType, TextContainer, TextFragment, TextPart, CODE_TYPE_CDATA,
};

use crate::skeleton::Skeleton;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    StartDocument(StartDocument),
    EndDocument(Ending),
    StartSubDocument(StartSubDocument),
    EndSubDocument(Ending),
    StartGroup(StartGroup),
    EndGroup(Ending),
    StartSubfilter(StartGroup),
    EndSubfilter(Ending),
    TextUnit(TextUnit),
    DocumentPart(DocumentPart),
    Multi { events: Vec<Event> },
    Noop,
}

impl Event {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Event::StartDocument(_) => "start_document",
            Event::EndDocument(_) => "end_document",
            Event::StartSubDocument(_) => "start_sub_document",
            Event::EndSubDocument(_) => "end_sub_document",
            Event::StartGroup(_) => "start_group",
            Event::EndGroup(_) => "end_group",
            Event::StartSubfilter(_) => "start_subfilter",
            Event::EndSubfilter(_) => "end_subfilter",
            Event::TextUnit(_) => "text_unit",
            Event::DocumentPart(_) => "document_part",
            Event::Multi { .. } => "multi",
            Event::Noop => "noop",
        }
    }

    pub fn resource(&self) -> Option<ResourceRef<'_>> {
        Some(match self {
            Event::StartDocument(sd) => ResourceRef::Document(sd),
            Event::StartSubDocument(ssd) => ResourceRef::SubDocument(ssd),
            Event::StartGroup(sg) | Event::StartSubfilter(sg) => ResourceRef::Group(sg),
            Event::EndDocument(end)
            | Event::EndSubDocument(end)
            | Event::EndGroup(end)
            | Event::EndSubfilter(end) => ResourceRef::Ending(end),
            Event::TextUnit(tu) => ResourceRef::TextUnit(tu),
            Event::DocumentPart(dp) => ResourceRef::DocumentPart(dp),
            Event::Multi { .. } | Event::Noop => return None,
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.resource().map(|res| res.id())
    }

    pub fn set_id(&mut self, id: String) {
        match self {
            Event::StartDocument(sd) => sd.id = id,
            Event::StartSubDocument(ssd) => ssd.id = id,
            Event::StartGroup(sg) | Event::StartSubfilter(sg) => sg.id = id,
            Event::EndDocument(end)
            | Event::EndSubDocument(end)
            | Event::EndGroup(end)
            | Event::EndSubfilter(end) => end.id = id,
            Event::TextUnit(tu) => tu.id = id,
            Event::DocumentPart(dp) => dp.id = id,
            Event::Multi { .. } | Event::Noop => {}
        }
    }

    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.resource().and_then(|res| res.skeleton())
    }

    pub fn skeleton_mut(&mut self) -> Option<&mut Option<Skeleton>> {
        match self {
            Event::StartDocument(sd) => Some(&mut sd.skeleton),
            Event::StartSubDocument(ssd) => Some(&mut ssd.skeleton),
            Event::StartGroup(sg) | Event::StartSubfilter(sg) => Some(&mut sg.skeleton),
            Event::EndDocument(end)
            | Event::EndSubDocument(end)
            | Event::EndGroup(end)
            | Event::EndSubfilter(end) => Some(&mut end.skeleton),
            Event::TextUnit(tu) => Some(&mut tu.skeleton),
            Event::DocumentPart(dp) => Some(&mut dp.skeleton),
            Event::Multi { .. } | Event::Noop => None,
        }
    }

    pub fn properties_mut(&mut self) -> Option<&mut Properties> {
        match self {
            Event::StartDocument(sd) => Some(&mut sd.properties),
            Event::StartSubDocument(ssd) => Some(&mut ssd.properties),
            Event::StartGroup(sg) | Event::StartSubfilter(sg) => Some(&mut sg.properties),
            Event::TextUnit(tu) => Some(&mut tu.properties),
            Event::DocumentPart(dp) => Some(&mut dp.properties),
            _ => None,
        }
    }

    pub fn is_referent(&self) -> bool {
        match self {
            Event::StartGroup(sg) | Event::StartSubfilter(sg) => sg.is_referent(),
            Event::TextUnit(tu) => tu.is_referent(),
            Event::DocumentPart(dp) => dp.is_referent(),
            _ => false,
        }
    }

    pub fn set_is_referent(&mut self, referent: bool) {
        match self {
            Event::StartGroup(sg) | Event::StartSubfilter(sg) => sg.set_is_referent(referent),
            Event::TextUnit(tu) => tu.set_is_referent(referent),
            Event::DocumentPart(dp) => dp.set_is_referent(referent),
            _ => {}
        }
    }

    /// Whether both events carry the same kind of resource.
    pub fn same_kind(&self, other: &Event) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Borrowed view of any resource, the scope markers are resolved against.
#[derive(Debug, Clone, Copy)]
pub enum ResourceRef<'a> {
    TextUnit(&'a TextUnit),
    DocumentPart(&'a DocumentPart),
    Group(&'a StartGroup),
    Document(&'a StartDocument),
    SubDocument(&'a StartSubDocument),
    Ending(&'a Ending),
}

impl<'a> ResourceRef<'a> {
    pub fn id(&self) -> &'a str {
        match *self {
            ResourceRef::TextUnit(tu) => &tu.id,
            ResourceRef::DocumentPart(dp) => &dp.id,
            ResourceRef::Group(sg) => &sg.id,
            ResourceRef::Document(sd) => &sd.id,
            ResourceRef::SubDocument(ssd) => &ssd.id,
            ResourceRef::Ending(end) => &end.id,
        }
    }

    pub fn skeleton(&self) -> Option<&'a Skeleton> {
        match *self {
            ResourceRef::TextUnit(tu) => tu.skeleton.as_ref(),
            ResourceRef::DocumentPart(dp) => dp.skeleton.as_ref(),
            ResourceRef::Group(sg) => sg.skeleton.as_ref(),
            ResourceRef::Document(sd) => sd.skeleton.as_ref(),
            ResourceRef::SubDocument(ssd) => ssd.skeleton.as_ref(),
            ResourceRef::Ending(end) => end.skeleton.as_ref(),
        }
    }

    pub fn as_nameable(&self) -> Option<&'a dyn Nameable> {
        match *self {
            ResourceRef::TextUnit(tu) => Some(tu),
            ResourceRef::DocumentPart(dp) => Some(dp),
            ResourceRef::Group(sg) => Some(sg),
            ResourceRef::Document(sd) => Some(sd),
            ResourceRef::SubDocument(ssd) => Some(ssd),
            ResourceRef::Ending(_) => None,
        }
    }

    pub fn as_text_unit(&self) -> Option<&'a TextUnit> {
        match *self {
            ResourceRef::TextUnit(tu) => Some(tu),
            _ => None,
        }
    }

    pub fn is_referent(&self) -> bool {
        match *self {
            ResourceRef::TextUnit(tu) => tu.is_referent(),
            ResourceRef::DocumentPart(dp) => dp.is_referent(),
            ResourceRef::Group(sg) => sg.is_referent(),
            _ => false,
        }
    }
}
