//! Resources carried by events
//!
//! Every resource has an id and may own a [`Skeleton`]. A resource with a non-zero reference
//! count is a referent: the writer parks it until a marker elsewhere pulls it in.

use super::text::TextContainer;
use crate::locale::LocaleId;
use crate::skeleton::Skeleton;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PROP_LANGUAGE: &str = "language";
pub const PROP_ENCODING: &str = "encoding";

/// Property values by name. A `None` value is a declared property without value.
pub type PropertyMap = BTreeMap<String, Option<String>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resource: PropertyMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub source: PropertyMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub target: BTreeMap<LocaleId, PropertyMap>,
}

impl Properties {
    pub fn is_empty(&self) -> bool {
        self.resource.is_empty() && self.source.is_empty() && self.target.is_empty()
    }

    pub fn resource_property(&self, name: &str) -> Option<&Option<String>> {
        self.resource.get(name)
    }

    pub fn source_property(&self, name: &str) -> Option<&Option<String>> {
        self.source.get(name)
    }

    pub fn target_property(&self, locale: &LocaleId, name: &str) -> Option<&Option<String>> {
        self.target.get(locale).and_then(|props| props.get(name))
    }

    pub fn set_resource(&mut self, name: &str, value: Option<&str>) {
        self.resource
            .insert(name.to_string(), value.map(str::to_string));
    }

    pub fn set_source(&mut self, name: &str, value: Option<&str>) {
        self.source.insert(name.to_string(), value.map(str::to_string));
    }

    pub fn set_target(&mut self, locale: &LocaleId, name: &str, value: Option<&str>) {
        self.target
            .entry(locale.clone())
            .or_default()
            .insert(name.to_string(), value.map(str::to_string));
    }

    /// Copies resource-level properties of `other` that are not already set here.
    pub fn inherit_resource_level(&mut self, other: &Properties) {
        for (name, value) in &other.resource {
            self.resource
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

/// Anything carrying named properties and a MIME type.
pub trait Nameable {
    fn id(&self) -> &str;
    fn mime_type(&self) -> Option<&str>;
    fn properties(&self) -> &Properties;
}

macro_rules! impl_nameable {
    ($($ty:ty),*) => {
        $(impl Nameable for $ty {
            fn id(&self) -> &str {
                &self.id
            }
            fn mime_type(&self) -> Option<&str> {
                self.mime_type.as_deref()
            }
            fn properties(&self) -> &Properties {
                &self.properties
            }
        })*
    };
}

impl_nameable!(TextUnit, DocumentPart, StartGroup, StartDocument, StartSubDocument);

fn yes() -> bool {
    true
}

fn default_line_break() -> String {
    "\n".to_string()
}

fn default_encoding() -> String {
    "UTF-8".to_string()
}

/// The translatable resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextUnit {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default = "yes")]
    pub translatable: bool,
    #[serde(default)]
    pub reference_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<Skeleton>,
    pub source: TextContainer,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub targets: BTreeMap<LocaleId, TextContainer>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

impl TextUnit {
    pub fn new(id: impl Into<String>, source: &str) -> Self {
        Self::with_source(id, TextContainer::from_text(source))
    }

    pub fn with_source(id: impl Into<String>, source: TextContainer) -> Self {
        Self {
            id: id.into(),
            name: None,
            mime_type: None,
            translatable: true,
            reference_count: 0,
            skeleton: None,
            source,
            targets: BTreeMap::new(),
            properties: Properties::default(),
        }
    }

    pub fn with_target(mut self, locale: LocaleId, target: TextContainer) -> Self {
        self.targets.insert(locale, target);
        self
    }

    pub fn with_skeleton(mut self, skeleton: Skeleton) -> Self {
        self.set_skeleton(skeleton);
        self
    }

    pub fn set_skeleton(&mut self, mut skeleton: Skeleton) {
        skeleton.set_owner(&self.id);
        self.skeleton = Some(skeleton);
    }

    pub fn target(&self, locale: &LocaleId) -> Option<&TextContainer> {
        self.targets.get(locale)
    }

    pub fn target_mut(&mut self, locale: &LocaleId) -> Option<&mut TextContainer> {
        self.targets.get_mut(locale)
    }

    pub fn is_referent(&self) -> bool {
        self.reference_count > 0
    }

    pub fn set_is_referent(&mut self, referent: bool) {
        self.reference_count = u32::from(referent);
    }

    /// A unit whose source has no content.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

/// Non-translatable stretch of the document, carried only by its skeleton.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPart {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub reference_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<Skeleton>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

impl DocumentPart {
    pub fn new(id: impl Into<String>, skeleton: Skeleton) -> Self {
        let mut part = Self {
            id: id.into(),
            ..Self::default()
        };
        part.set_skeleton(skeleton);
        part
    }

    pub fn set_skeleton(&mut self, mut skeleton: Skeleton) {
        skeleton.set_owner(&self.id);
        self.skeleton = Some(skeleton);
    }

    pub fn is_referent(&self) -> bool {
        self.reference_count > 0
    }

    pub fn set_is_referent(&mut self, referent: bool) {
        self.reference_count = u32::from(referent);
    }
}

/// Opens a group or a sub-filtered region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartGroup {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// For sub-filtered regions, the MIME type of the embedded content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub reference_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<Skeleton>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

impl StartGroup {
    pub fn new(id: impl Into<String>, skeleton: Option<Skeleton>) -> Self {
        let mut group = Self {
            id: id.into(),
            ..Self::default()
        };
        if let Some(skeleton) = skeleton {
            group.set_skeleton(skeleton);
        }
        group
    }

    pub fn set_skeleton(&mut self, mut skeleton: Skeleton) {
        skeleton.set_owner(&self.id);
        self.skeleton = Some(skeleton);
    }

    pub fn is_referent(&self) -> bool {
        self.reference_count > 0
    }

    pub fn set_is_referent(&mut self, referent: bool) {
        self.reference_count = u32::from(referent);
    }
}

/// Which writer the producing filter expects downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriterKind {
    #[default]
    Generic,
    /// A format-specific writer this engine cannot stand in for.
    Foreign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub locale: LocaleId,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default = "default_line_break")]
    pub line_break: String,
    #[serde(default)]
    pub multilingual: bool,
    /// Filter parameter, honoured only for multilingual formats.
    #[serde(default)]
    pub allow_empty_output_target: bool,
    #[serde(default)]
    pub skeleton_writer: WriterKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<Skeleton>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

impl StartDocument {
    pub fn new(id: impl Into<String>, locale: LocaleId) -> Self {
        Self {
            id: id.into(),
            name: None,
            locale,
            encoding: default_encoding(),
            mime_type: None,
            line_break: default_line_break(),
            multilingual: false,
            allow_empty_output_target: false,
            skeleton_writer: WriterKind::Generic,
            skeleton: None,
            properties: Properties::default(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: &str) -> Self {
        self.mime_type = Some(mime_type.to_string());
        self
    }

    pub fn with_skeleton(mut self, mut skeleton: Skeleton) -> Self {
        skeleton.set_owner(&self.id);
        self.skeleton = Some(skeleton);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartSubDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<Skeleton>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

/// Closes a document, sub-document, group or sub-filtered region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ending {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<Skeleton>,
}

impl Ending {
    pub fn new(id: impl Into<String>, skeleton: Option<Skeleton>) -> Self {
        Self {
            id: id.into(),
            skeleton,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_skeleton_reowns_self_markers() {
        let mut skel = Skeleton::new();
        skel.set_owner("old");
        skel.add_content_placeholder("old", None);
        let tu = TextUnit::new("tu1", "Hello").with_skeleton(skel);
        let skel = tu.skeleton.as_ref().expect("skeleton");
        assert_eq!(skel.owner(), Some("tu1"));
        assert!(skel.parts()[0].is_owned_by("tu1"));
    }

    #[test]
    fn referent_flag_follows_reference_count() {
        let mut dp = DocumentPart::new("dp1", Skeleton::from_text("x"));
        assert!(!dp.is_referent());
        dp.set_is_referent(true);
        assert_eq!(dp.reference_count, 1);
        assert!(dp.is_referent());
    }

    #[test]
    fn inherits_missing_resource_properties_only() {
        let mut parent = Properties::default();
        parent.set_resource("href", Some("a.html"));
        parent.set_resource("title", Some("T"));
        let mut child = Properties::default();
        child.set_resource("title", Some("kept"));
        child.inherit_resource_level(&parent);
        assert_eq!(child.resource_property("title"), Some(&Some("kept".to_string())));
        assert_eq!(child.resource_property("href"), Some(&Some("a.html".to_string())));
    }

    #[test]
    fn text_unit_json_defaults() {
        let tu: TextUnit = serde_json::from_str(
            r#"{"id":"tu1","source":{"parts":[{"segment":{"id":"0","text":"Hi"}}]}}"#,
        )
        .expect("text unit json");
        assert!(tu.translatable);
        assert!(!tu.is_referent());
        assert!(tu.skeleton.is_none());
    }
}
