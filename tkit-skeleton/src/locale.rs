//! Locale identifiers
//!
//! Tags are normalized on construction (trimmed, lowercase, `-` as separator) so `fr_FR`,
//! `fr-fr` and `FR-FR` compare equal. The empty tag is reserved: on a skeleton part it means
//! "resource level", i.e. neither source nor any target.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LocaleId(String);

impl LocaleId {
    pub fn new(tag: &str) -> Self {
        LocaleId(tag.trim().replace('_', "-").to_lowercase())
    }

    /// The reserved resource-level locale.
    pub fn empty() -> Self {
        LocaleId(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The language subtag (`fr` for `fr-ca`).
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or("")
    }

    /// True when both tags share a non-empty language subtag, regions are ignored.
    pub fn same_language_as(&self, other: &LocaleId) -> bool {
        !self.is_empty() && self.language() == other.language()
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for LocaleId {
    fn from(tag: String) -> Self {
        LocaleId::new(&tag)
    }
}

impl From<&str> for LocaleId {
    fn from(tag: &str) -> Self {
        LocaleId::new(tag)
    }
}

impl From<LocaleId> for String {
    fn from(locale: LocaleId) -> Self {
        locale.0
    }
}
