//! Text containers, segments and coded fragments
//!
//!     A [`TextFragment`] stores its text as "coded text": plain characters interleaved with
//!     private-use marker pairs standing for inline codes. Each marker is one of
//!     [`MARKER_OPENING`], [`MARKER_CLOSING`] or [`MARKER_ISOLATED`] followed by one character
//!     encoding the index of the code in the fragment's code list.
//!
//!     A [`TextContainer`] is the content of one side (source or one target) of a text unit: an
//!     ordered list of parts, each either interstitial text or a named [`Segment`]. An
//!     unsegmented container holds exactly one segment with id `"0"`.
//!
//!     On the wire a fragment is a plain string when it has no code, and a list of runs
//!     (`{"text": ..}` / `{"code": ..}`) otherwise.

use crate::skeleton::marker::contains_marker;
use serde::{Deserialize, Serialize};

pub const MARKER_OPENING: char = '\u{E101}';
pub const MARKER_CLOSING: char = '\u{E102}';
pub const MARKER_ISOLATED: char = '\u{E103}';
const INDEX_BASE: u32 = 0xE110;

/// Code type whose content is written without character escaping.
pub const CODE_TYPE_CDATA: &str = "cdata";

pub fn index_to_char(index: usize) -> char {
    char::from_u32(INDEX_BASE + index as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}

pub fn char_to_index(ch: char) -> usize {
    (ch as u32).saturating_sub(INDEX_BASE) as usize
}

pub fn is_marker(ch: char) -> bool {
    matches!(ch, MARKER_OPENING | MARKER_CLOSING | MARKER_ISOLATED)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    Opening,
    Closing,
    Placeholder,
}

impl TagType {
    fn marker(self) -> char {
        match self {
            TagType::Opening => MARKER_OPENING,
            TagType::Closing => MARKER_CLOSING,
            TagType::Placeholder => MARKER_ISOLATED,
        }
    }
}

/// An inline code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Code {
    pub tag_type: TagType,
    #[serde(rename = "type", default)]
    pub code_type: String,
    pub data: String,
    /// Markup written to the output; defaults to `data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_data: Option<String>,
}

impl Code {
    pub fn new(tag_type: TagType, code_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            tag_type,
            code_type: code_type.into(),
            data: data.into(),
            outer_data: None,
        }
    }

    pub fn with_outer_data(mut self, outer: impl Into<String>) -> Self {
        self.outer_data = Some(outer.into());
        self
    }

    pub fn outer_data(&self) -> &str {
        self.outer_data.as_deref().unwrap_or(&self.data)
    }

    /// Whether the written markup embeds a reference marker.
    pub fn has_reference(&self) -> bool {
        contains_marker(self.outer_data())
    }

    pub fn is_cdata(&self) -> bool {
        self.code_type == CODE_TYPE_CDATA
    }
}

/// Text with inline codes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "FragmentRepr", into = "FragmentRepr")]
pub struct TextFragment {
    coded_text: String,
    codes: Vec<Code>,
}

impl TextFragment {
    pub fn new(text: &str) -> Self {
        Self {
            coded_text: text.to_string(),
            codes: Vec::new(),
        }
    }

    pub fn append_text(&mut self, text: &str) {
        self.coded_text.push_str(text);
    }

    pub fn append_code(&mut self, code: Code) {
        self.coded_text.push(code.tag_type.marker());
        self.coded_text.push(index_to_char(self.codes.len()));
        self.codes.push(code);
    }

    pub fn append_fragment(&mut self, other: &TextFragment) {
        for run in other.runs() {
            match run {
                FragmentRun::Text(text) => self.append_text(&text),
                FragmentRun::Code(code) => self.append_code(code),
            }
        }
    }

    pub fn coded_text(&self) -> &str {
        &self.coded_text
    }

    pub fn codes(&self) -> &[Code] {
        &self.codes
    }

    pub fn codes_mut(&mut self) -> &mut [Code] {
        &mut self.codes
    }

    pub fn code(&self, index: usize) -> Option<&Code> {
        self.codes.get(index)
    }

    pub fn has_code(&self) -> bool {
        !self.codes.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.coded_text.is_empty()
    }

    /// Plain text rendering: codes are replaced by their data.
    pub fn to_text(&self) -> String {
        if !self.has_code() {
            return self.coded_text.clone();
        }
        let mut out = String::with_capacity(self.coded_text.len());
        let mut chars = self.coded_text.chars();
        while let Some(ch) = chars.next() {
            if is_marker(ch) {
                if let Some(code) = chars.next().and_then(|c| self.codes.get(char_to_index(c))) {
                    out.push_str(&code.data);
                }
            } else {
                out.push(ch);
            }
        }
        out
    }

    fn runs(&self) -> Vec<FragmentRun> {
        let mut runs = Vec::new();
        let mut text = String::new();
        let mut chars = self.coded_text.chars();
        while let Some(ch) = chars.next() {
            if is_marker(ch) {
                let code = chars.next().and_then(|c| self.codes.get(char_to_index(c)));
                if let Some(code) = code {
                    if !text.is_empty() {
                        runs.push(FragmentRun::Text(std::mem::take(&mut text)));
                    }
                    runs.push(FragmentRun::Code(code.clone()));
                }
            } else {
                text.push(ch);
            }
        }
        if !text.is_empty() {
            runs.push(FragmentRun::Text(text));
        }
        runs
    }
}

impl From<&str> for TextFragment {
    fn from(text: &str) -> Self {
        TextFragment::new(text)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FragmentRepr {
    Plain(String),
    Runs(Vec<FragmentRun>),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FragmentRun {
    Text(String),
    Code(Code),
}

impl From<FragmentRepr> for TextFragment {
    fn from(repr: FragmentRepr) -> Self {
        match repr {
            FragmentRepr::Plain(text) => TextFragment::new(&text),
            FragmentRepr::Runs(runs) => {
                let mut fragment = TextFragment::default();
                for run in runs {
                    match run {
                        FragmentRun::Text(text) => fragment.append_text(&text),
                        FragmentRun::Code(code) => fragment.append_code(code),
                    }
                }
                fragment
            }
        }
    }
}

impl From<TextFragment> for FragmentRepr {
    fn from(fragment: TextFragment) -> Self {
        if fragment.has_code() {
            FragmentRepr::Runs(fragment.runs())
        } else {
            FragmentRepr::Plain(fragment.coded_text)
        }
    }
}

/// A candidate translation attached to a segment or container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltTranslation {
    pub target: TextFragment,
    #[serde(default)]
    pub combined_score: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub text: TextFragment,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alt_translations: Vec<AltTranslation>,
}

impl Segment {
    pub fn new(id: impl Into<String>, text: impl Into<TextFragment>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            alt_translations: Vec::new(),
        }
    }

    pub fn with_alt_translation(mut self, alt: AltTranslation) -> Self {
        self.alt_translations.push(alt);
        self
    }

    /// Combined score of the first alternate translation, 0 without one.
    pub fn leverage_score(&self) -> i32 {
        self.alt_translations
            .first()
            .map(|alt| alt.combined_score)
            .unwrap_or(0)
    }
}

impl From<String> for TextFragment {
    fn from(text: String) -> Self {
        TextFragment::new(&text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPart {
    Text(TextFragment),
    Segment(Segment),
}

impl TextPart {
    pub fn content(&self) -> &TextFragment {
        match self {
            TextPart::Text(fragment) => fragment,
            TextPart::Segment(segment) => &segment.text,
        }
    }

    pub fn content_mut(&mut self) -> &mut TextFragment {
        match self {
            TextPart::Text(fragment) => fragment,
            TextPart::Segment(segment) => &mut segment.text,
        }
    }

    pub fn as_segment(&self) -> Option<&Segment> {
        match self {
            TextPart::Segment(segment) => Some(segment),
            TextPart::Text(_) => None,
        }
    }
}

/// One side of a text unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContainer {
    parts: Vec<TextPart>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    segmented: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    alt_translations: Vec<AltTranslation>,
}

impl Default for TextContainer {
    fn default() -> Self {
        Self::from_fragment(TextFragment::default())
    }
}

impl TextContainer {
    /// Unsegmented container with one empty segment.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_fragment(TextFragment::new(text))
    }

    pub fn from_fragment(fragment: TextFragment) -> Self {
        Self {
            parts: vec![TextPart::Segment(Segment::new("0", fragment))],
            segmented: false,
            alt_translations: Vec::new(),
        }
    }

    /// Container built by a segmentation pass.
    pub fn segmented(parts: Vec<TextPart>) -> Self {
        Self {
            parts,
            segmented: true,
            alt_translations: Vec::new(),
        }
    }

    pub fn parts(&self) -> &[TextPart] {
        &self.parts
    }

    pub fn parts_mut(&mut self) -> &mut [TextPart] {
        &mut self.parts
    }

    pub fn has_been_segmented(&self) -> bool {
        self.segmented
    }

    pub fn alt_translations(&self) -> &[AltTranslation] {
        &self.alt_translations
    }

    pub fn add_alt_translation(&mut self, alt: AltTranslation) {
        self.alt_translations.push(alt);
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.parts.iter().filter_map(TextPart::as_segment)
    }

    pub fn segment_count(&self) -> usize {
        self.segments().count()
    }

    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments().find(|segment| segment.id == id)
    }

    /// Position of segment `id` among the segments (interstitial text not counted).
    pub fn segment_index(&self, id: &str) -> Option<usize> {
        self.segments().position(|segment| segment.id == id)
    }

    pub fn segment_at(&self, index: usize) -> Option<&Segment> {
        self.segments().nth(index)
    }

    /// Segment `id`, or failing that the segment aligned by position with `id` in `other`.
    pub fn aligned_segment<'a>(&'a self, id: &str, other: &TextContainer) -> Option<&'a Segment> {
        self.segment(id).or_else(|| {
            other
                .segment_index(id)
                .and_then(|index| self.segment_at(index))
        })
    }

    pub fn content_is_one_segment(&self) -> bool {
        self.parts.len() == 1 && matches!(self.parts[0], TextPart::Segment(_))
    }

    /// True when every part is empty.
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|part| part.content().is_empty())
    }

    /// Content of the first segment, or of the first part when there is no segment.
    pub fn first_content(&self) -> Option<&TextFragment> {
        self.segments()
            .next()
            .map(|segment| &segment.text)
            .or_else(|| self.parts.first().map(TextPart::content))
    }

    /// All parts joined into one fragment.
    pub fn unsegmented_content(&self) -> TextFragment {
        let mut joined = TextFragment::default();
        for part in &self.parts {
            joined.append_fragment(part.content());
        }
        joined
    }
}
