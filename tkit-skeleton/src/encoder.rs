//! Output encoders
//!
//! An [`Encoder`] turns extracted text back into the native syntax of a format: escaping
//! markup characters, converting line breaks, and writing characters the output encoding cannot
//! represent as character references. The [`EncoderManager`] selects one encoder per MIME type;
//! the writer switches it before rendering each resource's content.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Where the text being encoded ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncoderContext {
    /// Extracted content.
    Text,
    /// Skeleton text around content.
    Skeleton,
    /// Markup of inline codes.
    Inline,
}

/// Settings shared by all encoders of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Output character encoding, e.g. `UTF-8` or `ISO-8859-1`.
    pub encoding: String,
    pub line_break: String,
    /// Escape `>` as well as `<` and `&` in markup formats.
    pub escape_gt: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            encoding: "UTF-8".to_string(),
            line_break: "\n".to_string(),
            escape_gt: false,
        }
    }
}

impl EncoderOptions {
    /// Highest code point the output encoding can represent, `None` when it is a Unicode
    /// encoding.
    pub fn max_code_point(&self) -> Option<u32> {
        match self.encoding.to_ascii_lowercase().as_str() {
            "us-ascii" | "ascii" => Some(0x7F),
            "iso-8859-1" | "latin1" | "latin-1" => Some(0xFF),
            _ => None,
        }
    }

    pub fn can_encode(&self, ch: char) -> bool {
        self.max_code_point().map_or(true, |max| ch as u32 <= max)
    }
}

/// Trait for output encoders
///
/// Implementors only need [`Encoder::name`] and [`Encoder::encode`]; the per-character and
/// property hooks default to those.
pub trait Encoder {
    /// Registry name, e.g. `"xml"`.
    fn name(&self) -> &str;

    fn encode(&self, text: &str, context: EncoderContext, options: &EncoderOptions) -> String;

    fn encode_char(&self, ch: char, context: EncoderContext, options: &EncoderOptions) -> String {
        let mut buf = [0u8; 4];
        self.encode(ch.encode_utf8(&mut buf), context, options)
    }

    /// Native form of a property value read from a skeleton marker.
    fn to_native(&self, _property: &str, value: &str) -> String {
        value.to_string()
    }
}

fn convert_line_breaks(text: &str, options: &EncoderOptions) -> String {
    if options.line_break == "\n" {
        text.to_string()
    } else {
        text.replace('\n', &options.line_break)
    }
}

/// Leaves characters alone apart from line breaks.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextEncoder;

impl Encoder for PlainTextEncoder {
    fn name(&self) -> &str {
        "plain"
    }

    fn encode(&self, text: &str, _context: EncoderContext, options: &EncoderOptions) -> String {
        convert_line_breaks(text, options)
    }
}

/// Escapes markup characters for XML and HTML output.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlEncoder;

impl Encoder for XmlEncoder {
    fn name(&self) -> &str {
        "xml"
    }

    fn encode(&self, text: &str, _context: EncoderContext, options: &EncoderOptions) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' if options.escape_gt => out.push_str("&gt;"),
                '\n' => out.push_str(&options.line_break),
                c if !options.can_encode(c) => out.push_str(&format!("&#x{:x};", c as u32)),
                c => out.push(c),
            }
        }
        out
    }
}

/// Default MIME type mappings installed by [`EncoderManager::with_defaults`].
pub const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    ("text/plain", "plain"),
    ("text/xml", "xml"),
    ("application/xml", "xml"),
    ("text/html", "xml"),
    ("application/xhtml+xml", "xml"),
    ("application/x-xliff+xml", "xml"),
];

/// Selects the encoder for the MIME type of the resource being written.
#[derive(Clone, Default)]
pub struct EncoderManager {
    encoders: HashMap<String, Rc<dyn Encoder>>,
    mappings: HashMap<String, String>,
    options: EncoderOptions,
    current: Option<Rc<dyn Encoder>>,
    current_mime: Option<String>,
}

impl fmt::Debug for EncoderManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderManager")
            .field("encoders", &self.encoder_names())
            .field("mappings", &self.mappings)
            .field("options", &self.options)
            .field("current", &self.current_name())
            .finish()
    }
}

impl EncoderManager {
    /// Create a manager with no encoder; everything passes through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with the built-in encoders and MIME mappings.
    pub fn with_defaults() -> Self {
        let mut manager = Self::new();
        manager.register(PlainTextEncoder);
        manager.register(XmlEncoder);
        for (mime, name) in DEFAULT_MAPPINGS {
            manager.set_mapping(mime, name);
        }
        manager
    }

    /// Register an encoder under its own name, replacing any previous one.
    pub fn register<E: Encoder + 'static>(&mut self, encoder: E) {
        self.encoders
            .insert(encoder.name().to_string(), Rc::new(encoder));
    }

    /// Map a MIME type to a registered encoder name.
    pub fn set_mapping(&mut self, mime_type: &str, encoder_name: &str) {
        let mime = mime_type.to_ascii_lowercase();
        // a remapped current type must be looked up again
        if self.current_mime.as_deref() == Some(mime.as_str()) {
            self.current_mime = None;
        }
        self.mappings.insert(mime, encoder_name.to_string());
    }

    pub fn has_mapping(&self, mime_type: &str) -> bool {
        self.mappings.contains_key(&mime_type.to_ascii_lowercase())
    }

    /// Registered encoder names (sorted).
    pub fn encoder_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.encoders.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn set_default_options(&mut self, encoding: &str, line_break: &str) {
        self.options.encoding = encoding.to_string();
        self.options.line_break = line_break.to_string();
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut EncoderOptions {
        &mut self.options
    }

    pub fn encoding(&self) -> &str {
        &self.options.encoding
    }

    pub fn line_break(&self) -> &str {
        &self.options.line_break
    }

    /// Switch to the encoder mapped to `mime_type`. `None` keeps the current one.
    pub fn update_encoder(&mut self, mime_type: Option<&str>) {
        let Some(mime) = mime_type.map(str::to_ascii_lowercase) else {
            return;
        };
        if self.current_mime.as_deref() == Some(mime.as_str()) {
            return;
        }
        self.current = self
            .mappings
            .get(&mime)
            .and_then(|name| self.encoders.get(name))
            .cloned();
        if self.current.is_none() {
            log::debug!("no encoder mapped to '{mime}', text passes through");
        }
        self.current_mime = Some(mime);
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref().map(|encoder| encoder.name())
    }

    pub fn encode(&self, text: &str, context: EncoderContext) -> String {
        match &self.current {
            Some(encoder) => encoder.encode(text, context, &self.options),
            None => text.to_string(),
        }
    }

    pub fn encode_char(&self, ch: char, context: EncoderContext) -> String {
        match &self.current {
            Some(encoder) => encoder.encode_char(ch, context, &self.options),
            None => ch.to_string(),
        }
    }

    pub fn to_native(&self, property: &str, value: &str) -> String {
        match &self.current {
            Some(encoder) => encoder.to_native(property, value),
            None => value.to_string(),
        }
    }
}
