//! Bilingual layers
//!
//! A layer wraps rendered content for bilingual review formats: code regions and inline codes
//! are bracketed, and every segment is written as source, a score marker and target.

use crate::encoder::EncoderContext;

/// Trait for layer providers
///
/// Only the mid-segment marker and the encoder must be supplied; all other markers default to
/// empty strings.
pub trait LayerProvider {
    fn start_code(&self) -> &str {
        ""
    }

    fn end_code(&self) -> &str {
        ""
    }

    fn start_inline(&self) -> &str {
        ""
    }

    fn end_inline(&self) -> &str {
        ""
    }

    fn start_segment(&self) -> &str {
        ""
    }

    fn end_segment(&self) -> &str {
        ""
    }

    /// Marker between source and target of a segment, carrying the leverage score.
    fn mid_segment(&self, leverage: i32) -> String;

    fn encode(&self, text: &str, context: EncoderContext) -> String;

    fn encode_char(&self, ch: char, context: EncoderContext) -> String {
        let mut buf = [0u8; 4];
        self.encode(ch.encode_utf8(&mut buf), context)
    }
}

/// Placeholder in [`BilingualLayer::mid_segment`] templates replaced by the score.
pub const SCORE_PLACEHOLDER: &str = "{score}";

/// Layer with configurable markers, defaulting to `{0>source<}score{>target<0}` segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BilingualLayer {
    pub start_code: String,
    pub end_code: String,
    pub start_inline: String,
    pub end_inline: String,
    pub start_segment: String,
    /// Template containing [`SCORE_PLACEHOLDER`].
    pub mid_segment: String,
    pub end_segment: String,
    /// Backslash-escape `\`, `{` and `}` in text written through the layer.
    pub escape_braces: bool,
}

impl Default for BilingualLayer {
    fn default() -> Self {
        Self {
            start_code: String::new(),
            end_code: String::new(),
            start_inline: String::new(),
            end_inline: String::new(),
            start_segment: "{0>".to_string(),
            mid_segment: format!("<}}{SCORE_PLACEHOLDER}{{>"),
            end_segment: "<0}".to_string(),
            escape_braces: false,
        }
    }
}

impl LayerProvider for BilingualLayer {
    fn start_code(&self) -> &str {
        &self.start_code
    }

    fn end_code(&self) -> &str {
        &self.end_code
    }

    fn start_inline(&self) -> &str {
        &self.start_inline
    }

    fn end_inline(&self) -> &str {
        &self.end_inline
    }

    fn start_segment(&self) -> &str {
        &self.start_segment
    }

    fn end_segment(&self) -> &str {
        &self.end_segment
    }

    fn mid_segment(&self, leverage: i32) -> String {
        self.mid_segment
            .replace(SCORE_PLACEHOLDER, &leverage.to_string())
    }

    fn encode(&self, text: &str, _context: EncoderContext) -> String {
        if !self.escape_braces {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            if matches!(ch, '\\' | '{' | '}') {
                out.push('\\');
            }
            out.push(ch);
        }
        out
    }
}
