//! Nested writer for sub-filtered regions
//!
//! Content of an embedded format (HTML inside a JSON string, say) is written by its own
//! [`SkeletonWriter`] with its own referent cache and encoder. The nested output is collected
//! and, once the region closes, encoded as a whole with the encoder that was current in the
//! enclosing writer when the region opened.

use super::{OutputOptions, SkeletonWriter};
use crate::encoder::{EncoderContext, EncoderManager};
use crate::error::WriterError;
use crate::model::{StartDocument, StartGroup};

#[derive(Debug)]
pub struct SubFilterWriter {
    scope_id: String,
    writer: SkeletonWriter,
    buffer: String,
    parent_encoders: Option<EncoderManager>,
}

impl SubFilterWriter {
    /// Opens the nested writer for the region started by `start`, inheriting the locales,
    /// encoding and layer of `parent`.
    pub fn new(start: &StartGroup, parent: &SkeletonWriter) -> Result<Self, WriterError> {
        let options = OutputOptions {
            locale: Some(parent.output_loc.clone()),
            encoding: Some(parent.output_encoding.clone()),
            line_break: parent.options.line_break.clone(),
            layer: parent.layer.clone(),
            encoders: parent.options.encoders.clone(),
            referent_copies: parent.referent_copies,
        };
        let mut writer = SkeletonWriter::new(options);
        writer.scope_id = Some(start.id.clone());

        let mut sd = StartDocument::new(start.id.clone(), parent.input_loc.clone());
        sd.encoding = parent.output_encoding.clone();
        sd.mime_type = start.mime_type.clone();
        sd.multilingual = parent.multilingual;
        if let Some(encoders) = parent.encoders.as_ref() {
            sd.line_break = encoders.line_break().to_string();
        }
        let head = writer.process_start_document(&sd)?;

        log::debug!(
            "opened nested writer for '{}' ({})",
            start.id,
            start.mime_type.as_deref().unwrap_or("no mime type")
        );
        Ok(Self {
            scope_id: start.id.clone(),
            writer,
            buffer: head,
            parent_encoders: parent.encoders.clone(),
        })
    }

    /// Id of the region this writer renders.
    pub fn scope_id(&self) -> &str {
        &self.scope_id
    }

    /// Runs one write on the nested writer and keeps its output.
    pub fn capture<F>(&mut self, write: F) -> Result<(), WriterError>
    where
        F: FnOnce(&mut SkeletonWriter) -> Result<String, WriterError>,
    {
        let out = write(&mut self.writer)?;
        self.buffer.push_str(&out);
        Ok(())
    }

    /// Raw nested output collected so far.
    pub fn output(&self) -> &str {
        &self.buffer
    }

    /// Nested output escaped for the enclosing format.
    pub fn encoded_output(&self) -> String {
        match &self.parent_encoders {
            Some(encoders) => encoders.encode(&self.buffer, EncoderContext::Text),
            None => self.buffer.clone(),
        }
    }

    pub fn writer(&self) -> &SkeletonWriter {
        &self.writer
    }
}
