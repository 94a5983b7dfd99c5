//! Streaming skeleton writer
//!
//! # The High-Level Concept
//!
//! Filters hand the writer one event at a time. For every event the writer returns the text
//! that event contributes to the output document, or an empty string when the event has to be
//! held back:
//!
//! - A **referent** (a resource some other skeleton points at) goes into the referent cache and
//!   is written later, wherever a marker pulls it in.
//! - While a **group buffer** is open, every event is appended to it instead of being written.
//! - While a **sub-filtered region** is open, every event belongs to a nested writer whose
//!   output is encoded as a whole for the enclosing format when the region closes.
//!
//! # Dispatch
//!
//! The checks run in that order: an active sub-writer takes the event (unless the event closes
//! that sub-writer's own region), then a referent is cached, then an open buffer takes the
//! event, and only then is the event rendered.
//!
//! Rendering itself (marker resolution, content selection, inline code expansion) lives in
//! [`content`](self) helpers on the same type.

mod content;
pub mod referents;
pub mod storage;
pub mod subfilter;

pub use referents::{Referent, ReferentCache};
pub use storage::{GroupBuffer, GroupKind, StorageStack, StoredItem};
pub use subfilter::SubFilterWriter;

use crate::encoder::{EncoderContext, EncoderManager};
use crate::error::WriterError;
use crate::layer::LayerProvider;
use crate::locale::LocaleId;
use crate::model::{
    DocumentPart, Ending, Event, ResourceRef, StartDocument, StartGroup, StartSubDocument,
    TextUnit,
};
use std::fmt;
use std::rc::Rc;

/// Output settings supplied by the caller, completed from the StartDocument event.
#[derive(Clone)]
pub struct OutputOptions {
    /// Output locale. Defaults to the input locale.
    pub locale: Option<LocaleId>,
    /// Output encoding. Defaults to the input encoding.
    pub encoding: Option<String>,
    /// Line break. Defaults to the one the filter detected.
    pub line_break: Option<String>,
    pub layer: Option<Rc<dyn LayerProvider>>,
    /// Encoders to use. `None` installs [`EncoderManager::with_defaults`].
    pub encoders: Option<EncoderManager>,
    /// How many markers may pull in the same referent.
    pub referent_copies: usize,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            locale: None,
            encoding: None,
            line_break: None,
            layer: None,
            encoders: None,
            referent_copies: 1,
        }
    }
}

impl fmt::Debug for OutputOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputOptions")
            .field("locale", &self.locale)
            .field("encoding", &self.encoding)
            .field("line_break", &self.line_break)
            .field("layer", &self.layer.is_some())
            .field("encoders", &self.encoders)
            .field("referent_copies", &self.referent_copies)
            .finish()
    }
}

impl OutputOptions {
    pub fn new(locale: LocaleId) -> Self {
        Self {
            locale: Some(locale),
            ..Self::default()
        }
    }

    pub fn with_encoding(mut self, encoding: &str) -> Self {
        self.encoding = Some(encoding.to_string());
        self
    }

    pub fn with_line_break(mut self, line_break: &str) -> Self {
        self.line_break = Some(line_break.to_string());
        self
    }

    pub fn with_layer<L: LayerProvider + 'static>(mut self, layer: L) -> Self {
        self.layer = Some(Rc::new(layer));
        self
    }

    pub fn with_encoders(mut self, encoders: EncoderManager) -> Self {
        self.encoders = Some(encoders);
        self
    }

    pub fn with_referent_copies(mut self, copies: usize) -> Self {
        self.referent_copies = copies.max(1);
        self
    }
}

/// Rebuilds documents from skeleton events.
pub struct SkeletonWriter {
    options: OutputOptions,
    input_loc: LocaleId,
    output_loc: LocaleId,
    output_encoding: String,
    multilingual: bool,
    allow_empty_output_target: bool,
    referent_copies: usize,
    referents: ReferentCache,
    storage: StorageStack,
    sub: Option<Box<SubFilterWriter>>,
    /// Whether the open sub-filtered region is written in place rather than buffered.
    sub_direct: bool,
    /// Id of the sub-filtered region this writer renders, for nested writers.
    scope_id: Option<String>,
    encoders: Option<EncoderManager>,
    layer: Option<Rc<dyn LayerProvider>>,
}

impl fmt::Debug for SkeletonWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkeletonWriter")
            .field("input_loc", &self.input_loc)
            .field("output_loc", &self.output_loc)
            .field("output_encoding", &self.output_encoding)
            .field("multilingual", &self.multilingual)
            .field("referents", &self.referents.len())
            .field("storage_depth", &self.storage.depth())
            .field("sub_writer", &self.sub.is_some())
            .field("scope_id", &self.scope_id)
            .finish()
    }
}

impl Default for SkeletonWriter {
    fn default() -> Self {
        Self::new(OutputOptions::default())
    }
}

impl SkeletonWriter {
    pub fn new(options: OutputOptions) -> Self {
        let referent_copies = options.referent_copies.max(1);
        let layer = options.layer.clone();
        Self {
            options,
            input_loc: LocaleId::empty(),
            output_loc: LocaleId::empty(),
            output_encoding: "UTF-8".to_string(),
            multilingual: false,
            allow_empty_output_target: false,
            referent_copies,
            referents: ReferentCache::new(),
            storage: StorageStack::new(),
            sub: None,
            sub_direct: false,
            scope_id: None,
            encoders: None,
            layer,
        }
    }

    /// Writes any event. `Multi` writes its children in order, `Noop` writes nothing.
    pub fn process(&mut self, event: &Event) -> Result<String, WriterError> {
        match event {
            Event::StartDocument(sd) => self.process_start_document(sd),
            Event::EndDocument(end) => self.process_end_document(end),
            Event::StartSubDocument(ssd) => self.process_start_subdocument(ssd),
            Event::EndSubDocument(end) => self.process_end_subdocument(end),
            Event::StartGroup(sg) => self.process_start_group(sg),
            Event::EndGroup(end) => self.process_end_group(end),
            Event::StartSubfilter(ssf) => self.process_start_subfilter(ssf),
            Event::EndSubfilter(end) => self.process_end_subfilter(end),
            Event::TextUnit(tu) => self.process_text_unit(tu),
            Event::DocumentPart(dp) => self.process_document_part(dp),
            Event::Multi { events } => {
                let mut out = String::new();
                for child in events {
                    out.push_str(&self.process(child)?);
                }
                Ok(out)
            }
            Event::Noop => Ok(String::new()),
        }
    }

    pub fn process_start_document(&mut self, sd: &StartDocument) -> Result<String, WriterError> {
        self.close();
        self.input_loc = sd.locale.clone();
        self.output_loc = self
            .options
            .locale
            .clone()
            .unwrap_or_else(|| sd.locale.clone());
        self.output_encoding = self
            .options
            .encoding
            .clone()
            .unwrap_or_else(|| sd.encoding.clone());
        let line_break = self
            .options
            .line_break
            .clone()
            .unwrap_or_else(|| sd.line_break.clone());
        self.multilingual = sd.multilingual;
        self.allow_empty_output_target = sd.multilingual && sd.allow_empty_output_target;

        let mut encoders = self
            .options
            .encoders
            .clone()
            .unwrap_or_else(EncoderManager::with_defaults);
        encoders.set_default_options(&self.output_encoding, &line_break);
        encoders.update_encoder(sd.mime_type.as_deref());
        self.encoders = Some(encoders);

        log::debug!(
            "writing '{}' from {} to {} ({})",
            sd.id,
            self.input_loc,
            self.output_loc,
            self.output_encoding
        );
        self.render_optional(
            sd.skeleton.as_ref(),
            ResourceRef::Document(sd),
            EncoderContext::Skeleton,
        )
    }

    /// Writes the closing skeleton, then releases every cached referent and buffer.
    pub fn process_end_document(&mut self, end: &Ending) -> Result<String, WriterError> {
        let out = self.render_optional(
            end.skeleton.as_ref(),
            ResourceRef::Ending(end),
            EncoderContext::Skeleton,
        );
        self.close();
        out
    }

    pub fn process_start_subdocument(
        &mut self,
        ssd: &StartSubDocument,
    ) -> Result<String, WriterError> {
        if let Some(sub) = self.sub.as_mut() {
            sub.capture(|w| w.process_start_subdocument(ssd))?;
            return Ok(String::new());
        }
        if self
            .storage
            .append(StoredItem::SubDocument(ssd.clone()))
            .is_none()
        {
            return Ok(String::new());
        }
        self.render_optional(
            ssd.skeleton.as_ref(),
            ResourceRef::SubDocument(ssd),
            EncoderContext::Skeleton,
        )
    }

    pub fn process_end_subdocument(&mut self, end: &Ending) -> Result<String, WriterError> {
        if let Some(sub) = self.sub.as_mut() {
            sub.capture(|w| w.process_end_subdocument(end))?;
            return Ok(String::new());
        }
        self.write_ending(end)
    }

    pub fn process_start_group(&mut self, sg: &StartGroup) -> Result<String, WriterError> {
        if let Some(sub) = self.sub.as_mut() {
            sub.capture(|w| w.process_start_group(sg))?;
            return Ok(String::new());
        }
        if sg.is_referent() || !self.storage.is_empty() {
            self.storage.push(GroupBuffer::new(sg.clone(), GroupKind::Group));
            return Ok(String::new());
        }
        self.render_optional(
            sg.skeleton.as_ref(),
            ResourceRef::Group(sg),
            EncoderContext::Skeleton,
        )
    }

    pub fn process_end_group(&mut self, end: &Ending) -> Result<String, WriterError> {
        if let Some(sub) = self.sub.as_mut() {
            sub.capture(|w| w.process_end_group(end))?;
            return Ok(String::new());
        }
        if self.storage.is_empty() {
            return self.write_ending(end);
        }
        self.storage.append(StoredItem::Ending(end.clone()));
        self.storage.pop(&mut self.referents, self.referent_copies);
        Ok(String::new())
    }

    pub fn process_start_subfilter(&mut self, ssf: &StartGroup) -> Result<String, WriterError> {
        if let Some(sub) = self.sub.as_mut() {
            sub.capture(|w| w.process_start_subfilter(ssf))?;
            return Ok(String::new());
        }
        // a nested writer never opens a region for its own scope
        if self.scope_id.as_deref() == Some(ssf.id.as_str()) {
            log::debug!("'{}' is this writer's own region, handled as a group", ssf.id);
            return self.process_start_group(ssf);
        }

        let sub = SubFilterWriter::new(ssf, self)?;
        self.sub = Some(Box::new(sub));
        if ssf.is_referent() || !self.storage.is_empty() {
            self.sub_direct = false;
            self.storage.push(GroupBuffer::new(ssf.clone(), GroupKind::Subfilter));
            return Ok(String::new());
        }
        self.sub_direct = true;
        self.render_optional(
            ssf.skeleton.as_ref(),
            ResourceRef::Group(ssf),
            EncoderContext::Skeleton,
        )
    }

    pub fn process_end_subfilter(&mut self, end: &Ending) -> Result<String, WriterError> {
        let Some(sub) = self.sub.as_mut() else {
            return self.process_end_group(end);
        };
        if sub.scope_id() != end.id {
            sub.capture(|w| w.process_end_subfilter(end))?;
            return Ok(String::new());
        }

        let encoded = sub.encoded_output();
        self.sub = None;
        if self.sub_direct {
            self.sub_direct = false;
            let closing = self.write_ending(end)?;
            return Ok(encoded + &closing);
        }
        if let Some(top) = self.storage.top_mut() {
            top.subfilter_output = Some(encoded);
        }
        self.storage.append(StoredItem::Ending(end.clone()));
        self.storage.pop(&mut self.referents, self.referent_copies);
        Ok(String::new())
    }

    pub fn process_text_unit(&mut self, tu: &TextUnit) -> Result<String, WriterError> {
        if let Some(sub) = self.sub.as_mut() {
            sub.capture(|w| w.process_text_unit(tu))?;
            return Ok(String::new());
        }
        if tu.is_referent() {
            self.referents.put(
                &tu.id,
                Referent::TextUnit(tu.clone()),
                self.referent_copies,
            );
            return Ok(String::new());
        }
        if self
            .storage
            .append(StoredItem::TextUnit(tu.clone()))
            .is_none()
        {
            return Ok(String::new());
        }
        let locale = self.output_loc.clone();
        self.render_text_unit(tu, Some(&locale), EncoderContext::Skeleton)
    }

    pub fn process_document_part(&mut self, dp: &DocumentPart) -> Result<String, WriterError> {
        if let Some(sub) = self.sub.as_mut() {
            sub.capture(|w| w.process_document_part(dp))?;
            return Ok(String::new());
        }
        if dp.is_referent() {
            self.referents.put(
                &dp.id,
                Referent::DocumentPart(dp.clone()),
                self.referent_copies,
            );
            return Ok(String::new());
        }
        if self
            .storage
            .append(StoredItem::DocumentPart(dp.clone()))
            .is_none()
        {
            return Ok(String::new());
        }
        self.render_optional(
            dp.skeleton.as_ref(),
            ResourceRef::DocumentPart(dp),
            EncoderContext::Skeleton,
        )
    }

    /// Caches a referent without writing anything.
    ///
    /// Groups and sub-filtered regions are cached as empty buffers: only their own skeleton is
    /// kept. Events that are not referents are ignored.
    pub fn add_to_referents(&mut self, event: &Event) {
        let referent = match event {
            Event::TextUnit(tu) if tu.is_referent() => Referent::TextUnit(tu.clone()),
            Event::DocumentPart(dp) if dp.is_referent() => Referent::DocumentPart(dp.clone()),
            Event::StartGroup(sg) if sg.is_referent() => {
                Referent::Group(GroupBuffer::new(sg.clone(), GroupKind::Group))
            }
            Event::StartSubfilter(ssf) if ssf.is_referent() => {
                Referent::Group(GroupBuffer::new(ssf.clone(), GroupKind::Subfilter))
            }
            _ => return,
        };
        if let Some(id) = event.id() {
            self.referents.put(id, referent, self.referent_copies);
        }
    }

    /// Number of markers that may resolve the same referent (at least one).
    pub fn set_referent_copies(&mut self, copies: usize) {
        self.referent_copies = copies.max(1);
    }

    pub fn referent_copies(&self) -> usize {
        self.referent_copies
    }

    /// Drops every cached referent, open buffer and nested writer.
    pub fn close(&mut self) {
        self.referents.clear();
        self.storage.clear();
        self.sub = None;
        self.sub_direct = false;
    }

    pub fn input_locale(&self) -> &LocaleId {
        &self.input_loc
    }

    pub fn output_locale(&self) -> &LocaleId {
        &self.output_loc
    }

    pub fn output_encoding(&self) -> &str {
        &self.output_encoding
    }

    pub fn is_multilingual(&self) -> bool {
        self.multilingual
    }

    pub fn allows_empty_output_target(&self) -> bool {
        self.allow_empty_output_target
    }

    pub fn referents(&self) -> &ReferentCache {
        &self.referents
    }

    pub fn storage_depth(&self) -> usize {
        self.storage.depth()
    }

    pub fn has_sub_writer(&self) -> bool {
        self.sub.is_some()
    }

    pub fn encoders(&self) -> Option<&EncoderManager> {
        self.encoders.as_ref()
    }

    pub fn layer(&self) -> Option<&Rc<dyn LayerProvider>> {
        self.layer.as_ref()
    }

    /// Consumes one use of a cached referent.
    pub fn take_referent(&mut self, id: &str) -> Option<Rc<Referent>> {
        self.referents.take(id)
    }

    pub fn peek_referent(&self, id: &str) -> Option<Rc<Referent>> {
        self.referents.peek(id)
    }

    fn write_ending(&mut self, end: &Ending) -> Result<String, WriterError> {
        if self.storage.append(StoredItem::Ending(end.clone())).is_none() {
            return Ok(String::new());
        }
        self.render_optional(
            end.skeleton.as_ref(),
            ResourceRef::Ending(end),
            EncoderContext::Skeleton,
        )
    }
}
