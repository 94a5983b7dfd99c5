//! Skeleton simplifier
//!
//! # The High-Level Concept
//!
//! The [`SkeletonWriter`] needs the whole document: a skeleton may point at a referent seen
//! earlier, or at a group that was buffered. A consumer that only ever sees one event at a time
//! cannot do that. The simplifier rewrites every event into events whose skeletons are plain
//! text, with the translatable content carried by standalone text units.
//!
//! # The Algorithm
//!
//! 1. **Referents** are swallowed: text units and document parts go into the wrapped writer's
//!    referent cache, referent groups are collected (already simplified) until their end.
//! 2. **Simple** events (text-only skeleton, no inline code reference) pass through.
//! 3. **Complex** events have their skeleton walked part by part. Literal text accumulates in a
//!    pending skeleton. A content placeholder for the output locale flushes the pending text
//!    into a document part and emits the unit itself. A reference flushes too, then the
//!    referenced resource is walked in place, or the collected group replayed.
//! 4. Adjacent document parts are merged, every produced unit and part gets an id derived from
//!    the event's own id, and the result is one event or a [`Event::Multi`].

use crate::encoder::{EncoderContext, EncoderManager};
use crate::error::{ResolveError, SimplifyError, WriterError};
use crate::locale::LocaleId;
use crate::model::{
    DocumentPart, Event, ResourceRef, StartDocument, TextContainer, TextUnit, WriterKind,
};
use crate::skeleton::classify::{self, classify, PartKind};
use crate::skeleton::marker::first_marker;
use crate::skeleton::{Skeleton, SkeletonPart};
use crate::writer::{OutputOptions, Referent, SkeletonWriter};
use std::collections::HashMap;

/// A referent group being collected.
#[derive(Debug)]
struct Collector {
    id: String,
    /// Scope depth right after the group opened.
    depth: usize,
    events: Vec<Event>,
}

#[derive(Debug)]
pub struct SkeletonSimplifier {
    writer: SkeletonWriter,
    target_locale: Option<LocaleId>,
    output_encoding: Option<String>,
    encoders: Option<EncoderManager>,
    referent_copies: usize,
    multilingual_override: Option<bool>,
    multilingual: bool,
    trg_loc: LocaleId,
    blocked: bool,
    resource_id: String,
    pending: Skeleton,
    scopes: Vec<String>,
    collecting: Vec<Collector>,
    groups: HashMap<String, Vec<Event>>,
}

impl Default for SkeletonSimplifier {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl SkeletonSimplifier {
    /// `target_locale` and `output_encoding` default to those of the StartDocument.
    pub fn new(target_locale: Option<LocaleId>, output_encoding: Option<String>) -> Self {
        Self {
            writer: SkeletonWriter::default(),
            target_locale,
            output_encoding,
            encoders: None,
            referent_copies: 1,
            multilingual_override: None,
            multilingual: false,
            trg_loc: LocaleId::empty(),
            blocked: false,
            resource_id: String::new(),
            pending: Skeleton::new(),
            scopes: Vec::new(),
            collecting: Vec::new(),
            groups: HashMap::new(),
        }
    }

    pub fn with_encoders(mut self, encoders: EncoderManager) -> Self {
        self.encoders = Some(encoders);
        self
    }

    pub fn with_referent_copies(mut self, copies: usize) -> Self {
        self.referent_copies = copies.max(1);
        self
    }

    /// Overrides the multilingual flag of the next StartDocument.
    pub fn set_multilingual(&mut self, multilingual: bool) {
        self.multilingual_override = Some(multilingual);
    }

    pub fn is_multilingual(&self) -> bool {
        self.multilingual
    }

    /// True after a StartDocument that expects a format-specific writer.
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn target_locale(&self) -> &LocaleId {
        &self.trg_loc
    }

    pub fn writer(&self) -> &SkeletonWriter {
        &self.writer
    }

    /// Converts one event. Swallowed events come back as [`Event::Noop`].
    pub fn convert(&mut self, mut event: Event) -> Result<Event, SimplifyError> {
        if let Event::StartDocument(sd) = &event {
            if sd.skeleton_writer == WriterKind::Foreign {
                log::warn!(
                    "'{}' expects a format-specific skeleton writer, events pass through unchanged",
                    sd.id
                );
                self.blocked = true;
                return Ok(event);
            }
            self.blocked = false;
            self.start_document(sd)?;
        }
        if self.blocked {
            return Ok(event);
        }

        if matches!(event, Event::TextUnit(_) | Event::DocumentPart(_)) && event.is_referent() {
            self.writer.add_to_referents(&event);
            return Ok(Event::Noop);
        }
        match &mut event {
            Event::StartGroup(sg) | Event::StartSubfilter(sg) => {
                self.scopes.push(sg.id.clone());
                if sg.is_referent() {
                    log::debug!("collecting referent group '{}'", sg.id);
                    self.collecting.push(Collector {
                        id: sg.id.clone(),
                        depth: self.scopes.len(),
                        events: Vec::new(),
                    });
                    sg.set_is_referent(false);
                }
            }
            Event::EndGroup(end) | Event::EndSubfilter(end) => {
                if self.scopes.pop().is_none() {
                    return Err(SimplifyError::UnbalancedEnd(end.id.clone()));
                }
            }
            _ => {}
        }

        let ends_document = matches!(event, Event::EndDocument(_));
        let converted = if is_complex(&event) {
            self.process_event(event)?
        } else {
            event
        };
        if ends_document {
            self.finish_document();
        }

        if let Some(collector) = self.collecting.last_mut() {
            push_flat(&mut collector.events, converted);
            if self.scopes.len() < collector.depth {
                if let Some(done) = self.collecting.pop() {
                    log::debug!("collected {} event(s) for group '{}'", done.events.len(), done.id);
                    self.groups.insert(done.id, done.events);
                }
            }
            return Ok(Event::Noop);
        }
        Ok(converted)
    }

    /// Converts a whole stream, flattening composites and dropping swallowed events.
    pub fn simplify_all<I>(&mut self, events: I) -> Result<Vec<Event>, SimplifyError>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut out = Vec::new();
        for event in events {
            let converted = self.convert(event)?;
            push_flat(&mut out, converted);
        }
        Ok(out)
    }

    fn start_document(&mut self, sd: &StartDocument) -> Result<(), SimplifyError> {
        self.finish_document();
        self.multilingual = self.multilingual_override.unwrap_or(sd.multilingual);
        self.trg_loc = self
            .target_locale
            .clone()
            .unwrap_or_else(|| sd.locale.clone());

        let mut options =
            OutputOptions::new(self.trg_loc.clone()).with_referent_copies(self.referent_copies);
        options.encoding = Some(
            self.output_encoding
                .clone()
                .unwrap_or_else(|| sd.encoding.clone()),
        );
        options.encoders = self.encoders.clone();
        self.writer = SkeletonWriter::new(options);

        let mut sd = sd.clone();
        sd.multilingual = self.multilingual;
        sd.skeleton = None;
        self.writer.process_start_document(&sd)?;
        Ok(())
    }

    fn finish_document(&mut self) {
        self.writer.close();
        self.pending = Skeleton::new();
        self.scopes.clear();
        self.collecting.clear();
        self.groups.clear();
    }

    fn process_event(&mut self, event: Event) -> Result<Event, SimplifyError> {
        self.resource_id = event.id().unwrap_or_default().to_string();
        self.pending = Skeleton::new();
        let mut out = Vec::new();

        match &event {
            Event::TextUnit(tu) => self.expand_text_unit(tu, &mut out)?,
            _ => {
                if let (Some(res), Some(skeleton)) = (event.resource(), event.skeleton()) {
                    self.expand_parts(skeleton, res, &mut out)?;
                }
            }
        }
        self.flush(&mut out);

        if !matches!(event, Event::TextUnit(_) | Event::DocumentPart(_)) {
            let mut stripped = event.clone();
            if let Some(skeleton) = stripped.skeleton_mut() {
                *skeleton = None;
            }
            // the closing document and an opening sub-filter go after their own markup
            if matches!(stripped, Event::EndDocument(_) | Event::StartSubfilter(_)) {
                out.push(stripped);
            } else {
                out.insert(0, stripped);
            }
        }

        let mut packed = pack(out);
        if packed.is_empty() {
            return Ok(event);
        }
        assign_ids(&mut packed, &event);
        if packed.len() == 1 {
            return Ok(packed.remove(0));
        }
        Ok(Event::Multi { events: packed })
    }

    fn expand_text_unit(
        &mut self,
        tu: &TextUnit,
        out: &mut Vec<Event>,
    ) -> Result<(), SimplifyError> {
        if tu.is_referent() && tu.skeleton.is_none() {
            let locale = self.trg_loc.clone();
            let text = self.writer.render_text_unit(tu, Some(&locale), EncoderContext::Skeleton)?;
            self.pending.append(&text);
            return Ok(());
        }
        match &tu.skeleton {
            None => self.add_tu(tu, out),
            Some(skeleton) => self.expand_parts(skeleton, ResourceRef::TextUnit(tu), out),
        }
    }

    fn expand_parts(
        &mut self,
        skeleton: &Skeleton,
        res: ResourceRef<'_>,
        out: &mut Vec<Event>,
    ) -> Result<(), SimplifyError> {
        let resource_id = res.id();
        for part in skeleton.parts() {
            match classify(part, resource_id) {
                PartKind::Text | PartKind::Property => self.append_rendered(part, Some(res))?,
                PartKind::ExtProperty => {
                    self.check_external_owner(part);
                    self.append_rendered(part, Some(res))?;
                }
                PartKind::Segment => {
                    let tu = require_text_unit(res)?;
                    self.expand_segment(part, tu, out)?;
                }
                PartKind::ExtSegment => match self.external_unit(part) {
                    Some(tu) => self.expand_segment(part, &tu, out)?,
                    None => self.append_rendered(part, Some(res))?,
                },
                PartKind::Reference => self.expand_reference(part, out)?,
                PartKind::Source => {
                    let tu = require_text_unit(res)?;
                    self.expand_source(tu, out)?;
                }
                PartKind::Target => {
                    let tu = require_text_unit(res)?;
                    self.expand_target(part, tu, out)?;
                }
                PartKind::ExtSource => match self.external_unit(part) {
                    Some(tu) => self.expand_source(&tu, out)?,
                    None => self.append_rendered(part, Some(res))?,
                },
                PartKind::ExtTarget => match self.external_unit(part) {
                    Some(tu) => self.expand_target(part, &tu, out)?,
                    None => self.append_rendered(part, Some(res))?,
                },
                PartKind::Unknown => {
                    log::warn!("cannot simplify part '{}' of '{}'", part.data, resource_id);
                    self.append_rendered(part, Some(res))?;
                }
            }
        }
        Ok(())
    }

    fn expand_source(&mut self, tu: &TextUnit, out: &mut Vec<Event>) -> Result<(), SimplifyError> {
        if self.multilingual {
            let text = self.writer.render_content(tu, None, EncoderContext::Text)?;
            self.pending.append(&text);
            return Ok(());
        }
        self.flush(out);
        self.add_tu(tu, out)
    }

    fn expand_target(
        &mut self,
        part: &SkeletonPart,
        tu: &TextUnit,
        out: &mut Vec<Event>,
    ) -> Result<(), SimplifyError> {
        if part.locale.as_ref() == Some(&self.trg_loc) {
            self.flush(out);
            return self.add_tu(tu, out);
        }
        let text = self.writer.render_content(tu, part.locale.as_ref(), EncoderContext::Skeleton)?;
        self.pending.append(&text);
        Ok(())
    }

    /// A segment placeholder: the segment pair for the output locale becomes its own unit.
    fn expand_segment(
        &mut self,
        part: &SkeletonPart,
        tu: &TextUnit,
        out: &mut Vec<Event>,
    ) -> Result<(), SimplifyError> {
        let Some(marker) = first_marker(&part.data) else {
            return self.append_rendered(part, None);
        };
        let segment_id = marker.id;
        let src_other = tu.target(&self.trg_loc).unwrap_or(&tu.source);
        let src_seg = tu.source.aligned_segment(segment_id, src_other);

        match part.locale.as_ref() {
            None => match src_seg {
                Some(segment) => {
                    let text =
                        self.writer.render_fragment(&segment.text, None, EncoderContext::Text)?;
                    self.pending.append(&text);
                }
                None => self.missing_segment(segment_id, &tu.id),
            },
            Some(locale) if *locale == self.trg_loc => {
                let Some(src_seg) = src_seg else {
                    self.missing_segment(segment_id, &tu.id);
                    return Ok(());
                };
                let target = tu
                    .target(locale)
                    .and_then(|tc| tc.aligned_segment(segment_id, &tu.source))
                    .map(|segment| segment.text.clone())
                    .unwrap_or_default();
                let mut unit = TextUnit::with_source(
                    tu.id.clone(),
                    TextContainer::from_fragment(src_seg.text.clone()),
                )
                .with_target(locale.clone(), TextContainer::from_fragment(target));
                unit.name = tu.name.clone();
                unit.mime_type = tu.mime_type.clone();
                unit.translatable = tu.translatable;
                self.flush(out);
                self.add_tu(&unit, out)?;
            }
            Some(locale) => {
                let segment = tu
                    .target(locale)
                    .and_then(|tc| tc.aligned_segment(segment_id, &tu.source));
                match segment {
                    Some(segment) => {
                        let text = self.writer.render_fragment(
                            &segment.text,
                            Some(locale),
                            EncoderContext::Skeleton,
                        )?;
                        self.pending.append(&text);
                    }
                    None => self.missing_segment(segment_id, &tu.id),
                }
            }
        }
        Ok(())
    }

    fn missing_segment(&mut self, segment_id: &str, tu_id: &str) {
        log::warn!("no segment '{segment_id}' in text unit '{tu_id}'");
        self.pending.append(ResolveError::InvalidSegmentRef.token());
    }

    /// A reference splits the pending text: before, the referenced resource, after.
    fn expand_reference(
        &mut self,
        part: &SkeletonPart,
        out: &mut Vec<Event>,
    ) -> Result<(), SimplifyError> {
        let Some(marker) = first_marker(&part.data) else {
            return self.append_rendered(part, None);
        };
        self.pending.append(&part.data[..marker.start]);
        self.flush(out);

        match self.writer.take_referent(marker.id) {
            Some(referent) => match referent.as_ref() {
                Referent::TextUnit(tu) => self.expand_text_unit(tu, out)?,
                Referent::DocumentPart(dp) => {
                    if let Some(skeleton) = &dp.skeleton {
                        self.expand_parts(skeleton, ResourceRef::DocumentPart(dp), out)?;
                    }
                }
                Referent::Group(buffer) => {
                    let text = self.writer.render_group(buffer, EncoderContext::Skeleton)?;
                    self.pending.append(&text);
                }
                Referent::Other(skeleton) => {
                    let text =
                        self.writer.render_skeleton(skeleton, None, EncoderContext::Skeleton)?;
                    self.pending.append(&text);
                }
            },
            None => match self.groups.remove(marker.id) {
                Some(events) => out.extend(events),
                None => {
                    log::warn!("no referent '{}' left to resolve", marker.id);
                    self.pending.append(ResolveError::RefNotFound.token());
                }
            },
        }
        self.flush(out);

        let suffix = &part.data[marker.end..];
        if suffix.is_empty() {
            return Ok(());
        }
        let rest = SkeletonPart {
            data: suffix.to_string(),
            owner: part.owner.clone(),
            locale: part.locale.clone(),
        };
        if classify::is_reference(&rest) {
            self.expand_reference(&rest, out)
        } else {
            self.append_rendered(&rest, None)
        }
    }

    fn check_external_owner(&self, part: &SkeletonPart) {
        let owner = part.owner.as_deref().unwrap_or_default();
        if self.writer.peek_referent(owner).is_none() {
            log::warn!("external owner '{owner}' of '{}' is not a referent", part.data);
        }
    }

    /// The cached unit an external placeholder points at.
    fn external_unit(&self, part: &SkeletonPart) -> Option<TextUnit> {
        let owner = part.owner.as_deref()?;
        let unit = self
            .writer
            .peek_referent(owner)
            .and_then(|referent| match referent.as_ref() {
                Referent::TextUnit(tu) => Some(tu.clone()),
                _ => None,
            });
        if unit.is_none() {
            log::warn!("external owner '{owner}' is not a cached text unit");
        }
        unit
    }

    fn append_rendered(
        &mut self,
        part: &SkeletonPart,
        scope: Option<ResourceRef<'_>>,
    ) -> Result<(), SimplifyError> {
        let text = self.writer.render_part(part, scope, EncoderContext::Skeleton)?;
        self.pending.append(&text);
        Ok(())
    }

    fn flush(&mut self, out: &mut Vec<Event>) {
        if self.pending.is_empty() {
            return;
        }
        let skeleton = std::mem::take(&mut self.pending);
        out.push(Event::DocumentPart(DocumentPart::new(
            self.resource_id.clone(),
            skeleton,
        )));
    }

    /// Emits a standalone copy of `tu`, with inline code references resolved.
    fn add_tu(&mut self, tu: &TextUnit, out: &mut Vec<Event>) -> Result<(), SimplifyError> {
        if tu.is_empty() {
            log::debug!("skipping empty text unit '{}'", tu.id);
            return Ok(());
        }
        let mut unit = tu.clone();
        unit.skeleton = None;
        unit.set_is_referent(false);

        let locale = self.trg_loc.clone();
        let container = match unit.targets.get_mut(&locale) {
            Some(target) => target,
            None => &mut unit.source,
        };
        for text_part in container.parts_mut() {
            for code in text_part.content_mut().codes_mut() {
                if code.has_reference() {
                    let expanded =
                        self.writer.expand_code(code, Some(&locale), EncoderContext::Text)?;
                    code.data = expanded.clone();
                    code.outer_data = Some(expanded);
                }
            }
        }
        out.push(Event::TextUnit(unit));
        Ok(())
    }
}

fn require_text_unit<'a>(res: ResourceRef<'a>) -> Result<&'a TextUnit, SimplifyError> {
    res.as_text_unit().ok_or_else(|| {
        WriterError::SelfReferenceNotTextUnit {
            owner: res.id().to_string(),
        }
        .into()
    })
}

/// Whether an event needs simplifying: a skeleton part that is not plain text, or an inline code
/// carrying a reference.
pub fn is_complex(event: &Event) -> bool {
    let skeleton_refs = event
        .skeleton()
        .is_some_and(|skeleton| skeleton.parts().iter().any(|part| !classify::is_text(part)));
    let code_refs = match event {
        Event::TextUnit(tu) => std::iter::once(&tu.source)
            .chain(tu.targets.values())
            .flat_map(|tc| tc.parts())
            .any(|part| part.content().codes().iter().any(|code| code.has_reference())),
        _ => false,
    };
    skeleton_refs || code_refs
}

fn push_flat(out: &mut Vec<Event>, event: Event) {
    match event {
        Event::Multi { events } => {
            for child in events {
                push_flat(out, child);
            }
        }
        Event::Noop => {}
        other => out.push(other),
    }
}

/// Drops no-ops and merges runs of document parts into one.
fn pack(events: Vec<Event>) -> Vec<Event> {
    let mut packed: Vec<Event> = Vec::with_capacity(events.len());
    for event in events {
        if matches!(event, Event::Noop) {
            continue;
        }
        if let (Some(Event::DocumentPart(prev)), Event::DocumentPart(next)) =
            (packed.last_mut(), &event)
        {
            if let Some(more) = &next.skeleton {
                prev.skeleton
                    .get_or_insert_with(Skeleton::new)
                    .extend(more);
            }
            continue;
        }
        packed.push(event);
    }
    packed
}

/// Renames produced units and parts after `original`: `<id>`, `<id>_1`, ... and, when the
/// original is not itself a document part, `dp_<id>`, `dp_<id>_1`, ... for the parts.
fn assign_ids(events: &mut [Event], original: &Event) {
    let base = original.id().unwrap_or_default().to_string();
    let original_is_part = matches!(original, Event::DocumentPart(_));
    let properties = original
        .resource()
        .and_then(|res| res.as_nameable())
        .map(|res| res.properties().clone());

    let mut seen: HashMap<String, usize> = HashMap::new();
    for event in events.iter_mut() {
        let stem = match event {
            Event::DocumentPart(_) if !original_is_part => format!("dp_{base}"),
            Event::TextUnit(_) | Event::DocumentPart(_) => base.clone(),
            _ => continue,
        };
        let count = seen.entry(stem.clone()).or_insert(0);
        let id = if *count == 0 {
            stem
        } else {
            format!("{stem}_{count}")
        };
        *count += 1;
        event.set_id(id);

        if event.same_kind(original) {
            if let (Some(props), Some(target)) = (&properties, event.properties_mut()) {
                target.inherit_resource_level(props);
            }
        }
    }
}

/// Simplifies a whole event stream with a fresh simplifier.
pub fn simplify_events(
    events: Vec<Event>,
    target_locale: Option<LocaleId>,
) -> Result<Vec<Event>, SimplifyError> {
    SkeletonSimplifier::new(target_locale, None).simplify_all(events)
}
