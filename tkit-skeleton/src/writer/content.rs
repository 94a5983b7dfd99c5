//! Marker resolution and content rendering
//!
//! Every skeleton part goes through [`SkeletonWriter::render_part`]. Text without a marker is
//! copied (through the layer encoder when a layer is active). Otherwise markers are resolved
//! strictly left to right; the text a marker resolves to is final and never scanned again.
//!
//! Bad data never aborts a document. A missing referent, segment or property is logged and the
//! marker is replaced by the matching [`ResolveError`] token.

use super::referents::Referent;
use super::storage::{GroupBuffer, GroupKind, StoredItem};
use super::SkeletonWriter;
use crate::encoder::EncoderContext;
use crate::error::{ResolveError, WriterError};
use crate::locale::LocaleId;
use crate::model::text::{char_to_index, is_marker, MARKER_CLOSING, MARKER_OPENING};
use crate::model::{
    Code, Nameable, ResourceRef, TextContainer, TextFragment, TextPart, TextUnit, PROP_ENCODING,
    PROP_LANGUAGE,
};
use crate::skeleton::marker::{contains_marker, find_marker, MarkerScan, RefMarker};
use crate::skeleton::{Skeleton, SkeletonPart};
use std::rc::Rc;

fn unresolved(error: ResolveError, detail: &str) -> String {
    log::warn!("{}: {detail}", error.token());
    error.token().to_string()
}

impl SkeletonWriter {
    /// Renders every part of `skeleton` with `scope` as the resource owning it.
    pub fn render_skeleton(
        &mut self,
        skeleton: &Skeleton,
        scope: Option<ResourceRef<'_>>,
        context: EncoderContext,
    ) -> Result<String, WriterError> {
        let mut out = String::new();
        for part in skeleton.parts() {
            out.push_str(&self.render_part(part, scope, context)?);
        }
        Ok(out)
    }

    pub(super) fn render_optional(
        &mut self,
        skeleton: Option<&Skeleton>,
        scope: ResourceRef<'_>,
        context: EncoderContext,
    ) -> Result<String, WriterError> {
        match skeleton {
            Some(skeleton) => self.render_skeleton(skeleton, Some(scope), context),
            None => Ok(String::new()),
        }
    }

    /// Renders one part, resolving its markers.
    pub fn render_part(
        &mut self,
        part: &SkeletonPart,
        scope: Option<ResourceRef<'_>>,
        context: EncoderContext,
    ) -> Result<String, WriterError> {
        let text = part.data.as_str();
        if !contains_marker(text) {
            return Ok(self.layer_encode(text, context));
        }

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        loop {
            match find_marker(text, cursor) {
                MarkerScan::None => {
                    out.push_str(&self.layer_encode(&text[cursor..], context));
                    break;
                }
                MarkerScan::Unterminated(start) => {
                    out.push_str(&self.layer_encode(&text[cursor..start], context));
                    out.push_str(&unresolved(
                        ResolveError::InvalidRefMarker,
                        &format!("unterminated marker in '{text}'"),
                    ));
                    break;
                }
                MarkerScan::Found(marker) => {
                    out.push_str(&self.layer_encode(&text[cursor..marker.start], context));
                    out.push_str(&self.resolve_marker(part, &marker, scope, context)?);
                    cursor = marker.end;
                }
            }
        }
        Ok(out)
    }

    fn resolve_marker(
        &mut self,
        part: &SkeletonPart,
        marker: &RefMarker<'_>,
        scope: Option<ResourceRef<'_>>,
        context: EncoderContext,
    ) -> Result<String, WriterError> {
        if marker.property.is_none() && part.owner.is_none() {
            return self.resolve_reference(marker.id, part.locale.as_ref(), context);
        }

        let Some(owner_id) = part.owner.as_deref() else {
            return Ok(unresolved(
                ResolveError::NullRef,
                &format!("property marker '{}' has no owner", &part.data),
            ));
        };
        let cached;
        let owner = match scope.filter(|res| res.id() == owner_id) {
            Some(res) => res,
            None => {
                cached = self.referents.peek(owner_id);
                match cached.as_deref().and_then(Referent::as_resource) {
                    Some(res) => res,
                    None => {
                        return Ok(unresolved(
                            ResolveError::NullRef,
                            &format!("owner '{owner_id}' is not in scope"),
                        ))
                    }
                }
            }
        };

        let locale = self.default_locale(part.locale.as_ref());
        if marker.is_segment() {
            let Some(tu) = owner.as_text_unit() else {
                return Ok(unresolved(
                    ResolveError::InvalidRefType,
                    &format!("segment marker owned by non text unit '{owner_id}'"),
                ));
            };
            return self.render_segment_ref(tu, marker.id, part.locale.as_ref(), context);
        }
        if let Some(property) = marker.property {
            return Ok(match owner.as_nameable() {
                Some(res) => self.property_value(res, property, part.locale.as_ref(), context),
                None => unresolved(
                    ResolveError::InvalidRefType,
                    &format!("'{owner_id}' cannot carry properties"),
                ),
            });
        }

        let tu = owner
            .as_text_unit()
            .ok_or_else(|| WriterError::SelfReferenceNotTextUnit {
                owner: owner_id.to_string(),
            })?;
        let context = if self.multilingual && part.locale.is_none() {
            EncoderContext::Text
        } else {
            context
        };
        self.render_content(tu, locale.as_ref(), context)
    }

    fn resolve_reference(
        &mut self,
        id: &str,
        part_locale: Option<&LocaleId>,
        context: EncoderContext,
    ) -> Result<String, WriterError> {
        let Some(referent) = self.referents.take(id) else {
            return Ok(unresolved(
                ResolveError::RefNotFound,
                &format!("no referent '{id}' left to resolve"),
            ));
        };
        let locale = self
            .default_locale(part_locale)
            .or_else(|| Some(self.output_loc.clone()));
        self.render_referent(&referent, locale.as_ref(), context)
    }

    /// Renders a cached referent the way its kind is written.
    pub fn render_referent(
        &mut self,
        referent: &Rc<Referent>,
        locale: Option<&LocaleId>,
        context: EncoderContext,
    ) -> Result<String, WriterError> {
        match referent.as_ref() {
            Referent::TextUnit(tu) => self.render_text_unit(tu, locale, context),
            Referent::DocumentPart(dp) => {
                self.render_optional(dp.skeleton.as_ref(), ResourceRef::DocumentPart(dp), context)
            }
            Referent::Group(buffer) => self.render_group(buffer, context),
            Referent::Other(skeleton) => self.render_skeleton(skeleton, None, context),
        }
    }

    /// The locale a marker without one stands for.
    pub(super) fn default_locale(&self, part_locale: Option<&LocaleId>) -> Option<LocaleId> {
        match part_locale {
            Some(locale) => Some(locale.clone()),
            None if self.multilingual => None,
            None => Some(self.output_loc.clone()),
        }
    }

    /// A unit's skeleton, or its bare content when it has none.
    pub fn render_text_unit(
        &mut self,
        tu: &TextUnit,
        locale: Option<&LocaleId>,
        context: EncoderContext,
    ) -> Result<String, WriterError> {
        match tu.skeleton.as_ref() {
            Some(skeleton) => {
                self.render_skeleton(skeleton, Some(ResourceRef::TextUnit(tu)), context)
            }
            None => self.render_content(tu, locale, context),
        }
    }

    /// Content of `tu` for `locale` (`None` is the source).
    pub fn render_content(
        &mut self,
        tu: &TextUnit,
        locale: Option<&LocaleId>,
        context: EncoderContext,
    ) -> Result<String, WriterError> {
        self.update_encoder(tu.mime_type.as_deref());
        let context = if tu.translatable {
            context
        } else {
            EncoderContext::Text
        };

        let lazy_empty;
        let container = match locale {
            None => &tu.source,
            Some(loc) => match tu.target(loc) {
                Some(target) if !target.is_empty() => target,
                target if self.allow_empty_output_target && self.layer.is_none() => {
                    lazy_empty = TextContainer::empty();
                    target.unwrap_or(&lazy_empty)
                }
                _ => &tu.source,
            },
        };

        let segmented = tu.source.has_been_segmented()
            || !tu.source.content_is_one_segment()
            || container.has_been_segmented()
            || !container.content_is_one_segment()
            || !container.alt_translations().is_empty();
        if segmented {
            return self.render_segmented(tu, container, locale, context);
        }

        let fragment = container.first_content().cloned().unwrap_or_default();
        let Some(layer) = self.layer.clone() else {
            return self.render_fragment(&fragment, locale, context);
        };
        let text = self.render_fragment(&fragment, locale, EncoderContext::Text)?;
        Ok(match context {
            EncoderContext::Skeleton => format!("{}{text}{}", layer.end_code(), layer.start_code()),
            EncoderContext::Inline => {
                format!("{}{text}{}", layer.end_inline(), layer.start_inline())
            }
            EncoderContext::Text => text,
        })
    }

    fn render_segmented(
        &mut self,
        tu: &TextUnit,
        target: &TextContainer,
        locale: Option<&LocaleId>,
        context: EncoderContext,
    ) -> Result<String, WriterError> {
        let layer = self.layer.clone();
        let mut out = String::new();
        for part in target.parts() {
            let TextPart::Segment(trg_seg) = part else {
                out.push_str(&self.render_fragment(part.content(), locale, context)?);
                continue;
            };
            let mut leverage = trg_seg.leverage_score();
            let mut trg_text = &trg_seg.text;
            let src_seg = tu.source.aligned_segment(&trg_seg.id, target);
            match src_seg {
                None => log::warn!(
                    "no source segment for '{}' in text unit '{}'",
                    trg_seg.id,
                    tu.id
                ),
                Some(src) if trg_text.is_empty() && !src.text.is_empty() => {
                    trg_text = &src.text;
                    leverage = 0;
                }
                Some(_) => {}
            }

            let Some(layer) = layer.as_ref() else {
                out.push_str(&self.render_fragment(trg_text, locale, context)?);
                continue;
            };
            // a target segment without a source pairs with an empty source side
            let src_text = match src_seg {
                Some(src) => self.render_fragment(&src.text, locale, EncoderContext::Text)?,
                None => String::new(),
            };
            let entry = format!(
                "{}{}{}{}{}",
                layer.start_segment(),
                src_text,
                layer.mid_segment(leverage),
                self.render_fragment(trg_text, locale, EncoderContext::Text)?,
                layer.end_segment()
            );
            match context {
                EncoderContext::Skeleton => {
                    out.push_str(layer.end_code());
                    out.push_str(&entry);
                    out.push_str(layer.start_code());
                }
                EncoderContext::Inline => {
                    out.push_str(layer.end_inline());
                    out.push_str(&entry);
                    out.push_str(layer.start_inline());
                }
                EncoderContext::Text => out.push_str(&entry),
            }
        }
        Ok(out)
    }

    /// One segment of `tu`: from the source when `locale` is `None`, else from that target.
    fn render_segment_ref(
        &mut self,
        tu: &TextUnit,
        segment_id: &str,
        locale: Option<&LocaleId>,
        context: EncoderContext,
    ) -> Result<String, WriterError> {
        let container = match locale {
            None => &tu.source,
            Some(loc) => tu.target(loc).unwrap_or(&tu.source),
        };
        match container.aligned_segment(segment_id, &tu.source) {
            Some(segment) => {
                self.update_encoder(tu.mime_type.as_deref());
                self.render_fragment(&segment.text, locale, context)
            }
            None => Ok(unresolved(
                ResolveError::InvalidSegmentRef,
                &format!("no segment '{segment_id}' in text unit '{}'", tu.id),
            )),
        }
    }

    /// Value of a named property, rewritten for the output where needed.
    ///
    /// `locale` selects the source properties (`None`), the resource-level ones (the empty
    /// locale) or those of one target, falling back to the source.
    pub fn property_value(
        &mut self,
        resource: &dyn Nameable,
        name: &str,
        locale: Option<&LocaleId>,
        context: EncoderContext,
    ) -> String {
        self.update_encoder(resource.mime_type());
        let props = resource.properties();
        let found = match locale {
            None => props.source_property(name),
            Some(loc) if loc.is_empty() => props.resource_property(name),
            Some(loc) => props
                .target_property(loc, name)
                .or_else(|| props.source_property(name)),
        };
        let value = match found {
            None => {
                return unresolved(
                    ResolveError::PropNotFound,
                    &format!("no property '{name}' on '{}'", resource.id()),
                )
            }
            Some(None) => {
                return unresolved(
                    ResolveError::PropValueNull,
                    &format!("property '{name}' of '{}' has no value", resource.id()),
                )
            }
            Some(Some(value)) => value.clone(),
        };

        let value = match name {
            PROP_LANGUAGE if LocaleId::new(&value).same_language_as(&self.input_loc) => {
                self.output_loc.to_string()
            }
            PROP_ENCODING => self.output_encoding.clone(),
            _ => value,
        };
        let value = match &self.encoders {
            Some(encoders) => encoders.to_native(name, &value),
            None => value,
        };
        self.layer_encode(&value, context)
    }

    /// Walks coded text, escaping characters and expanding inline codes.
    ///
    /// `locale` is the side the fragment belongs to (`None` for the source); references inside
    /// its codes resolve against the same side.
    pub fn render_fragment(
        &mut self,
        fragment: &TextFragment,
        locale: Option<&LocaleId>,
        context: EncoderContext,
    ) -> Result<String, WriterError> {
        if !fragment.has_code() {
            let text = self.encode(fragment.coded_text(), context);
            return Ok(self.layer_encode(&text, context));
        }

        let coded = fragment.coded_text();
        let mut out = String::with_capacity(coded.len());
        let mut in_cdata = false;
        let mut chars = coded.chars();
        while let Some(ch) = chars.next() {
            if is_marker(ch) {
                let index = chars
                    .next()
                    .map(char_to_index)
                    .unwrap_or(fragment.codes().len());
                let code = fragment.code(index).ok_or_else(|| WriterError::CodeIndexOutOfRange {
                    index,
                    text: fragment.to_text(),
                })?;
                if code.is_cdata() {
                    match ch {
                        MARKER_OPENING => in_cdata = true,
                        MARKER_CLOSING => in_cdata = false,
                        _ => {}
                    }
                }
                out.push_str(&self.expand_code(code, locale, context)?);
            } else if in_cdata {
                out.push(ch);
            } else {
                let encoded = match &self.encoders {
                    Some(encoders) => encoders.encode_char(ch, context),
                    None => ch.to_string(),
                };
                out.push_str(&self.layer_encode(&encoded, context));
            }
        }
        Ok(out)
    }

    /// Outer markup of an inline code, with any reference in it resolved.
    pub fn expand_code(
        &mut self,
        code: &Code,
        locale: Option<&LocaleId>,
        _context: EncoderContext,
    ) -> Result<String, WriterError> {
        let outer = match self.layer.clone() {
            Some(layer) => format!(
                "{}{}{}",
                layer.start_inline(),
                layer.encode(code.outer_data(), EncoderContext::Inline),
                layer.end_inline()
            ),
            None => code.outer_data().to_string(),
        };
        if !code.has_reference() {
            return Ok(outer);
        }

        let mut out = String::with_capacity(outer.len());
        let mut cursor = 0;
        loop {
            match find_marker(&outer, cursor) {
                MarkerScan::None => {
                    out.push_str(&outer[cursor..]);
                    break;
                }
                MarkerScan::Unterminated(start) => {
                    out.push_str(&outer[cursor..start]);
                    out.push_str(&unresolved(
                        ResolveError::InvalidRefMarker,
                        &format!("unterminated marker in code '{}'", code.data),
                    ));
                    break;
                }
                MarkerScan::Found(marker) => {
                    out.push_str(&outer[cursor..marker.start]);
                    out.push_str(&self.resolve_code_marker(&marker, locale)?);
                    cursor = marker.end;
                }
            }
        }
        Ok(out)
    }

    fn resolve_code_marker(
        &mut self,
        marker: &RefMarker<'_>,
        locale: Option<&LocaleId>,
    ) -> Result<String, WriterError> {
        let Some(referent) = self.referents.take(marker.id) else {
            return Ok(unresolved(
                ResolveError::RefNotFound,
                &format!("no referent '{}' for inline code", marker.id),
            ));
        };
        if let Some(property) = marker.property {
            return Ok(match referent.as_resource().and_then(|res| res.as_nameable()) {
                Some(res) => self.property_value(res, property, locale, EncoderContext::Inline),
                None => unresolved(
                    ResolveError::InvalidRefType,
                    &format!("referent '{}' cannot carry properties", marker.id),
                ),
            });
        }
        self.render_referent(&referent, locale, EncoderContext::Inline)
    }

    /// A buffered group: its skeleton, then its items in order.
    pub fn render_group(
        &mut self,
        buffer: &GroupBuffer,
        context: EncoderContext,
    ) -> Result<String, WriterError> {
        let mut out = self.render_optional(
            buffer.start.skeleton.as_ref(),
            ResourceRef::Group(&buffer.start),
            context,
        )?;
        if buffer.kind == GroupKind::Subfilter {
            if let Some(output) = &buffer.subfilter_output {
                out.push_str(output);
            }
            if let Some(end) = buffer.last_ending() {
                out.push_str(&self.render_optional(
                    end.skeleton.as_ref(),
                    ResourceRef::Ending(end),
                    context,
                )?);
            }
            return Ok(out);
        }

        let locale = self.output_loc.clone();
        for item in &buffer.items {
            let text = match item {
                StoredItem::TextUnit(tu) => self.render_text_unit(tu, Some(&locale), context)?,
                StoredItem::DocumentPart(dp) => self.render_optional(
                    dp.skeleton.as_ref(),
                    ResourceRef::DocumentPart(dp),
                    context,
                )?,
                StoredItem::SubDocument(ssd) => self.render_optional(
                    ssd.skeleton.as_ref(),
                    ResourceRef::SubDocument(ssd),
                    context,
                )?,
                StoredItem::Ending(end) => {
                    self.render_optional(end.skeleton.as_ref(), ResourceRef::Ending(end), context)?
                }
                StoredItem::Group(nested) => self.render_group(nested, context)?,
            };
            out.push_str(&text);
        }
        Ok(out)
    }

    fn update_encoder(&mut self, mime_type: Option<&str>) {
        if let Some(encoders) = self.encoders.as_mut() {
            encoders.update_encoder(mime_type);
        }
    }

    fn encode(&self, text: &str, context: EncoderContext) -> String {
        match &self.encoders {
            Some(encoders) => encoders.encode(text, context),
            None => text.to_string(),
        }
    }

    fn layer_encode(&self, text: &str, context: EncoderContext) -> String {
        match &self.layer {
            Some(layer) => layer.encode(text, context),
            None => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::OutputOptions;
    use super::*;
    use crate::layer::BilingualLayer;
    use crate::model::{AltTranslation, DocumentPart, Segment, StartDocument, TagType, TextPart};

    fn writer_for(output: &str, layer: Option<BilingualLayer>) -> SkeletonWriter {
        let mut options = OutputOptions::new(LocaleId::new(output));
        if let Some(layer) = layer {
            options = options.with_layer(layer);
        }
        let mut writer = SkeletonWriter::new(options);
        let sd = StartDocument::new("sd", LocaleId::new("en")).with_mime_type("text/xml");
        writer.process_start_document(&sd).unwrap();
        writer
    }

    fn fr() -> LocaleId {
        LocaleId::new("fr")
    }

    #[test]
    fn plain_text_part_is_copied() {
        let mut writer = writer_for("fr", None);
        let out = writer
            .render_part(&SkeletonPart::new("<p>"), None, EncoderContext::Skeleton)
            .unwrap();
        assert_eq!(out, "<p>");
    }

    #[test]
    fn missing_referent_yields_token() {
        let mut writer = writer_for("fr", None);
        let out = writer
            .render_part(&SkeletonPart::new("a[#$nope]b"), None, EncoderContext::Skeleton)
            .unwrap();
        assert_eq!(out, "a-ERR:REF-NOT-FOUND-b");
    }

    #[test]
    fn unterminated_marker_keeps_prefix() {
        let mut writer = writer_for("fr", None);
        let out = writer
            .render_part(&SkeletonPart::new("ab[#$x"), None, EncoderContext::Skeleton)
            .unwrap();
        assert_eq!(out, "ab-ERR:INVALID-REF-MARKER-");
    }

    #[test]
    fn content_falls_back_to_source() {
        let mut writer = writer_for("fr", None);
        let tu = TextUnit::new("tu1", "a < b");
        let out = writer
            .render_content(&tu, Some(&fr()), EncoderContext::Skeleton)
            .unwrap();
        assert_eq!(out, "a &lt; b");
    }

    #[test]
    fn segments_pair_with_layer_and_score() {
        let mut writer = writer_for("fr", Some(BilingualLayer::default()));
        let source = TextContainer::segmented(vec![
            TextPart::Segment(Segment::new("1", "A")),
            TextPart::Segment(Segment::new("2", "B")),
        ]);
        let target = TextContainer::segmented(vec![
            TextPart::Segment(Segment::new("1", "a").with_alt_translation(AltTranslation {
                target: "a".into(),
                combined_score: 85,
                origin: None,
            })),
            TextPart::Segment(Segment::new("2", "")),
        ]);
        let tu = TextUnit::with_source("tu1", source).with_target(fr(), target);
        let out = writer
            .render_content(&tu, Some(&fr()), EncoderContext::Text)
            .unwrap();
        assert_eq!(out, "{0>A<}85{>a<0}{0>B<}0{>B<0}");
    }

    #[test]
    fn unpaired_target_segment_has_empty_source_side() {
        let mut writer = writer_for("fr", Some(BilingualLayer::default()));
        let source = TextContainer::segmented(vec![TextPart::Segment(Segment::new("s1", "A"))]);
        let target = TextContainer::segmented(vec![
            TextPart::Segment(Segment::new("s1", "a")),
            TextPart::Segment(Segment::new("s9", "z")),
        ]);
        let tu = TextUnit::with_source("tu1", source).with_target(fr(), target);
        let out = writer
            .render_content(&tu, Some(&fr()), EncoderContext::Text)
            .unwrap();
        assert_eq!(out, "{0>A<}0{>a<0}{0><}0{>z<0}");
    }

    #[test]
    fn multi_part_source_takes_the_segmented_path() {
        let mut writer = writer_for("fr", Some(BilingualLayer::default()));
        let source: TextContainer = serde_json::from_str(
            r#"{"parts":[{"text":"x "},{"segment":{"id":"0","text":"y"}}]}"#,
        )
        .expect("container json");
        assert!(!source.has_been_segmented());
        let tu =
            TextUnit::with_source("tu1", source).with_target(fr(), TextContainer::from_text("Y"));
        let out = writer
            .render_content(&tu, Some(&fr()), EncoderContext::Text)
            .unwrap();
        assert_eq!(out, "{0>y<}0{>Y<0}");
    }

    #[test]
    fn property_language_is_rewritten() {
        let mut writer = writer_for("fr-ca", None);
        let mut dp = DocumentPart::new("dp1", Skeleton::new());
        dp.properties.set_source(PROP_LANGUAGE, Some("en-US"));
        dp.properties.set_source("title", None);
        let lang = writer.property_value(&dp, PROP_LANGUAGE, None, EncoderContext::Skeleton);
        assert_eq!(lang, "fr-ca");
        let null = writer.property_value(&dp, "title", None, EncoderContext::Skeleton);
        assert_eq!(null, ResolveError::PropValueNull.token());
        let missing = writer.property_value(&dp, "href", None, EncoderContext::Skeleton);
        assert_eq!(missing, ResolveError::PropNotFound.token());
    }

    #[test]
    fn cdata_code_suppresses_escaping() {
        let mut writer = writer_for("fr", None);
        let mut frag = TextFragment::new("a<");
        frag.append_code(Code::new(TagType::Opening, "cdata", "<![CDATA["));
        frag.append_text("<b>");
        frag.append_code(Code::new(TagType::Closing, "cdata", "]]>"));
        let out = writer.render_fragment(&frag, None, EncoderContext::Text).unwrap();
        assert_eq!(out, "a&lt;<![CDATA[<b>]]>");
    }

    #[test]
    fn code_reference_resolves_referent_property() {
        let mut writer = writer_for("fr", None);
        let mut dp = DocumentPart::new("dp1", Skeleton::new());
        dp.properties.set_source("href", Some("a.html"));
        dp.set_is_referent(true);
        writer.process_document_part(&dp).unwrap();
        let code = Code::new(TagType::Opening, "link", "<a>")
            .with_outer_data("<a href=\"[#$dp1@%href]\">");
        let out = writer.expand_code(&code, Some(&fr()), EncoderContext::Text).unwrap();
        assert_eq!(out, "<a href=\"a.html\">");
    }

    #[test]
    fn self_reference_to_document_part_is_an_error() {
        let mut writer = writer_for("fr", None);
        let mut skel = Skeleton::new();
        skel.add_content_placeholder("dp1", None);
        let dp = DocumentPart::new("dp1", skel);
        let err = writer.process_document_part(&dp).unwrap_err();
        assert_eq!(
            err,
            WriterError::SelfReferenceNotTextUnit {
                owner: "dp1".to_string()
            }
        );
    }
}
