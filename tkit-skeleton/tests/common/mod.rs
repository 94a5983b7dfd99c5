//! Event builders shared by the writer and simplifier tests.

#![allow(dead_code)]

use tkit_skeleton::model::{Code, Segment, TagType, TextPart};
use tkit_skeleton::{
    DocumentPart, Ending, Event, LocaleId, OutputOptions, Skeleton, SkeletonWriter,
    StartDocument, TextContainer, TextFragment, TextUnit,
};

pub fn en() -> LocaleId {
    LocaleId::new("en")
}

pub fn fr() -> LocaleId {
    LocaleId::new("fr")
}

pub fn start(mime_type: &str) -> Event {
    Event::StartDocument(StartDocument::new("doc", en()).with_mime_type(mime_type))
}

/// A bilingual document start: the skeleton carries both the source and the target.
pub fn start_multilingual(allow_empty_output_target: bool) -> Event {
    let mut sd = StartDocument::new("doc", en()).with_mime_type("text/xml");
    sd.multilingual = true;
    sd.allow_empty_output_target = allow_empty_output_target;
    Event::StartDocument(sd)
}

pub fn end() -> Event {
    Event::EndDocument(Ending::new("doc", None))
}

/// A unit with a French target and no skeleton of its own.
pub fn unit(id: &str, source: &str, target: &str) -> TextUnit {
    TextUnit::new(id, source).with_target(fr(), TextContainer::from_text(target))
}

/// A unit whose skeleton wraps its content in `before` and `after`.
pub fn wrapped(id: &str, before: &str, source: &str, target: &str, after: &str) -> TextUnit {
    let mut skel = Skeleton::new();
    skel.append(before);
    skel.add_content_placeholder(id, None);
    skel.append(after);
    unit(id, source, target).with_skeleton(skel)
}

pub fn part(id: &str, text: &str) -> DocumentPart {
    DocumentPart::new(id, Skeleton::from_text(text))
}

/// A document part whose skeleton pulls in the referent `target`.
pub fn pointer(id: &str, before: &str, target: &str, after: &str) -> DocumentPart {
    let mut skel = Skeleton::new();
    skel.append(before);
    skel.add_reference(target);
    skel.append(after);
    DocumentPart::new(id, skel)
}

pub fn referent(mut tu: TextUnit) -> TextUnit {
    tu.set_is_referent(true);
    tu
}

/// Runs `events` through a fresh writer and concatenates the output.
pub fn write_all(events: &[Event], options: OutputOptions) -> String {
    let mut writer = SkeletonWriter::new(options);
    events
        .iter()
        .map(|event| writer.process(event).expect("write"))
        .collect()
}

pub fn write_fr(events: &[Event]) -> String {
    write_all(events, OutputOptions::new(fr()))
}

/// Skeleton writing the source and the French target of `id` side by side.
pub fn bilingual_skeleton(id: &str) -> Skeleton {
    let mut skel = Skeleton::new();
    skel.append("<source>");
    skel.add_content_placeholder(id, None);
    skel.append("</source><target>");
    skel.add_content_placeholder(id, Some(fr()));
    skel.append("</target>");
    skel
}

/// `text` followed by a link code whose title pulls in the referent `target`.
pub fn linked(text: &str, target: &str) -> TextFragment {
    let mut fragment = TextFragment::new(text);
    fragment.append_code(
        Code::new(TagType::Placeholder, "link", "<a/>")
            .with_outer_data(format!("<a title=\"[#${target}]\"/>")),
    );
    fragment
}

/// A container split into segments, given as `(id, text)` pairs.
pub fn segments(pairs: &[(&str, &str)]) -> TextContainer {
    TextContainer::segmented(
        pairs
            .iter()
            .map(|(id, text)| TextPart::Segment(Segment::new(*id, *text)))
            .collect(),
    )
}
