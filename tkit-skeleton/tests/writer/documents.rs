//! Plain documents: skeleton text around text units and document parts.

use crate::common::*;
use insta::assert_snapshot;
use tkit_skeleton::layer::BilingualLayer;
use tkit_skeleton::{
    DocumentPart, Ending, Event, OutputOptions, Skeleton, StartDocument, TextUnit,
};

fn page() -> Vec<Event> {
    let sd = StartDocument::new("doc", en())
        .with_mime_type("text/xml")
        .with_skeleton(Skeleton::from_text("<doc>"));
    vec![
        Event::StartDocument(sd),
        Event::TextUnit(wrapped("tu1", "<t>", "Hello", "Bonjour", "</t>")),
        Event::DocumentPart(part("dp1", "<br/>")),
        Event::TextUnit(wrapped("tu2", "<t>", "Bye", "Au revoir", "</t>")),
        Event::EndDocument(Ending::new("doc", Some(Skeleton::from_text("</doc>")))),
    ]
}

#[test]
fn test_writes_targets_in_skeleton_order() {
    assert_snapshot!(
        write_fr(&page()),
        @"<doc><t>Bonjour</t><br/><t>Au revoir</t></doc>"
    );
}

#[test]
fn test_source_locale_writes_source() {
    let out = write_all(&page(), OutputOptions::new(en()));
    assert_eq!(out, "<doc><t>Hello</t><br/><t>Bye</t></doc>");
}

#[test]
fn test_missing_target_falls_back_to_source() {
    let mut skel = Skeleton::new();
    skel.append("<t>");
    skel.add_content_placeholder("tu1", None);
    skel.append("</t>");
    let tu = TextUnit::new("tu1", "Hello").with_skeleton(skel);
    let events = vec![start("text/xml"), Event::TextUnit(tu), end()];
    assert_eq!(write_fr(&events), "<t>Hello</t>");
}

#[test]
fn test_content_is_escaped_but_skeleton_is_not() {
    let events = vec![
        start("text/xml"),
        Event::TextUnit(wrapped("tu1", "<t>", "a < b", "a < b & c", "</t>")),
        end(),
    ];
    assert_eq!(write_fr(&events), "<t>a &lt; b &amp; c</t>");
}

#[test]
fn test_resource_property_is_written() {
    let mut skel = Skeleton::new();
    skel.append("<a href=\"");
    skel.add_value_placeholder("dp1", "href", Some(tkit_skeleton::LocaleId::empty()));
    skel.append("\">");
    let mut dp = DocumentPart::new("dp1", skel);
    dp.properties.set_resource("href", Some("a.html"));

    let events = vec![start("text/html"), Event::DocumentPart(dp), end()];
    assert_snapshot!(write_fr(&events), @r#"<a href="a.html">"#);
}

#[test]
fn test_missing_property_leaves_a_visible_token() {
    let mut skel = Skeleton::new();
    skel.append("<a title=\"");
    skel.add_value_placeholder("dp1", "title", Some(tkit_skeleton::LocaleId::empty()));
    skel.append("\">");
    let dp = DocumentPart::new("dp1", skel);

    let events = vec![start("text/html"), Event::DocumentPart(dp), end()];
    assert_eq!(write_fr(&events), "<a title=\"-ERR:PROP-NOT-FOUND-\">");
}

#[test]
fn test_layer_brackets_content_as_text() {
    let layer = BilingualLayer {
        start_code: "<c>".to_string(),
        end_code: "</c>".to_string(),
        ..BilingualLayer::default()
    };
    let events = vec![
        start("text/plain"),
        Event::TextUnit(wrapped("tu1", "<t>", "Hello", "Bonjour", "</t>")),
        end(),
    ];
    let out = write_all(&events, OutputOptions::new(fr()).with_layer(layer));
    assert_eq!(out, "<t></c>Bonjour<c></t>");
}

#[test]
fn test_new_document_resets_the_writer() {
    let mut writer = tkit_skeleton::SkeletonWriter::new(OutputOptions::new(fr()));
    writer.process(&start("text/plain")).unwrap();
    writer
        .process(&Event::TextUnit(referent(unit("tu1", "Home", "Accueil"))))
        .unwrap();
    assert_eq!(writer.referents().len(), 1);

    writer.process(&start("text/plain")).unwrap();
    assert!(writer.referents().is_empty());
}
