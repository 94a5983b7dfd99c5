//! Bilingual documents and segment placeholders through the simplifier.

use crate::common::*;
use insta::assert_snapshot;
use tkit_skeleton::{simplify_events, Event, Skeleton, SkeletonSimplifier, TextContainer, TextUnit};

fn kinds(events: &[Event]) -> String {
    events
        .iter()
        .map(Event::kind_name)
        .collect::<Vec<_>>()
        .join(",")
}

fn unit_ids(events: &[Event]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::TextUnit(tu) => Some(tu.id.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_source_side_stays_in_the_skeleton() {
    let events = vec![
        start_multilingual(false),
        Event::TextUnit(unit("tu1", "Hello", "Bonjour").with_skeleton(bilingual_skeleton("tu1"))),
        end(),
    ];
    let simplified = simplify_events(events.clone(), Some(fr())).unwrap();
    assert_snapshot!(
        kinds(&simplified),
        @"start_document,document_part,text_unit,document_part,end_document"
    );
    assert_eq!(
        simplified[1].skeleton().map(|s| s.to_string()).as_deref(),
        Some("<source>Hello</source><target>")
    );
    assert_eq!(write_fr(&simplified), write_fr(&events));
}

#[test]
fn test_code_references_resolve_per_side() {
    let tu = TextUnit::with_source("tu1", TextContainer::from_fragment(linked("see ", "tu2")))
        .with_target(fr(), TextContainer::from_fragment(linked("voir ", "tu2")))
        .with_skeleton(bilingual_skeleton("tu1"));
    let events = vec![
        start_multilingual(false),
        Event::TextUnit(referent(unit("tu2", "Home", "Accueil"))),
        Event::TextUnit(tu),
        end(),
    ];
    let simplified = SkeletonSimplifier::new(Some(fr()), None)
        .with_referent_copies(2)
        .simplify_all(events)
        .unwrap();
    assert_eq!(
        write_fr(&simplified),
        "<source>see <a title=\"Home\"/></source><target>voir <a title=\"Accueil\"/></target>"
    );
}

#[test]
fn test_each_target_segment_becomes_a_unit() {
    let mut skel = Skeleton::new();
    skel.append("<p>");
    skel.add_segment_placeholder("tu1", "s1", Some(fr()));
    skel.append(" ");
    skel.add_segment_placeholder("tu1", "s2", Some(fr()));
    skel.append("</p>");
    let tu = TextUnit::with_source("tu1", segments(&[("s1", "A"), ("s2", "B")]))
        .with_target(fr(), segments(&[("s1", "a"), ("s2", "b")]))
        .with_skeleton(skel);
    let events = vec![start("text/xml"), Event::TextUnit(tu), end()];

    let simplified = simplify_events(events.clone(), Some(fr())).unwrap();
    assert_eq!(unit_ids(&simplified), ["tu1", "tu1_1"]);
    assert_eq!(write_fr(&simplified), "<p>a b</p>");
    assert_eq!(write_fr(&simplified), write_fr(&events));
}

#[test]
fn test_source_segment_is_written_into_the_skeleton() {
    let mut skel = Skeleton::new();
    skel.append("[");
    skel.add_segment_placeholder("tu1", "s2", Some(fr()));
    skel.append("|");
    skel.add_segment_placeholder("tu1", "s1", None);
    skel.append("]");
    let tu = TextUnit::with_source("tu1", segments(&[("s1", "A"), ("s2", "B")]))
        .with_target(fr(), segments(&[("s1", "a"), ("s2", "b")]))
        .with_skeleton(skel);
    let events = vec![start("text/xml"), Event::TextUnit(tu), end()];

    let simplified = simplify_events(events.clone(), Some(fr())).unwrap();
    assert_eq!(unit_ids(&simplified), ["tu1"]);
    assert_eq!(write_fr(&simplified), "[b|A]");
}
