//! Bilingual documents, where the skeleton writes source and target side by side.

use crate::common::*;
use tkit_skeleton::{Event, OutputOptions, TextContainer, TextUnit};

fn link_unit() -> TextUnit {
    TextUnit::with_source("tu1", TextContainer::from_fragment(linked("see ", "tu2")))
        .with_target(fr(), TextContainer::from_fragment(linked("voir ", "tu2")))
        .with_skeleton(bilingual_skeleton("tu1"))
}

#[test]
fn test_source_and_target_are_both_written() {
    let events = vec![
        start_multilingual(false),
        Event::TextUnit(unit("tu1", "Hello", "Bonjour").with_skeleton(bilingual_skeleton("tu1"))),
        end(),
    ];
    assert_eq!(write_fr(&events), "<source>Hello</source><target>Bonjour</target>");
}

#[test]
fn test_code_reference_follows_the_side_it_is_on() {
    let events = vec![
        start_multilingual(false),
        Event::TextUnit(referent(unit("tu2", "Home", "Accueil"))),
        Event::TextUnit(link_unit()),
        end(),
    ];
    let out = write_all(&events, OutputOptions::new(fr()).with_referent_copies(2));
    assert_eq!(
        out,
        "<source>see <a title=\"Home\"/></source><target>voir <a title=\"Accueil\"/></target>"
    );
}

#[test]
fn test_empty_target_is_kept_when_allowed() {
    let empty = || unit("tu1", "Hello", "").with_skeleton(bilingual_skeleton("tu1"));

    let lazy = vec![start_multilingual(true), Event::TextUnit(empty()), end()];
    assert_eq!(write_fr(&lazy), "<source>Hello</source><target></target>");

    let strict = vec![start_multilingual(false), Event::TextUnit(empty()), end()];
    assert_eq!(write_fr(&strict), "<source>Hello</source><target>Hello</target>");
}

#[test]
fn test_missing_target_is_empty_when_allowed() {
    let tu = TextUnit::new("tu1", "Hello").with_skeleton(bilingual_skeleton("tu1"));
    let events = vec![start_multilingual(true), Event::TextUnit(tu), end()];
    assert_eq!(write_fr(&events), "<source>Hello</source><target></target>");
}

#[test]
fn test_empty_target_flag_is_ignored_for_monolingual_documents() {
    let mut sd = match start("text/xml") {
        Event::StartDocument(sd) => sd,
        _ => unreachable!(),
    };
    sd.allow_empty_output_target = true;
    let events = vec![
        Event::StartDocument(sd),
        Event::TextUnit(wrapped("tu1", "<t>", "Hello", "", "</t>")),
        end(),
    ];
    assert_eq!(write_fr(&events), "<t>Hello</t>");
}
