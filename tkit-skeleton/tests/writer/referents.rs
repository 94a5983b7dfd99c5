//! Referents cached out of order and pulled in by reference markers.

use crate::common::*;
use insta::assert_snapshot;
use tkit_skeleton::{Event, OutputOptions};

#[test]
fn test_referent_is_written_where_referenced() {
    let events = vec![
        start("text/html"),
        Event::TextUnit(referent(unit("tu1", "Home", "Accueil"))),
        Event::DocumentPart(pointer("dp1", "<a title=\"", "tu1", "\">")),
        end(),
    ];
    assert_snapshot!(write_fr(&events), @r#"<a title="Accueil">"#);
}

#[test]
fn test_forward_reference_is_not_found() {
    let events = vec![
        start("text/html"),
        Event::DocumentPart(pointer("dp1", "<a>", "tu1", "</a>")),
        Event::TextUnit(referent(unit("tu1", "Home", "Accueil"))),
        end(),
    ];
    assert_eq!(write_fr(&events), "<a>-ERR:REF-NOT-FOUND-</a>");
}

#[test]
fn test_referent_is_used_once_by_default() {
    let events = vec![
        start("text/plain"),
        Event::TextUnit(referent(unit("tu1", "Home", "Accueil"))),
        Event::DocumentPart(pointer("dp1", "[", "tu1", "]")),
        Event::DocumentPart(pointer("dp2", "[", "tu1", "]")),
        end(),
    ];
    assert_eq!(write_fr(&events), "[Accueil][-ERR:REF-NOT-FOUND-]");
}

#[test]
fn test_referent_copies_allow_repeated_use() {
    let events = vec![
        start("text/plain"),
        Event::TextUnit(referent(unit("tu1", "Home", "Accueil"))),
        Event::DocumentPart(pointer("dp1", "[", "tu1", "]")),
        Event::DocumentPart(pointer("dp2", "[", "tu1", "]")),
        end(),
    ];
    let out = write_all(&events, OutputOptions::new(fr()).with_referent_copies(2));
    assert_eq!(out, "[Accueil][Accueil]");
}

#[test]
fn test_referents_resolve_through_other_referents() {
    let mut inner = pointer("dp0", "<b>", "tu1", "</b>");
    inner.set_is_referent(true);
    let events = vec![
        start("text/html"),
        Event::TextUnit(referent(unit("tu1", "Home", "Accueil"))),
        Event::DocumentPart(inner),
        Event::DocumentPart(pointer("dp1", "<i>", "dp0", "</i>")),
        end(),
    ];
    assert_eq!(write_fr(&events), "<i><b>Accueil</b></i>");
}

#[test]
fn test_referent_keeps_its_own_skeleton() {
    let events = vec![
        start("text/html"),
        Event::TextUnit(referent(wrapped("tu1", "<em>", "Home", "Accueil", "</em>"))),
        Event::DocumentPart(pointer("dp1", "<p>", "tu1", "</p>")),
        end(),
    ];
    assert_eq!(write_fr(&events), "<p><em>Accueil</em></p>");
}

#[test]
fn test_end_document_drops_unused_referents() {
    let mut writer = tkit_skeleton::SkeletonWriter::new(OutputOptions::new(fr()));
    writer.process(&start("text/plain")).unwrap();
    writer
        .process(&Event::TextUnit(referent(unit("tu1", "Home", "Accueil"))))
        .unwrap();
    writer.process(&end()).unwrap();
    assert!(writer.referents().is_empty());
}
