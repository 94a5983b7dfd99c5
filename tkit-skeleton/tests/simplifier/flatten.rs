use crate::common::*;
use insta::assert_snapshot;
use tkit_skeleton::simplifier::is_complex;
use tkit_skeleton::{simplify_events, Ending, Event, Skeleton, SkeletonSimplifier, StartGroup};

fn kinds(events: &[Event]) -> String {
    events
        .iter()
        .map(Event::kind_name)
        .collect::<Vec<_>>()
        .join(",")
}

#[test]
fn test_complex_unit_is_split_around_its_content() {
    let events = vec![
        start("text/xml"),
        Event::TextUnit(wrapped("tu1", "<t>", "Hello", "Bonjour", "</t>")),
        end(),
    ];
    let simplified = simplify_events(events.clone(), Some(fr())).unwrap();
    assert_snapshot!(
        kinds(&simplified),
        @"start_document,document_part,text_unit,document_part,end_document"
    );
    assert_eq!(write_fr(&simplified), write_fr(&events));
}

#[test]
fn test_referenced_unit_is_inlined_into_the_part() {
    let events = vec![
        start("text/html"),
        Event::TextUnit(referent(unit("tu1", "Home", "Accueil"))),
        Event::DocumentPart(pointer("dp1", "<a title=\"", "tu1", "\">")),
        end(),
    ];
    let simplified = simplify_events(events, Some(fr())).unwrap();
    assert_eq!(
        kinds(&simplified),
        "start_document,document_part,end_document"
    );
    assert_eq!(write_fr(&simplified), "<a title=\"Accueil\">");
}

#[test]
fn test_referent_group_is_replayed_at_its_reference() {
    let mut sg = StartGroup::new("g1", Some(Skeleton::from_text("<ul>")));
    sg.set_is_referent(true);
    let events = vec![
        start("text/html"),
        Event::StartGroup(sg),
        Event::TextUnit(wrapped("tu1", "<li>", "One", "Un", "</li>")),
        Event::EndGroup(Ending::new("g1", Some(Skeleton::from_text("</ul>")))),
        Event::DocumentPart(pointer("dp1", "<div>", "g1", "</div>")),
        end(),
    ];
    let simplified = simplify_events(events.clone(), Some(fr())).unwrap();
    assert_eq!(write_fr(&simplified), write_fr(&events));
    assert!(simplified
        .iter()
        .all(|event| !event.is_referent() && !is_complex(event)));
}

#[test]
fn test_simplified_stream_has_no_references_left() {
    let events = vec![
        start("text/html"),
        Event::TextUnit(referent(wrapped("tu1", "<em>", "Home", "Accueil", "</em>"))),
        Event::DocumentPart(pointer("dp1", "<p>", "tu1", "</p>")),
        Event::TextUnit(wrapped("tu2", "<t>", "Bye", "Au revoir", "</t>")),
        end(),
    ];
    let simplified = simplify_events(events, Some(fr())).unwrap();
    for event in &simplified {
        assert!(!is_complex(event), "{} is still complex", event.kind_name());
        if let Event::TextUnit(tu) = event {
            assert!(tu.skeleton.is_none());
            assert!(!tu.is_referent());
        }
    }
    assert_eq!(write_fr(&simplified), "<p><em>Accueil</em></p><t>Au revoir</t>");
}

#[test]
fn test_one_event_at_a_time() {
    let mut simplifier = SkeletonSimplifier::new(Some(fr()), None);
    assert!(matches!(simplifier.convert(start("text/plain")).unwrap(), Event::StartDocument(_)));
    let swallowed = simplifier
        .convert(Event::TextUnit(referent(unit("tu1", "Home", "Accueil"))))
        .unwrap();
    assert_eq!(swallowed, Event::Noop);
    let converted = simplifier
        .convert(Event::DocumentPart(pointer("dp1", "[", "tu1", "]")))
        .unwrap();
    let Event::DocumentPart(dp) = converted else {
        panic!("expected one document part, got {}", converted.kind_name());
    };
    assert_eq!(dp.id, "dp1");
    assert_eq!(dp.skeleton.map(|s| s.to_string()), Some("[Accueil]".to_string()));
}
