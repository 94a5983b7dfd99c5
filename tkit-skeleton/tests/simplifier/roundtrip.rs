//! Property tests: simplifying never changes the written document.

use crate::common::*;
use proptest::prelude::*;
use tkit_skeleton::{simplify_events, Event, OutputOptions};

/// One paragraph of a generated document.
#[derive(Debug, Clone)]
struct Paragraph {
    source: String,
    target: String,
    /// Written through a referenced unit instead of in place.
    by_reference: bool,
}

fn paragraph_strategy() -> impl Strategy<Value = Paragraph> {
    ("[a-z]{1,8}", "[a-z]{1,8}", any::<bool>()).prop_map(|(source, target, by_reference)| {
        Paragraph {
            source,
            target,
            by_reference,
        }
    })
}

fn document(paragraphs: &[Paragraph]) -> Vec<Event> {
    let mut events = vec![start("text/plain")];
    for (i, p) in paragraphs.iter().enumerate() {
        let id = format!("tu{i}");
        let tu = wrapped(&id, "<p>", &p.source, &p.target, "</p>");
        if p.by_reference {
            events.push(Event::TextUnit(referent(tu)));
            events.push(Event::DocumentPart(pointer(
                &format!("dp{i}"),
                "<li>",
                &id,
                "</li>",
            )));
        } else {
            events.push(Event::TextUnit(tu));
        }
    }
    events.push(end());
    events
}

proptest! {
    #[test]
    fn simplified_stream_writes_the_same_document(
        paragraphs in prop::collection::vec(paragraph_strategy(), 0..8)
    ) {
        let events = document(&paragraphs);
        let simplified = simplify_events(events.clone(), Some(fr())).unwrap();
        prop_assert_eq!(write_fr(&simplified), write_fr(&events));
    }

    #[test]
    fn every_target_appears_once(
        paragraphs in prop::collection::vec(paragraph_strategy(), 1..8)
    ) {
        let events = document(&paragraphs);
        let simplified = simplify_events(events, Some(fr())).unwrap();
        let units = simplified
            .iter()
            .filter(|event| matches!(event, Event::TextUnit(_)))
            .count();
        prop_assert_eq!(units, paragraphs.len());
    }

    #[test]
    fn exhausted_references_leave_tokens(copies in 1usize..4, uses in 1usize..6) {
        let mut events = vec![
            start("text/plain"),
            Event::TextUnit(referent(unit("tu1", "Home", "Accueil"))),
        ];
        for i in 0..uses {
            events.push(Event::DocumentPart(pointer(&format!("dp{i}"), "", "tu1", "|")));
        }
        events.push(end());

        let out = write_all(&events, OutputOptions::new(fr()).with_referent_copies(copies));
        let resolved = out.matches("Accueil").count();
        let missing = out.matches("-ERR:REF-NOT-FOUND-").count();
        prop_assert_eq!(resolved, uses.min(copies));
        prop_assert_eq!(missing, uses.saturating_sub(copies));
    }
}
