//! Sub-filtered regions written by a nested writer.

use crate::common::*;
use tkit_skeleton::{Ending, Event, Skeleton, StartGroup};

fn region(id: &str, is_referent: bool) -> Event {
    let mut ssf = StartGroup::new(id, None);
    ssf.mime_type = Some("text/html".to_string());
    ssf.set_is_referent(is_referent);
    Event::StartSubfilter(ssf)
}

#[test]
fn test_embedded_markup_is_escaped_for_the_host() {
    let events = vec![
        start("text/xml"),
        Event::DocumentPart(part("dp1", "<data>")),
        region("sf1", false),
        Event::TextUnit(wrapped("tu1", "<b>", "Hello", "Bonjour", "</b>")),
        Event::EndSubfilter(Ending::new("sf1", None)),
        Event::DocumentPart(part("dp2", "</data>")),
        end(),
    ];
    assert_eq!(write_fr(&events), "<data>&lt;b>Bonjour&lt;/b></data>");
}

#[test]
fn test_referent_region_is_written_at_reference() {
    let events = vec![
        start("text/xml"),
        region("sf1", true),
        Event::TextUnit(wrapped("tu1", "<b>", "Hello", "Bonjour", "</b>")),
        Event::EndSubfilter(Ending::new("sf1", None)),
        Event::DocumentPart(pointer("dp1", "<p>", "sf1", "</p>")),
        end(),
    ];
    assert_eq!(write_fr(&events), "<p>&lt;b>Bonjour&lt;/b></p>");
}

#[test]
fn test_nested_writer_is_released_at_region_end() {
    let mut writer = tkit_skeleton::SkeletonWriter::new(tkit_skeleton::OutputOptions::new(fr()));
    writer.process(&start("text/xml")).unwrap();
    writer.process(&region("sf1", false)).unwrap();
    assert!(writer.has_sub_writer());
    writer
        .process(&Event::EndSubfilter(Ending::new("sf1", None)))
        .unwrap();
    assert!(!writer.has_sub_writer());
}

#[test]
fn test_region_inside_referent_group_is_buffered_with_it() {
    let mut sg = StartGroup::new("g1", Some(Skeleton::from_text("<div>")));
    sg.set_is_referent(true);
    let events = vec![
        start("text/xml"),
        Event::StartGroup(sg),
        region("sf1", false),
        Event::TextUnit(wrapped("tu1", "<b>", "Hello", "Bonjour", "</b>")),
        Event::EndSubfilter(Ending::new("sf1", None)),
        Event::EndGroup(Ending::new("g1", Some(Skeleton::from_text("</div>")))),
        Event::DocumentPart(pointer("dp1", "<p>", "g1", "</p>")),
        end(),
    ];
    assert_eq!(write_fr(&events), "<p><div>&lt;b>Bonjour&lt;/b></div></p>");
}
