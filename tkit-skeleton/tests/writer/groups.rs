//! Groups written in place or buffered as referents.

use crate::common::*;
use insta::assert_snapshot;
use tkit_skeleton::{Ending, Event, Skeleton, StartGroup};

fn open(id: &str, markup: &str, is_referent: bool) -> Event {
    let mut sg = StartGroup::new(id, Some(Skeleton::from_text(markup)));
    sg.set_is_referent(is_referent);
    Event::StartGroup(sg)
}

fn close(id: &str, markup: &str) -> Event {
    Event::EndGroup(Ending::new(id, Some(Skeleton::from_text(markup))))
}

#[test]
fn test_plain_group_is_written_in_place() {
    let events = vec![
        start("text/html"),
        open("g1", "<ul>", false),
        Event::TextUnit(wrapped("tu1", "<li>", "One", "Un", "</li>")),
        close("g1", "</ul>"),
        end(),
    ];
    assert_eq!(write_fr(&events), "<ul><li>Un</li></ul>");
}

#[test]
fn test_referent_group_is_replayed_at_reference() {
    let events = vec![
        start("text/html"),
        open("g1", "<ul>", true),
        Event::TextUnit(wrapped("tu1", "<li>", "One", "Un", "</li>")),
        Event::TextUnit(wrapped("tu2", "<li>", "Two", "Deux", "</li>")),
        close("g1", "</ul>"),
        Event::DocumentPart(pointer("dp1", "<div>", "g1", "</div>")),
        end(),
    ];
    assert_snapshot!(
        write_fr(&events),
        @"<div><ul><li>Un</li><li>Deux</li></ul></div>"
    );
}

#[test]
fn test_nested_groups_keep_their_order() {
    let events = vec![
        start("text/html"),
        open("g1", "<ul>", true),
        open("g2", "<ol>", false),
        Event::DocumentPart(part("dp0", "<li>x</li>")),
        close("g2", "</ol>"),
        Event::DocumentPart(part("dp2", "<hr/>")),
        close("g1", "</ul>"),
        Event::DocumentPart(pointer("dp1", "<div>", "g1", "</div>")),
        end(),
    ];
    assert_eq!(
        write_fr(&events),
        "<div><ul><ol><li>x</li></ol><hr/></ul></div>"
    );
}

#[test]
fn test_buffered_group_writes_nothing_until_referenced() {
    let mut writer = tkit_skeleton::SkeletonWriter::new(tkit_skeleton::OutputOptions::new(fr()));
    writer.process(&start("text/html")).unwrap();
    assert_eq!(writer.process(&open("g1", "<ul>", true)).unwrap(), "");
    assert_eq!(writer.storage_depth(), 1);
    assert_eq!(writer.process(&close("g1", "</ul>")).unwrap(), "");
    assert_eq!(writer.storage_depth(), 0);
    assert!(writer.referents().contains("g1"));
}
