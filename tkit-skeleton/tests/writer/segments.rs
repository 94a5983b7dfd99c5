//! Segmented units and segment placeholders.

use crate::common::*;
use tkit_skeleton::{Event, Skeleton, TextUnit};

fn segmented_unit(target: &[(&str, &str)], skeleton: Skeleton) -> TextUnit {
    TextUnit::with_source("tu1", segments(&[("s1", "A"), ("s2", "B")]))
        .with_target(fr(), segments(target))
        .with_skeleton(skeleton)
}

fn write_unit(tu: TextUnit) -> String {
    write_fr(&[start("text/xml"), Event::TextUnit(tu), end()])
}

#[test]
fn test_segment_placeholder_without_locale_reads_the_source() {
    let mut skel = Skeleton::new();
    skel.append("[");
    skel.add_segment_placeholder("tu1", "s2", Some(fr()));
    skel.append("|");
    skel.add_segment_placeholder("tu1", "s1", None);
    skel.append("]");
    let tu = segmented_unit(&[("s1", "a"), ("s2", "b")], skel);
    assert_eq!(write_unit(tu), "[b|A]");
}

#[test]
fn test_segment_placeholder_aligns_by_position() {
    let mut skel = Skeleton::new();
    skel.append("[");
    skel.add_segment_placeholder("tu1", "s2", Some(fr()));
    skel.append("]");
    let tu = segmented_unit(&[("t1", "a"), ("t2", "b")], skel);
    assert_eq!(write_unit(tu), "[b]");
}

#[test]
fn test_unknown_segment_yields_token() {
    let mut skel = Skeleton::new();
    skel.add_segment_placeholder("tu1", "s7", Some(fr()));
    let tu = segmented_unit(&[("s1", "a"), ("s2", "b")], skel);
    assert_eq!(write_unit(tu), "-ERR:INVALID-SEGMENT-REF-");
}

#[test]
fn test_segments_are_joined_without_a_layer() {
    let mut skel = Skeleton::new();
    skel.append("<p>");
    skel.add_content_placeholder("tu1", None);
    skel.append("</p>");
    let tu = segmented_unit(&[("s1", "a"), ("s2", "b")], skel);
    assert_eq!(write_unit(tu), "<p>ab</p>");
}
