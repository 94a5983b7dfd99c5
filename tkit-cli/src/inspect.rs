//! Inspect views
//!
//! Human-readable dumps of an event stream, used to debug what a filter produced before it is
//! merged:
//!
//! - `events`: one line per event with its id and flags (default)
//! - `parts`: every skeleton part with the class the writer will give it
//! - `json`: the stream re-serialized, normalized and pretty-printed

use std::fmt::Write;
use tkit_skeleton::simplifier::is_complex;
use tkit_skeleton::skeleton::classify::classify;
use tkit_skeleton::Event;

pub const AVAILABLE_VIEWS: &[&str] = &["events", "parts", "json"];

pub const DEFAULT_VIEW: &str = "events";

pub fn render_view(events: &[Event], view: &str) -> Result<String, String> {
    match view {
        "events" => {
            let mut out = String::new();
            for event in events {
                write_event_line(&mut out, event, 0);
            }
            Ok(out)
        }
        "parts" => Ok(render_parts(events)),
        "json" => serde_json::to_string_pretty(events)
            .map(|json| json + "\n")
            .map_err(|e| e.to_string()),
        other => Err(format!(
            "Unknown view '{other}'. Available: {}",
            AVAILABLE_VIEWS.join(", ")
        )),
    }
}

fn write_event_line(out: &mut String, event: &Event, depth: usize) {
    let indent = "  ".repeat(depth);
    let id = event.id().unwrap_or("-");
    let mut flags = Vec::new();
    if event.is_referent() {
        flags.push("referent");
    }
    if is_complex(event) {
        flags.push("complex");
    }
    let parts = event.skeleton().map_or(0, |skeleton| skeleton.len());
    let _ = write!(out, "{indent}{} {id} parts={parts}", event.kind_name());
    if !flags.is_empty() {
        let _ = write!(out, " [{}]", flags.join(","));
    }
    out.push('\n');

    if let Event::Multi { events } = event {
        for child in events {
            write_event_line(out, child, depth + 1);
        }
    }
}

fn render_parts(events: &[Event]) -> String {
    let mut out = String::new();
    for event in events {
        if let Event::Multi { events } = event {
            out.push_str(&render_parts(events));
            continue;
        }
        let (Some(id), Some(skeleton)) = (event.id(), event.skeleton()) else {
            continue;
        };
        let _ = writeln!(out, "{} {id}", event.kind_name());
        for part in skeleton.parts() {
            let _ = write!(out, "  {:?} {:?}", classify(part, id), part.data);
            if let Some(owner) = &part.owner {
                let _ = write!(out, " owner={owner}");
            }
            if let Some(locale) = &part.locale {
                let _ = write!(out, " locale={locale:?}");
            }
            out.push('\n');
        }
    }
    out
}
