// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded events.
//!
//! [`export`] writes the events captured by a
//! [`RecorderSink`](super::recorder::RecorderSink) as a JSON array, one
//! object per event in recording order:
//!
//! ```json
//! [
//!   { "seq": 0, "event": "prepare", "args": { "sections": 1, "items": 20, ... } },
//!   { "seq": 1, "event": "lookup", "args": { "category": "Cell", ... } }
//! ]
//! ```

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Converts one recorded event into its JSON `args` object.
#[must_use]
pub fn event_args(event: &RecordedEvent) -> Value {
    match event {
        RecordedEvent::Prepare(e) => json!({
            "sections": e.section_count,
            "items": e.item_count,
            "content_width": e.content_size.width,
            "content_height": e.content_size.height,
        }),
        RecordedEvent::Invalidate(e) => json!({
            "scope": format!("{:?}", e.scope),
            "evicted_items": e.evicted_items,
            "evicted_supplementary": e.evicted_supplementary,
            "evicted_decoration": e.evicted_decoration,
            "content_width": e.content_size.width,
            "content_height": e.content_size.height,
        }),
        RecordedEvent::ValidationFailure { index_path, error } => json!({
            "section": index_path.section,
            "item": index_path.item,
            "error": error.to_string(),
        }),
        RecordedEvent::UpdateBatch(e) => json!({
            "items": e.item_count,
            "seeded_initial": e.seeded_initial,
            "seeded_final": e.seeded_final,
        }),
        RecordedEvent::Transition(e) => json!({
            "direction": format!("{:?}", e.direction),
            "seeded": e.seeded,
            "from_sibling": e.from_sibling,
        }),
        RecordedEvent::BatchEnd(e) => json!({
            "kind": format!("{:?}", e.kind),
            "purged": e.purged,
        }),
        RecordedEvent::Lookup(e) => json!({
            "category": format!("{:?}", e.category),
            "usage": format!("{:?}", e.usage),
            "section": e.index_path.section,
            "item": e.index_path.item,
            "outcome": format!("{:?}", e.outcome),
        }),
        RecordedEvent::RectQuery(e) => json!({
            "rect": [e.rect.x0, e.rect.y0, e.rect.x1, e.rect.y1],
            "outcome": format!("{:?}", e.outcome),
            "count": e.count,
        }),
    }
}

/// Writes `events` as a pretty-printed JSON array.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let array: Vec<Value> = events
        .iter()
        .enumerate()
        .map(|(seq, event)| {
            json!({
                "seq": seq,
                "event": event.name(),
                "args": event_args(event),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut *writer, &Value::Array(array))?;
    writeln!(writer)?;
    Ok(())
}
