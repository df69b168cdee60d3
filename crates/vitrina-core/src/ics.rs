// ── Calendar invite export ──
//
// Builds a single-event iCalendar document (RFC 5545) for a stream.
// Used when the API's own invite endpoint is unavailable.

use chrono::{DateTime, TimeDelta, Utc};

use crate::model::Stream;

pub const INVITE_DURATION_MINUTES: i64 = 60;

/// Content lines are folded at 75 octets.
const FOLD_AT: usize = 75;

fn stamp(t: DateTime<Utc>) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// TEXT value escaping: backslash, semicolon, comma, newline.
fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// Fold one content line, never splitting a UTF-8 sequence.
fn fold(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + line.len() / FOLD_AT * 3);
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > FOLD_AT {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out
}

pub fn invite_filename(stream: &Stream) -> String {
    format!("vivo-{}.ics", stream.id)
}

/// Render the invite. `now` becomes `DTSTAMP`.
pub fn calendar_invite(stream: &Stream, now: DateTime<Utc>) -> String {
    let start = stream.scheduled_at;
    let end = start + TimeDelta::minutes(INVITE_DURATION_MINUTES);
    let summary = format!("{} – {}", stream.shop.name, stream.title);
    let description = match &stream.platform {
        Some(platform) => format!("Vivo de {} en {platform}", stream.shop.name),
        None => format!("Vivo de {}", stream.shop.name),
    };

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_owned(),
        "VERSION:2.0".to_owned(),
        "PRODID:-//Vitrina//Vivos//ES".to_owned(),
        "CALSCALE:GREGORIAN".to_owned(),
        "METHOD:PUBLISH".to_owned(),
        "BEGIN:VEVENT".to_owned(),
        format!("UID:stream-{}@vitrina", stream.id),
        format!("DTSTAMP:{}", stamp(now)),
        format!("DTSTART:{}", stamp(start)),
        format!("DTEND:{}", stamp(end)),
        format!("SUMMARY:{}", escape_text(&summary)),
        format!("DESCRIPTION:{}", escape_text(&description)),
    ];
    if let Some(url) = &stream.url {
        lines.push(format!("URL:{url}"));
    }
    lines.push("END:VEVENT".to_owned());
    lines.push("END:VCALENDAR".to_owned());

    let mut doc = String::new();
    for line in &lines {
        doc.push_str(&fold(line));
        doc.push_str("\r\n");
    }
    doc
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Shop, StreamStatus};
    use std::sync::Arc;

    fn stream() -> Stream {
        let mut shop = Shop::fallback();
        shop.name = "Moda Urbana".into();
        Stream {
            id: "st-1".into(),
            shop: Arc::new(shop),
            title: "Liquidación, todo; 50%".into(),
            platform: Some("Instagram".into()),
            url: Some("https://instagram.com/moda".into()),
            status: StreamStatus::Upcoming,
            scheduled_at: "2026-10-20T21:00:00Z".parse().unwrap(),
            is_visible: true,
            views: 0,
            likes: 0,
            report_count: 0,
            extension_count: 0,
        }
    }

    #[test]
    fn renders_event_fields() {
        let now = "2026-10-19T10:00:00Z".parse().unwrap();
        let doc = calendar_invite(&stream(), now);

        assert!(doc.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(doc.ends_with("END:VCALENDAR\r\n"));
        assert!(doc.contains("UID:stream-st-1@vitrina\r\n"));
        assert!(doc.contains("DTSTAMP:20261019T100000Z\r\n"));
        assert!(doc.contains("DTSTART:20261020T210000Z\r\n"));
        assert!(doc.contains("DTEND:20261020T220000Z\r\n"));
        assert!(doc.contains("SUMMARY:Moda Urbana – Liquidación\\, todo\\; 50%\r\n"));
        assert!(doc.contains("URL:https://instagram.com/moda\r\n"));
    }

    #[test]
    fn no_bare_newlines() {
        let doc = calendar_invite(&stream(), Utc::now());
        assert_eq!(doc.matches('\n').count(), doc.matches("\r\n").count());
    }

    #[test]
    fn long_lines_are_folded_on_char_boundaries() {
        let mut s = stream();
        s.title = "ñ".repeat(120);
        let doc = calendar_invite(&s, Utc::now());
        for line in doc.split("\r\n") {
            assert!(line.len() <= FOLD_AT, "{line}");
        }
        assert!(doc.contains("\r\n ñ"));
    }

    #[test]
    fn escapes_text() {
        assert_eq!(escape_text("a\\b;c,d\ne"), "a\\\\b\\;c\\,d\\ne");
    }
}
