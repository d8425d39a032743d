//! Streaming RSS/Atom entry extraction.
//!
//! Handles both RSS 2.0 (`<item>` with `<pubDate>`) and Atom (`<entry>`
//! with `<published>`/`<updated>`) feeds with one event loop.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::{FeedError, Headline};

/// Placeholder text for entries that carry no title element.
const NO_TITLE: &str = "No Title";

/// Parse a feed document into [`Headline`]s attributed to `source_name`.
///
/// Each entry's `captured_at` is the parsed publish time, falling back to
/// the updated time, falling back to `fetched_at` when both are absent or
/// unparsable. Entries without a title become [`NO_TITLE`] rather than
/// being dropped.
pub(crate) fn parse_feed(
    xml: &str,
    source_name: &str,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Headline>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut headlines = Vec::new();
    let mut in_entry = false;
    let mut current_tag = String::new();
    let mut title: Option<String> = None;
    let mut published = String::new();
    let mut updated = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("").to_string();
                if name == "item" || name == "entry" {
                    in_entry = true;
                    title = None;
                    published.clear();
                    updated.clear();
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if (name == "item" || name == "entry") && in_entry {
                    in_entry = false;
                    headlines.push(Headline {
                        source: source_name.to_string(),
                        text: title.take().unwrap_or_else(|| NO_TITLE.to_string()),
                        captured_at: entry_timestamp(&published, &updated, fetched_at),
                    });
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_entry {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    record_field(&current_tag, &text, &mut title, &mut published, &mut updated);
                }
            }
            Ok(Event::CData(e)) => {
                if in_entry {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    record_field(&current_tag, &text, &mut title, &mut published, &mut updated);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Xml(e)),
            _ => {}
        }
    }

    Ok(headlines)
}

fn record_field(
    tag: &str,
    text: &str,
    title: &mut Option<String>,
    published: &mut String,
    updated: &mut String,
) {
    match tag {
        "title" => *title = Some(text.to_string()),
        "pubDate" | "published" => *published = text.to_string(),
        "updated" => *updated = text.to_string(),
        _ => {}
    }
}

/// Resolve an entry's capture time: published, then updated, then the
/// fetch wall-clock time.
fn entry_timestamp(published: &str, updated: &str, fetched_at: DateTime<Utc>) -> DateTime<Utc> {
    parse_date(published)
        .or_else(|| parse_date(updated))
        .unwrap_or(fetched_at)
}

/// RSS feeds carry RFC 2822 dates; Atom feeds carry RFC 3339. Try both.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
