//! Torznab RSS feed parsing.
//!
//! Indexer responses are RSS 2.0 with Torznab extensions. We walk the
//! document with quick-xml events rather than a serde mapping because
//! feeds in the wild disagree on optional fields and attribute
//! placement (size may live in `<size>` or in a `<torznab:attr>`).

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

use super::{Candidate, SearchError};

#[derive(Debug, Default)]
struct ItemBuilder {
    title: Option<String>,
    guid: Option<String>,
    indexer: Option<String>,
    size_bytes: Option<u64>,
    published_at: Option<DateTime<Utc>>,
    categories: Vec<u32>,
}

impl ItemBuilder {
    fn set_attr(&mut self, name: &str, value: &str) {
        match name {
            "size" => {
                if self.size_bytes.is_none() {
                    self.size_bytes = value.parse().ok();
                }
            }
            "category" => {
                if let Ok(cat) = value.parse() {
                    self.categories.push(cat);
                }
            }
            _ => {}
        }
    }

    fn build(self) -> Option<Candidate> {
        Some(Candidate {
            title: self.title?,
            guid: self.guid?,
            indexer: self.indexer.unwrap_or_default(),
            size_bytes: self.size_bytes.unwrap_or(0),
            published_at: self.published_at,
            categories: self.categories,
        })
    }
}

/// Parse a Torznab feed into candidates. An empty or item-less document
/// yields an empty list, not an error.
pub fn parse_torznab_feed(xml: &str) -> Result<Vec<Candidate>, SearchError> {
    if xml.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut candidates = Vec::new();
    let mut current: Option<ItemBuilder> = None;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                current_tag = tag.clone();

                if tag == "item" {
                    current = Some(ItemBuilder::default());
                } else if tag == "torznab:attr" {
                    if let Some(ref mut item) = current {
                        apply_torznab_attr(item, e);
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag == "torznab:attr" {
                    if let Some(ref mut item) = current {
                        apply_torznab_attr(item, e);
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(ref mut item) = current {
                    let text = e.unescape().unwrap_or_default().to_string();
                    if text.is_empty() {
                        continue;
                    }
                    match current_tag.as_str() {
                        "title" => item.title = Some(text),
                        "guid" => {
                            if item.guid.is_none() {
                                item.guid = Some(text);
                            }
                        }
                        "jackettindexer" => item.indexer = Some(text),
                        "size" => item.size_bytes = text.parse().ok(),
                        "category" => {
                            if let Ok(cat) = text.parse() {
                                item.categories.push(cat);
                            }
                        }
                        "pubDate" => item.published_at = parse_feed_date(&text),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag == "item" {
                    if let Some(candidate) = current.take().and_then(ItemBuilder::build) {
                        candidates.push(candidate);
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SearchError::ParseError(e.to_string())),
            _ => {}
        }
    }

    Ok(candidates)
}

fn apply_torznab_attr(item: &mut ItemBuilder, e: &quick_xml::events::BytesStart<'_>) {
    let mut attr_name = String::new();
    let mut attr_value = String::new();

    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let val = String::from_utf8_lossy(&attr.value).to_string();
        if key == "name" {
            attr_name = val;
        } else if key == "value" {
            attr_value = val;
        }
    }

    item.set_attr(&attr_name, &attr_value);
}

/// Feeds report pubDate as RFC 2822; some aggregators emit RFC 3339.
fn parse_feed_date(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(date_str)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date_str).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
