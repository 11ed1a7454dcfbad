//! RSS item extraction without a regex engine.
//!
//! The feed is walked with a small scanner: locate each `<item>` block, read the child
//! elements by name, then decode CDATA sections and XML entities into plain text. The
//! scanner accepts anything RSS-shaped and only fails on structurally broken input such
//! as an unterminated item or CDATA section.

use std::str::FromStr;

use crate::errors::FolioError;

use super::{NewsItem, Severity, MAX_NEWS_ITEMS};

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";
const SEVERITY_MARKER: &str = "Severity:</strong>";

/// Parses the first [`MAX_NEWS_ITEMS`] items of an RSS document, in source order.
pub fn parse_feed(xml: &str) -> Result<Vec<NewsItem>, FolioError> {
    let mut items = Vec::new();
    let mut cursor = 0;

    while items.len() < MAX_NEWS_ITEMS {
        let Some((body_start, body_end, next)) = next_element(xml, "item", cursor)? else {
            break;
        };
        items.push(parse_item(&xml[body_start..body_end])?);
        cursor = next;
    }

    log::debug!("Parsed {} feed items", items.len());
    Ok(items)
}

fn parse_item(block: &str) -> Result<NewsItem, FolioError> {
    let title = child_text(block, "title")?.unwrap_or_default();
    let link = child_text(block, "link")?.unwrap_or_default();
    let published = child_text(block, "pubDate")?.unwrap_or_default();
    let raw_description = child_text(block, "description")?.unwrap_or_default();

    Ok(NewsItem {
        title: title.trim().to_string(),
        link: link.trim().to_string(),
        published: published.trim().to_string(),
        severity: extract_severity(&raw_description),
        description: summarize(&raw_description),
    })
}

/// Decoded text content of the first `<tag>` child, or `None` when absent.
fn child_text(block: &str, tag: &str) -> Result<Option<String>, FolioError> {
    match next_element(block, tag, 0)? {
        Some((start, end, _)) => Ok(Some(decode_text(&block[start..end])?)),
        None => Ok(None),
    }
}

/// Finds the next `<tag ...>...</tag>` at or after `from`.
///
/// Returns the byte range of the element body and the offset just past the closing tag.
/// A self-closing `<tag/>` has an empty body. Closing tags inside CDATA are ignored.
fn next_element(
    hay: &str,
    tag: &str,
    from: usize,
) -> Result<Option<(usize, usize, usize)>, FolioError> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let mut search = from;

    loop {
        let Some(found) = hay[search..].find(&open) else {
            return Ok(None);
        };
        let tag_start = search + found;
        let after_name = tag_start + open.len();

        // `<item` must not match `<items>` or `<itemCount>`.
        match hay[after_name..].chars().next() {
            Some(c) if c == '>' || c == '/' || c.is_whitespace() => {}
            Some(_) => {
                search = after_name;
                continue;
            }
            None => return Ok(None),
        }

        let Some(gt) = hay[after_name..].find('>') else {
            return Err(FolioError::FeedParse(format!("unterminated <{}> tag", tag)));
        };
        let open_end = after_name + gt;
        if hay[..open_end].ends_with('/') {
            return Ok(Some((open_end + 1, open_end + 1, open_end + 1)));
        }

        let body_start = open_end + 1;
        let body_end = find_outside_cdata(hay, &close, body_start)?
            .ok_or_else(|| FolioError::FeedParse(format!("missing </{}>", tag)))?;
        return Ok(Some((body_start, body_end, body_end + close.len())));
    }
}

fn find_outside_cdata(hay: &str, needle: &str, from: usize) -> Result<Option<usize>, FolioError> {
    let mut pos = from;
    loop {
        let next_needle = hay[pos..].find(needle).map(|i| pos + i);
        let next_cdata = hay[pos..].find(CDATA_OPEN).map(|i| pos + i);

        match (next_needle, next_cdata) {
            (Some(n), Some(c)) if c < n => {
                let content = c + CDATA_OPEN.len();
                let end = hay[content..]
                    .find(CDATA_CLOSE)
                    .ok_or_else(|| FolioError::FeedParse("unterminated CDATA section".to_string()))?;
                pos = content + end + CDATA_CLOSE.len();
            }
            (found, _) => return Ok(found),
        }
    }
}

/// Element text: CDATA sections verbatim, everything else entity-decoded.
fn decode_text(raw: &str) -> Result<String, FolioError> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find(CDATA_OPEN) {
        out.push_str(&decode_entities(&rest[..start]));
        let content = &rest[start + CDATA_OPEN.len()..];
        let end = content
            .find(CDATA_CLOSE)
            .ok_or_else(|| FolioError::FeedParse("unterminated CDATA section".to_string()))?;
        out.push_str(&content[..end]);
        rest = &content[end + CDATA_CLOSE.len()..];
    }
    out.push_str(&decode_entities(rest));

    Ok(out)
}

/// Replaces the five predefined XML entities and numeric character references.
/// Anything unrecognised is left as written.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// `Severity:</strong> <score> | <LEVEL>`, with flexible spacing. The first marker that
/// parses wins; if none does, or the level is outside the known four, there is no severity.
fn extract_severity(description: &str) -> Option<Severity> {
    description
        .match_indices(SEVERITY_MARKER)
        .find_map(|(at, _)| severity_after(&description[at + SEVERITY_MARKER.len()..]))
}

fn severity_after(text: &str) -> Option<Severity> {
    let rest = text.trim_start();

    let score_len = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    if score_len == 0 {
        return None;
    }

    let rest = rest[score_len..].trim_start().strip_prefix('|')?.trim_start();
    let level_len = rest
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(rest.len());
    if level_len == 0 {
        return None;
    }

    Severity::from_str(&rest[..level_len]).ok()
}

/// First line of the description with markup removed.
fn summarize(description: &str) -> Option<String> {
    let cut = first_break(description).unwrap_or(description.len());
    let text = strip_tags(&description[..cut]);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

fn first_break(text: &str) -> Option<usize> {
    let newline = text.find('\n');
    let br = text.to_ascii_lowercase().find("<br");
    match (newline, br) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
