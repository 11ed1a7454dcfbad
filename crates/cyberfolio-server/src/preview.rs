//! Open Graph metadata extraction for link previews.
//!
//! Pages are scanned with a few tolerant regexes rather than a full HTML parser: the
//! preview only needs `<title>`, a handful of `<meta>` tags and the favicon `<link>`.
//! Attribute order and quoting style do not matter.

use std::collections::HashMap;

use cyberfolio_core::news::feed::decode_entities;
use cyberfolio_core::LinkPreview;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

static META_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<meta\s[^>]*>").expect("valid meta regex"));
static LINK_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<link\s[^>]*>").expect("valid link regex"));
static TITLE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)([a-z][a-z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid attribute regex")
});

/// Lowercased attribute names mapped to their entity-decoded values.
fn attributes(tag: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(tag)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps.get(2).or(caps.get(3)).or(caps.get(4))?.as_str();
            Some((name, decode_entities(value).trim().to_string()))
        })
        .collect()
}

/// `<meta>` contents keyed by their lowercased `property` or `name`. First one wins.
fn meta_contents(html: &str) -> HashMap<String, String> {
    let mut contents = HashMap::new();
    for tag in META_TAG.find_iter(html) {
        let attrs = attributes(tag.as_str());
        let key = attrs.get("property").or_else(|| attrs.get("name"));
        if let (Some(key), Some(content)) = (key, attrs.get("content")) {
            contents
                .entry(key.to_ascii_lowercase())
                .or_insert_with(|| content.clone());
        }
    }
    contents
}

fn favicon_href(html: &str) -> Option<String> {
    LINK_TAG.find_iter(html).find_map(|tag| {
        let attrs = attributes(tag.as_str());
        let rel = attrs.get("rel")?.to_ascii_lowercase();
        if rel.split_whitespace().any(|token| token == "icon") {
            attrs.get("href").filter(|href| !href.is_empty()).cloned()
        } else {
            None
        }
    })
}

fn title_text(html: &str) -> Option<String> {
    let caps = TITLE_TAG.captures(html)?;
    let text = decode_entities(caps.get(1)?.as_str());
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Absolute form of `href` relative to `base`; left as written when it cannot be joined.
pub fn resolve(base: &Url, href: &str) -> String {
    match base.join(href) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

/// Builds the preview for `requested_url` from a page fetched from `page_url`
/// (the address after redirects).
pub fn extract_preview(html: &str, requested_url: &str, page_url: &Url) -> LinkPreview {
    let meta = meta_contents(html);
    let non_empty = |key: &str| meta.get(key).filter(|value| !value.is_empty()).cloned();

    let title = non_empty("og:title")
        .or_else(|| title_text(html))
        .unwrap_or_default();
    let description = non_empty("og:description")
        .or_else(|| non_empty("description"))
        .unwrap_or_default();
    let image = non_empty("og:image")
        .map(|href| resolve(page_url, &href))
        .unwrap_or_default();
    let favicon = resolve(
        page_url,
        &favicon_href(html).unwrap_or_else(|| "/favicon.ico".to_string()),
    );

    LinkPreview {
        title,
        description,
        image,
        url: requested_url.to_string(),
        favicon,
    }
}
