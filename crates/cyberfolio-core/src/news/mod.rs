//! Security news: the `news` command's producer.
//!
//! The proxy hands back the raw CVE RSS document wrapped in `{ "data": ... }`. This
//! module fetches it, extracts at most [`MAX_NEWS_ITEMS`] advisories and renders them
//! into a panel. Fetching is fail-open: whatever goes wrong, the visitor gets a
//! well-formed panel and the cause goes to the log.

pub mod feed;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::commands::ContentProducer;
use crate::content::{Badge, Card, Panel, Tone};
use crate::errors::FolioError;

pub use feed::parse_feed;

pub const MAX_NEWS_ITEMS: usize = 5;

pub const NEWS_HEADING: &str = "Latest Security Vulnerabilities";
pub const NEWS_SOURCE: &str = "Source: CVE Feed - Latest Security Vulnerabilities";
pub const NO_ADVISORIES: &str = "No advisories available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn tone(&self) -> Tone {
        match self {
            Severity::Critical => Tone::Danger,
            Severity::High => Tone::Warning,
            Severity::Medium | Severity::Low => Tone::Caution,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for Severity {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Severity::Low),
            "MEDIUM" => Ok(Severity::Medium),
            "HIGH" => Ok(Severity::High),
            "CRITICAL" => Ok(Severity::Critical),
            other => Err(FolioError::FeedParse(format!("unknown severity '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    /// `pubDate` as published, usually RFC 2822.
    pub published: String,
    pub severity: Option<Severity>,
    pub description: Option<String>,
}

impl NewsItem {
    /// `YYYY-MM-DD` when the date parses, the raw value otherwise.
    pub fn display_date(&self) -> String {
        match chrono::DateTime::parse_from_rfc2822(self.published.trim()) {
            Ok(date) => date.format("%Y-%m-%d").to_string(),
            Err(_) => self.published.clone(),
        }
    }
}

/// Where the raw feed document comes from.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_feed(&self) -> Result<String, FolioError>;
}

#[derive(Debug, Deserialize)]
struct NewsEnvelope {
    data: Option<String>,
    error: Option<String>,
}

/// Reads the feed through the proxy's `GET /api/news`.
#[derive(Debug, Clone)]
pub struct HttpNewsSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNewsSource {
    pub fn new(server_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), server_url)
    }

    pub fn with_client(client: reqwest::Client, server_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/news", server_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NewsSource for HttpNewsSource {
    async fn fetch_feed(&self) -> Result<String, FolioError> {
        log::debug!("Fetching news feed from {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Error statuses still carry `{error}`, which is the more useful message.
        let envelope: NewsEnvelope = serde_json::from_str(&body).map_err(|e| {
            FolioError::Proxy(format!("status {} with unreadable body: {}", status, e))
        })?;

        match envelope {
            NewsEnvelope {
                error: Some(error), ..
            } => Err(FolioError::Proxy(error)),
            NewsEnvelope {
                data: Some(data), ..
            } if status.is_success() => Ok(data),
            _ => Err(FolioError::Proxy(format!("status {} without feed data", status))),
        }
    }
}

/// Fetches and parses advisories. Never fails: any error is logged and yields an
/// empty list.
pub async fn fetch_security_news(source: &dyn NewsSource) -> Vec<NewsItem> {
    let result = match source.fetch_feed().await {
        Ok(xml) => parse_feed(&xml),
        Err(e) => Err(e),
    };

    match result {
        Ok(items) => {
            log::info!("Fetched {} security advisories", items.len());
            items
        }
        Err(e) => {
            log::warn!("Error fetching security news: {}", e);
            Vec::new()
        }
    }
}

pub fn news_panel(items: &[NewsItem]) -> Panel {
    let mut panel = Panel::new().heading(NEWS_HEADING).notice("Live Feed");

    if items.is_empty() {
        panel = panel.text(NO_ADVISORIES);
    }

    for item in items {
        let mut card = Card::new(item.title.clone())
            .icon("🔒")
            .link(item.link.clone())
            .period(format!("📅 {}", item.display_date()));
        if let Some(severity) = item.severity {
            card = card.badge(Badge::new(severity.to_string(), severity.tone()));
        }
        if let Some(description) = &item.description {
            card = card.line(description.clone());
        }
        panel = panel.card(card);
    }

    panel.footer(NEWS_SOURCE).footer("● Auto-updating")
}

/// The `news` command.
#[derive(Clone)]
pub struct NewsProducer {
    source: Arc<dyn NewsSource>,
}

impl NewsProducer {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        Self { source }
    }

    pub fn over_http(server_url: &str) -> Self {
        Self::new(Arc::new(HttpNewsSource::new(server_url)))
    }
}

#[async_trait]
impl ContentProducer for NewsProducer {
    async fn produce(&self) -> Panel {
        let items = fetch_security_news(self.source.as_ref()).await;
        news_panel(&items)
    }
}

#[cfg(test)]
#[path = "news_test.rs"]
mod tests;
