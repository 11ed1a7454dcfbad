//! Client for the proxy's `GET /api/link-preview` and the panel it resolves to.

use serde::{Deserialize, Serialize};

use crate::content::{Card, Panel};
use crate::errors::FolioError;

pub const PREVIEW_FAILED: &str = "Failed to load preview";

/// Page metadata as returned by the proxy. Missing fields come back as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkPreview {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
    pub favicon: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct LinkPreviewClient {
    client: reqwest::Client,
    endpoint: String,
}

impl LinkPreviewClient {
    pub fn new(server_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), server_url)
    }

    pub fn with_client(client: reqwest::Client, server_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/link-preview", server_url.trim_end_matches('/')),
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<LinkPreview, FolioError> {
        let request_url = format!("{}?url={}", self.endpoint, urlencoding::encode(url));
        log::debug!("Fetching link preview: {}", request_url);

        let response = self.client.get(&request_url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("status {}", status));
            return Err(FolioError::Proxy(message));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// What a link-preview placeholder turns into once its fetch settles.
pub fn preview_panel(url: &str, result: &Result<LinkPreview, FolioError>) -> Panel {
    match result {
        Ok(preview) => {
            let title = if preview.title.is_empty() {
                url.to_string()
            } else {
                preview.title.clone()
            };
            let link = if preview.url.is_empty() {
                url.to_string()
            } else {
                preview.url.clone()
            };

            let mut card = Card::new(title).icon("🔗").link(link);
            if !preview.description.is_empty() {
                card = card.line(preview.description.clone());
            }
            if !preview.image.is_empty() {
                card = card.line(format!("🖼 {}", preview.image));
            }
            if !preview.favicon.is_empty() {
                card = card.subtitle(preview.favicon.clone());
            }
            Panel::new().card(card)
        }
        Err(e) => {
            log::warn!("Link preview for {} failed: {}", url, e);
            Panel::new().error(PREVIEW_FAILED)
        }
    }
}
