//! Render-agnostic content model.
//!
//! Every command produces a [`Panel`]: an ordered list of [`Block`]s that a front-end
//! maps to its own styling. The model deliberately carries meaning (heading, card,
//! notice) rather than colors so the same panel can be drawn by the terminal UI or
//! flattened with [`Panel::to_plain_text`].

pub mod portfolio;

use serde::Serialize;

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;

/// Visual weight of a [`Badge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Success,
    Caution,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
}

impl Badge {
    pub fn new(label: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }
}

/// A bordered group: a job, a skill family, a project, a news advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Card {
    pub icon: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub period: Option<String>,
    pub link: Option<String>,
    pub badge: Option<Badge>,
    pub body: Vec<String>,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn badge(mut self, badge: Badge) -> Self {
        self.badge = Some(badge);
        self
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body.extend(lines.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Block {
    /// Bracketed section title such as `[Technical Skills]`.
    Heading(String),
    Text(String),
    Bullet(String),
    Field { label: String, value: String },
    Tags { label: Option<String>, items: Vec<String> },
    Card(Card),
    /// Highlighted one-liner, drawn with a leading play marker.
    Notice(String),
    /// Placeholder resolved lazily by the front-end through the link-preview proxy.
    LinkPreview(String),
    Error(String),
    Footer(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Panel {
    pub blocks: Vec<Block>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn heading(self, text: impl Into<String>) -> Self {
        self.push(Block::Heading(text.into()))
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.push(Block::Text(text.into()))
    }

    pub fn bullet(self, text: impl Into<String>) -> Self {
        self.push(Block::Bullet(text.into()))
    }

    pub fn field(self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Block::Field {
            label: label.into(),
            value: value.into(),
        })
    }

    pub fn tags<I, S>(self, label: Option<&str>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Block::Tags {
            label: label.map(str::to_string),
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    pub fn card(self, card: Card) -> Self {
        self.push(Block::Card(card))
    }

    pub fn notice(self, text: impl Into<String>) -> Self {
        self.push(Block::Notice(text.into()))
    }

    pub fn link_preview(self, url: impl Into<String>) -> Self {
        self.push(Block::LinkPreview(url.into()))
    }

    pub fn error(self, text: impl Into<String>) -> Self {
        self.push(Block::Error(text.into()))
    }

    pub fn footer(self, text: impl Into<String>) -> Self {
        self.push(Block::Footer(text.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// URLs of every link-preview placeholder, in panel order.
    pub fn preview_urls(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::LinkPreview(url) => Some(url.as_str()),
            _ => None,
        })
    }

    /// Flattens the panel into unstyled text, one block per line group.
    pub fn to_plain_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Heading(text) | Block::Text(text) | Block::Footer(text) => {
                    lines.push(text.clone())
                }
                Block::Bullet(text) => lines.push(format!("  ▹ {}", text)),
                Block::Field { label, value } => lines.push(format!("{}: {}", label, value)),
                Block::Tags { label, items } => {
                    let joined = items.join(" · ");
                    match label {
                        Some(label) => lines.push(format!("{}: {}", label, joined)),
                        None => lines.push(joined),
                    }
                }
                Block::Card(card) => {
                    let mut title = match &card.icon {
                        Some(icon) => format!("{} {}", icon, card.title),
                        None => card.title.clone(),
                    };
                    if let Some(badge) = &card.badge {
                        title.push_str(&format!(" [{}]", badge.label));
                    }
                    lines.push(title);
                    for extra in [&card.subtitle, &card.period, &card.link].into_iter().flatten() {
                        lines.push(format!("  {}", extra));
                    }
                    for line in &card.body {
                        lines.push(format!("    ▹ {}", line));
                    }
                }
                Block::Notice(text) => lines.push(format!("▶ {}", text)),
                Block::LinkPreview(url) => lines.push(format!("🔗 {}", url)),
                Block::Error(text) => lines.push(format!("! {}", text)),
            }
        }
        lines.join("\n")
    }
}
