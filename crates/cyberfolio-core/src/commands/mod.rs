//! Command dispatch table.
//!
//! A command is a name bound to one of three behaviours: a static panel, the clear
//! action, or an asynchronous producer. The registry is assembled once through
//! [`RegistryBuilder`] and is read-only afterwards; lookups are case-insensitive and
//! ignore surrounding whitespace.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::content::{portfolio, Panel};
use crate::errors::FolioError;

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;

/// Produces a panel on demand, typically by fetching something remote. Producers
/// never fail; they degrade to whatever content represents "nothing available".
#[async_trait]
pub trait ContentProducer: Send + Sync {
    async fn produce(&self) -> Panel;
}

#[derive(Clone)]
pub enum CommandKind {
    Static(Panel),
    Clear,
    Async(Arc<dyn ContentProducer>),
}

impl std::fmt::Debug for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandKind::Static(_) => write!(f, "Static"),
            CommandKind::Clear => write!(f, "Clear"),
            CommandKind::Async(_) => write!(f, "Async"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandEntry {
    pub name: String,
    pub description: String,
    pub kind: CommandKind,
}

/// Lookup key for a typed line: trimmed and lowercased.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: BTreeMap<String, CommandEntry>,
    order: Vec<String>,
}

impl RegistryBuilder {
    pub fn register(
        mut self,
        name: &str,
        description: &str,
        kind: CommandKind,
    ) -> Result<Self, FolioError> {
        let key = normalize(name);
        if self.entries.contains_key(&key) {
            return Err(FolioError::DuplicateCommand(key));
        }
        self.order.push(key.clone());
        self.entries.insert(
            key.clone(),
            CommandEntry {
                name: key,
                description: description.to_string(),
                kind,
            },
        );
        Ok(self)
    }

    /// Registers a static help panel listing every command registered so far, in
    /// registration order, followed by the help command itself.
    pub fn register_help(self, name: &str, description: &str) -> Result<Self, FolioError> {
        let own_name = normalize(name);
        let panel = {
            let mut listing: Vec<(&str, &str)> = self
                .order
                .iter()
                .filter_map(|key| self.entries.get(key))
                .map(|entry| (entry.name.as_str(), entry.description.as_str()))
                .collect();
            listing.push((own_name.as_str(), description));
            portfolio::help(&listing)
        };
        self.register(name, description, CommandKind::Static(panel))
    }

    pub fn build(self) -> CommandRegistry {
        CommandRegistry {
            entries: self.entries,
        }
    }
}

#[derive(Debug)]
pub struct CommandRegistry {
    entries: BTreeMap<String, CommandEntry>,
}

impl CommandRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The portfolio's command set. `news` is the only asynchronous entry.
    pub fn portfolio(news: Arc<dyn ContentProducer>) -> Result<Self, FolioError> {
        let last_updated = chrono::Local::now().format("%Y-%m-%d").to_string();
        let registry = Self::builder()
            .register(
                "whoami",
                "Display personal info",
                CommandKind::Static(portfolio::whoami(&last_updated)),
            )?
            .register(
                "experience",
                "Show work experience",
                CommandKind::Static(portfolio::experience()),
            )?
            .register("skills", "List technical skills", CommandKind::Static(portfolio::skills()))?
            .register(
                "projects",
                "View portfolio projects",
                CommandKind::Static(portfolio::projects()),
            )?
            .register(
                "contact",
                "Get contact information",
                CommandKind::Static(portfolio::contact()),
            )?
            .register("social", "View social media links", CommandKind::Static(portfolio::social()))?
            .register("clear", "Clear terminal history", CommandKind::Clear)?
            .register("news", "Show latest tech news", CommandKind::Async(news))?
            .register_help("help", "Show this help message")?
            .build();

        log::debug!("Command registry built with {} commands", registry.len());
        Ok(registry)
    }

    pub fn lookup(&self, raw: &str) -> Option<&CommandEntry> {
        self.entries.get(&normalize(raw))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
