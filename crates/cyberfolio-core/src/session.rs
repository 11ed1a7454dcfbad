//! Interactive session state.
//!
//! A [`Session`] is created when the boot sequence hands over and lives for as long as
//! the visitor stays. It owns the scrollback history; the registry it dispatches
//! against is shared and immutable. Scroll position belongs to whichever front-end
//! draws the history.

use std::sync::Arc;

use serde::Serialize;

use crate::commands::{normalize, CommandKind, CommandRegistry};
use crate::content::{portfolio, Panel};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryLine {
    /// Exactly what was typed, case and whitespace preserved.
    pub command: String,
    pub output: Panel,
}

/// What `execute` did to the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Appended(HistoryLine),
    Cleared,
}

pub struct Session {
    registry: Arc<CommandRegistry>,
    history: Vec<HistoryLine>,
}

impl Session {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            registry,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[HistoryLine] {
        &self.history
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Resolves one typed line and records the result.
    ///
    /// `clear` empties the history without recording itself; front-ends reset their
    /// scroll position on [`Outcome::Cleared`].
    /// Unknown input is answered with the not-found panel. Asynchronous commands are
    /// awaited before anything is appended, and since this takes `&mut self` a session
    /// never has two commands in flight.
    pub async fn execute(&mut self, raw_input: &str) -> Outcome {
        let key = normalize(raw_input);
        let kind = self.registry.lookup(&key).map(|entry| entry.kind.clone());

        let output = match kind {
            Some(CommandKind::Clear) => {
                log::debug!("Clearing {} history entries", self.history.len());
                self.history.clear();
                return Outcome::Cleared;
            }
            Some(CommandKind::Static(panel)) => panel,
            Some(CommandKind::Async(producer)) => {
                log::debug!("Awaiting producer for '{}'", key);
                producer.produce().await
            }
            None => {
                log::debug!("Unknown command '{}'", key);
                portfolio::not_found()
            }
        };

        let line = HistoryLine {
            command: raw_input.to_string(),
            output,
        };
        self.history.push(line.clone());
        Outcome::Appended(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ContentProducer;
    use crate::content::portfolio::NOT_FOUND_MESSAGE;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProducer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentProducer for CountingProducer {
        async fn produce(&self) -> Panel {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Panel::new().text(format!("call {}", n))
        }
    }

    fn session() -> (Session, Arc<CountingProducer>) {
        let producer = Arc::new(CountingProducer {
            calls: AtomicUsize::new(0),
        });
        let registry = CommandRegistry::portfolio(producer.clone()).unwrap();
        (Session::new(Arc::new(registry)), producer)
    }

    #[tokio::test]
    async fn test_unknown_input_appends_not_found() {
        let (mut session, _) = session();

        for raw in ["ls", "sudo rm -rf /", "", "   ", "helpme"] {
            let before = session.history().len();
            let outcome = session.execute(raw).await;
            assert_eq!(session.history().len(), before + 1);

            let last = session.history().last().unwrap();
            assert_eq!(last.command, raw);
            assert_eq!(last.output.to_plain_text(), NOT_FOUND_MESSAGE);
            assert_eq!(outcome, Outcome::Appended(last.clone()));
        }
    }

    #[tokio::test]
    async fn test_clear_variants_empty_history() {
        let (mut session, _) = session();

        for raw in ["clear", "CLEAR", "  clear  "] {
            session.execute("help").await;
            session.execute("skills").await;

            let outcome = session.execute(raw).await;
            assert_eq!(outcome, Outcome::Cleared);
            assert!(session.history().is_empty());
        }
    }

    #[tokio::test]
    async fn test_clear_on_empty_history_appends_nothing() {
        let (mut session, _) = session();
        assert_eq!(session.execute("Clear").await, Outcome::Cleared);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_static_commands_repeat_identically() {
        let (mut session, _) = session();

        for name in ["help", "whoami", "experience", "skills", "projects", "contact", "social"] {
            let shouted = name.to_uppercase();
            session.execute(&shouted).await;
            session.execute(&shouted).await;

            let history = session.history();
            let (first, second) = (&history[history.len() - 2], &history[history.len() - 1]);
            assert_eq!(first.command, shouted);
            assert_eq!(second.command, shouted);
            assert_eq!(first.output, second.output);
        }
    }

    #[tokio::test]
    async fn test_whoami_end_to_end() {
        let (mut session, _) = session();
        session.execute("WhoAmI").await;

        let expected = match &session.registry().lookup("whoami").unwrap().kind {
            CommandKind::Static(panel) => panel.clone(),
            other => panic!("unexpected kind {:?}", other),
        };
        assert_eq!(
            session.history(),
            &[HistoryLine {
                command: "WhoAmI".to_string(),
                output: expected,
            }]
        );
    }

    #[tokio::test]
    async fn test_async_command_is_awaited_and_appended_in_order() {
        let (mut session, producer) = session();

        session.execute("news").await;
        session.execute("help").await;
        session.execute("NEWS").await;

        assert_eq!(producer.calls.load(Ordering::SeqCst), 2);
        let commands: Vec<&str> = session
            .history()
            .iter()
            .map(|line| line.command.as_str())
            .collect();
        assert_eq!(commands, vec!["news", "help", "NEWS"]);
        assert_eq!(session.history()[0].output.to_plain_text(), "call 1");
        assert_eq!(session.history()[2].output.to_plain_text(), "call 2");
    }
}
