//! Single-writer worker that owns a [`Session`].
//!
//! Front-ends never touch the session directly. They push raw lines through an
//! [`InterpreterHandle`]; the worker executes them strictly in submission order and
//! reports every change as a [`SessionEvent`]. A slow `news` fetch therefore holds back
//! later submissions instead of racing them into the history.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::errors::FolioError;
use crate::session::{HistoryLine, Outcome, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A submission started executing.
    Busy(String),
    Appended(HistoryLine),
    Cleared,
    /// The queue drained.
    Idle,
}

#[derive(Debug, Clone)]
pub struct InterpreterHandle {
    tx: mpsc::UnboundedSender<String>,
}

impl InterpreterHandle {
    pub fn submit(&self, raw_input: impl Into<String>) -> Result<(), FolioError> {
        self.tx
            .send(raw_input.into())
            .map_err(|_| FolioError::Io("interpreter worker has stopped".to_string()))
    }
}

pub struct Interpreter {
    session: Session,
    rx: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl Interpreter {
    /// Moves `session` into a new worker task. The worker stops once every handle is
    /// dropped and the queue is empty; the join handle yields the final session.
    pub fn spawn(
        session: Session,
    ) -> (
        InterpreterHandle,
        mpsc::UnboundedReceiver<SessionEvent>,
        JoinHandle<Session>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, events_rx) = mpsc::unbounded_channel();

        let worker = Interpreter {
            session,
            rx,
            events,
        };
        let join = tokio::spawn(worker.run());

        (InterpreterHandle { tx }, events_rx, join)
    }

    async fn run(mut self) -> Session {
        log::debug!("Interpreter worker started");

        while let Some(raw_input) = self.rx.recv().await {
            self.emit(SessionEvent::Busy(raw_input.clone()));

            match self.session.execute(&raw_input).await {
                Outcome::Appended(line) => self.emit(SessionEvent::Appended(line)),
                Outcome::Cleared => self.emit(SessionEvent::Cleared),
            }

            if self.rx.is_empty() {
                self.emit(SessionEvent::Idle);
            }
        }

        log::debug!(
            "Interpreter worker stopped with {} history entries",
            self.session.history().len()
        );
        self.session
    }

    fn emit(&self, event: SessionEvent) {
        // The session keeps going without an observer.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandRegistry, ContentProducer};
    use crate::content::Panel;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct SlowNews;

    #[async_trait]
    impl ContentProducer for SlowNews {
        async fn produce(&self) -> Panel {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Panel::new().heading("slow news")
        }
    }

    fn spawn_session() -> (
        InterpreterHandle,
        mpsc::UnboundedReceiver<SessionEvent>,
        JoinHandle<Session>,
    ) {
        let registry = CommandRegistry::portfolio(Arc::new(SlowNews)).unwrap();
        Interpreter::spawn(Session::new(Arc::new(registry)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_news_does_not_reorder_history() {
        let (handle, mut events, join) = spawn_session();

        handle.submit("news").unwrap();
        handle.submit("help").unwrap();
        handle.submit("Skills").unwrap();
        drop(handle);

        let session = join.await.unwrap();
        let commands: Vec<&str> = session
            .history()
            .iter()
            .map(|line| line.command.as_str())
            .collect();
        assert_eq!(commands, vec!["news", "help", "Skills"]);
        assert_eq!(
            session.history()[0].output.to_plain_text(),
            "slow news"
        );

        let mut appended = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let SessionEvent::Appended(line) = event {
                appended.push(line.command);
            }
        }
        assert_eq!(appended, vec!["news", "help", "Skills"]);
    }

    #[tokio::test]
    async fn test_events_bracket_each_submission() {
        let (handle, mut events, join) = spawn_session();

        handle.submit("whoami").unwrap();
        assert_eq!(
            events.recv().await,
            Some(SessionEvent::Busy("whoami".to_string()))
        );
        assert!(matches!(events.recv().await, Some(SessionEvent::Appended(_))));
        assert_eq!(events.recv().await, Some(SessionEvent::Idle));

        handle.submit("clear").unwrap();
        assert_eq!(
            events.recv().await,
            Some(SessionEvent::Busy("clear".to_string()))
        );
        assert_eq!(events.recv().await, Some(SessionEvent::Cleared));
        assert_eq!(events.recv().await, Some(SessionEvent::Idle));

        drop(handle);
        let session = join.await.unwrap();
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_submit_fails_after_worker_stops() {
        let (handle, events, join) = spawn_session();
        let spare = handle.clone();
        drop(events);
        join.abort();
        let _ = join.await;

        assert!(matches!(spare.submit("help"), Err(FolioError::Io(_))));
        drop(handle);
    }
}
