use anyhow::Result;
use cyberfolio_core::InterpreterHandle;
use cyberfolio_core::LinkPreviewClient;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Event;

pub struct ActionsService {}

impl ActionsService {
    /// Runs until every action sender is dropped. Submissions go to the interpreter in
    /// arrival order; preview fetches run concurrently and report back as events.
    pub async fn start(
        interpreter: InterpreterHandle,
        preview_client: LinkPreviewClient,
        event_tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            match action {
                Action::Submit(raw_input) => {
                    tracing::debug!(command = raw_input.as_str(), "submit");
                    interpreter.submit(raw_input)?;
                }
                Action::FetchPreview(url) => {
                    let client = preview_client.clone();
                    let worker_event_tx = event_tx.clone();
                    tokio::spawn(async move {
                        let result = client.fetch(&url).await;
                        if let Err(err) = &result {
                            tracing::warn!(url = url.as_str(), error = %err, "link preview failed");
                        }
                        let _ = worker_event_tx.send(Event::PreviewLoaded(url, result));
                    });
                }
            }
        }

        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyberfolio_core::news::NewsProducer;
    use cyberfolio_core::CommandRegistry;
    use cyberfolio_core::Interpreter;
    use cyberfolio_core::Session;
    use cyberfolio_core::SessionEvent;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_submissions_reach_the_interpreter_in_order() {
        let news = Arc::new(NewsProducer::over_http("http://127.0.0.1:9"));
        let registry = Arc::new(CommandRegistry::portfolio(news).unwrap());
        let (handle, mut session_events, _join) = Interpreter::spawn(Session::new(registry));

        let (event_tx, _event_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        action_tx.send(Action::Submit("help".to_string())).unwrap();
        action_tx.send(Action::Submit("nope".to_string())).unwrap();
        drop(action_tx);

        ActionsService::start(
            handle,
            LinkPreviewClient::new("http://127.0.0.1:9"),
            event_tx,
            &mut action_rx,
        )
        .await
        .unwrap();

        let mut appended = vec![];
        while appended.len() < 2 {
            if let Some(SessionEvent::Appended(line)) = session_events.recv().await {
                appended.push(line.command);
            }
        }
        assert_eq!(appended, vec!["help", "nope"]);
    }

    #[tokio::test]
    async fn test_preview_failures_come_back_as_events() {
        let registry = Arc::new(
            CommandRegistry::portfolio(Arc::new(NewsProducer::over_http("http://127.0.0.1:9")))
                .unwrap(),
        );
        let (handle, _session_events, _join) = Interpreter::spawn(Session::new(registry));

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        action_tx
            .send(Action::FetchPreview("https://defendis.ai".to_string()))
            .unwrap();
        drop(action_tx);

        ActionsService::start(
            handle,
            LinkPreviewClient::new("http://127.0.0.1:9"),
            event_tx,
            &mut action_rx,
        )
        .await
        .unwrap();

        match event_rx.recv().await {
            Some(Event::PreviewLoaded(url, result)) => {
                assert_eq!(url, "https://defendis.ai");
                assert!(result.is_err());
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
