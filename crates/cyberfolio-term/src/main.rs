use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use cyberfolio_core::BootSequencer;
use cyberfolio_core::BootTimings;
use cyberfolio_core::CommandRegistry;
use cyberfolio_core::Interpreter;
use cyberfolio_core::LinkPreviewClient;
use cyberfolio_core::NewsProducer;
use cyberfolio_core::Session;
use cyberfolio_core::BOOT_LINES;
use cyberfolio_term::application::cli;
use cyberfolio_term::domain::services::ActionsService;
use cyberfolio_term::Action;
use cyberfolio_term::Config;
use cyberfolio_term::ConfigKey;
use cyberfolio_term::Event;
use cyberfolio_term::UiProps;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::task;
use tracing_appender::non_blocking::WorkerGuard;

const FAST_BOOT_SPEEDUP: u32 = 10;

fn init_logging() -> Result<WorkerGuard> {
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("cyberfolio");
    std::fs::create_dir_all(&log_dir)?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&log_dir, "cyberfolio.log"));
    let level = Config::get(ConfigKey::LogLevel)
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    tracing_subscriber::fmt()
        .json()
        .with_max_level(level)
        .with_writer(writer)
        .init();

    return Ok(guard);
}

async fn run_ui(
    props: UiProps,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut stdout = io::stdout();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let result = cyberfolio_term::start_loop(&mut terminal, props, tx, rx).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    let _ = crossterm::execute!(io::stdout(), cursor::Show);

    return result;
}

#[tokio::main]
async fn main() -> Result<()> {
    if !cli::parse().await? {
        return Ok(());
    }
    let _log_guard = init_logging()?;

    std::panic::set_hook(Box::new(|panic_info| {
        cyberfolio_term::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let server_url = Config::get(ConfigKey::ServerUrl);
    let speedup = if Config::get_bool(ConfigKey::FastBoot) {
        FAST_BOOT_SPEEDUP
    } else {
        1
    };
    let timings = BootTimings::default().with_speedup(speedup);
    tracing::info!(server_url = server_url.as_str(), speedup, "starting");

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let (boot_tx, mut boot_rx) = mpsc::unbounded_channel();
    tokio::spawn(BootSequencer::new(BOOT_LINES.to_vec(), timings).run_into(boot_tx));
    let boot_event_tx = event_tx.clone();
    tokio::spawn(async move {
        while let Some(phase) = boot_rx.recv().await {
            if boot_event_tx.send(Event::Boot(phase)).is_err() {
                break;
            }
        }
    });

    let news = Arc::new(NewsProducer::over_http(&server_url));
    let registry = Arc::new(CommandRegistry::portfolio(news)?);
    let (interpreter, mut session_rx, _session) = Interpreter::spawn(Session::new(registry));
    let session_event_tx = event_tx.clone();
    tokio::spawn(async move {
        while let Some(session_event) = session_rx.recv().await {
            if session_event_tx.send(Event::Session(session_event)).is_err() {
                break;
            }
        }
    });

    let mut background_futures = task::JoinSet::new();
    let preview_client = LinkPreviewClient::new(&server_url);
    background_futures.spawn(async move {
        return ActionsService::start(interpreter, preview_client, event_tx, &mut action_rx).await;
    });

    let props = UiProps {
        boot_lines: BOOT_LINES.to_vec(),
        memory_test: timings.memory_test / timings.speedup,
    };

    let result = tokio::select!(
        res = background_futures.join_next() => match res {
            Some(Ok(res)) => res,
            Some(Err(err)) => Err(err.into()),
            None => Ok(()),
        },
        res = run_ui(props, action_tx, event_rx) => res,
    );

    if result.is_err() {
        cyberfolio_term::destruct_terminal_for_panic();
    }

    return result;
}
