//! Quiz display binary: polls the session authority, renders frames, and forwards teacher controls.

use std::{
    io::{self, BufRead},
    sync::Arc,
    thread,
};

use anyhow::Context;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quiz_display::{
    api::{HttpQuizGateway, HttpTransport, QuizGateway, SessionId},
    config::{AppConfig, DEFAULT_ORIGIN},
    services::{CommandDispatcher, SyncLoop},
    state::{DisplayState, DisplayStore, SharedStore},
    ui::{ControlInput, parse_input, render_frame},
};

/// Clear the terminal and move the cursor home before each frame.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    if !config.has_explicit_base() {
        warn!(origin = DEFAULT_ORIGIN, "no API base address configured; using default origin");
    }

    let transport = HttpTransport::new(config.base_url(), config.request_timeout())
        .context("building HTTP transport")?;
    info!(base_url = %transport.base_url(), "starting quiz display");

    let gateway: Arc<dyn QuizGateway> = Arc::new(HttpQuizGateway::new(transport));
    let store = DisplayStore::new();
    // Single default session until the authority exposes session routing.
    let session: Option<SessionId> = None;

    let mut sync = SyncLoop::new(gateway.clone(), store.clone(), config.poll_interval());
    sync.start(session.clone());

    let dispatcher = Arc::new(CommandDispatcher::new(
        gateway,
        store.clone(),
        session,
        config.celebration(),
    ));

    let renderer = tokio::spawn(render_frames(store.subscribe()));

    tokio::select! {
        _ = shutdown_signal() => info!("shutdown requested"),
        _ = read_controls(store.clone(), dispatcher) => info!("control input closed"),
    }

    sync.stop();
    renderer.abort();
    Ok(())
}

/// Redraw the display whenever the store publishes a new state.
async fn render_frames(mut updates: watch::Receiver<DisplayState>) {
    let mut stdout = tokio::io::stdout();
    loop {
        let frame = {
            let state = updates.borrow_and_update();
            render_frame(&state)
        };
        if let Err(err) = write_frame(&mut stdout, &frame).await {
            warn!(error = %err, "failed to write frame");
            break;
        }

        if updates.changed().await.is_err() {
            break;
        }
    }
}

/// Clear the screen, write one frame and flush it.
async fn write_frame<W: AsyncWrite + Unpin>(out: &mut W, frame: &str) -> io::Result<()> {
    out.write_all(format!("{CLEAR_SCREEN}{frame}").as_bytes()).await?;
    out.flush().await
}

/// Forward stdin lines from a dedicated thread; the channel closes on EOF.
fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "failed to read control input");
                    break;
                }
            }
        }
    });
    rx
}

/// Handle teacher controls until input closes or `quit` is entered.
///
/// Commands are rejected while the first load is pending; accepted commands are
/// spawned so they may race each other and the poll loop.
async fn read_controls(store: SharedStore, dispatcher: Arc<CommandDispatcher>) {
    let mut lines = spawn_input_reader();
    while let Some(line) = lines.recv().await {
        if line.trim().is_empty() {
            continue;
        }

        match parse_input(&line) {
            Ok(ControlInput::Quit) => break,
            Ok(ControlInput::Command(command)) => {
                if !store.controls_enabled() {
                    info!(%command, "ignoring command while loading");
                    continue;
                }
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    dispatcher.dispatch(command).await;
                });
            }
            Err(err) => {
                warn!(error = %err, "rejected control input");
                store.record_error(err.to_string());
            }
        }
    }
}

/// Configure tracing subscribers; logs go to stderr so frames on stdout stay intact.
fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
