//! Terminal front end: raw-mode setup, the event loop and drawing.
//!
//! The loop is the only place session state is mutated. Measurements run
//! on separate tokio tasks and report back over a channel, so the screen
//! keeps redrawing and accepting navigation while a request is outstanding.

mod keys;
mod view;

use std::io;
use std::sync::Arc;
use crossterm::{
    event::{Event as TermEvent, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use crate::application::{Command, Config, Event, MeasureUseCase, Outcome, ParsedUrl, Session};
use crate::domain::ResptimeError;
use crate::infrastructure::{HickoryDnsResolver, HybridHttpClient, RustlsTlsHandshaker, TokioClock, TokioTcpDialer};

pub use keys::action_for;
pub use view::{breakdown_rows, history_row, HISTORY_COLUMNS, MIN_HEIGHT, MIN_WIDTH};

pub type LiveMeasurer = MeasureUseCase<HickoryDnsResolver, TokioTcpDialer, RustlsTlsHandshaker, HybridHttpClient, TokioClock>;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

fn terminal_error(what: &str, e: io::Error) -> ResptimeError {
    ResptimeError::other(format!("{}: {}", what, e))
}

/// Takes over the terminal, runs the session until the user quits and
/// restores the terminal afterwards, also on error.
pub async fn run(measurer: Arc<LiveMeasurer>, config: &Config) -> Result<(), ResptimeError> {
    enable_raw_mode().map_err(|e| terminal_error("enable raw mode", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let res = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(mut terminal) => {
            terminal.clear().ok();
            let res = event_loop(&mut terminal, measurer, config).await;
            terminal.show_cursor().ok();
            res
        }
        Err(e) => Err(terminal_error("create terminal", e)),
    };

    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen).ok();
    res
}

async fn event_loop(terminal: &mut Term, measurer: Arc<LiveMeasurer>, config: &Config) -> Result<(), ResptimeError> {
    let mut session = Session::new();
    if let Ok((width, height)) = crossterm::terminal::size() {
        session.handle(Event::Resize { width, height });
    }

    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(config.tick_rate);
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<Outcome>(1);

    loop {
        terminal.draw(|f| view::draw(f, &session)).map_err(|e| terminal_error("draw", e))?;

        let event = tokio::select! {
            _ = tick.tick() => Event::Tick,
            maybe_ev = events.next() => match maybe_ev {
                Some(Ok(TermEvent::Key(key))) => match action_for(key) {
                    Some(action) => Event::Key(action),
                    None => continue,
                },
                Some(Ok(TermEvent::Resize(width, height))) => Event::Resize { width, height },
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(terminal_error("read terminal event", e)),
                None => {
                    tracing::info!("terminal event stream closed");
                    return Ok(());
                }
            },
            Some(outcome) = outcome_rx.recv() => Event::Measured(outcome),
        };

        match session.handle(event) {
            Some(Command::Measure { url, id }) => spawn_measurement(Arc::clone(&measurer), url, id, outcome_tx.clone()),
            Some(Command::Quit) => {
                tracing::info!(measurements = session.history().len(), "session ended");
                return Ok(());
            }
            None => {}
        }
    }
}

/// Runs one measurement on its own task. Once the session has ended the
/// receiver is gone and the result is dropped.
fn spawn_measurement(measurer: Arc<LiveMeasurer>, url: ParsedUrl, id: u32, tx: mpsc::Sender<Outcome>) {
    tokio::spawn(async move {
        let result = measurer.execute(&url, id).await;
        if tx.send(Outcome { id, result }).await.is_err() {
            tracing::debug!(id, "session gone, discarding measurement");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::config::{ResolverConfig, ResolverOpts};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn live_measurer() -> Arc<LiveMeasurer> {
        Arc::new(MeasureUseCase::new(
            HickoryDnsResolver::with_config(ResolverConfig::default(), ResolverOpts::default()),
            TokioTcpDialer::new(),
            RustlsTlsHandshaker::new().unwrap(),
            HybridHttpClient::new(),
            TokioClock::new(),
            Config::default(),
        ))
    }

    #[tokio::test]
    async fn background_measurement_reports_outcome() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = sock.read(&mut buf).await;
            let _ = sock.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok").await;
        });

        let (tx, mut rx) = mpsc::channel(1);
        let url = ParsedUrl::parse(&format!("http://{}/", addr)).unwrap();
        spawn_measurement(live_measurer(), url, 7, tx);

        let outcome = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        assert_eq!(outcome.id, 7);
        let m = outcome.result.unwrap();
        assert_eq!(m.status_line(), "200 OK");
        assert_eq!(m.connection_address, addr);
    }

    #[tokio::test]
    async fn failed_measurement_is_reported_too() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (tx, mut rx) = mpsc::channel(1);
        let url = ParsedUrl::parse(&format!("http://{}/", addr)).unwrap();
        spawn_measurement(live_measurer(), url, 1, tx);

        let outcome = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        assert!(outcome.result.unwrap_err().is_network());
    }
}
