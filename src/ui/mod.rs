pub mod app;
pub mod form;
pub mod ledger;
pub mod notify;
pub mod search;
pub mod view;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::config::Config;
use crate::remote::ApiClient;
use app::App;
use search::{Debouncer, SEARCH_DEBOUNCE};

// How often notifications are checked for expiry
const TICK_RATE: Duration = Duration::from_millis(50);

/// Run the terminal front end against the API at `config.api_url`.
pub async fn run(config: &Config) -> Result<()> {
    info!(api = config.api_url(), "starting terminal front end");

    let (debouncer, mut queries) = Debouncer::new(SEARCH_DEBOUNCE);
    let mut app = App::new(ApiClient::new(config.api_url()), debouncer);
    app.fetch_clients().await;

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut events = EventStream::new();
    let result = run_app(&mut terminal, &mut app, &mut queries, &mut events).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B, S>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    queries: &mut UnboundedReceiver<String>,
    events: &mut S,
) -> Result<()>
where
    B: Backend,
    S: Stream<Item = io::Result<Event>> + Unpin,
{
    let mut ticker = interval(TICK_RATE);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal.draw(|f| view::draw(f, app))?;

        tokio::select! {
            _ = ticker.tick() => app.tick(Instant::now()),
            Some(query) = queries.recv() => app.apply_search(&query),
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key).await? {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    info!("terminal front end closed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use futures::channel::mpsc;
    use tui::backend::TestBackend;

    use super::*;
    use crate::models::Client;

    fn key(code: KeyCode) -> io::Result<Event> {
        Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn client(id: i64, name: &str, phone: &str) -> Client {
        Client {
            id,
            name: name.to_string(),
            phone: phone.to_string(),
            balance: 0.0,
            workplace: None,
        }
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol.as_str()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn fired_search_narrows_the_table() {
        let (debouncer, mut queries) = Debouncer::new(SEARCH_DEBOUNCE);
        let mut app = App::new(ApiClient::new("http://127.0.0.1:9"), debouncer);
        app.replace_clients(vec![client(2, "Ann", "123"), client(1, "Bo", "555")]);

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let (keys, mut events) = mpsc::unbounded();

        let typing = async {
            for code in [KeyCode::Char('/'), KeyCode::Char('b'), KeyCode::Char('o')] {
                keys.unbounded_send(key(code)).unwrap();
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            tokio::time::sleep(SEARCH_DEBOUNCE * 2).await;
            keys.unbounded_send(Ok(Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
            ))))
            .unwrap();
        };

        let (result, ()) = tokio::join!(
            run_app(&mut terminal, &mut app, &mut queries, &mut events),
            typing
        );
        result.unwrap();

        let names: Vec<&str> = app.view().rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bo"]);
        assert_eq!(app.search(), "bo");

        // The last frame was drawn before the quit key was handled.
        let screen = screen(&terminal);
        assert!(screen.contains("Bo"));
        assert!(!screen.contains("Ann"));
    }

    #[tokio::test]
    async fn closed_event_stream_ends_the_loop() {
        let (debouncer, mut queries) = Debouncer::new(SEARCH_DEBOUNCE);
        let mut app = App::new(ApiClient::new("http://127.0.0.1:9"), debouncer);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let mut events = futures::stream::empty::<io::Result<Event>>();

        run_app(&mut terminal, &mut app, &mut queries, &mut events)
            .await
            .unwrap();
    }
}
