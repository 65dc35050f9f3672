use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Quiet period after the last keystroke before the search runs.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Delays search queries until input goes quiet.
///
/// Each `push` aborts the pending task and schedules a new one carrying the
/// latest query. Queries that survive the delay arrive on the receiver
/// returned by `new`.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    fired: UnboundedSender<String>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> (Self, UnboundedReceiver<String>) {
        let (fired, receiver) = mpsc::unbounded_channel();

        let debouncer = Self {
            delay,
            pending: None,
            fired,
        };

        (debouncer, receiver)
    }

    pub fn push(&mut self, query: String) {
        self.cancel();

        let delay = self.delay;
        let fired = self.fired.clone();
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            // The receiver only goes away when the UI is shutting down.
            let _ = fired.send(query);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_of_keystrokes_fires_once_with_last_value() {
        let (mut debouncer, mut fired) = Debouncer::new(SEARCH_DEBOUNCE);

        debouncer.push("a".to_string());
        sleep(Duration::from_millis(100)).await;
        debouncer.push("an".to_string());
        sleep(Duration::from_millis(100)).await;
        debouncer.push("ann".to_string());

        sleep(Duration::from_millis(300)).await;

        assert_eq!(fired.recv().await.as_deref(), Some("ann"));
        assert!(fired.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_before_quiet_period() {
        let (mut debouncer, mut fired) = Debouncer::new(SEARCH_DEBOUNCE);

        debouncer.push("bo".to_string());
        sleep(Duration::from_millis(200)).await;

        assert!(fired.try_recv().is_err());

        sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.recv().await.as_deref(), Some("bo"));
    }

    #[tokio::test(start_paused = true)]
    async fn separated_keystrokes_fire_separately() {
        let (mut debouncer, mut fired) = Debouncer::new(SEARCH_DEBOUNCE);

        debouncer.push("a".to_string());
        sleep(Duration::from_millis(300)).await;
        debouncer.push("ab".to_string());
        sleep(Duration::from_millis(300)).await;

        assert_eq!(fired.recv().await.as_deref(), Some("a"));
        assert_eq!(fired.recv().await.as_deref(), Some("ab"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_query() {
        let (mut debouncer, mut fired) = Debouncer::new(SEARCH_DEBOUNCE);

        debouncer.push("x".to_string());
        debouncer.cancel();
        sleep(Duration::from_millis(500)).await;

        assert!(fired.try_recv().is_err());
    }
}
