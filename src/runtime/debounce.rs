//! Timer-with-invalidation debounce.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Default settle window for typed filter input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Publishes a value only after it has stayed unchanged for `delay`.
///
/// Each [`push`](Debouncer::push) aborts the pending timer, so the latest
/// value always wins and superseded values are never published.
pub struct Debouncer<T> {
    delay: Duration,
    output: Arc<watch::Sender<T>>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Clone + Send + Sync + 'static> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> (Self, watch::Receiver<T>) {
        let (output, settled) = watch::channel(initial);
        let debouncer = Self {
            delay,
            output: Arc::new(output),
            pending: None,
        };
        (debouncer, settled)
    }

    pub fn push(&mut self, value: T) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let output = Arc::clone(&self.output);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            output.send_replace(value);
        }));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_settles() {
        let (mut debouncer, mut settled) = Debouncer::new(String::new(), DEFAULT_DEBOUNCE);

        debouncer.push("r".to_string());
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.push("ri".to_string());
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.push("rick".to_string());

        settled.changed().await.unwrap();
        assert_eq!(*settled.borrow_and_update(), "rick");
        assert!(!settled.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_published_before_window() {
        let (mut debouncer, settled) = Debouncer::new(0u32, Duration::from_millis(500));

        debouncer.push(7);
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(*settled.borrow(), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*settled.borrow(), 7);
    }
}
