//! Rotating progress messages shown while an image uploads
//!
//! [`ProgressMessages::start`] spawns a ticker and hands back a guard. The
//! ticker lives exactly as long as the guard: dropping it aborts the task and
//! clears the published message, whichever way the upload settled.
//!
//! Only the most recently started ticker owns the channel. An older guard
//! that outlives a newer `start` neither rotates nor clears the message.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(3000);
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

pub const DEFAULT_MESSAGES: [&str; 5] = [
    "Having a glass of water while you wait?",
    "Time for a quick stretch!",
    "Remember to sit straight 🪑",
    "Breathe in, breathe out 🧘\u{200d}♀\u{fe0f}",
    "Almost there! Stay hydrated 💧",
];

pub fn default_messages() -> Vec<String> {
    DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect()
}

#[derive(Debug, Clone)]
pub struct ProgressMessages {
    tx: Arc<watch::Sender<Option<String>>>,
    generation: Arc<AtomicU64>,
    messages: Arc<[String]>,
    interval: Duration,
}

impl ProgressMessages {
    pub fn new(messages: Vec<String>, interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        let messages = if messages.is_empty() {
            default_messages()
        } else {
            messages
        };
        Self {
            tx: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            messages: messages.into(),
            interval: interval.max(MIN_INTERVAL),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Publish the first message now and rotate every `interval`
    pub fn start(&self) -> ProgressGuard {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let tx = self.tx.clone();
        let current = self.generation.clone();
        let messages = self.messages.clone();
        let interval = self.interval;

        tx.send_replace(messages.first().cloned());
        let task = tokio::spawn(async move {
            let mut index = 0usize;
            loop {
                tokio::time::sleep(interval).await;
                if current.load(Ordering::SeqCst) != generation {
                    break;
                }
                index = (index + 1) % messages.len();
                tx.send_replace(Some(messages[index].clone()));
            }
        });

        ProgressGuard {
            task,
            generation,
            current: self.generation.clone(),
            tx: self.tx.clone(),
        }
    }
}

impl Default for ProgressMessages {
    fn default() -> Self {
        Self::new(default_messages(), DEFAULT_INTERVAL)
    }
}

#[must_use = "the ticker stops when the guard is dropped"]
#[derive(Debug)]
pub struct ProgressGuard {
    task: JoinHandle<()>,
    generation: u64,
    current: Arc<AtomicU64>,
    tx: Arc<watch::Sender<Option<String>>>,
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.task.abort();
        if self.current.load(Ordering::SeqCst) == self.generation {
            self.tx.send_replace(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_rotates_and_wraps() {
        let progress = ProgressMessages::new(
            vec!["one".into(), "two".into()],
            Duration::from_secs(3),
        );
        let _guard = progress.start();
        assert_eq!(progress.current().as_deref(), Some("one"));

        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(progress.current().as_deref(), Some("two"));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(progress.current().as_deref(), Some("one"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_clears_and_stops() {
        let progress = ProgressMessages::default();
        let guard = progress.start();
        assert_eq!(progress.current().as_deref(), Some(DEFAULT_MESSAGES[0]));

        drop(guard);
        assert!(progress.current().is_none());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(progress.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_guard_leaves_newer_ticker_alone() {
        let progress = ProgressMessages::new(
            vec!["one".into(), "two".into()],
            Duration::from_secs(3),
        );
        let stale = progress.start();
        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(progress.current().as_deref(), Some("two"));

        let fresh = progress.start();
        assert_eq!(progress.current().as_deref(), Some("one"));

        drop(stale);
        assert_eq!(progress.current().as_deref(), Some("one"));

        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(progress.current().as_deref(), Some("two"));

        drop(fresh);
        assert!(progress.current().is_none());
    }

    #[test]
    fn test_interval_is_clamped_and_messages_defaulted() {
        let progress = ProgressMessages::new(Vec::new(), Duration::ZERO);
        assert_eq!(progress.interval(), MIN_INTERVAL);
        assert_eq!(progress.messages.len(), DEFAULT_MESSAGES.len());
    }
}
