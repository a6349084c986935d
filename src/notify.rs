//! Transient user-facing notices (the toast layer)
//!
//! Flows push notices into an unbounded channel; whatever renders them
//! drains the receiver. A dropped receiver just means nobody is watching.

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Sending half handed to every flow that talks to the user
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn success(&self, text: impl Into<String>) {
        self.push(NoticeLevel::Success, text.into());
    }

    pub fn info(&self, text: impl Into<String>) {
        self.push(NoticeLevel::Info, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(NoticeLevel::Error, text.into());
    }

    fn push(&self, level: NoticeLevel, text: String) {
        tracing::debug!("notice {:?}: {}", level, text);
        if self.tx.send(Notice { level, text }).is_err() {
            tracing::trace!("notice dropped, no receiver");
        }
    }
}

/// Drain everything currently queued
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_arrive_in_order() {
        let (notifier, mut rx) = Notifier::channel();
        notifier.success("Welcome back!");
        notifier.error("Login failed");

        let notices = drain(&mut rx);
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[1].text, "Login failed");
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_dropped_receiver_is_harmless() {
        let (notifier, rx) = Notifier::channel();
        drop(rx);
        notifier.info("nobody listening");
    }
}
