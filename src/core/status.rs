use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageLevel {
    Info,
    Success,
    Error,
}

/// One transient status line shown in the toolbar. Messages expire on their
/// own; only the newest one is kept.
#[derive(Debug, Clone)]
pub struct StatusLine {
    current: Option<(String, MessageLevel, Instant)>,
    ttl: Duration,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            current: None,
            ttl: Duration::from_secs(3),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.current = Some((text.into(), MessageLevel::Info, Instant::now()));
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.current = Some((text.into(), MessageLevel::Success, Instant::now()));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.current = Some((text.into(), MessageLevel::Error, Instant::now()));
    }

    /// Drop the message once its time is up.
    pub fn update(&mut self) {
        if let Some((_, _, created)) = &self.current {
            if created.elapsed() >= self.ttl {
                self.current = None;
            }
        }
    }

    pub fn message(&self) -> Option<(&str, MessageLevel)> {
        self.current
            .as_ref()
            .map(|(text, level, _)| (text.as_str(), *level))
    }
}
