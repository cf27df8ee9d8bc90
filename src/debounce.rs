//! Debounced recompute for search input.
//!
//! Every new value cancels the pending recompute and restarts the quiet
//! window; only the latest value is released once the window passes with
//! no further input.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Sending half; cloneable, dropping all senders ends the stream
#[derive(Debug, Clone)]
pub struct DebounceSender<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> DebounceSender<T> {
    /// Queue a value; returns false once the receiving side is gone
    pub fn send(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    rx: mpsc::UnboundedReceiver<T>,
}

/// Create a debounced channel with the given quiet window
pub fn debounce_channel<T>(window: Duration) -> (DebounceSender<T>, Debouncer<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DebounceSender { tx }, Debouncer { window, rx })
}

impl<T> Debouncer<T> {
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Next settled value, or `None` when all senders are dropped and
    /// nothing is pending. A value pending when the senders close is
    /// released immediately.
    pub async fn next(&mut self) -> Option<T> {
        let mut latest = self.rx.recv().await?;

        loop {
            match timeout(self.window, self.rx.recv()).await {
                Ok(Some(value)) => latest = value,
                Ok(None) | Err(_) => return Some(latest),
            }
        }
    }
}
