use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Cancelable one-shot timer.
///
/// Scheduling aborts whatever was pending, so a burst of calls within the
/// window fires only the last callback. Dropping the debouncer aborts the
/// pending callback too.
///
/// Must be used from inside a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Runs `fire` once the window elapses without another `schedule` call.
    pub fn schedule<F>(&mut self, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            sleep(window).await;
            fire();
        }));
    }

    /// Returns true if a callback was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
