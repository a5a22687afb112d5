//! Shutdown signal handling

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tracing::debug;

/// Set once SIGINT or SIGTERM arrives
pub struct ShutdownSignal {
    shutdown: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Get a clone of the shutdown flag
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Mark shutdown as requested and wake any waiter
    pub fn trigger(&self) {
        Self::fire(&self.shutdown, &self.notify);
    }

    /// Resolve once shutdown has been requested
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_shutdown() {
                return;
            }
            notified.await;
        }
    }

    /// Install the OS signal handlers
    #[cfg(unix)]
    pub async fn setup(&self) -> Result<(), std::io::Error> {
        use tokio::signal::unix::{signal, SignalKind};

        for (kind, name) in [
            (SignalKind::interrupt(), "SIGINT"),
            (SignalKind::terminate(), "SIGTERM"),
        ] {
            let mut stream = signal(kind)?;
            let shutdown = Arc::clone(&self.shutdown);
            let notify = Arc::clone(&self.notify);
            tokio::spawn(async move {
                if stream.recv().await.is_some() {
                    debug!(signal = name, "shutdown requested");
                    Self::fire(&shutdown, &notify);
                }
            });
        }

        Ok(())
    }

    /// Install the OS signal handlers
    #[cfg(not(unix))]
    pub async fn setup(&self) -> Result<(), std::io::Error> {
        let shutdown = Arc::clone(&self.shutdown);
        let notify = Arc::clone(&self.notify);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!(signal = "ctrl-c", "shutdown requested");
                Self::fire(&shutdown, &notify);
            }
        });
        Ok(())
    }

    fn fire(shutdown: &AtomicBool, notify: &Notify) {
        shutdown.store(true, Ordering::SeqCst);
        notify.notify_waiters();
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn shutdown_signal_default_is_false() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_shutdown());
    }

    #[test]
    fn shutdown_signal_flag_can_be_set() {
        let signal = ShutdownSignal::new();
        let flag = signal.flag();
        flag.store(true, Ordering::SeqCst);
        assert!(signal.is_shutdown());
    }

    #[tokio::test]
    async fn wait_returns_after_trigger() {
        let signal = Arc::new(ShutdownSignal::new());
        let trigger = Arc::clone(&signal);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.trigger();
        });
        tokio::time::timeout(Duration::from_secs(5), signal.wait())
            .await
            .unwrap();
        assert!(signal.is_shutdown());
    }

    #[tokio::test]
    async fn wait_returns_immediately_when_already_triggered() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        tokio::time::timeout(Duration::from_millis(100), signal.wait())
            .await
            .unwrap();
    }
}
