//! Status listener port interface

use crate::domain::status::StatusEvent;

/// Receiver of pipeline status events.
///
/// Called synchronously on the recording worker, in the order events are
/// raised. Implementations must not block for long; hand events off to a
/// channel if real work is needed.
pub trait StatusListener: Send + Sync {
    fn on_event(&self, event: StatusEvent);
}

impl<F> StatusListener for F
where
    F: Fn(StatusEvent) + Send + Sync,
{
    fn on_event(&self, event: StatusEvent) {
        self(event)
    }
}
