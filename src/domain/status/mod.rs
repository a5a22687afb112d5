//! Status events raised by the recording pipeline

mod event;

pub use event::StatusEvent;
