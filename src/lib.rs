//! mp3rec - record microphone audio straight to MP3
//!
//! This crate captures mono 16-bit PCM from an input device, encodes it
//! with LAME on a background worker and appends the MP3 frames to a file,
//! reporting progress only through status events.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, status events, pipeline state and errors
//! - **Application**: The recording pipeline and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, LAME, filesystem, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
