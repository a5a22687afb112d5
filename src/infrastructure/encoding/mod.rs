//! MP3 encoding infrastructure module

mod lame;

pub use lame::LameEncoder;
