//! Utility modules for common functionality

pub mod time;

pub use time::{format_epoch, format_epoch_local, now_epoch, parse_epoch};
