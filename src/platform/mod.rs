//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key names to game commands)
//! - Time (frame timestamps, round seeds)

pub mod input;

pub use input::{Command, key_command};

/// Seed for a fresh round
#[cfg(target_arch = "wasm32")]
pub fn round_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed for a fresh round
#[cfg(not(target_arch = "wasm32"))]
pub fn round_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
