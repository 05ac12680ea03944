//! Red Light - a "Red Light, Green Light" reflex game
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (timers, doll, player, outcome)
//! - `renderer`: WebGPU scene rendering
//! - `platform`: Browser/native platform abstraction
//! - `asset`: Doll model loading (glTF)
//! - `tuning`: Data-driven round timing
//! - `ui`: HUD banner text
//! - `audio`: Sound cues (Web Audio on wasm)

pub mod asset;
pub mod audio;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::{AssetError, ConfigError, GameError};
pub use settings::Settings;
pub use tuning::{HoldRange, RoundConfig};

/// Game configuration constants
pub mod consts {
    /// Player start position along the track (X axis)
    pub const START_POSITION: f32 = 3.0;
    /// Far end of the track
    pub const END_POSITION: f32 = -START_POSITION;
    /// How far short of the far end the player already counts as home
    pub const GOAL_MARGIN: f32 = 0.4;
    /// Sign of forward movement along X (the goal is at negative X)
    pub const FORWARD: f32 = -1.0;

    /// Velocity while the move key is held (units per frame)
    pub const RUN_VELOCITY: f32 = -0.2;
    /// Ease-out of velocity back to zero after releasing the move key
    pub const STOP_TWEEN_MS: f64 = 100.0;

    /// Round length once running
    pub const TIME_LIMIT_MS: f64 = 10_000.0;
    /// Loading pause before the countdown shows
    pub const INTRO_DELAY_MS: f64 = 3_000.0;
    /// Countdown starts at this number
    pub const COUNTDOWN_FROM: u8 = 3;
    /// Spacing between countdown numbers
    pub const COUNTDOWN_STEP_MS: f64 = 1_000.0;

    /// Visual turn duration of the doll
    pub const TURN_TWEEN_MS: f64 = 450.0;
    /// Doll yaw when facing the player
    pub const FACING_PLAYER_ROTATION: f32 = 0.0;
    /// Doll yaw when facing away (close to, not exactly, half a turn)
    pub const FACING_AWAY_ROTATION: f32 = -3.15;
    /// Delay after a turn away starts before moving becomes safe
    pub const SETTLE_FACING_AWAY_MS: f64 = 150.0;
    /// Delay after a turn toward the player starts before moving becomes fatal
    pub const SETTLE_FACING_PLAYER_MS: f64 = 450.0;
    /// Hold while facing the player (uniform, inclusive)
    pub const FACING_PLAYER_HOLD_MS: (f64, f64) = (1_000.0, 1_750.0);
    /// Hold while facing away (uniform, inclusive)
    pub const FACING_AWAY_HOLD_MS: (f64, f64) = (1_000.0, 2_000.0);

    /// Doll model location, relative to the page
    pub const DOLL_MODEL_PATH: &str = "/models/squid_game/scene.gltf";
}

/// Goal threshold derived from the track ends
#[inline]
pub fn goal_position() -> f32 {
    consts::END_POSITION - consts::FORWARD * consts::GOAL_MARGIN
}

/// Convert a 0xRRGGBB colour to RGBA floats
#[inline]
pub const fn rgb_hex(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}
