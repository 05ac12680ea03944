//! Deterministic round simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only comes in through frame timestamps
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod evaluate;
pub mod oscillator;
pub mod round;
pub mod schedule;
pub mod state;
pub mod tween;

pub use evaluate::evaluate;
pub use oscillator::{DollCue, DollOscillator};
pub use round::Round;
pub use schedule::Scheduler;
pub use state::{Doll, DollOrientation, Outcome, PlayerState, RoundEvent, RoundState};
pub use tween::{Ease, Tween};
