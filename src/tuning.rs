//! Data-driven round timing
//!
//! Defaults reproduce the classic game. Everything is in milliseconds on the
//! frame clock, positions and velocities are in world units (per frame).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::DollOrientation;

/// Inclusive range a hold duration is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldRange {
    pub min_ms: f64,
    pub max_ms: f64,
}

impl HoldRange {
    pub const fn new(min_ms: f64, max_ms: f64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn contains(&self, ms: f64) -> bool {
        ms >= self.min_ms && ms <= self.max_ms
    }

    /// Uniform draw. Caller guarantees the range was validated.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.min_ms..=self.max_ms)
    }
}

/// Timing and geometry of a single round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub start_position: f32,
    /// Crossing this position wins
    pub goal_position: f32,
    pub run_velocity: f32,
    pub stop_tween_ms: f64,

    pub time_limit_ms: f64,
    pub intro_delay_ms: f64,
    pub countdown_from: u8,
    pub countdown_step_ms: f64,

    pub turn_tween_ms: f64,
    /// Lag between starting a turn away and moving becoming safe
    pub settle_facing_away_ms: f64,
    /// Lag between starting a turn toward the player and moving becoming fatal
    pub settle_facing_player_ms: f64,
    pub facing_player_hold: HoldRange,
    pub facing_away_hold: HoldRange,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            start_position: START_POSITION,
            goal_position: crate::goal_position(),
            run_velocity: RUN_VELOCITY,
            stop_tween_ms: STOP_TWEEN_MS,

            time_limit_ms: TIME_LIMIT_MS,
            intro_delay_ms: INTRO_DELAY_MS,
            countdown_from: COUNTDOWN_FROM,
            countdown_step_ms: COUNTDOWN_STEP_MS,

            turn_tween_ms: TURN_TWEEN_MS,
            settle_facing_away_ms: SETTLE_FACING_AWAY_MS,
            settle_facing_player_ms: SETTLE_FACING_PLAYER_MS,
            facing_player_hold: HoldRange::new(FACING_PLAYER_HOLD_MS.0, FACING_PLAYER_HOLD_MS.1),
            facing_away_hold: HoldRange::new(FACING_AWAY_HOLD_MS.0, FACING_AWAY_HOLD_MS.1),
        }
    }
}

impl RoundConfig {
    /// Hold range used after turning to `orientation`
    pub fn hold_range(&self, orientation: DollOrientation) -> HoldRange {
        match orientation {
            DollOrientation::FacingPlayer => self.facing_player_hold,
            DollOrientation::FacingAway => self.facing_away_hold,
        }
    }

    /// Delay between a turn to `orientation` starting and it taking effect
    pub fn settle_delay(&self, orientation: DollOrientation) -> f64 {
        match orientation {
            DollOrientation::FacingPlayer => self.settle_facing_player_ms,
            DollOrientation::FacingAway => self.settle_facing_away_ms,
        }
    }

    /// Reject configs that would break round sequencing.
    ///
    /// A hold shorter than its settle delay would let a stale settle land
    /// after the next turn began, so holds must outlast both settles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("time_limit_ms", self.time_limit_ms),
            ("countdown_step_ms", self.countdown_step_ms),
            ("turn_tween_ms", self.turn_tween_ms),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        for (field, value) in [
            ("intro_delay_ms", self.intro_delay_ms),
            ("stop_tween_ms", self.stop_tween_ms),
            ("settle_facing_away_ms", self.settle_facing_away_ms),
            ("settle_facing_player_ms", self.settle_facing_player_ms),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if !(self.run_velocity * FORWARD > 0.0) {
            return Err(ConfigError::NotForward(self.run_velocity));
        }
        if !((self.goal_position - self.start_position) * FORWARD > 0.0) {
            return Err(ConfigError::GoalBehindStart {
                start: self.start_position,
                goal: self.goal_position,
            });
        }

        let longest_settle = self.settle_facing_away_ms.max(self.settle_facing_player_ms);
        for (which, range) in [
            ("facing-player", self.facing_player_hold),
            ("facing-away", self.facing_away_hold),
        ] {
            if !(range.min_ms <= range.max_ms) || range.min_ms < 0.0 {
                return Err(ConfigError::EmptyRange {
                    which,
                    min_ms: range.min_ms,
                    max_ms: range.max_ms,
                });
            }
            if range.min_ms <= longest_settle {
                return Err(ConfigError::HoldShorterThanSettle {
                    which,
                    hold_ms: range.min_ms,
                    settle_ms: longest_settle,
                });
            }
        }

        Ok(())
    }
}
