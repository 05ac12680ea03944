//! Round state and core simulation types

use serde::{Deserialize, Serialize};

use super::tween::{Ease, Tween};
use crate::consts::*;

/// Phase of a round. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoundState {
    /// Intro pause, model loading
    Loading,
    /// Countdown showing
    Starting,
    /// Player may move, doll is turning
    Running,
    /// Terminal
    Over,
}

impl RoundState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundState::Loading => "loading",
            RoundState::Starting => "starting",
            RoundState::Running => "running",
            RoundState::Over => "over",
        }
    }
}

/// Which way the doll is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DollOrientation {
    /// Back turned: moving is safe
    FacingAway,
    /// Watching: moving loses
    FacingPlayer,
}

impl DollOrientation {
    pub fn flipped(self) -> Self {
        match self {
            DollOrientation::FacingAway => DollOrientation::FacingPlayer,
            DollOrientation::FacingPlayer => DollOrientation::FacingAway,
        }
    }

    /// Doll yaw for this orientation
    pub fn rotation(self) -> f32 {
        match self {
            DollOrientation::FacingAway => FACING_AWAY_ROTATION,
            DollOrientation::FacingPlayer => FACING_PLAYER_ROTATION,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DollOrientation::FacingAway => "facing away",
            DollOrientation::FacingPlayer => "facing player",
        }
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
    TimeExpired,
}

impl Outcome {
    /// Banner text
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Won => "You win!",
            Outcome::Lost => "You lose",
            Outcome::TimeExpired => "Time over!",
        }
    }
}

/// Player position and velocity along the track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: f32,
    pub velocity: f32,
    /// Ease-out back to rest after the move key is released
    #[serde(skip)]
    stop_tween: Option<Tween>,
}

impl PlayerState {
    pub fn new(position: f32) -> Self {
        Self {
            position,
            velocity: 0.0,
            stop_tween: None,
        }
    }

    /// Start moving at `velocity`; interrupts any ease-out
    pub fn run(&mut self, velocity: f32) {
        self.stop_tween = None;
        self.velocity = velocity;
    }

    /// Ease velocity to zero over `duration_ms`
    pub fn stop(&mut self, duration_ms: f64) {
        if self.velocity == 0.0 {
            self.stop_tween = None;
            return;
        }
        self.stop_tween = Some(Tween::new(self.velocity, 0.0, duration_ms, Ease::Power1Out));
    }

    /// Step the ease-out, if one is running
    pub fn ease_velocity(&mut self, dt_ms: f64) {
        if let Some(tween) = &mut self.stop_tween {
            self.velocity = tween.advance(dt_ms);
            if tween.is_finished() {
                self.stop_tween = None;
            }
        }
    }

    /// Moving toward the goal (an easing-out player still counts)
    pub fn is_advancing(&self) -> bool {
        self.velocity * FORWARD > 0.0
    }

    /// Strictly past `goal` in the forward direction
    pub fn has_crossed(&self, goal: f32) -> bool {
        (self.position - goal) * FORWARD > 0.0
    }

    /// One frame of movement
    pub fn advance(&mut self) {
        self.position += self.velocity;
    }
}

/// The doll: a visual heading that tweens, and a logical orientation that
/// lags behind it until the turn settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doll {
    orientation: DollOrientation,
    heading: DollOrientation,
    rotation_y: f32,
    #[serde(skip)]
    turn: Option<Tween>,
}

impl Default for Doll {
    fn default() -> Self {
        Self::new()
    }
}

impl Doll {
    /// Starts logically facing away while visually facing the player;
    /// the first turn corrects the mismatch.
    pub fn new() -> Self {
        Self {
            orientation: DollOrientation::FacingAway,
            heading: DollOrientation::FacingPlayer,
            rotation_y: FACING_PLAYER_ROTATION,
            turn: None,
        }
    }

    /// Begin the visual turn; logical orientation is untouched until `settle`
    pub fn begin_turn(&mut self, to: DollOrientation, duration_ms: f64) {
        self.heading = to;
        self.turn = Some(Tween::new(
            self.rotation_y,
            to.rotation(),
            duration_ms,
            Ease::Power1Out,
        ));
    }

    /// Make `to` the logical orientation
    pub fn settle(&mut self, to: DollOrientation) {
        self.orientation = to;
    }

    /// Step the rotation tween
    pub fn animate(&mut self, dt_ms: f64) {
        if let Some(turn) = &mut self.turn {
            self.rotation_y = turn.advance(dt_ms);
            if turn.is_finished() {
                self.turn = None;
            }
        }
    }

    /// Orientation the evaluator sees
    pub fn orientation(&self) -> DollOrientation {
        self.orientation
    }

    /// Orientation the doll is visually turning or turned toward
    pub fn heading(&self) -> DollOrientation {
        self.heading
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn is_turning(&self) -> bool {
        self.turn.is_some()
    }

    /// Visual and logical orientation disagree
    pub fn is_unsettled(&self) -> bool {
        self.heading != self.orientation
    }
}

/// Notifications for the host (HUD, audio, logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// Countdown number now showing; 0 means "Go!"
    CountdownChanged(u8),
    Started,
    DollTurning(DollOrientation),
    DollSettled(DollOrientation),
    Finished(Outcome),
}
