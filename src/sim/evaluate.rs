//! Per-frame outcome evaluation

use super::state::{DollOrientation, Outcome, PlayerState};

/// Decide whether this frame ends the round.
///
/// Loss is checked before win: a frame that both crosses the goal and is
/// caught moving by the doll is a loss.
pub fn evaluate(player: &PlayerState, doll: DollOrientation, goal: f32) -> Option<Outcome> {
    if player.is_advancing() && doll == DollOrientation::FacingPlayer {
        return Some(Outcome::Lost);
    }
    if player.has_crossed(goal) {
        return Some(Outcome::Won);
    }
    None
}
