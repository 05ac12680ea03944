//! Doll oscillator
//!
//! A cooperative task that turns the doll back and forth forever:
//! face the player, hold, face away, hold, repeat. Each turn also schedules
//! a settle cue, the moment the new orientation takes effect. The task never
//! stops on its own; once abandoned every cue it receives is a no-op.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::state::DollOrientation;
use crate::tuning::RoundConfig;

/// A suspension point of the oscillator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DollCue {
    /// Start turning toward the orientation
    Turn(DollOrientation),
    /// The orientation is now in effect
    Settle(DollOrientation),
}

/// The first turn of every cycle
pub const FIRST_TURN: DollOrientation = DollOrientation::FacingPlayer;

#[derive(Debug, Clone)]
pub struct DollOscillator {
    rng: Pcg32,
    config: RoundConfig,
    abandoned: bool,
    turns: u32,
}

impl DollOscillator {
    pub fn new(config: &RoundConfig, seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            config: config.clone(),
            abandoned: false,
            turns: 0,
        }
    }

    /// Cue that kicks the cycle off
    pub fn first_cue(&self) -> DollCue {
        DollCue::Turn(FIRST_TURN)
    }

    /// Resume after `cue` fired. Returns the follow-up cues with their delays.
    pub fn on_cue(&mut self, cue: DollCue) -> Vec<(f64, DollCue)> {
        if self.abandoned {
            return Vec::new();
        }
        match cue {
            DollCue::Turn(to) => {
                self.turns += 1;
                let hold = self.sample_hold(to);
                vec![
                    (self.config.settle_delay(to), DollCue::Settle(to)),
                    (hold, DollCue::Turn(to.flipped())),
                ]
            }
            DollCue::Settle(_) => Vec::new(),
        }
    }

    /// Draw how long to hold `orientation` before turning again
    pub fn sample_hold(&mut self, orientation: DollOrientation) -> f64 {
        self.config.hold_range(orientation).sample(&mut self.rng)
    }

    /// Stop reacting to cues. In-flight cues stay queued and fizzle.
    pub fn abandon(&mut self) {
        self.abandoned = true;
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    /// Turns started so far
    pub fn turns(&self) -> u32 {
        self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::tuning::HoldRange;

    #[test]
    fn test_turn_schedules_settle_and_next_turn() {
        let config = RoundConfig::default();
        let mut osc = DollOscillator::new(&config, 7);

        let follow = osc.on_cue(osc.first_cue());
        assert_eq!(follow.len(), 2);
        assert_eq!(
            follow[0],
            (450.0, DollCue::Settle(DollOrientation::FacingPlayer))
        );
        let (hold, next) = follow[1];
        assert_eq!(next, DollCue::Turn(DollOrientation::FacingAway));
        assert!(config.facing_player_hold.contains(hold));

        let follow = osc.on_cue(next);
        assert_eq!(
            follow[0],
            (150.0, DollCue::Settle(DollOrientation::FacingAway))
        );
        assert!(config.facing_away_hold.contains(follow[1].0));
        assert_eq!(follow[1].1, DollCue::Turn(DollOrientation::FacingPlayer));
        assert_eq!(osc.turns(), 2);
    }

    #[test]
    fn test_turn_follows_configured_timings() {
        let config = RoundConfig {
            facing_player_hold: HoldRange::new(900.0, 900.0),
            settle_facing_player_ms: 300.0,
            ..Default::default()
        };
        let mut osc = DollOscillator::new(&config, 11);
        assert_eq!(
            osc.on_cue(osc.first_cue()),
            vec![
                (300.0, DollCue::Settle(DollOrientation::FacingPlayer)),
                (900.0, DollCue::Turn(DollOrientation::FacingAway)),
            ]
        );
    }

    #[test]
    fn test_settle_has_no_follow_up() {
        let mut osc = DollOscillator::new(&RoundConfig::default(), 1);
        assert!(
            osc.on_cue(DollCue::Settle(DollOrientation::FacingAway))
                .is_empty()
        );
    }

    #[test]
    fn test_abandoned_oscillator_goes_quiet() {
        let mut osc = DollOscillator::new(&RoundConfig::default(), 1);
        osc.abandon();
        assert!(osc.is_abandoned());
        assert!(osc.on_cue(osc.first_cue()).is_empty());
        assert_eq!(osc.turns(), 0);
    }

    #[test]
    fn test_same_seed_same_holds() {
        let config = RoundConfig::default();
        let mut a = DollOscillator::new(&config, 99);
        let mut b = DollOscillator::new(&config, 99);
        for _ in 0..20 {
            assert_eq!(
                a.sample_hold(DollOrientation::FacingAway),
                b.sample_hold(DollOrientation::FacingAway)
            );
        }
    }

    #[test]
    fn test_degenerate_range_returns_its_bound() {
        let config = RoundConfig {
            facing_player_hold: HoldRange::new(1_200.0, 1_200.0),
            ..Default::default()
        };
        let mut osc = DollOscillator::new(&config, 3);
        assert_eq!(osc.sample_hold(DollOrientation::FacingPlayer), 1_200.0);
    }

    proptest! {
        #[test]
        fn prop_holds_stay_in_range(seed in any::<u64>()) {
            let config = RoundConfig::default();
            let mut osc = DollOscillator::new(&config, seed);
            for _ in 0..200 {
                let player = osc.sample_hold(DollOrientation::FacingPlayer);
                prop_assert!(config.facing_player_hold.contains(player));
                let away = osc.sample_hold(DollOrientation::FacingAway);
                prop_assert!(config.facing_away_hold.contains(away));
            }
        }

        #[test]
        fn prop_custom_ranges_respected(
            seed in any::<u64>(),
            min in 500.0f64..3_000.0,
            span in 0.0f64..2_000.0,
        ) {
            let range = HoldRange::new(min, min + span);
            let config = RoundConfig {
                facing_player_hold: range,
                facing_away_hold: range,
                ..Default::default()
            };
            let mut osc = DollOscillator::new(&config, seed);
            for _ in 0..50 {
                let hold = osc.sample_hold(DollOrientation::FacingAway);
                prop_assert!(range.contains(hold));
            }
        }
    }
}
