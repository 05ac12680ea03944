//! A single round: intro, countdown, running, over
//!
//! `Round` owns every piece of mutable game state. The host feeds it frame
//! timestamps and key edges; deferred work (countdown, round timer, doll
//! turns) runs from the internal scheduler at the first frame that reaches
//! it. Every handler checks the round state first, so nothing scheduled
//! before the round ended can change its outcome.

use log::{debug, info};

use super::evaluate::evaluate;
use super::oscillator::{DollCue, DollOscillator};
use super::schedule::Scheduler;
use super::state::{Doll, Outcome, PlayerState, RoundEvent, RoundState};
use super::tween::{Ease, Tween};
use crate::error::ConfigError;
use crate::tuning::RoundConfig;

/// Deferred work owned by a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    /// Show countdown number n (0 = go)
    Countdown(u8),
    /// The time limit ran out
    RoundTimeout,
    Doll(DollCue),
}

pub struct Round {
    config: RoundConfig,
    seed: u64,
    state: RoundState,
    outcome: Option<Outcome>,
    player: PlayerState,
    doll: Doll,
    oscillator: DollOscillator,
    timers: Scheduler<TimerEvent>,
    begun: bool,
    countdown: Option<u8>,
    running_since: Option<f64>,
    finished_at: Option<f64>,
    last_frame: Option<f64>,
    frames: u64,
    events: Vec<RoundEvent>,
}

impl Round {
    pub fn new(config: RoundConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            player: PlayerState::new(config.start_position),
            doll: Doll::new(),
            oscillator: DollOscillator::new(&config, seed),
            timers: Scheduler::new(),
            config,
            seed,
            state: RoundState::Loading,
            outcome: None,
            begun: false,
            countdown: None,
            running_since: None,
            finished_at: None,
            last_frame: None,
            frames: 0,
            events: Vec::new(),
        })
    }

    /// Start the intro clock at `now`. Only the first call has any effect.
    pub fn begin(&mut self, now: f64) -> bool {
        if self.begun {
            return false;
        }
        self.begun = true;
        self.timers.advance_to(now);
        self.last_frame = Some(now);
        self.timers.schedule(
            self.config.intro_delay_ms,
            TimerEvent::Countdown(self.config.countdown_from),
        );
        info!("Round loading (seed {})", self.seed);
        true
    }

    /// One rendered frame at timestamp `now` (ms).
    ///
    /// Order: due timers, tweens, outcome evaluation, then movement.
    pub fn frame(&mut self, now: f64) {
        if self.state == RoundState::Over {
            return;
        }

        let dt = self.last_frame.map_or(0.0, |last| (now - last).max(0.0));
        self.last_frame = Some(now);

        while let Some((at, event)) = self.timers.pop_due(now) {
            self.dispatch(event, at);
        }
        self.timers.advance_to(now);

        self.doll.animate(dt);

        if self.state != RoundState::Running {
            return;
        }

        self.player.ease_velocity(dt);
        if let Some(outcome) = evaluate(
            &self.player,
            self.doll.orientation(),
            self.config.goal_position,
        ) {
            self.finish(outcome, now);
            return;
        }
        self.player.advance();
        self.frames += 1;
    }

    /// Move key pressed. Ignored unless running.
    pub fn press_forward(&mut self) -> bool {
        if self.state != RoundState::Running {
            return false;
        }
        self.player.run(self.config.run_velocity);
        true
    }

    /// Move key released. Ignored unless running.
    pub fn release_forward(&mut self) -> bool {
        if self.state != RoundState::Running {
            return false;
        }
        self.player.stop(self.config.stop_tween_ms);
        true
    }

    /// Notifications since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    fn dispatch(&mut self, event: TimerEvent, at: f64) {
        match event {
            TimerEvent::Countdown(n) => self.on_countdown(n, at),
            TimerEvent::RoundTimeout => {
                if self.state == RoundState::Running {
                    self.finish(Outcome::TimeExpired, at);
                } else {
                    debug!("Round timer fired while {}, ignoring", self.state.as_str());
                }
            }
            TimerEvent::Doll(cue) => self.on_doll_cue(cue),
        }
    }

    fn on_countdown(&mut self, n: u8, at: f64) {
        if self.state == RoundState::Loading {
            self.state = RoundState::Starting;
            debug!("Round starting at {at:.0}ms");
        }
        if self.state != RoundState::Starting {
            return;
        }

        self.countdown = Some(n);
        self.events.push(RoundEvent::CountdownChanged(n));
        if n == 0 {
            self.start_running(at);
        } else {
            self.timers
                .schedule(self.config.countdown_step_ms, TimerEvent::Countdown(n - 1));
        }
    }

    fn start_running(&mut self, at: f64) {
        self.state = RoundState::Running;
        self.running_since = Some(at);
        self.timers
            .schedule(self.config.time_limit_ms, TimerEvent::RoundTimeout);
        self.timers
            .schedule(0.0, TimerEvent::Doll(self.oscillator.first_cue()));
        self.events.push(RoundEvent::Started);
        info!(
            "Round running, {:.1}s on the clock",
            self.config.time_limit_ms / 1000.0
        );
    }

    fn on_doll_cue(&mut self, cue: DollCue) {
        if self.state != RoundState::Running || self.oscillator.is_abandoned() {
            debug!("Doll cue {cue:?} after round ended, ignoring");
            return;
        }

        match cue {
            DollCue::Turn(to) => {
                self.doll.begin_turn(to, self.config.turn_tween_ms);
                self.events.push(RoundEvent::DollTurning(to));
                debug!("Doll turning: {}", to.as_str());
            }
            DollCue::Settle(to) => {
                self.doll.settle(to);
                self.events.push(RoundEvent::DollSettled(to));
                debug!("Doll settled: {}", to.as_str());
            }
        }

        for (delay, next) in self.oscillator.on_cue(cue) {
            self.timers.schedule(delay, TimerEvent::Doll(next));
        }
    }

    fn finish(&mut self, outcome: Outcome, at: f64) {
        self.state = RoundState::Over;
        self.outcome = Some(outcome);
        self.finished_at = Some(at);
        self.oscillator.abandon();
        self.events.push(RoundEvent::Finished(outcome));
        info!(
            "Round over: {} (position {:.2}, {} frames, {} doll turns)",
            outcome.message(),
            self.player.position,
            self.frames,
            self.oscillator.turns()
        );
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.state == RoundState::Over
    }

    pub fn has_begun(&self) -> bool {
        self.begun
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn doll(&self) -> &Doll {
        &self.doll
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Countdown number last shown
    pub fn countdown(&self) -> Option<u8> {
        self.countdown
    }

    /// Frames evaluated while running
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Time left on the round clock; frozen once the round is over
    pub fn time_remaining_ms(&self) -> f64 {
        let limit = self.config.time_limit_ms;
        match self.running_since {
            None => limit,
            Some(since) => {
                let until = self.finished_at.unwrap_or_else(|| self.timers.now());
                (limit - (until - since)).clamp(0.0, limit)
            }
        }
    }

    /// Width of the time bar, 1 at the start down to 0 at the limit
    pub fn time_bar(&self) -> f32 {
        let limit = self.config.time_limit_ms;
        Tween::new(1.0, 0.0, limit, Ease::Linear).value_at(limit - self.time_remaining_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::DollOrientation;
    use proptest::prelude::*;

    /// Intro + countdown with default timing
    const GO_AT: f64 = 6_000.0;

    fn new_round(seed: u64) -> Round {
        let mut round = Round::new(RoundConfig::default(), seed).unwrap();
        round.begin(0.0);
        round
    }

    fn running_round(seed: u64) -> Round {
        let mut round = new_round(seed);
        round.frame(GO_AT);
        assert_eq!(round.state(), RoundState::Running);
        round
    }

    /// Step 10ms frames until `pred` holds, returning the time reached
    fn run_until(round: &mut Round, mut now: f64, pred: impl Fn(&Round) -> bool) -> f64 {
        while !pred(round) {
            now += 10.0;
            round.frame(now);
            assert!(now < 60_000.0, "condition never reached");
        }
        now
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = RoundConfig {
            run_velocity: 0.0,
            ..Default::default()
        };
        assert!(Round::new(config, 1).is_err());
    }

    #[test]
    fn test_countdown_sequence() {
        let mut round = new_round(1);
        assert!(!round.begin(100.0), "second begin is ignored");

        round.frame(2_999.0);
        assert_eq!(round.state(), RoundState::Loading);
        assert!(round.drain_events().is_empty());

        round.frame(3_000.0);
        assert_eq!(round.state(), RoundState::Starting);
        assert_eq!(round.countdown(), Some(3));
        assert_eq!(round.drain_events(), vec![RoundEvent::CountdownChanged(3)]);

        round.frame(4_000.0);
        assert_eq!(round.countdown(), Some(2));
        round.frame(5_500.0);
        assert_eq!(round.countdown(), Some(1));
        assert_eq!(round.state(), RoundState::Starting);

        round.drain_events();
        round.frame(GO_AT);
        assert_eq!(round.state(), RoundState::Running);
        assert_eq!(
            round.drain_events(),
            vec![
                RoundEvent::CountdownChanged(0),
                RoundEvent::Started,
                RoundEvent::DollTurning(DollOrientation::FacingPlayer),
            ]
        );
    }

    #[test]
    fn test_late_frame_catches_up_whole_countdown() {
        let mut round = new_round(1);
        round.frame(7_000.0);
        assert_eq!(round.state(), RoundState::Running);
        let events = round.drain_events();
        assert_eq!(&events[..4], &[
            RoundEvent::CountdownChanged(3),
            RoundEvent::CountdownChanged(2),
            RoundEvent::CountdownChanged(1),
            RoundEvent::CountdownChanged(0),
        ]);
        // Round clock started at the scheduled go time, not the late frame
        assert_eq!(round.time_remaining_ms(), 9_000.0);
    }

    #[test]
    fn test_input_ignored_before_running() {
        let mut round = new_round(1);
        assert!(!round.press_forward());
        round.frame(3_500.0);
        assert!(!round.press_forward());
        assert!(!round.release_forward());
        assert_eq!(round.player().velocity, 0.0);
        assert_eq!(round.player().position, RoundConfig::default().start_position);
    }

    #[test]
    fn test_no_movement_before_running() {
        let mut round = new_round(1);
        for t in (0..6_000).step_by(16) {
            round.frame(t as f64);
        }
        assert_eq!(round.frames(), 0);
        assert_eq!(round.player().position, RoundConfig::default().start_position);
    }

    #[test]
    fn test_doll_settles_after_lag() {
        let mut round = running_round(1);
        assert_eq!(round.doll().heading(), DollOrientation::FacingPlayer);
        assert_eq!(round.doll().orientation(), DollOrientation::FacingAway);

        round.frame(GO_AT + 449.0);
        assert_eq!(round.doll().orientation(), DollOrientation::FacingAway);

        round.frame(GO_AT + 450.0);
        assert_eq!(round.doll().orientation(), DollOrientation::FacingPlayer);
        assert!(!round.doll().is_unsettled());
    }

    #[test]
    fn test_moving_while_watched_loses_next_frame() {
        let mut round = running_round(1);
        round.frame(GO_AT + 450.0);
        assert_eq!(round.doll().orientation(), DollOrientation::FacingPlayer);

        assert!(round.press_forward());
        round.frame(GO_AT + 466.0);
        assert_eq!(round.state(), RoundState::Over);
        assert_eq!(round.outcome(), Some(Outcome::Lost));
        // The losing frame does not move the player
        assert_eq!(round.player().position, RoundConfig::default().start_position);
    }

    #[test]
    fn test_moving_during_settle_lag_is_safe() {
        let mut round = running_round(1);
        assert!(round.press_forward());
        let mut now = GO_AT;
        for _ in 0..10 {
            now += 10.0;
            round.frame(now);
        }
        assert!(round.release_forward());
        let stopped_at = round.player().position;
        assert!(stopped_at < RoundConfig::default().start_position);

        // Velocity eases out well before the doll's watch takes effect
        run_until(&mut round, now, |r| {
            r.doll().orientation() == DollOrientation::FacingPlayer
        });
        assert_eq!(round.state(), RoundState::Running);
        assert_eq!(round.player().velocity, 0.0);
    }

    #[test]
    fn test_reaching_goal_while_away_wins() {
        let mut round = running_round(42);
        let now = run_until(&mut round, GO_AT, |r| {
            r.doll().orientation() == DollOrientation::FacingAway
                && r.doll().heading() == DollOrientation::FacingAway
        });

        assert!(round.press_forward());
        run_until(&mut round, now, Round::is_over);
        assert_eq!(round.outcome(), Some(Outcome::Won));
        assert!(round.player().has_crossed(round.config().goal_position));
    }

    #[test]
    fn test_time_expires() {
        let mut round = running_round(5);
        round.frame(GO_AT + 9_999.0);
        assert_eq!(round.state(), RoundState::Running);
        assert!(round.time_remaining_ms() > 0.0);

        round.drain_events();
        round.frame(GO_AT + 10_000.0);
        assert_eq!(round.outcome(), Some(Outcome::TimeExpired));
        assert_eq!(round.time_remaining_ms(), 0.0);
        assert_eq!(round.time_bar(), 0.0);
        assert!(
            round
                .drain_events()
                .contains(&RoundEvent::Finished(Outcome::TimeExpired))
        );
    }

    #[test]
    fn test_timer_after_win_changes_nothing() {
        let mut round = running_round(42);
        let now = run_until(&mut round, GO_AT, |r| {
            r.doll().orientation() == DollOrientation::FacingAway
                && r.doll().heading() == DollOrientation::FacingAway
        });
        round.press_forward();
        run_until(&mut round, now, Round::is_over);
        assert_eq!(round.outcome(), Some(Outcome::Won));

        // Frames past the limit, and the timer itself firing late
        round.frame(GO_AT + 10_000.0);
        round.dispatch(TimerEvent::RoundTimeout, GO_AT + 10_000.0);
        assert_eq!(round.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn test_doll_cues_after_round_end_are_ignored() {
        let mut round = running_round(1);
        round.frame(GO_AT + 450.0);
        round.press_forward();
        round.frame(GO_AT + 460.0);
        assert!(round.is_over());

        let heading = round.doll().heading();
        round.dispatch(TimerEvent::Doll(DollCue::Turn(heading.flipped())), GO_AT + 2_000.0);
        round.dispatch(TimerEvent::Doll(DollCue::Settle(heading.flipped())), GO_AT + 2_000.0);
        assert_eq!(round.doll().heading(), heading);
        assert_eq!(round.doll().orientation(), DollOrientation::FacingPlayer);
    }

    #[test]
    fn test_time_bar_shrinks_linearly() {
        let mut round = new_round(1);
        assert_eq!(round.time_bar(), 1.0);
        round.frame(GO_AT);
        round.frame(GO_AT + 5_000.0);
        // Standing still: still running, half the time gone
        assert_eq!(round.state(), RoundState::Running);
        assert!((round.time_bar() - 0.5).abs() < 1e-6);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Press,
        Release,
        Idle,
    }

    fn op_strategy() -> impl Strategy<Value = (Op, f64)> {
        (
            prop_oneof![Just(Op::Press), Just(Op::Release), Just(Op::Idle)],
            1.0f64..40.0,
        )
    }

    proptest! {
        #[test]
        fn prop_position_moves_by_velocity_each_frame(
            seed in any::<u64>(),
            ops in proptest::collection::vec(op_strategy(), 1..300),
        ) {
            let mut round = running_round(seed);
            let mut now = GO_AT;
            for (op, dt) in ops {
                match op {
                    Op::Press => { round.press_forward(); }
                    Op::Release => { round.release_forward(); }
                    Op::Idle => {}
                }
                let before = round.player().position;
                now += dt;
                round.frame(now);
                let after = round.player().position;
                if round.is_over() {
                    prop_assert_eq!(after, before);
                    break;
                }
                prop_assert_eq!(after, before + round.player().velocity);
            }
        }

        #[test]
        fn prop_over_is_terminal(
            seed in any::<u64>(),
            ops in proptest::collection::vec(op_strategy(), 1..100),
        ) {
            let mut round = running_round(seed);
            round.frame(GO_AT + 450.0);
            round.press_forward();
            round.frame(GO_AT + 460.0);
            prop_assert_eq!(round.outcome(), Some(Outcome::Lost));
            round.drain_events();

            let position = round.player().position;
            let frames = round.frames();
            let mut now = GO_AT + 460.0;
            for (op, dt) in ops {
                match op {
                    Op::Press => prop_assert!(!round.press_forward()),
                    Op::Release => prop_assert!(!round.release_forward()),
                    Op::Idle => {}
                }
                now += dt * 100.0;
                round.frame(now);
            }
            prop_assert_eq!(round.player().position, position);
            prop_assert_eq!(round.frames(), frames);
            prop_assert_eq!(round.outcome(), Some(Outcome::Lost));
            prop_assert!(round.drain_events().is_empty());
        }
    }
}
