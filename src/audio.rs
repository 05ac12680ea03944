//! Sound cues
//!
//! Procedurally generated with the Web Audio API, no sound files. Each
//! cue is a short list of enveloped oscillator notes.

use crate::sim::{DollOrientation, Outcome, RoundEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// "Starting in N"
    CountdownBeep,
    /// "Go!"
    Go,
    /// Doll starts turning to face the player
    DollTurn,
    Win,
    Lose,
    TimeUp,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Triangle,
}

/// One enveloped oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub freq: f32,
    /// Start offset in seconds
    pub delay: f64,
    /// Decay length in seconds
    pub length: f64,
    pub wave: Wave,
    /// Peak gain before master volume
    pub gain: f32,
}

const fn note(freq: f32, delay: f64, length: f64, wave: Wave, gain: f32) -> Note {
    Note {
        freq,
        delay,
        length,
        wave,
        gain,
    }
}

const COUNTDOWN_BEEP: &[Note] = &[note(440.0, 0.0, 0.15, Wave::Sine, 0.4)];
const GO: &[Note] = &[
    note(660.0, 0.0, 0.12, Wave::Triangle, 0.4),
    note(880.0, 0.1, 0.3, Wave::Triangle, 0.4),
];
const DOLL_TURN: &[Note] = &[note(220.0, 0.0, 0.4, Wave::Square, 0.15)];
const WIN: &[Note] = &[
    note(500.0, 0.0, 0.25, Wave::Triangle, 0.25),
    note(600.0, 0.08, 0.25, Wave::Triangle, 0.25),
    note(700.0, 0.16, 0.25, Wave::Triangle, 0.25),
    note(800.0, 0.24, 0.25, Wave::Triangle, 0.25),
    note(1000.0, 0.32, 0.25, Wave::Triangle, 0.25),
];
const LOSE: &[Note] = &[
    note(400.0, 0.0, 0.3, Wave::Sine, 0.3),
    note(350.0, 0.2, 0.3, Wave::Sine, 0.3),
    note(300.0, 0.4, 0.3, Wave::Sine, 0.3),
    note(200.0, 0.6, 0.3, Wave::Sine, 0.3),
];
const TIME_UP: &[Note] = &[
    note(300.0, 0.0, 0.2, Wave::Square, 0.2),
    note(300.0, 0.25, 0.5, Wave::Square, 0.2),
];

impl SoundEffect {
    /// Cue for a round event, if it has one
    pub fn for_event(event: &RoundEvent) -> Option<Self> {
        match *event {
            RoundEvent::CountdownChanged(0) => Some(Self::Go),
            RoundEvent::CountdownChanged(_) => Some(Self::CountdownBeep),
            RoundEvent::DollTurning(DollOrientation::FacingPlayer) => Some(Self::DollTurn),
            RoundEvent::Finished(Outcome::Won) => Some(Self::Win),
            RoundEvent::Finished(Outcome::Lost) => Some(Self::Lose),
            RoundEvent::Finished(Outcome::TimeExpired) => Some(Self::TimeUp),
            RoundEvent::Started
            | RoundEvent::DollTurning(DollOrientation::FacingAway)
            | RoundEvent::DollSettled(_) => None,
        }
    }

    pub fn notes(self) -> &'static [Note] {
        match self {
            Self::CountdownBeep => COUNTDOWN_BEEP,
            Self::Go => GO,
            Self::DollTurn => DOLL_TURN,
            Self::Win => WIN,
            Self::Lose => LOSE,
            Self::TimeUp => TIME_UP,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Note, SoundEffect, Wave};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for note in effect.notes() {
                self.play_note(ctx, note);
            }
        }

        fn play_note(&self, ctx: &AudioContext, note: &Note) {
            let Some((osc, gain)) = create_osc(ctx, note.freq, note.wave) else {
                return;
            };
            let t = ctx.current_time() + note.delay;

            gain.gain().set_value_at_time(self.volume * note.gain, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + note.length)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + note.length + 0.05).ok();
        }
    }

    /// Create an oscillator routed through a gain node
    fn create_osc(ctx: &AudioContext, freq: f32, wave: Wave) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(match wave {
            Wave::Sine => OscillatorType::Sine,
            Wave::Square => OscillatorType::Square,
            Wave::Triangle => OscillatorType::Triangle,
        });
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}
