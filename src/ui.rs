//! HUD text derived from round state

use crate::sim::{Round, RoundState};

/// Shown under the banner once a round is over
pub const RESTART_HINT: &str = "Press Enter or R to play again";

/// Banner text for the current round
pub fn banner_text(round: &Round) -> String {
    match round.state() {
        RoundState::Loading => String::new(),
        RoundState::Starting => match round.countdown() {
            Some(n) if n > 0 => format!("Starting in {n}"),
            _ => "Go!".to_string(),
        },
        RoundState::Running => "Go!".to_string(),
        RoundState::Over => round
            .outcome()
            .map(|outcome| outcome.message().to_string())
            .unwrap_or_default(),
    }
}

/// Second HUD line, if any
pub fn hint_text(round: &Round) -> Option<&'static str> {
    round.is_over().then_some(RESTART_HINT)
}

/// Rolling frames-per-second estimate over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Record a frame timestamp (ms)
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // The slot we will overwrite next holds the oldest sample;
        // N samples span N - 1 frame intervals
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time - oldest;
            if elapsed > 0.0 {
                let intervals = (self.frame_times.len() - 1) as f64;
                self.fps = (intervals * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
