//! Playback clock for a looping clip

use super::sampling::normalize_time;

/// Loop-normalised playback position, advanced once per rendered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackClock {
    /// Current time within the loop (seconds)
    time: f32,
    /// Loop duration (seconds)
    duration: f32,
}

impl PlaybackClock {
    /// Create a clock at the start of a loop of `duration` seconds
    pub fn new(duration: f32) -> Self {
        Self {
            time: 0.0,
            duration,
        }
    }

    /// Advance by `elapsed` seconds, wrapping at the loop end
    ///
    /// Returns the new loop-normalised time. Non-finite input leaves the
    /// clock untouched.
    pub fn tick(&mut self, elapsed: f32) -> f32 {
        if !elapsed.is_finite() {
            log::warn!("Ignoring non-finite clock delta {}", elapsed);
            return self.time;
        }
        self.time = normalize_time(self.time + elapsed, self.duration);
        self.time
    }

    /// Jump to an absolute playback time
    pub fn seek(&mut self, time: f32) {
        self.time = normalize_time(time, self.duration);
    }

    /// Reset the time to the beginning of the loop
    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    /// Current time within the loop
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Loop duration
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Position within the loop in `[0, 1)`
    pub fn progress(&self) -> f32 {
        self.time / self.duration
    }
}
