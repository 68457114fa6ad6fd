//! Loop normalisation and frame bracketing

use glam::Vec3;

use super::motion::MotionFrame;

/// Reduce a playback time into `[0, duration)`
///
/// Times past the end wrap around any number of times, negative times wrap
/// backwards. Non-finite times collapse to the start of the loop.
pub fn normalize_time(time: f32, duration: f32) -> f32 {
    let t = time.rem_euclid(duration);
    // rem_euclid may round up to `duration` for tiny negative inputs
    if !t.is_finite() || t >= duration {
        0.0
    } else {
        t
    }
}

/// Bracketing frame indices and blend ratio for a playback time
///
/// Returns `(prev, next, ratio)` where `prev = floor(t / duration * n)`,
/// `next = ceil(t / duration * n)` wrapped to 0 at `n`, and `ratio` is the
/// fractional position between them in `[0, 1)`.
pub fn sample_indices(time: f32, duration: f32, frame_count: usize) -> (usize, usize, f32) {
    if frame_count == 0 {
        return (0, 0, 0.0);
    }

    let scaled = normalize_time(time, duration) / duration * frame_count as f32;
    if scaled >= frame_count as f32 {
        return (0, 0, 0.0);
    }

    let prev = scaled.floor() as usize;
    let mut next = scaled.ceil() as usize;
    if next >= frame_count {
        next = 0;
    }
    let ratio = (scaled - prev as f32).clamp(0.0, 1.0);

    (prev, next, ratio)
}

/// Two bracketing frames and the blend ratio between them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample<'a> {
    /// Frame at or before the sampled time
    pub prev: &'a MotionFrame,
    /// Frame after the sampled time (frame 0 when closing the loop)
    pub next: &'a MotionFrame,
    /// Index of `prev`
    pub prev_index: usize,
    /// Index of `next`
    pub next_index: usize,
    /// Blend ratio from `prev` towards `next`
    pub ratio: f32,
}

impl FrameSample<'_> {
    /// Number of joints the sampled frames carry
    pub fn joint_count(&self) -> usize {
        self.prev.joint_count()
    }

    /// Per-channel linear blend of the joint's Euler rotation (degrees)
    ///
    /// Channels are blended independently; at `ratio == 0` the previous
    /// frame is reproduced exactly.
    pub fn joint_rotation(&self, joint: usize) -> Vec3 {
        let a = self.prev.joint_rotation(joint);
        if self.ratio <= 0.0 {
            return a;
        }
        let b = self.next.joint_rotation(joint);
        a + (b - a) * self.ratio
    }
}
