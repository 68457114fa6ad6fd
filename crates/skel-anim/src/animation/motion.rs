//! Motion frames and loopable clips

use glam::Vec3;

use super::sampling::{FrameSample, sample_indices};
use crate::error::{AnimError, Result};

/// Number of root channels preceding the per-joint rotations
/// (global position followed by root orientation)
pub const ROOT_CHANNELS: usize = 6;

/// Rotation channels stored per joint
pub const CHANNELS_PER_JOINT: usize = 3;

/// Number of channels a frame carries for a skeleton of `joint_count` joints
///
/// The root orientation doubles as joint 0's rotation slot, so joint `j`
/// starts at channel `3 + 3 * j`.
pub const fn channel_count(joint_count: usize) -> usize {
    ROOT_CHANNELS - CHANNELS_PER_JOINT + CHANNELS_PER_JOINT * joint_count
}

/// One row of motion data
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MotionFrame {
    channels: Vec<f32>,
}

impl MotionFrame {
    /// Wrap a raw channel row
    pub fn from_channels(channels: Vec<f32>) -> Self {
        Self { channels }
    }

    /// Build a frame from root position and one Euler rotation (degrees) per joint
    ///
    /// `rotations[0]` is stored as the root orientation.
    pub fn new(root_position: Vec3, rotations: &[Vec3]) -> Self {
        let mut channels = Vec::with_capacity(channel_count(rotations.len().max(1)));
        channels.extend_from_slice(&root_position.to_array());
        if rotations.is_empty() {
            channels.extend_from_slice(&[0.0; CHANNELS_PER_JOINT]);
        }
        for rotation in rotations {
            channels.extend_from_slice(&rotation.to_array());
        }
        Self { channels }
    }

    /// A frame with every channel at zero for `joint_count` joints
    pub fn rest(joint_count: usize) -> Self {
        Self {
            channels: vec![0.0; channel_count(joint_count)],
        }
    }

    /// Raw channel values
    pub fn channels(&self) -> &[f32] {
        &self.channels
    }

    /// Number of joints this frame carries rotations for
    pub fn joint_count(&self) -> usize {
        let len = self.channels.len() + CHANNELS_PER_JOINT;
        len.saturating_sub(ROOT_CHANNELS) / CHANNELS_PER_JOINT
    }

    /// Global root position (unused by pose evaluation)
    pub fn root_position(&self) -> Vec3 {
        self.vec3_at(0)
    }

    /// Global root orientation (unused by pose evaluation)
    pub fn root_orientation(&self) -> Vec3 {
        self.vec3_at(CHANNELS_PER_JOINT)
    }

    /// Euler rotation channels of `joint` in degrees, as (x, y, z)
    pub fn joint_rotation(&self, joint: usize) -> Vec3 {
        self.vec3_at(ROOT_CHANNELS - CHANNELS_PER_JOINT + CHANNELS_PER_JOINT * joint)
    }

    fn vec3_at(&self, start: usize) -> Vec3 {
        self.channels
            .get(start..start + 3)
            .map_or(Vec3::ZERO, Vec3::from_slice)
    }

    fn has_valid_layout(&self) -> bool {
        let len = self.channels.len();
        len >= ROOT_CHANNELS && (len - ROOT_CHANNELS) % CHANNELS_PER_JOINT == 0
    }
}

/// An implicitly looping sequence of frames spread evenly over a fixed duration
///
/// With the `serde` feature, deserialization goes through [`MotionClip::new`]
/// and fails on the same input the constructor rejects.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ClipData", into = "ClipData"))]
pub struct MotionClip {
    frames: Vec<MotionFrame>,
    duration: f32,
}

/// Serialized form of a clip, validated on the way in
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct ClipData {
    frames: Vec<MotionFrame>,
    duration: f32,
}

#[cfg(feature = "serde")]
impl TryFrom<ClipData> for MotionClip {
    type Error = AnimError;

    fn try_from(data: ClipData) -> Result<Self> {
        Self::new(data.frames, data.duration)
    }
}

#[cfg(feature = "serde")]
impl From<MotionClip> for ClipData {
    fn from(clip: MotionClip) -> Self {
        Self {
            frames: clip.frames,
            duration: clip.duration,
        }
    }
}

impl MotionClip {
    /// Create a clip
    ///
    /// # Arguments
    /// * `frames` - Motion frames in playback order
    /// * `duration` - Total loop duration in seconds
    pub fn new(frames: Vec<MotionFrame>, duration: f32) -> Result<Self> {
        if frames.is_empty() {
            return Err(AnimError::EmptyMotionClip);
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(AnimError::InvalidDuration(duration));
        }

        let expected = frames[0].channels.len();
        for (index, frame) in frames.iter().enumerate() {
            if !frame.has_valid_layout() || frame.channels.len() != expected {
                return Err(AnimError::InvalidChannelCount {
                    frame: index,
                    channels: frame.channels.len(),
                });
            }
        }

        log::debug!(
            "Loaded motion clip: {} frames, {} joints, {:.3}s",
            frames.len(),
            frames[0].joint_count(),
            duration
        );

        Ok(Self { frames, duration })
    }

    /// Create a clip from flat channel rows
    pub fn from_rows(rows: Vec<Vec<f32>>, duration: f32) -> Result<Self> {
        Self::new(
            rows.into_iter().map(MotionFrame::from_channels).collect(),
            duration,
        )
    }

    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of joints each frame carries rotations for
    pub fn joint_count(&self) -> usize {
        self.frames[0].joint_count()
    }

    /// Total loop duration in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Seconds between two consecutive frames
    pub fn frame_time(&self) -> f32 {
        self.duration / self.frames.len() as f32
    }

    /// All frames
    pub fn frames(&self) -> &[MotionFrame] {
        &self.frames
    }

    /// Frame at `index`
    pub fn frame(&self, index: usize) -> Option<&MotionFrame> {
        self.frames.get(index)
    }

    /// Bracketing frames and blend ratio for a playback time
    pub fn sample(&self, time: f32) -> FrameSample<'_> {
        let (prev_index, next_index, ratio) =
            sample_indices(time, self.duration, self.frames.len());
        log::trace!(
            "Sampled t={:.4}: frames {} -> {} at {:.3}",
            time,
            prev_index,
            next_index,
            ratio
        );
        FrameSample {
            prev: &self.frames[prev_index],
            next: &self.frames[next_index],
            prev_index,
            next_index,
            ratio,
        }
    }

    /// Sample that reproduces frame `index` exactly
    pub fn sample_frame(&self, index: usize) -> Option<FrameSample<'_>> {
        let frame = self.frames.get(index)?;
        Some(FrameSample {
            prev: frame,
            next: frame,
            prev_index: index,
            next_index: index,
            ratio: 0.0,
        })
    }
}
