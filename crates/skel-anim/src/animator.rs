//! Per-frame animation driver
//!
//! The [`Animator`] owns the scene's skeleton, motion clip and rest-pose
//! mesh together with the playback clock. Each rendered frame calls
//! [`Animator::update`] with the elapsed wall-clock time and hands the
//! returned vertices to the renderer.

use crate::animation::{MotionClip, PlaybackClock, normalize_time};
use crate::error::{AnimError, Result};
use crate::pose::{Pose, PoseEvaluator, SkeletonLines};
use crate::skeleton::Skeleton;
use crate::skinning::{SkinnedMesh, Skinner, SkinningOptions, Vertex};

/// Everything computed for one rendered frame
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedFrame {
    /// Loop-normalised time the frame was evaluated at
    pub time: f32,
    /// Motion frame at or before `time`
    pub prev_frame: usize,
    /// Motion frame after `time`
    pub next_frame: usize,
    /// Blend ratio between the two motion frames
    pub ratio: f32,
    /// Joint transforms
    pub pose: Pose,
    /// Deformed vertices, one per rest-pose vertex
    pub vertices: Vec<Vertex>,
    /// Skeleton line list for debug drawing
    pub skeleton: SkeletonLines,
}

/// Animation state machine for a single skinned character
#[derive(Debug, Clone)]
pub struct Animator {
    skeleton: Skeleton,
    clip: MotionClip,
    mesh: SkinnedMesh,
    evaluator: PoseEvaluator,
    skinner: Skinner,
    clock: PlaybackClock,
}

impl Animator {
    /// Create an animator
    ///
    /// Fails if the clip does not carry one rotation triple per skeleton
    /// joint or if the mesh references bones the skeleton lacks.
    pub fn new(
        skeleton: Skeleton,
        clip: MotionClip,
        mesh: SkinnedMesh,
        options: SkinningOptions,
    ) -> Result<Self> {
        if clip.joint_count() != skeleton.joint_count() {
            return Err(AnimError::JointCountMismatch {
                skeleton: skeleton.joint_count(),
                motion: clip.joint_count(),
            });
        }
        mesh.validate_for(&skeleton)?;

        log::debug!(
            "Animator ready: {} joints, {} frames over {:.3}s, {} vertices",
            skeleton.joint_count(),
            clip.frame_count(),
            clip.duration(),
            mesh.vertex_count()
        );

        let evaluator = PoseEvaluator::new(&skeleton);
        let clock = PlaybackClock::new(clip.duration());

        Ok(Self {
            skeleton,
            clip,
            mesh,
            evaluator,
            skinner: Skinner::new(options),
            clock,
        })
    }

    /// Advance the clock by `elapsed` seconds and evaluate the new frame
    pub fn update(&mut self, elapsed: f32) -> Result<AnimatedFrame> {
        let time = self.clock.tick(elapsed);
        self.evaluate_at(time)
    }

    /// Evaluate the frame at `time` without touching the clock
    pub fn evaluate_at(&self, time: f32) -> Result<AnimatedFrame> {
        let sample = self.clip.sample(time);
        let pose = self.evaluator.evaluate(&sample)?;
        let vertices = self.skinner.skin_mesh(&pose, &self.mesh)?;
        let skeleton = pose.skeleton_lines(&self.skeleton);

        Ok(AnimatedFrame {
            time: normalize_time(time, self.clip.duration()),
            prev_frame: sample.prev_index,
            next_frame: sample.next_index,
            ratio: sample.ratio,
            pose,
            vertices,
            skeleton,
        })
    }

    /// Evaluate motion frame `index` exactly
    pub fn evaluate_frame(&self, index: usize) -> Option<Result<Pose>> {
        let sample = self.clip.sample_frame(index)?;
        Some(self.evaluator.evaluate(&sample))
    }

    /// The skeleton
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// The motion clip
    pub fn clip(&self) -> &MotionClip {
        &self.clip
    }

    /// The rest-pose mesh
    pub fn mesh(&self) -> &SkinnedMesh {
        &self.mesh
    }

    /// The playback clock
    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    /// Mutable access to the playback clock (seek, reset)
    pub fn clock_mut(&mut self) -> &mut PlaybackClock {
        &mut self.clock
    }
}
