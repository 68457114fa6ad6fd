//! Bone hierarchy transform computation
//!
//! Converts sampled Euler rotations into bone-to-world and world-to-bone
//! matrices for every joint. Joints are processed in index order, so each
//! parent's matrices are final before any child reads them.
//!
//! Per non-root joint `j` with parent `p`, rest offset `o` and interpolated
//! rotation channels `(x, y, z)` in degrees:
//!
//! ```text
//! T  = translate(o)          Ti = translate(-o)
//! R  = Rz(z) * Rx(x) * Ry(y)
//! bone2world[j] = bone2world[p] * T * R
//! world2bone[j] = Ti * world2bone[p]
//! ```
//!
//! The root (joint 0) keeps identity for both matrices.

use glam::{Mat4, Vec3};

use crate::animation::FrameSample;
use crate::error::{AnimError, Result};
use crate::skeleton::Skeleton;

/// Rotation matrix for Euler channels given in degrees
///
/// Elementary rotations are right-handed and composed as `Rz * Rx * Ry`,
/// the convention the motion channels were recorded in. The order does not
/// commute and must not be changed.
pub fn euler_rotation(degrees: Vec3) -> Mat4 {
    let rx = Mat4::from_rotation_x(degrees.x.to_radians());
    let ry = Mat4::from_rotation_y(degrees.y.to_radians());
    let rz = Mat4::from_rotation_z(degrees.z.to_radians());
    rz * rx * ry
}

/// Per-joint transforms for one instant of the animation
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    bone_to_world: Vec<Mat4>,
    world_to_bone: Vec<Mat4>,
}

impl Pose {
    /// Number of joints covered by the pose
    pub fn joint_count(&self) -> usize {
        self.bone_to_world.len()
    }

    /// Bone-to-world matrices indexed by joint
    pub fn bone_to_world(&self) -> &[Mat4] {
        &self.bone_to_world
    }

    /// World-to-bone matrices indexed by joint
    pub fn world_to_bone(&self) -> &[Mat4] {
        &self.world_to_bone
    }

    /// Matrix applied to rest-pose vertices bound to `joint`
    ///
    /// `world2bone` only carries the negated rest offsets, so this is the
    /// posed transform times the inverse bind transform of the joint. It
    /// equals identity whenever the joint chain is at rest.
    pub fn skinning_matrix(&self, joint: usize) -> Option<Mat4> {
        let b2w = self.bone_to_world.get(joint)?;
        let w2b = self.world_to_bone.get(joint)?;
        Some(*b2w * *w2b)
    }

    /// World position of `joint` (translation column of its bone-to-world matrix)
    pub fn joint_position(&self, joint: usize) -> Option<Vec3> {
        self.bone_to_world.get(joint).map(|m| m.w_axis.truncate())
    }

    /// Line list for drawing the skeleton
    ///
    /// The root is drawn at its rest offset, every other joint at its world
    /// position, with one `(joint, parent)` segment per non-root joint.
    pub fn skeleton_lines(&self, skeleton: &Skeleton) -> SkeletonLines {
        let mut positions = Vec::with_capacity(self.joint_count());
        let mut indices = Vec::with_capacity(self.joint_count().saturating_sub(1) * 2);

        positions.push(skeleton.offset(0).unwrap_or(Vec3::ZERO));
        for joint in 1..self.joint_count() {
            positions.push(self.bone_to_world[joint].w_axis.truncate());
            if let Some(parent) = skeleton.parent(joint) {
                indices.push(joint as u32);
                indices.push(parent as u32);
            }
        }

        SkeletonLines { positions, indices }
    }
}

/// Joint positions plus segment index pairs for debug drawing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkeletonLines {
    /// One position per joint
    pub positions: Vec<Vec3>,
    /// Flat `(joint, parent)` index pairs
    pub indices: Vec<u32>,
}

impl SkeletonLines {
    /// Number of line segments
    pub fn segment_count(&self) -> usize {
        self.indices.len() / 2
    }
}

/// Computes [`Pose`]s for a fixed skeleton
///
/// Translation matrices for the rest offsets are built once; only the
/// rotations change per frame.
#[derive(Debug, Clone)]
pub struct PoseEvaluator {
    /// Parent index per joint (0 for the root, never read)
    parents: Vec<usize>,
    /// Translation by the rest offset
    translations: Vec<Mat4>,
    /// Translation by the negated rest offset
    inverse_translations: Vec<Mat4>,
}

impl PoseEvaluator {
    /// Create an evaluator for `skeleton`
    pub fn new(skeleton: &Skeleton) -> Self {
        let count = skeleton.joint_count();
        let mut parents = Vec::with_capacity(count);
        let mut translations = Vec::with_capacity(count);
        let mut inverse_translations = Vec::with_capacity(count);

        for joint in skeleton.joints() {
            parents.push(joint.parent.unwrap_or(0));
            translations.push(Mat4::from_translation(joint.offset));
            inverse_translations.push(Mat4::from_translation(-joint.offset));
        }

        Self {
            parents,
            translations,
            inverse_translations,
        }
    }

    /// Number of joints
    pub fn joint_count(&self) -> usize {
        self.parents.len()
    }

    /// Evaluate the pose for interpolated motion data
    ///
    /// Both bracketing frames must carry one rotation per skeleton joint.
    pub fn evaluate(&self, sample: &FrameSample<'_>) -> Result<Pose> {
        let next = sample.next.joint_count();
        if next != self.joint_count() {
            return Err(AnimError::JointCountMismatch {
                skeleton: self.joint_count(),
                motion: next,
            });
        }
        self.evaluate_with(sample.joint_count(), |joint| sample.joint_rotation(joint))
    }

    /// Evaluate the pose for explicit per-joint Euler rotations (degrees)
    ///
    /// `rotations[0]` belongs to the root and is ignored.
    pub fn evaluate_rotations(&self, rotations: &[Vec3]) -> Result<Pose> {
        self.evaluate_with(rotations.len(), |joint| rotations[joint])
    }

    /// Pose with every rotation channel at zero
    pub fn rest_pose(&self) -> Pose {
        let count = self.joint_count();
        let mut bone_to_world = Vec::with_capacity(count);
        let mut world_to_bone = Vec::with_capacity(count);
        self.compose(&mut bone_to_world, &mut world_to_bone, |_| Mat4::IDENTITY);
        Pose {
            bone_to_world,
            world_to_bone,
        }
    }

    fn evaluate_with(&self, joint_count: usize, rotation: impl Fn(usize) -> Vec3) -> Result<Pose> {
        if joint_count != self.joint_count() {
            return Err(AnimError::JointCountMismatch {
                skeleton: self.joint_count(),
                motion: joint_count,
            });
        }

        let mut bone_to_world = Vec::with_capacity(joint_count);
        let mut world_to_bone = Vec::with_capacity(joint_count);
        self.compose(&mut bone_to_world, &mut world_to_bone, |joint| {
            euler_rotation(rotation(joint))
        });

        Ok(Pose {
            bone_to_world,
            world_to_bone,
        })
    }

    fn compose(
        &self,
        bone_to_world: &mut Vec<Mat4>,
        world_to_bone: &mut Vec<Mat4>,
        rotation: impl Fn(usize) -> Mat4,
    ) {
        if self.parents.is_empty() {
            return;
        }

        bone_to_world.push(Mat4::IDENTITY);
        world_to_bone.push(Mat4::IDENTITY);

        for joint in 1..self.parents.len() {
            let parent = self.parents[joint];
            let local = self.translations[joint] * rotation(joint);
            bone_to_world.push(bone_to_world[parent] * local);
            world_to_bone.push(self.inverse_translations[joint] * world_to_bone[parent]);
        }
    }
}
