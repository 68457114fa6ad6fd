//! Real-time skeletal animation evaluator
//!
//! Given a joint hierarchy, a looping clip of per-joint Euler rotations and a
//! skinned mesh, this crate computes the deformed vertex buffer for each
//! rendered frame:
//!
//! 1. [`animation`] normalises the playback time into the loop and brackets
//!    it between two motion frames.
//! 2. [`pose`] blends the rotation channels of those frames and propagates
//!    bone-to-world / world-to-bone matrices down the [`skeleton`].
//! 3. [`skinning`] blends every vertex by its bone weights (linear blend
//!    skinning).
//!
//! [`Animator`] wires these together behind a single per-frame `update`.
//! Asset decoding and draw submission are left to the caller.
//!
//! # Example
//!
//! ```rust
//! use glam::{Vec2, Vec3};
//! use skel_anim::{
//!     Animator, DrawMode, MotionClip, MotionFrame, Skeleton, SkinnedMesh, SkinningOptions,
//!     Vertex, skeleton::NO_PARENT,
//! };
//!
//! let skeleton = Skeleton::from_arrays(
//!     &["root", "bone"],
//!     &[NO_PARENT, 0],
//!     &[Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)],
//! )?;
//! let clip = MotionClip::new(vec![MotionFrame::rest(2)], 1.0)?;
//! let mesh = SkinnedMesh::new(
//!     vec![Vertex::new(Vec3::new(0.0, 1.5, 0.0), Vec3::Y, Vec2::ZERO).with_influence(0, 1, 1.0)],
//!     Vec::new(),
//!     DrawMode::Triangles,
//! )?;
//!
//! let mut animator = Animator::new(skeleton, clip, mesh, SkinningOptions::default())?;
//! let frame = animator.update(1.0 / 60.0)?;
//! assert_eq!(frame.vertices.len(), 1);
//! # Ok::<(), skel_anim::AnimError>(())
//! ```

pub mod animation;
pub mod animator;
pub mod error;
pub mod pose;
pub mod skeleton;
pub mod skinning;

// Re-export common types
pub use animation::{FrameSample, MotionClip, MotionFrame, PlaybackClock};
pub use animator::{AnimatedFrame, Animator};
pub use error::{AnimError, Result};
pub use pose::{Pose, PoseEvaluator, SkeletonLines, euler_rotation};
pub use skeleton::{Joint, Skeleton};
pub use skinning::{DrawMode, SkinnedMesh, Skinner, SkinningOptions, Vertex};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
