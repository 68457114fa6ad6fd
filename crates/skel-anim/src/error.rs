use thiserror::Error;

use crate::skinning::DrawMode;

/// Error types for skeleton, motion and mesh validation and evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimError {
    /// The skeleton has no joints
    #[error("Skeleton has no joints")]
    EmptySkeleton,

    /// Two parallel input arrays disagree in length
    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Joint 0 is the hierarchy root and cannot have a parent
    #[error("Root joint must not have a parent, found parent {parent}")]
    RootHasParent { parent: i32 },

    /// A non-root joint has no parent
    #[error("Joint {joint} has no parent")]
    MissingParent { joint: usize },

    /// A parent index refers to a joint that is not processed before its child
    #[error("Joint {joint} refers to unresolved parent {parent}")]
    UnresolvedParent { joint: usize, parent: i32 },

    /// A motion clip without any frames
    #[error("Empty motion clip")]
    EmptyMotionClip,

    /// Clip duration must be finite and positive
    #[error("Invalid clip duration: {0}")]
    InvalidDuration(f32),

    /// A motion frame whose channel count does not fit the channel layout
    #[error("Frame {frame} has invalid channel count {channels}")]
    InvalidChannelCount { frame: usize, channels: usize },

    /// Motion data and skeleton describe a different number of joints
    #[error("Joint count mismatch: skeleton has {skeleton}, motion has {motion}")]
    JointCountMismatch { skeleton: usize, motion: usize },

    /// A vertex references a bone outside the skeleton
    #[error("Vertex {vertex} references bone {bone}, skeleton has {joint_count} joints")]
    BoneIndexOutOfRange {
        vertex: usize,
        bone: i32,
        joint_count: usize,
    },

    /// Active influence weights of a vertex do not sum to one
    #[error("Vertex {vertex} has degenerate weights (sum {sum})")]
    DegenerateWeights { vertex: usize, sum: f32 },

    /// An index buffer entry points past the vertex buffer
    #[error("Index {index} at position {position} exceeds vertex count {vertex_count}")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },

    /// Index count is not a multiple of the primitive size
    #[error("Index count {count} does not fit draw mode {mode:?}")]
    IndexArity { mode: DrawMode, count: usize },
}

/// Result type using AnimError
pub type Result<T> = std::result::Result<T, AnimError>;
