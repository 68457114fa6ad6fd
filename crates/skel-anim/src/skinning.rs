//! Linear blend skinning
//!
//! Deforms rest-pose vertices with an evaluated [`Pose`]. Each vertex blends
//! up to four bone influences:
//!
//! ```text
//! position' = xyz( sum_i weight[i] * bone2world[b_i] * world2bone[b_i] * (position, 1) )
//! ```
//!
//! Influences whose bone index is [`NO_BONE`] are skipped. Normals, texture
//! coordinates, bone indices and weights pass through unchanged.
//!
//! # Example
//!
//! ```rust
//! use glam::{Vec2, Vec3};
//! use skel_anim::pose::PoseEvaluator;
//! use skel_anim::skeleton::{NO_PARENT, Skeleton};
//! use skel_anim::skinning::{Skinner, SkinningOptions, Vertex};
//!
//! let skeleton = Skeleton::from_arrays(&["root", "arm"], &[NO_PARENT, 0], &[Vec3::ZERO, Vec3::X])?;
//! let pose = PoseEvaluator::new(&skeleton).rest_pose();
//!
//! let vertex = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, Vec2::ZERO)
//!     .with_influence(0, 1, 1.0);
//! let skinner = Skinner::new(SkinningOptions::default());
//! let skinned = skinner.skin_vertices(&pose, &[vertex])?;
//! assert!(skinned[0].position.abs_diff_eq(vertex.position, 1e-5));
//! # Ok::<(), skel_anim::AnimError>(())
//! ```

use glam::{Vec2, Vec3, Vec4};

use crate::error::{AnimError, Result};
use crate::pose::Pose;
use crate::skeleton::Skeleton;

/// Bone index marking an unused influence slot
pub const NO_BONE: i32 = -1;

/// Maximum bone influences per vertex
pub const MAX_INFLUENCES: usize = 4;

/// A skinned mesh vertex
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    /// Position
    pub position: Vec3,
    /// Normal (not re-skinned)
    pub normal: Vec3,
    /// Texture coordinate
    pub tex_coord: Vec2,
    /// Influencing joints, [`NO_BONE`] for unused slots
    pub bones: [i32; MAX_INFLUENCES],
    /// Weight per influence slot
    pub weights: [f32; MAX_INFLUENCES],
}

impl Vertex {
    /// Create a vertex without bone influences
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coord,
            bones: [NO_BONE; MAX_INFLUENCES],
            weights: [0.0; MAX_INFLUENCES],
        }
    }

    /// Set influence `slot` to `bone` with `weight`
    ///
    /// Only slots below [`MAX_INFLUENCES`] exist. Debug builds panic on any
    /// other slot, release builds return the vertex unchanged.
    #[must_use]
    pub fn with_influence(mut self, slot: usize, bone: i32, weight: f32) -> Self {
        debug_assert!(slot < MAX_INFLUENCES, "no influence slot {slot}");
        if slot < MAX_INFLUENCES {
            self.bones[slot] = bone;
            self.weights[slot] = weight;
        }
        self
    }

    /// Active `(bone, weight)` pairs
    pub fn influences(&self) -> impl Iterator<Item = (i32, f32)> + '_ {
        self.bones
            .iter()
            .zip(self.weights.iter())
            .filter(|(bone, _)| **bone != NO_BONE)
            .map(|(&bone, &weight)| (bone, weight))
    }

    /// Sum of the active influence weights
    pub fn weight_sum(&self) -> f32 {
        self.influences().map(|(_, w)| w).sum()
    }
}

/// Primitive layout of an index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawMode {
    /// Index pairs forming line segments
    Lines,
    /// Index triples forming triangles
    #[default]
    Triangles,
}

impl DrawMode {
    /// Indices per primitive
    pub fn indices_per_primitive(self) -> usize {
        match self {
            Self::Lines => 2,
            Self::Triangles => 3,
        }
    }
}

/// Rest-pose mesh with its index buffer
///
/// Deserialization runs the same checks as [`SkinnedMesh::new`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "MeshData", into = "MeshData"))]
pub struct SkinnedMesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    draw_mode: DrawMode,
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct MeshData {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    draw_mode: DrawMode,
}

#[cfg(feature = "serde")]
impl TryFrom<MeshData> for SkinnedMesh {
    type Error = AnimError;

    fn try_from(data: MeshData) -> Result<Self> {
        Self::new(data.vertices, data.indices, data.draw_mode)
    }
}

#[cfg(feature = "serde")]
impl From<SkinnedMesh> for MeshData {
    fn from(mesh: SkinnedMesh) -> Self {
        Self {
            vertices: mesh.vertices,
            indices: mesh.indices,
            draw_mode: mesh.draw_mode,
        }
    }
}

impl SkinnedMesh {
    /// Create a mesh, checking index bounds and primitive arity
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, draw_mode: DrawMode) -> Result<Self> {
        if indices.len() % draw_mode.indices_per_primitive() != 0 {
            return Err(AnimError::IndexArity {
                mode: draw_mode,
                count: indices.len(),
            });
        }
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, index)| **index as usize >= vertices.len())
        {
            return Err(AnimError::IndexOutOfRange {
                position,
                index,
                vertex_count: vertices.len(),
            });
        }

        Ok(Self {
            vertices,
            indices,
            draw_mode,
        })
    }

    /// Check that every bone influence refers to a joint of `skeleton`
    pub fn validate_for(&self, skeleton: &Skeleton) -> Result<()> {
        let joint_count = skeleton.joint_count();
        for (vertex, v) in self.vertices.iter().enumerate() {
            for (bone, _) in v.influences() {
                check_bone(vertex, bone, joint_count)?;
            }
        }
        Ok(())
    }

    /// Rest-pose vertices
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Index buffer
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Primitive layout of the index buffer
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Options for controlling the skinning behavior
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkinningOptions {
    /// Reject vertices whose active weights do not sum to 1.0
    ///
    /// When false, weights are used as given and a vertex without any active
    /// influence collapses to the origin.
    pub validate_weights: bool,
    /// Allowed deviation of the weight sum from 1.0
    pub weight_tolerance: f32,
}

impl Default for SkinningOptions {
    fn default() -> Self {
        Self {
            validate_weights: false,
            weight_tolerance: 1e-3,
        }
    }
}

/// Vertex skinning with a fixed set of options
#[derive(Debug, Clone, Default)]
pub struct Skinner {
    options: SkinningOptions,
}

impl Skinner {
    /// Create a skinner
    pub fn new(options: SkinningOptions) -> Self {
        Self { options }
    }

    /// Skin every vertex of `vertices`
    ///
    /// The output has exactly one vertex per input vertex.
    pub fn skin_vertices(&self, pose: &Pose, vertices: &[Vertex]) -> Result<Vec<Vertex>> {
        vertices
            .iter()
            .enumerate()
            .map(|(index, vertex)| self.skin_vertex(pose, index, vertex))
            .collect()
    }

    /// Skin the rest-pose vertices of `mesh`
    pub fn skin_mesh(&self, pose: &Pose, mesh: &SkinnedMesh) -> Result<Vec<Vertex>> {
        self.skin_vertices(pose, mesh.vertices())
    }

    /// Skin a single vertex
    ///
    /// `index` is only used to report errors.
    pub fn skin_vertex(&self, pose: &Pose, index: usize, vertex: &Vertex) -> Result<Vertex> {
        if self.options.validate_weights {
            let sum = vertex.weight_sum();
            if (sum - 1.0).abs() > self.options.weight_tolerance {
                return Err(AnimError::DegenerateWeights { vertex: index, sum });
            }
        }

        let rest = vertex.position.extend(1.0);
        let mut accumulated = Vec4::ZERO;

        for (bone, weight) in vertex.influences() {
            let joint = check_bone(index, bone, pose.joint_count())?;
            let b2w = pose.bone_to_world()[joint];
            let w2b = pose.world_to_bone()[joint];
            accumulated += weight * (b2w * (w2b * rest));
        }

        Ok(Vertex {
            position: accumulated.truncate(),
            ..*vertex
        })
    }

    /// Current options
    pub fn options(&self) -> &SkinningOptions {
        &self.options
    }

    /// Replace the options
    pub fn set_options(&mut self, options: SkinningOptions) {
        self.options = options;
    }
}

fn check_bone(vertex: usize, bone: i32, joint_count: usize) -> Result<usize> {
    match usize::try_from(bone) {
        Ok(joint) if joint < joint_count => Ok(joint),
        _ => Err(AnimError::BoneIndexOutOfRange {
            vertex,
            bone,
            joint_count,
        }),
    }
}
