//! Static joint hierarchy
//!
//! A [`Skeleton`] is an ordered list of joints where every joint's parent
//! appears before it. Joint 0 is the root. The ordering is checked once at
//! construction so that pose evaluation can walk the joints front to back
//! with every parent transform already resolved.

use glam::Vec3;

use crate::error::{AnimError, Result};

/// Raw parent value marking "no parent" in pre-decoded joint arrays
pub const NO_PARENT: i32 = -1;

/// A single joint of the hierarchy
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Joint {
    /// Joint name as found in the source data
    pub name: String,
    /// Parent joint index, `None` for the root
    pub parent: Option<usize>,
    /// Rest-pose translation from the parent joint, in the parent's bone space
    pub offset: Vec3,
}

impl Joint {
    /// Create a new joint
    pub fn new(name: impl Into<String>, parent: Option<usize>, offset: Vec3) -> Self {
        Self {
            name: name.into(),
            parent,
            offset,
        }
    }

    /// Check if this joint is a hierarchy root
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Immutable joint hierarchy
///
/// Serializes as its joint list. Deserialization runs the same checks as
/// [`Skeleton::new`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Joint>", into = "Vec<Joint>"))]
pub struct Skeleton {
    joints: Vec<Joint>,
}

impl TryFrom<Vec<Joint>> for Skeleton {
    type Error = AnimError;

    fn try_from(joints: Vec<Joint>) -> Result<Self> {
        Self::new(joints)
    }
}

impl From<Skeleton> for Vec<Joint> {
    fn from(skeleton: Skeleton) -> Self {
        skeleton.joints
    }
}

impl Skeleton {
    /// Create a skeleton from joints in hierarchy order
    ///
    /// Rejects empty skeletons, a root with a parent, non-root joints
    /// without a parent and any parent index that is not smaller than the
    /// child's own index.
    pub fn new(joints: Vec<Joint>) -> Result<Self> {
        if joints.is_empty() {
            return Err(AnimError::EmptySkeleton);
        }

        for (index, joint) in joints.iter().enumerate() {
            match (index, joint.parent) {
                (0, Some(parent)) => {
                    return Err(AnimError::RootHasParent {
                        parent: parent as i32,
                    });
                }
                (0, None) => {}
                (joint, None) => return Err(AnimError::MissingParent { joint }),
                (joint, Some(parent)) if parent >= joint => {
                    return Err(AnimError::UnresolvedParent {
                        joint,
                        parent: parent as i32,
                    });
                }
                _ => {}
            }
        }

        log::debug!("Loaded skeleton with {} joints", joints.len());

        Ok(Self { joints })
    }

    /// Create a skeleton from the parallel arrays of a decoded asset
    ///
    /// # Arguments
    /// * `names` - Joint names
    /// * `parents` - Parent index per joint, [`NO_PARENT`] for the root
    /// * `offsets` - Rest-pose offset per joint
    pub fn from_arrays<S: AsRef<str>>(
        names: &[S],
        parents: &[i32],
        offsets: &[Vec3],
    ) -> Result<Self> {
        if parents.len() != names.len() {
            return Err(AnimError::LengthMismatch {
                what: "joint parents",
                expected: names.len(),
                actual: parents.len(),
            });
        }
        if offsets.len() != names.len() {
            return Err(AnimError::LengthMismatch {
                what: "joint offsets",
                expected: names.len(),
                actual: offsets.len(),
            });
        }

        let mut joints = Vec::with_capacity(names.len());
        for (index, ((name, &parent), &offset)) in
            names.iter().zip(parents).zip(offsets).enumerate()
        {
            let parent = match parent {
                NO_PARENT => None,
                p if p < 0 || p as usize >= index => {
                    if index == 0 {
                        return Err(AnimError::RootHasParent { parent: p });
                    }
                    return Err(AnimError::UnresolvedParent {
                        joint: index,
                        parent: p,
                    });
                }
                p => Some(p as usize),
            };
            let name: &str = name.as_ref();
            joints.push(Joint::new(name, parent, offset));
        }

        Self::new(joints)
    }

    /// Number of joints, including the root
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// All joints in hierarchy order
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Joint at `index`
    pub fn joint(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index)
    }

    /// Parent of the joint at `index`
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.joints.get(index).and_then(|j| j.parent)
    }

    /// Rest-pose offset of the joint at `index`
    pub fn offset(&self, index: usize) -> Option<Vec3> {
        self.joints.get(index).map(|j| j.offset)
    }

    /// Find a joint index by name
    pub fn find(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }

    /// Sum of rest offsets from the joint up to (but excluding) the root
    pub fn rest_position(&self, index: usize) -> Vec3 {
        let mut position = Vec3::ZERO;
        let mut current = index;
        while let Some(parent) = self.parent(current) {
            position += self.joints[current].offset;
            current = parent;
        }
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chain() -> Skeleton {
        Skeleton::from_arrays(
            &["Hips", "Spine", "Head"],
            &[NO_PARENT, 0, 1],
            &[
                Vec3::new(0.0, 10.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 2.0, 0.5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_skeleton_from_arrays() {
        let skeleton = chain();
        assert_eq!(skeleton.joint_count(), 3);
        assert_eq!(skeleton.parent(0), None);
        assert_eq!(skeleton.parent(2), Some(1));
        assert_eq!(skeleton.offset(1), Some(Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(skeleton.find("Head"), Some(2));
        assert_eq!(skeleton.find("Tail"), None);
        assert!(skeleton.joint(0).unwrap().is_root());
    }

    #[test]
    fn test_rest_position_excludes_root_offset() {
        let skeleton = chain();
        assert_eq!(skeleton.rest_position(0), Vec3::ZERO);
        assert_eq!(skeleton.rest_position(2), Vec3::new(0.0, 3.0, 0.5));
    }

    #[test]
    fn test_empty_skeleton_rejected() {
        let names: [&str; 0] = [];
        assert_eq!(
            Skeleton::from_arrays(&names, &[], &[]),
            Err(AnimError::EmptySkeleton)
        );
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let offsets = [Vec3::ZERO; 2];
        assert_eq!(
            Skeleton::from_arrays(&["a", "b"], &[NO_PARENT], &offsets),
            Err(AnimError::LengthMismatch {
                what: "joint parents",
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_forward_parent_rejected() {
        let offsets = [Vec3::ZERO; 3];
        assert_eq!(
            Skeleton::from_arrays(&["a", "b", "c"], &[NO_PARENT, 2, 0], &offsets),
            Err(AnimError::UnresolvedParent {
                joint: 1,
                parent: 2
            })
        );
    }

    #[test]
    fn test_self_parent_rejected() {
        let joints = vec![
            Joint::new("root", None, Vec3::ZERO),
            Joint::new("loop", Some(1), Vec3::ZERO),
        ];
        assert_eq!(
            Skeleton::new(joints),
            Err(AnimError::UnresolvedParent {
                joint: 1,
                parent: 1
            })
        );
    }

    #[test]
    fn test_root_with_parent_rejected() {
        let err = Skeleton::from_arrays(&["a"], &[0], &[Vec3::ZERO]).unwrap_err();
        assert_eq!(err, AnimError::RootHasParent { parent: 0 });
    }

    #[test]
    fn test_orphan_joint_rejected() {
        let offsets = [Vec3::ZERO; 2];
        let result = Skeleton::from_arrays(&["a", "b"], &[NO_PARENT, NO_PARENT], &offsets);
        assert_eq!(result, Err(AnimError::MissingParent { joint: 1 }));
    }

    #[test]
    fn test_negative_parent_rejected() {
        let offsets = [Vec3::ZERO; 2];
        assert_eq!(
            Skeleton::from_arrays(&["a", "b"], &[NO_PARENT, -7], &offsets),
            Err(AnimError::UnresolvedParent {
                joint: 1,
                parent: -7
            })
        );
    }

    #[test]
    fn test_try_from_joints_validates() {
        let joints = vec![Joint::new("root", Some(0), Vec3::ZERO)];
        assert_eq!(
            Skeleton::try_from(joints),
            Err(AnimError::RootHasParent { parent: 0 })
        );

        let skeleton = chain();
        let joints: Vec<Joint> = skeleton.clone().into();
        assert_eq!(Skeleton::try_from(joints), Ok(skeleton));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let skeleton = chain();
        let json = serde_json::to_string(&skeleton).unwrap();
        let decoded: Skeleton = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, skeleton);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_malformed_hierarchy() {
        let json = r#"[
            {"name": "root", "parent": null, "offset": [0.0, 0.0, 0.0]},
            {"name": "arm", "parent": 5, "offset": [1.0, 0.0, 0.0]}
        ]"#;
        let err = serde_json::from_str::<Skeleton>(json).unwrap_err();
        assert!(err.to_string().contains("unresolved parent 5"));

        assert!(serde_json::from_str::<Skeleton>("[]").is_err());
    }
}
