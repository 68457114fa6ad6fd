//! End-to-end scenarios for pose evaluation and skinning

use glam::{Mat4, Vec2, Vec3};
use pretty_assertions::assert_eq;
use skel_anim::skeleton::NO_PARENT;
use skel_anim::{
    AnimError, Animator, DrawMode, MotionClip, MotionFrame, PoseEvaluator, Skeleton, SkinnedMesh,
    Skinner, SkinningOptions, Vertex,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assert_near(actual: Vec3, expected: Vec3) {
    assert!(
        actual.abs_diff_eq(expected, 1e-4),
        "expected {expected:?}, got {actual:?}"
    );
}

/// Root plus one child one unit above it
fn two_joint_chain() -> Skeleton {
    Skeleton::from_arrays(
        &["root", "child"],
        &[NO_PARENT, 0],
        &[Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)],
    )
    .unwrap()
}

/// Fixed root, a hinge joint at the origin and a child one unit above it
fn hinge_chain() -> Skeleton {
    Skeleton::from_arrays(
        &["root", "hinge", "child"],
        &[NO_PARENT, 0, 1],
        &[Vec3::ZERO, Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)],
    )
    .unwrap()
}

#[test]
fn test_child_of_static_chain_sits_at_offset() {
    init_logging();
    let skeleton = two_joint_chain();
    let clip = MotionClip::new(vec![MotionFrame::rest(2)], 1.0).unwrap();
    let pose = PoseEvaluator::new(&skeleton)
        .evaluate(&clip.sample(0.0))
        .unwrap();

    assert_near(pose.joint_position(1).unwrap(), Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(pose.bone_to_world()[0], Mat4::IDENTITY);
}

#[test]
fn test_rotated_parent_maps_child_offset() {
    init_logging();
    let skeleton = hinge_chain();
    let evaluator = PoseEvaluator::new(&skeleton);

    let cases = [
        (Vec3::new(0.0, 0.0, 90.0), Vec3::new(-1.0, 0.0, 0.0)),
        (Vec3::new(90.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
        (Vec3::new(-90.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
        // Y rotation leaves an offset along Y in place
        (Vec3::new(0.0, 90.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
    ];

    for (rotation, expected) in cases {
        let frame = MotionFrame::new(Vec3::ZERO, &[Vec3::ZERO, rotation, Vec3::ZERO]);
        let clip = MotionClip::new(vec![frame], 1.0).unwrap();
        let pose = evaluator.evaluate(&clip.sample(0.0)).unwrap();
        assert_near(pose.joint_position(2).unwrap(), expected);
    }
}

#[test]
fn test_rest_translation_is_cumulative_offset() {
    let skeleton = Skeleton::from_arrays(
        &["Hips", "Chest", "Neck", "Head", "UpLeg", "Leg", "Foot"],
        &[NO_PARENT, 0, 1, 2, 0, 4, 5],
        &[
            Vec3::new(0.0, 35.0, 0.0),
            Vec3::new(0.0, 5.2, 0.0),
            Vec3::new(0.0, 18.6, 0.0),
            Vec3::new(0.0, 5.4, 0.3),
            Vec3::new(3.9, 0.0, 0.0),
            Vec3::new(0.0, -17.6, 0.0),
            Vec3::new(0.0, -17.1, -0.2),
        ],
    )
    .unwrap();
    let clip = MotionClip::new(vec![MotionFrame::rest(7); 3], 0.5).unwrap();
    let pose = PoseEvaluator::new(&skeleton)
        .evaluate(&clip.sample(0.0))
        .unwrap();

    for joint in 1..skeleton.joint_count() {
        let mut expected = Vec3::ZERO;
        let mut current = joint;
        while let Some(parent) = skeleton.parent(current) {
            expected += skeleton.offset(current).unwrap();
            current = parent;
        }
        assert_near(pose.joint_position(joint).unwrap(), expected);

        let product = pose.bone_to_world()[joint] * pose.world_to_bone()[joint];
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-4), "joint {joint}");
    }
}

#[test]
fn test_four_frame_clip_midpoint() {
    let frames: Vec<MotionFrame> = (0..4)
        .map(|f| {
            let angle = f as f32 * 10.0;
            MotionFrame::new(
                Vec3::ZERO,
                &[Vec3::ZERO, Vec3::new(angle, angle * 2.0, -angle)],
            )
        })
        .collect();
    let duration = 2.0;
    let clip = MotionClip::new(frames, duration).unwrap();

    let sample = clip.sample(1.5 / 4.0 * duration);
    assert_eq!((sample.prev_index, sample.next_index), (1, 2));
    assert!((sample.ratio - 0.5).abs() < 1e-6);
    assert_near(sample.joint_rotation(1), Vec3::new(15.0, 30.0, -15.0));
}

#[test]
fn test_boundary_evaluation_matches_frame() {
    let skeleton = hinge_chain();
    let frames: Vec<MotionFrame> = (0..5)
        .map(|f| {
            let angle = 7.0 + f as f32 * 13.0;
            let hinge = Vec3::new(angle, -angle, angle / 2.0);
            MotionFrame::new(Vec3::ZERO, &[Vec3::ZERO, hinge, Vec3::ZERO])
        })
        .collect();
    let clip = MotionClip::new(frames, 2.5).unwrap();
    let mesh = SkinnedMesh::new(Vec::new(), Vec::new(), DrawMode::Triangles).unwrap();
    let animator = Animator::new(skeleton, clip, mesh, SkinningOptions::default()).unwrap();

    for k in 0..5 {
        let at_time = animator.evaluate_at(k as f32 * 0.5).unwrap().pose;
        let direct = animator.evaluate_frame(k).unwrap().unwrap();
        for joint in 0..3 {
            let a = at_time.bone_to_world()[joint];
            let b = direct.bone_to_world()[joint];
            assert!(a.abs_diff_eq(b, 1e-4), "frame {k} joint {joint}");
        }
    }
}

#[test]
fn test_skinned_length_matches_input() {
    let skeleton = hinge_chain();
    let pose = PoseEvaluator::new(&skeleton)
        .evaluate_rotations(&[Vec3::ZERO, Vec3::new(20.0, 0.0, 45.0), Vec3::ZERO])
        .unwrap();
    let skinner = Skinner::new(SkinningOptions::default());

    for count in [0usize, 1, 17, 256] {
        let vertices: Vec<Vertex> = (0..count)
            .map(|i| {
                Vertex::new(Vec3::new(0.0, i as f32 * 0.01, 0.0), Vec3::Y, Vec2::ZERO)
                    .with_influence(0, (i % 3) as i32, 1.0)
            })
            .collect();
        let skinned = skinner.skin_vertices(&pose, &vertices).unwrap();
        assert_eq!(skinned.len(), count);
    }
}

#[test]
fn test_vertex_without_influence_is_zero() {
    let skeleton = hinge_chain();
    let pose = PoseEvaluator::new(&skeleton).rest_pose();
    let vertex = Vertex::new(Vec3::new(3.0, 4.0, 5.0), Vec3::Z, Vec2::ONE);
    let skinned = Skinner::default().skin_vertices(&pose, &[vertex]).unwrap();
    assert_eq!(skinned[0].position, Vec3::ZERO);
    assert_eq!(skinned[0].normal, Vec3::Z);
}

#[test]
fn test_setup_errors_abort() {
    assert_eq!(
        MotionClip::new(Vec::new(), 5.0).unwrap_err(),
        AnimError::EmptyMotionClip
    );
    assert!(matches!(
        Skeleton::from_arrays(&["a", "b"], &[NO_PARENT, 1], &[Vec3::ZERO; 2]),
        Err(AnimError::UnresolvedParent {
            joint: 1,
            parent: 1
        })
    ));
}
