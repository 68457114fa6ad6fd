//! Drives a procedurally built leg through a looping swing and logs the
//! skinned result at a fixed frame rate.
//!
//! Run with `RUST_LOG=debug cargo run --example walk_cycle`.

use anyhow::Result;
use glam::{Vec2, Vec3};
use skel_anim::skeleton::NO_PARENT;
use skel_anim::{
    Animator, DrawMode, MotionClip, MotionFrame, Skeleton, SkinnedMesh, SkinningOptions, Vertex,
};

const FRAME_COUNT: usize = 24;
const DURATION: f32 = 1.2;
const SEGMENT_VERTICES: usize = 8;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let skeleton = Skeleton::from_arrays(
        &["Hips", "UpLeg", "Leg", "Foot"],
        &[NO_PARENT, 0, 1, 2],
        &[
            Vec3::new(0.0, 9.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -4.0, 0.0),
            Vec3::new(0.0, -4.0, 0.0),
        ],
    )?;

    // Hip swings forward and back, knee bends on the back swing
    let frames = (0..FRAME_COUNT)
        .map(|f| {
            let phase = f as f32 / FRAME_COUNT as f32 * std::f32::consts::TAU;
            let hip = Vec3::X * phase.sin() * 30.0;
            let knee = Vec3::X * (-phase.sin()).max(0.0) * 45.0;
            MotionFrame::new(Vec3::Y * 9.0, &[Vec3::ZERO, hip, knee, Vec3::ZERO])
        })
        .collect();
    let clip = MotionClip::new(frames, DURATION)?;

    // A strip of vertices down the leg, blended across the knee
    let mut vertices = Vec::new();
    for i in 0..=SEGMENT_VERTICES * 2 {
        let t = i as f32 / SEGMENT_VERTICES as f32;
        let position = Vec3::new(1.0, -4.0 * t, 0.0);
        let knee_weight = (t - 0.75).clamp(0.0, 0.5) * 2.0;
        let (upper, lower) = if t < 1.0 { (1, 2) } else { (2, 3) };
        vertices.push(
            Vertex::new(position, Vec3::Z, Vec2::new(0.0, t / 2.0))
                .with_influence(0, upper, 1.0 - knee_weight)
                .with_influence(1, lower, knee_weight),
        );
    }
    let indices = (0..vertices.len() as u32 - 1)
        .flat_map(|i| [i, i + 1])
        .collect();
    let mesh = SkinnedMesh::new(vertices, indices, DrawMode::Lines)?;

    let mut animator = Animator::new(skeleton, clip, mesh, SkinningOptions::default())?;

    let dt = 1.0 / 30.0;
    for _ in 0..45 {
        let frame = animator.update(dt)?;
        let foot = frame.skeleton.positions[3];
        let tip = frame.vertices.last().map_or(Vec3::ZERO, |v| v.position);
        log::info!(
            "t={:.3} frames {}->{} ({:.2}) foot=({:.2}, {:.2}, {:.2}) tip=({:.2}, {:.2}, {:.2})",
            frame.time,
            frame.prev_frame,
            frame.next_frame,
            frame.ratio,
            foot.x,
            foot.y,
            foot.z,
            tip.x,
            tip.y,
            tip.z
        );
    }

    Ok(())
}
