//! Deterministic replay harness shared by the tests and the benchtests
//! binary: a fixed skeleton stub plus a digest over every emitted target.

use glam::{Mat4, Quat};
use striderig_core::{vec3, BoneFrame, Isometry, PoseHasher, Scalar};

use crate::{BoneQuery, ConfigError, RigConfig, RigDriver};

/// Host-skeleton stand-in with a constant chest frame and sole offset.
#[derive(Copy, Clone, Debug)]
pub struct FixedSkeleton {
    pub chest: BoneFrame,
    pub sole: Scalar,
}

impl Default for FixedSkeleton {
    fn default() -> Self {
        Self {
            chest: BoneFrame::new(Mat4::from_rotation_translation(
                Quat::from_rotation_x(-0.1),
                vec3(0.0, 1.25, 0.0),
            )),
            sole: 0.05,
        }
    }
}

impl BoneQuery for FixedSkeleton {
    fn chest_frame(&self) -> BoneFrame { self.chest }
    fn sole_offset(&self) -> Scalar { self.sole }
}

/// Drive a fresh rig for `ticks` fixed steps, feeding each tick's
/// synthesized body pose back in as the solver result, and digest the full
/// output stream. Equal digests mean bit-identical replays.
pub fn replay(config: &RigConfig, ticks: u32, dt: Scalar) -> Result<[u8; 32], ConfigError> {
    let mut driver = RigDriver::new(config.clone())?;
    let skel = FixedSkeleton::default();
    let mut h = PoseHasher::new();
    let mut solver_body = Isometry::default();
    for _ in 0..ticks {
        let out = driver.tick(dt, solver_body, &skel);
        out.digest_into(&mut h);
        solver_body = out.body.pose;
    }
    Ok(h.finalize())
}
