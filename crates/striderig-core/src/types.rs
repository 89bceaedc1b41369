use glam::{Mat4, Quat};

use crate::Scalar;

pub type Vec3 = glam::Vec3;

#[inline] pub fn vec3(x: Scalar, y: Scalar, z: Scalar) -> Vec3 { Vec3::new(x, y, z) }
#[inline] pub fn iso(pos: Vec3, rot: Quat) -> Isometry { Isometry { pos, rot } }
#[inline] pub fn quat_identity() -> Quat { Quat::IDENTITY }

#[derive(Copy, Clone, Debug)]
pub struct Isometry { pub pos: Vec3, pub rot: Quat }

impl Default for Isometry {
    fn default() -> Self { Self { pos: Vec3::ZERO, rot: Quat::IDENTITY } }
}

impl Isometry {
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 { self.pos + self.rot * p }
}

/// Local-to-world transform of one reference bone plus its inverse.
/// Snapshotted once per tick from the host skeleton; valid only within
/// that tick.
#[derive(Copy, Clone, Debug)]
pub struct BoneFrame {
    pub local_to_world: Mat4,
    pub world_to_local: Mat4,
}

impl BoneFrame {
    pub fn new(local_to_world: Mat4) -> Self {
        Self { local_to_world, world_to_local: local_to_world.inverse() }
    }

    #[inline]
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.world_to_local.transform_point3(world)
    }

    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.local_to_world.transform_point3(local)
    }
}

impl Default for BoneFrame {
    fn default() -> Self { Self::new(Mat4::IDENTITY) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn bone_frame_round_trip() {
        let m = Mat4::from_rotation_translation(
            Quat::from_rotation_y(0.7),
            Vec3::new(0.3, 1.4, -0.2),
        );
        let f = BoneFrame::new(m);
        let p = vec3(0.25, 0.9, 0.1);
        let back = f.to_world(f.to_local(p));
        assert!((back - p).length() < 1e-5);
    }
}
