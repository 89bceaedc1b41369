use blake3::Hasher;
use glam::Quat;

use crate::{Scalar, Vec3};

/// Accumulates every emitted target of a tick (or a whole replay) into a
/// stable digest, for bit-for-bit determinism checks across runs.
pub struct PoseHasher(Hasher);

impl PoseHasher {
    pub fn new() -> Self { PoseHasher(Hasher::new()) }
    pub fn update_bytes(&mut self, bytes: &[u8]) { self.0.update(bytes); }
    pub fn finalize(self) -> [u8; 32] { *self.0.finalize().as_bytes() }
}

impl Default for PoseHasher {
    fn default() -> Self { Self::new() }
}

#[inline]
pub fn hash_scalar(h: &mut PoseHasher, s: Scalar) {
    h.update_bytes(&s.to_le_bytes());
}

#[inline]
pub fn hash_vec3(h: &mut PoseHasher, v: &Vec3) {
    for c in [v.x, v.y, v.z] { h.update_bytes(&c.to_le_bytes()); }
}

#[inline]
pub fn hash_quat(h: &mut PoseHasher, q: &Quat) {
    for c in [q.x, q.y, q.z, q.w] { h.update_bytes(&c.to_le_bytes()); }
}
