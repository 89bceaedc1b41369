pub mod scalar;
pub mod types;
pub mod rng;
pub mod hash;
pub mod schedule;
pub mod determinism;

pub use scalar::Scalar;
pub use types::{Vec3, Isometry, BoneFrame, vec3, iso, quat_identity};
pub use rng::{mix32, hash01, hash_range, hash_sign};
pub use hash::{PoseHasher, hash_scalar, hash_vec3, hash_quat};
pub use schedule::{TickStage, schedule_digest};
pub use determinism::DeterminismContract;
pub use glam::Quat;
