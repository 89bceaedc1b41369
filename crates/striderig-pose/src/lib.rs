use core::f32::consts::PI;

use glam::Quat;
use striderig_core::{vec3, BoneFrame, Isometry, Scalar, Vec3};
use striderig_gait::{Foot, GaitState};
use striderig_noise::{NoiseChannel, NoiseField};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Hand { Left, Right }

impl Hand {
    #[inline]
    pub fn index(self) -> usize {
        match self { Hand::Left => 0, Hand::Right => 1 }
    }

    #[inline]
    fn channel(self) -> NoiseChannel {
        match self { Hand::Left => NoiseChannel::HandLeft, Hand::Right => NoiseChannel::HandRight }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct PoseParams {
    pub body_height: Scalar,
    pub body_pos_noise_amp: Scalar,
    pub body_rot_noise_deg: Scalar,
    /// Right-hand rest offset in body space; the left hand mirrors x.
    pub hand_rest_offset: Vec3,
    pub hand_noise_amp: Scalar,
    /// Chest-local clamp floors. Hand-tuned for the default skeleton; do
    /// not assume they transfer to other proportions.
    pub hand_min_y: Scalar,
    pub hand_side_clamp: Scalar,
    pub head_move_amp: Scalar,
    pub look_distance: Scalar,
    pub spine_tilt_deg: Scalar,
    pub spine_twist_deg: [Scalar; 3],
}

impl Default for PoseParams {
    fn default() -> Self {
        Self {
            body_height: 0.9,
            body_pos_noise_amp: 0.02,
            body_rot_noise_deg: 6.0,
            hand_rest_offset: vec3(0.25, 0.65, 0.3),
            hand_noise_amp: 0.05,
            hand_min_y: 0.2,
            hand_side_clamp: 0.2,
            head_move_amp: 0.3,
            look_distance: 2.0,
            spine_tilt_deg: -8.0,
            spine_twist_deg: [4.0, 10.0, 4.0],
        }
    }
}

/// Derives body, hand, head and spine targets from the stepping state and
/// the noise field. Everything here is a pure read except the retained
/// heading, which only changes when the feet give a usable direction.
#[derive(Copy, Clone, Debug)]
pub struct PoseCtrl {
    pub params: PoseParams,
    heading_yaw: Scalar,
}

impl PoseCtrl {
    pub fn new(params: PoseParams) -> Self {
        Self { params, heading_yaw: 0.0 }
    }

    pub fn heading_yaw(&self) -> Scalar { self.heading_yaw }

    /// Hip target. Horizontally a sine-weighted blend between the foot
    /// targets, so weight pours onto the planted foot while the other foot
    /// is mid-swing. Vertically `body_height` plus two bob cycles per step
    /// (one per foot plant) plus scalar jitter.
    pub fn body_position(
        &self,
        gait: &GaitState,
        noise: &NoiseField,
        ground_bias: Scalar,
    ) -> Vec3 {
        let l = gait.foot_target(Foot::Left, ground_bias);
        let r = gait.foot_target(Foot::Right, ground_bias);
        let pivot_offset = if gait.pivot() == Foot::Left { 0.0 } else { 1.0 };
        let theta = (gait.progress() + pivot_offset) * PI;
        let w_right = (1.0 - theta.sin()) * 0.5;
        let mut p = l.lerp(r, w_right);
        p.y = self.params.body_height
            + (gait.progress() * 4.0 * PI).cos() * gait.spec().step_height * 0.5
            + noise.scalar(NoiseChannel::BodyPos) * self.params.body_pos_noise_amp;
        p
    }

    /// Heading faces 90 degrees off the foot line, flattened to the ground
    /// plane, with a bounded rotational wobble on top. Coincident feet
    /// leave the previous heading in place instead of producing a NaN.
    pub fn body_rotation(
        &mut self,
        gait: &GaitState,
        noise: &NoiseField,
        ground_bias: Scalar,
    ) -> Quat {
        let l = gait.foot_target(Foot::Left, ground_bias);
        let r = gait.foot_target(Foot::Right, ground_bias);
        let line = vec3(r.x - l.x, 0.0, r.z - l.z);
        if line.length_squared() > 1.0e-8 {
            // foot line rotated +90 degrees about Y
            let fwd = vec3(line.z, 0.0, -line.x);
            self.heading_yaw = fwd.x.atan2(fwd.z);
        }
        Quat::from_rotation_y(self.heading_yaw)
            * noise.rotation(NoiseChannel::BodyRot, self.params.body_rot_noise_deg)
    }

    /// Hand reach: mirrored rest offset taken into world space through the
    /// solver-supplied body pose, jittered, then clamped in the chest
    /// frame so hands stay on their own side and above the clamp floor.
    pub fn hand_target(
        &self,
        hand: Hand,
        solver_body: &Isometry,
        chest: &BoneFrame,
        noise: &NoiseField,
    ) -> Vec3 {
        let mut rest = self.params.hand_rest_offset;
        if hand == Hand::Left { rest.x = -rest.x; }
        let world = solver_body.transform_point(rest)
            + noise.vector3(hand.channel()) * self.params.hand_noise_amp;
        let mut local = chest.to_local(world);
        local.y = local.y.max(self.params.hand_min_y);
        match hand {
            Hand::Left => local.z = local.z.max(self.params.hand_side_clamp),
            Hand::Right => local.z = local.z.min(-self.params.hand_side_clamp),
        }
        chest.to_world(local)
    }

    /// Gaze point: a fixed distance ahead of the synthesized body, pushed
    /// around by the head channel.
    pub fn look_target(&self, body: &Isometry, noise: &NoiseField) -> Vec3 {
        let local = noise.vector3(NoiseChannel::Head) * self.params.head_move_amp
            + vec3(0.0, 0.0, self.params.look_distance);
        body.transform_point(local)
    }

    /// Cosmetic upper-body sway: fixed forward tilt composed with a
    /// three-axis bounded wobble. Applied identically to each spine bone;
    /// independent of the stepping state.
    pub fn spine_twist(&self, noise: &NoiseField) -> Quat {
        Quat::from_rotation_x(self.params.spine_tilt_deg.to_radians())
            * noise.euler_rotation(NoiseChannel::SpineTwist, self.params.spine_twist_deg)
    }
}
