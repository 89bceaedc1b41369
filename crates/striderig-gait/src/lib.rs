use glam::Quat;
use striderig_core::{hash_range, hash_sign, vec3, Scalar, Vec3};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Foot { Left, Right }

impl Foot {
    #[inline]
    pub fn index(self) -> usize {
        match self { Foot::Left => 0, Foot::Right => 1 }
    }

    #[inline]
    fn from_index(i: usize) -> Foot {
        if i == 0 { Foot::Left } else { Foot::Right }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct GaitSpec {
    pub step_frequency: Scalar, // steps per second
    pub stride_len: Scalar,     // foot separation, meters
    pub step_height: Scalar,    // swing lift, meters
    pub max_turn_deg: Scalar,   // per-step turn bound
    pub seed: u32,
}

impl Default for GaitSpec {
    fn default() -> Self {
        Self {
            step_frequency: 2.0,
            stride_len: 0.4,
            step_height: 0.15,
            max_turn_deg: 45.0,
            seed: 0,
        }
    }
}

/// Emitted when a step boundary commits a landing point. The only FootPair
/// mutation in the kernel.
#[derive(Copy, Clone, Debug)]
pub struct StepEvent {
    pub step_index: u32, // the departing step
    pub turn_rad: Scalar,
    pub foot: Foot, // the relocated foot
    pub landing: Vec3,
}

/// C1 ease: zero slope at both ends, so the swing arc starts and lands with
/// zero vertical velocity.
#[inline]
pub fn smoothstep(x: Scalar) -> Scalar {
    x * x * (3.0 - 2.0 * x)
}

/// Phase-driven stepping state. The phase only ever grows; step index,
/// progress and pivot parity are all derived from it. Foot anchors live on
/// the ground plane and are biased vertically at read time only.
#[derive(Copy, Clone, Debug)]
pub struct GaitState {
    spec: GaitSpec,
    phase: Scalar,
    feet: [Vec3; 2], // [left, right], y = 0
}

impl GaitState {
    pub fn new(spec: GaitSpec) -> Self {
        let half = spec.stride_len * 0.5;
        Self {
            spec,
            phase: 0.0,
            feet: [vec3(-half, 0.0, 0.0), vec3(half, 0.0, 0.0)],
        }
    }

    pub fn spec(&self) -> &GaitSpec { &self.spec }
    pub fn phase(&self) -> Scalar { self.phase }

    #[inline]
    pub fn step_index(&self) -> u32 { self.phase.floor() as u32 }

    #[inline]
    pub fn progress(&self) -> Scalar { self.phase - self.phase.floor() }

    /// Even step index => left foot is planted.
    #[inline]
    pub fn pivot(&self) -> Foot {
        if self.step_index() % 2 == 0 { Foot::Left } else { Foot::Right }
    }

    #[inline]
    pub fn swing(&self) -> Foot {
        match self.pivot() { Foot::Left => Foot::Right, Foot::Right => Foot::Left }
    }

    /// Signed turn of a given step, radians. Pure in (seed, step index):
    /// sign and magnitude take consecutive seed offsets and stay stable for
    /// the lifetime of the instance.
    pub fn step_turn(&self, step_index: u32) -> Scalar {
        let s = self.spec.seed.wrapping_add(step_index.wrapping_mul(2));
        let sign = hash_sign(s);
        let mag = hash_range(0.5, 1.0, s.wrapping_add(1)) * self.spec.max_turn_deg.to_radians();
        sign * mag
    }

    /// Advance the phase by `step_frequency * dt`. If that crosses a step
    /// boundary, first commit the departing swing foot to its landing
    /// point: pivot + R(full turn) * (unit foot-line * stride). The landing
    /// foot becomes the next step's pivot.
    pub fn advance(&mut self, dt: Scalar) -> Option<StepEvent> {
        let delta = self.spec.step_frequency * dt.max(0.0);
        let mut event = None;
        if (self.phase + delta).floor() > self.phase.floor() {
            let departing = self.step_index();
            let pivot_i = (departing % 2) as usize;
            let swing_i = pivot_i ^ 1;
            let pivot = self.feet[pivot_i];
            let line = self.feet[swing_i] - pivot;
            // coincident feet have no line to rotate; fall back to +X
            let dir = if line.length_squared() > 1.0e-12 { line.normalize() } else { Vec3::X };
            let turn = self.step_turn(departing);
            let landing =
                pivot + Quat::from_rotation_y(turn) * (dir * self.spec.stride_len);
            self.feet[swing_i] = landing;
            event = Some(StepEvent {
                step_index: departing,
                turn_rad: turn,
                foot: Foot::from_index(swing_i),
                landing,
            });
        }
        self.phase += delta;
        event
    }

    /// Raw ground-plane anchors, [left, right].
    pub fn feet(&self) -> [Vec3; 2] { self.feet }

    /// Where a foot is right now. The pivot sits on its anchor; the swing
    /// foot rotates about the pivot by the partial turn and arcs upward by
    /// `sin(smoothstep(progress) * pi) * step_height`. At progress 0 and 1
    /// this reduces exactly to the stored anchors, so nothing snaps across
    /// a boundary.
    pub fn foot_target(&self, foot: Foot, ground_bias: Scalar) -> Vec3 {
        let bias = vec3(0.0, ground_bias, 0.0);
        let i = foot.index();
        let pivot_i = self.pivot().index();
        if i == pivot_i {
            return self.feet[i] + bias;
        }
        let progress = self.progress();
        let turn = self.step_turn(self.step_index()) * progress;
        let pivot = self.feet[pivot_i];
        let swung = pivot + Quat::from_rotation_y(turn) * (self.feet[i] - pivot);
        let lift = ((smoothstep(progress) * core::f32::consts::PI).sin()
            * self.spec.step_height)
            .max(0.0);
        swung + vec3(0.0, lift, 0.0) + bias
    }
}
