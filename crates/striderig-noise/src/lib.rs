use glam::{EulerRot, Quat};
use striderig_core::{hash01, Scalar, Vec3};

/// One channel per consumer. Channels share the field's clock but sample
/// disjoint seed lanes, so no channel ever reads another's history.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NoiseChannel {
    BodyPos,
    BodyRot,
    HandLeft,
    HandRight,
    Head,
    SpineTwist,
}

impl NoiseChannel {
    #[inline]
    fn salt(self) -> u32 {
        match self {
            NoiseChannel::BodyPos => 0,
            NoiseChannel::BodyRot => 1,
            NoiseChannel::HandLeft => 2,
            NoiseChannel::HandRight => 3,
            NoiseChannel::Head => 4,
            NoiseChannel::SpineTwist => 5,
        }
    }
}

/// Continuously advancing layered value noise. `step` moves the clock by
/// `frequency * dt`; queries between steps are pure and idempotent.
#[derive(Copy, Clone, Debug)]
pub struct NoiseField {
    seed: u32,
    frequency: Scalar,
    t: Scalar,
}

const LANES_PER_CHANNEL: u32 = 8;

#[inline]
fn fade(t: Scalar) -> Scalar {
    // quintic ease, C2 at the lattice points
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: Scalar, b: Scalar, t: Scalar) -> Scalar { a + (b - a) * t }

/// Lattice value in [-1, 1] at an integer cell of one seed lane.
#[inline]
fn lattice(lane_seed: u32, cell: u32) -> Scalar {
    hash01(lane_seed.wrapping_add(cell.wrapping_mul(0x9e37_79b9))) * 2.0 - 1.0
}

/// 1D value noise in [-1, 1], C1-continuous in t (t >= 0).
#[inline]
fn value_noise(t: Scalar, lane_seed: u32) -> Scalar {
    let cell = t.floor();
    let frac = t - cell;
    let cell = cell as u32;
    lerp(
        lattice(lane_seed, cell),
        lattice(lane_seed, cell.wrapping_add(1)),
        fade(frac),
    )
}

impl NoiseField {
    pub fn new(seed: u32, frequency: Scalar) -> Self {
        Self { seed, frequency: frequency.max(0.0), t: 0.0 }
    }

    pub fn frequency(&self) -> Scalar { self.frequency }

    pub fn set_frequency(&mut self, frequency: Scalar) {
        self.frequency = frequency.max(0.0);
    }

    /// Advance every channel's clock. Call exactly once per tick, before
    /// any query of that tick.
    pub fn step(&mut self, dt: Scalar) {
        self.t += self.frequency * dt.max(0.0);
    }

    #[inline]
    fn lane_seed(&self, channel: NoiseChannel, lane: u32) -> u32 {
        self.seed
            .wrapping_add((channel.salt() * LANES_PER_CHANNEL + lane).wrapping_mul(0x85eb_ca6b))
    }

    #[inline]
    fn sample(&self, channel: NoiseChannel, lane: u32) -> Scalar {
        value_noise(self.t, self.lane_seed(channel, lane))
    }

    /// Smooth scalar in [-1, 1].
    pub fn scalar(&self, channel: NoiseChannel) -> Scalar {
        self.sample(channel, 0)
    }

    /// Smooth vector, each component in [-1, 1].
    pub fn vector3(&self, channel: NoiseChannel) -> Vec3 {
        Vec3::new(
            self.sample(channel, 1),
            self.sample(channel, 2),
            self.sample(channel, 3),
        )
    }

    /// Smooth rotation about a wandering axis, never exceeding
    /// `max_angle_deg` from identity.
    pub fn rotation(&self, channel: NoiseChannel, max_angle_deg: Scalar) -> Quat {
        let axis = Vec3::new(
            self.sample(channel, 4),
            self.sample(channel, 5),
            self.sample(channel, 6),
        );
        // a degenerate axis means no discernible direction; keep identity
        if axis.length_squared() < 1.0e-8 {
            return Quat::IDENTITY;
        }
        let angle = self.sample(channel, 7) * max_angle_deg.to_radians();
        Quat::from_axis_angle(axis.normalize(), angle)
    }

    /// Composite rotation with an independent bound per Euler axis, for the
    /// upper-spine twist.
    pub fn euler_rotation(&self, channel: NoiseChannel, max_deg: [Scalar; 3]) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.sample(channel, 1) * max_deg[0].to_radians(),
            self.sample(channel, 2) * max_deg[1].to_radians(),
            self.sample(channel, 3) * max_deg[2].to_radians(),
        )
    }
}
