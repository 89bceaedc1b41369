pub mod harness;

use glam::Quat;
use serde::{Deserialize, Serialize};
use striderig_core::{
    hash_quat, hash_scalar, hash_vec3, iso, schedule_digest, BoneFrame, Isometry, PoseHasher,
    Scalar, TickStage, Vec3,
};
use striderig_gait::{Foot, GaitSpec, GaitState, StepEvent};
use striderig_noise::NoiseField;
use striderig_pose::{Hand, PoseCtrl, PoseParams};
use thiserror::Error;

/// Everything the rig needs from the host skeleton, queried once per tick.
/// The returned frame is a snapshot: it must not be cached across ticks.
pub trait BoneQuery {
    fn chest_frame(&self) -> BoneFrame;
    /// Sole-to-ankle height, added to every foot target at read time.
    fn sole_offset(&self) -> Scalar;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
}

/// Immutable per-instance tuning. Validated once at driver construction,
/// never mid-tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub seed: u32,
    pub step_frequency: f32,
    pub stride_len: f32,
    pub step_height: f32,
    pub max_turn_deg: f32,
    pub body_height: f32,
    pub body_pos_noise_amp: f32,
    pub body_rot_noise_deg: f32,
    pub hand_rest_offset: [f32; 3],
    pub hand_noise_amp: f32,
    pub hand_min_y: f32,
    pub hand_side_clamp: f32,
    pub head_move_amp: f32,
    pub look_distance: f32,
    pub spine_tilt_deg: f32,
    pub spine_twist_deg: [f32; 3],
    pub noise_frequency: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            step_frequency: 2.0,
            stride_len: 0.4,
            step_height: 0.15,
            max_turn_deg: 45.0,
            body_height: 0.9,
            body_pos_noise_amp: 0.02,
            body_rot_noise_deg: 6.0,
            hand_rest_offset: [0.25, 0.65, 0.3],
            hand_noise_amp: 0.05,
            // hand-tuned chest-local clamp floors (see design notes)
            hand_min_y: 0.2,
            hand_side_clamp: 0.2,
            head_move_amp: 0.3,
            look_distance: 2.0,
            spine_tilt_deg: -8.0,
            spine_twist_deg: [4.0, 10.0, 4.0],
            noise_frequency: 1.5,
        }
    }
}

impl RigConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("step_frequency", self.step_frequency),
            ("stride_len", self.stride_len),
            ("body_height", self.body_height),
            ("noise_frequency", self.noise_frequency),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        let non_negative = [
            ("step_height", self.step_height),
            ("max_turn_deg", self.max_turn_deg),
            ("body_pos_noise_amp", self.body_pos_noise_amp),
            ("body_rot_noise_deg", self.body_rot_noise_deg),
            ("hand_noise_amp", self.hand_noise_amp),
            ("head_move_amp", self.head_move_amp),
            ("look_distance", self.look_distance),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }
        Ok(())
    }

    fn gait_spec(&self) -> GaitSpec {
        GaitSpec {
            step_frequency: self.step_frequency,
            stride_len: self.stride_len,
            step_height: self.step_height,
            max_turn_deg: self.max_turn_deg,
            seed: self.seed,
        }
    }

    fn pose_params(&self) -> PoseParams {
        PoseParams {
            body_height: self.body_height,
            body_pos_noise_amp: self.body_pos_noise_amp,
            body_rot_noise_deg: self.body_rot_noise_deg,
            hand_rest_offset: Vec3::from_array(self.hand_rest_offset),
            hand_noise_amp: self.hand_noise_amp,
            hand_min_y: self.hand_min_y,
            hand_side_clamp: self.hand_side_clamp,
            head_move_amp: self.head_move_amp,
            look_distance: self.look_distance,
            spine_tilt_deg: self.spine_tilt_deg,
            spine_twist_deg: self.spine_twist_deg,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct WeightedPoint { pub pos: Vec3, pub weight: Scalar }

#[derive(Copy, Clone, Debug)]
pub struct WeightedPose { pub pose: Isometry, pub weight: Scalar }

/// One tick's full output bundle for the external IK solver. Every target
/// carries full weight.
#[derive(Copy, Clone, Debug)]
pub struct PoseTargets {
    pub feet: [WeightedPoint; 2],       // [left, right]
    pub body: WeightedPose,
    pub spine_twist: [Quat; 3],
    pub hands: [WeightedPoint; 2],      // [left, right]
    pub look_at: WeightedPoint,
}

impl PoseTargets {
    /// Feed every emitted value, in emission order, into a digest.
    pub fn digest_into(&self, h: &mut PoseHasher) {
        for f in &self.feet {
            hash_vec3(h, &f.pos);
            hash_scalar(h, f.weight);
        }
        hash_vec3(h, &self.body.pose.pos);
        hash_quat(h, &self.body.pose.rot);
        hash_scalar(h, self.body.weight);
        for q in &self.spine_twist { hash_quat(h, q); }
        for hd in &self.hands {
            hash_vec3(h, &hd.pos);
            hash_scalar(h, hd.weight);
        }
        hash_vec3(h, &self.look_at.pos);
        hash_scalar(h, self.look_at.weight);
    }

    pub fn digest(&self) -> [u8; 32] {
        let mut h = PoseHasher::new();
        self.digest_into(&mut h);
        h.finalize()
    }
}

/// Append-only record of step boundaries, oldest entries dropped at the
/// cap. Recording replaces logging here.
#[derive(Clone, Debug, Default)]
pub struct StepLedger {
    events: Vec<StepEvent>,
    cap: usize,
}

impl StepLedger {
    pub fn new(cap: usize) -> Self {
        Self { events: Vec::new(), cap }
    }

    pub fn push(&mut self, e: StepEvent) {
        if self.cap > 0 && self.events.len() == self.cap {
            self.events.remove(0);
        }
        self.events.push(e);
    }

    pub fn events(&self) -> &[StepEvent] { &self.events }
    pub fn len(&self) -> usize { self.events.len() }
    pub fn is_empty(&self) -> bool { self.events.is_empty() }
    pub fn clear(&mut self) { self.events.clear(); }
}

#[derive(Default)]
struct ScheduleRecorder { stages: Vec<TickStage> }

impl ScheduleRecorder {
    fn begin_tick(&mut self) { self.stages.clear(); }
    fn push(&mut self, s: TickStage) { self.stages.push(s); }
    fn digest(&self) -> [u8; 32] { schedule_digest(&self.stages) }
}

/// Per-tick orchestrator. One instance per animated character; owns all
/// mutable state, shares nothing.
pub struct RigDriver {
    config: RigConfig,
    noise: NoiseField,
    gait: GaitState,
    pose: PoseCtrl,
    sched: ScheduleRecorder,
    ledger: StepLedger,
}

const LEDGER_CAP: usize = 256;

impl RigDriver {
    pub fn new(config: RigConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let noise = NoiseField::new(config.seed, config.noise_frequency);
        let gait = GaitState::new(config.gait_spec());
        let pose = PoseCtrl::new(config.pose_params());
        Ok(Self {
            config,
            noise,
            gait,
            pose,
            sched: ScheduleRecorder::default(),
            ledger: StepLedger::new(LEDGER_CAP),
        })
    }

    pub fn config(&self) -> &RigConfig { &self.config }
    pub fn gait(&self) -> &GaitState { &self.gait }
    pub fn ledger(&self) -> &StepLedger { &self.ledger }
    pub fn schedule_digest(&self) -> [u8; 32] { self.sched.digest() }

    /// One tick: advance noise and phase, refresh the chest snapshot, then
    /// synthesize the whole bundle. `solver_body` is the host IK solver's
    /// body pose from its previous resolve, used for hand world transforms.
    pub fn tick(
        &mut self,
        dt: Scalar,
        solver_body: Isometry,
        bones: &impl BoneQuery,
    ) -> PoseTargets {
        let dt = dt.max(0.0);
        self.sched.begin_tick();

        self.noise.set_frequency(self.config.noise_frequency);
        self.sched.push(TickStage::NoiseStep);
        self.noise.step(dt);

        self.sched.push(TickStage::GaitAdvance);
        if let Some(e) = self.gait.advance(dt) {
            self.ledger.push(e);
        }

        self.sched.push(TickStage::FrameRefresh);
        let chest = bones.chest_frame();
        let bias = bones.sole_offset();

        self.sched.push(TickStage::PoseQuery);
        let feet = [
            WeightedPoint { pos: self.gait.foot_target(Foot::Left, bias), weight: 1.0 },
            WeightedPoint { pos: self.gait.foot_target(Foot::Right, bias), weight: 1.0 },
        ];
        let body_pos = self.pose.body_position(&self.gait, &self.noise, bias);
        let body_rot = self.pose.body_rotation(&self.gait, &self.noise, bias);
        let body = iso(body_pos, body_rot);
        let twist = self.pose.spine_twist(&self.noise);
        let hands = [
            WeightedPoint {
                pos: self.pose.hand_target(Hand::Left, &solver_body, &chest, &self.noise),
                weight: 1.0,
            },
            WeightedPoint {
                pos: self.pose.hand_target(Hand::Right, &solver_body, &chest, &self.noise),
                weight: 1.0,
            },
        ];
        let look_at = WeightedPoint {
            pos: self.pose.look_target(&body, &self.noise),
            weight: 1.0,
        };

        PoseTargets {
            feet,
            body: WeightedPose { pose: body, weight: 1.0 },
            spine_twist: [twist; 3],
            hands,
            look_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{replay, FixedSkeleton};

    const DT: Scalar = 1.0 / 60.0;

    fn config(seed: u32) -> RigConfig {
        RigConfig { seed, ..RigConfig::default() }
    }

    #[test] fn rejects_bad_config_at_construction() {
        let bad = RigConfig { step_frequency: -2.0, ..RigConfig::default() };
        assert!(matches!(
            RigDriver::new(bad),
            Err(ConfigError::NotPositive { name: "step_frequency", .. })
        ));
        let bad = RigConfig { hand_noise_amp: -0.1, ..RigConfig::default() };
        assert!(RigDriver::new(bad).is_err());
        let bad = RigConfig { noise_frequency: f32::NAN, ..RigConfig::default() };
        assert!(RigDriver::new(bad).is_err());
    }

    #[test] fn same_seed_same_digest() {
        let a = replay(&config(123), 240, DT).unwrap();
        let b = replay(&config(123), 240, DT).unwrap();
        assert_eq!(a, b);
    }

    #[test] fn different_seeds_diverge() {
        let a = replay(&config(123), 240, DT).unwrap();
        let b = replay(&config(124), 240, DT).unwrap();
        assert_ne!(a, b);
    }

    #[test] fn every_target_carries_full_weight() {
        let mut driver = RigDriver::new(config(9)).unwrap();
        let skel = FixedSkeleton::default();
        let out = driver.tick(DT, Isometry::default(), &skel);
        for f in out.feet { assert_eq!(f.weight, 1.0); }
        for h in out.hands { assert_eq!(h.weight, 1.0); }
        assert_eq!(out.body.weight, 1.0);
        assert_eq!(out.look_at.weight, 1.0);
    }

    #[test] fn spine_twist_is_uniform_across_the_three_bones() {
        let mut driver = RigDriver::new(config(2)).unwrap();
        let skel = FixedSkeleton::default();
        let out = driver.tick(DT, Isometry::default(), &skel);
        assert_eq!(out.spine_twist[0], out.spine_twist[1]);
        assert_eq!(out.spine_twist[1], out.spine_twist[2]);
    }

    #[test] fn stage_order_is_stable_every_tick() {
        let mut driver = RigDriver::new(config(7)).unwrap();
        let skel = FixedSkeleton::default();
        driver.tick(DT, Isometry::default(), &skel);
        let first = driver.schedule_digest();
        for _ in 0..100 {
            driver.tick(DT, Isometry::default(), &skel);
            assert_eq!(driver.schedule_digest(), first);
        }
    }

    #[test] fn zero_dt_tick_changes_nothing() {
        let mut driver = RigDriver::new(config(5)).unwrap();
        let skel = FixedSkeleton::default();
        let mut body = Isometry::default();
        for _ in 0..30 {
            body = driver.tick(DT, body, &skel).body.pose;
        }
        let a = driver.tick(0.0, body, &skel).digest();
        let b = driver.tick(0.0, body, &skel).digest();
        assert_eq!(a, b);
        // negative dt is treated as zero, never as rewind
        let c = driver.tick(-DT, body, &skel).digest();
        assert_eq!(a, c);
    }

    #[test] fn ledger_records_the_half_second_scenario() {
        let mut driver = RigDriver::new(config(123)).unwrap();
        let skel = FixedSkeleton::default();
        let mut body = Isometry::default();
        for _ in 0..32 {
            body = driver.tick(DT, body, &skel).body.pose;
        }
        assert_eq!(driver.ledger().len(), 1);
        let e = driver.ledger().events()[0];
        assert_eq!(e.step_index, 0);
        let pivot = driver.gait().feet()[Foot::Left.index()];
        assert!((e.landing.distance(pivot) - driver.config().stride_len).abs() < 1e-5);
    }

    #[test] fn ledger_drops_oldest_at_cap() {
        let mut l = StepLedger::new(2);
        let e = StepEvent {
            step_index: 0,
            turn_rad: 0.1,
            foot: Foot::Right,
            landing: Vec3::ZERO,
        };
        for i in 0..5 {
            l.push(StepEvent { step_index: i, ..e });
        }
        assert_eq!(l.len(), 2);
        assert_eq!(l.events()[0].step_index, 3);
        assert_eq!(l.events()[1].step_index, 4);
    }

    #[test] fn config_round_trips_through_json() {
        let cfg = config(42);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: RigConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, 42);
        assert_eq!(back.stride_len, cfg.stride_len);
        // partial configs fall back to defaults
        let partial: RigConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(partial.seed, 7);
        assert_eq!(partial.step_frequency, RigConfig::default().step_frequency);
    }
}
