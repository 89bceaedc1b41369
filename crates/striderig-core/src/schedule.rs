use crate::PoseHasher;

/// Fixed per-tick stage order of the rig driver. Recorded each tick so a
/// digest mismatch flags any reordering of the pipeline.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TickStage {
    NoiseStep = 1,
    GaitAdvance = 2,
    FrameRefresh = 3,
    PoseQuery = 4,
}

pub fn schedule_digest(stages: &[TickStage]) -> [u8; 32] {
    let mut h = PoseHasher::new();
    for s in stages { h.update_bytes(&[*s as u8]); }
    h.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn digest_detects_reorder() {
        let a = schedule_digest(&[TickStage::NoiseStep, TickStage::GaitAdvance]);
        let b = schedule_digest(&[TickStage::GaitAdvance, TickStage::NoiseStep]);
        assert_ne!(a, b);
    }
}
