/// What a host must hold fixed for two replays to produce identical
/// digests: the float width, the tick size, and the stage order.
#[derive(Copy, Clone, Debug)]
pub struct DeterminismContract {
    pub fixed_dt: f32,
    pub float: &'static str,
    pub stable_stage_order: bool,
}

impl DeterminismContract {
    pub fn default_contract() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            float: "f32",
            stable_stage_order: true,
        }
    }
}
