/// Every quantity in the kernel is f32; the determinism contract depends on
/// all consumers agreeing on the float width.
pub type Scalar = f32;
