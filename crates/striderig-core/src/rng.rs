use crate::Scalar;

/// 32-bit avalanche finalizer (lowbias-style). Stateless: the same seed
/// always maps to the same output, and flipping any input bit scrambles
/// roughly half the output bits, so consecutive seeds are uncorrelated.
#[inline]
pub fn mix32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

/// Hashed scalar in [0, 1). Pure function of the seed; no internal state.
#[inline]
pub fn hash01(seed: u32) -> Scalar {
    // top 24 bits -> exact f32 in [0,1)
    (mix32(seed) >> 8) as Scalar / (1u32 << 24) as Scalar
}

/// Hashed scalar in [lo, hi).
#[inline]
pub fn hash_range(lo: Scalar, hi: Scalar, seed: u32) -> Scalar {
    lo + hash01(seed) * (hi - lo)
}

/// Hashed sign, +1 when the unit hash lands above 0.5.
#[inline]
pub fn hash_sign(seed: u32) -> Scalar {
    if hash01(seed) > 0.5 { 1.0 } else { -1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn unit_interval() {
        for s in 0..10_000u32 {
            let v = hash01(s.wrapping_mul(2654435761));
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test] fn stateless_and_stable() {
        assert_eq!(hash01(123), hash01(123));
        assert_eq!(hash_range(0.5, 1.0, 7), hash_range(0.5, 1.0, 7));
    }

    #[test] fn consecutive_seeds_decorrelate() {
        // adjacent seeds must not produce adjacent values
        let mut close = 0;
        for s in 0..1000u32 {
            if (hash01(s) - hash01(s + 1)).abs() < 1e-3 { close += 1; }
        }
        assert!(close < 10, "adjacent seeds too correlated: {close}");
    }

    #[test] fn range_respects_bounds() {
        for s in 0..1000u32 {
            let v = hash_range(0.5, 1.0, s);
            assert!((0.5..1.0).contains(&v));
        }
    }

    #[test] fn sign_takes_both_values() {
        let mut pos = 0;
        let mut neg = 0;
        for s in 0..1000u32 {
            if hash_sign(s) > 0.0 { pos += 1 } else { neg += 1 }
        }
        assert!(pos > 400 && neg > 400, "biased sign: +{pos} -{neg}");
    }
}
