//! Scalar helpers shared by intersection and shading code.

use crate::{MathError, MathResult};

/// Square `x`, refusing negative bases and results that overflow to infinity.
///
/// Used wherever a value is stored squared (sphere radii) so that malformed
/// input surfaces as an error instead of a silently valid square.
pub fn checked_pow2(x: f32) -> MathResult<f32> {
    if !x.is_finite() {
        return Err(MathError::NonFinite(x));
    }
    if x < 0.0 {
        return Err(MathError::NegativeBase(x));
    }

    let squared = x * x;
    if !squared.is_finite() {
        return Err(MathError::NonFinite(squared));
    }
    Ok(squared)
}

/// `x^5`, used by the Schlick Fresnel term.
#[inline]
pub fn pow5(x: f32) -> f32 {
    let x2 = x * x;
    x2 * x2 * x
}

/// Sign that treats zero as positive: `1.0` for `x >= 0`, `-1.0` otherwise.
#[inline]
pub fn sign_inc(x: f32) -> f32 {
    if x >= 0.0 {
        1.0
    } else {
        -1.0
    }
}
