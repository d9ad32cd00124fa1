//! IEEE-754 half precision conversions for float16 vector elements.

use half::f16;

/// Narrow an `f32` to binary16 bits, rounding to nearest, ties to even.
///
/// Values beyond the float16 range become infinities of the same sign.
/// NaN stays NaN and the sign of zero is kept.
#[must_use]
pub fn f32_to_f16_bits(value: f32) -> u16 {
    f16::from_f32(value).to_bits()
}

/// Widen binary16 bits to `f32`. Exact for every input.
#[must_use]
pub fn f16_bits_to_f32(bits: u16) -> f32 {
    f16::from_bits(bits).to_f32()
}

/// Round an `f32` to the nearest value float16 storage can hold.
#[must_use]
pub fn round_to_f16(value: f32) -> f32 {
    f16::from_f32(value).to_f32()
}
