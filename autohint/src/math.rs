//! Fixed point helpers.
//!
//! Note: the hinter does lots of bit fiddling on raw 16.16 and 26.6 values
//! so we're opting out of using the strongly typed variants here because
//! they just add noise and reduce clarity.

use font_types::Fixed;

/// Multiplies a value by a 16.16 factor, rounding to nearest.
pub(crate) fn fixed_mul(a: i32, b: i32) -> i32 {
    (Fixed::from_bits(a) * Fixed::from_bits(b)).to_bits()
}

/// Divides a value by another, returning a 16.16 quotient.
///
/// Division by zero saturates rather than panicking.
pub(crate) fn fixed_div(a: i32, b: i32) -> i32 {
    (Fixed::from_bits(a) / Fixed::from_bits(b)).to_bits()
}

/// Computes `a * b / c` with a 64-bit intermediate, rounding to nearest.
pub(crate) fn fixed_mul_div(a: i32, b: i32, c: i32) -> i32 {
    Fixed::from_bits(a)
        .mul_div(Fixed::from_bits(b), Fixed::from_bits(c))
        .to_bits()
}

/// Rounds a 26.6 value to the nearest pixel.
pub(crate) fn pix_round(a: i32) -> i32 {
    (a + 32) & !63
}
