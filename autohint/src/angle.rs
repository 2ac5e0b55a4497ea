//! Low precision vector angles.
//!
//! Angles are integers where a half turn is [`PI`]. These are only used for
//! detecting inflections and locally straight points so speed matters far
//! more than accuracy.

use super::math::fixed_div;

/// Integer representation of a half turn.
pub(crate) const PI: i32 = 256;
pub(crate) const TWO_PI: i32 = PI * 2;
pub(crate) const HALF_PI: i32 = PI / 2;

const ATAN_BITS: i32 = 8;

/// Arctangent of `i / 256` for `i` in `0..256`, in units where a half turn
/// is 256.
#[rustfmt::skip]
const ARCTAN: [u8; 1 << ATAN_BITS] = [
    0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 5,
    5, 5, 6, 6, 6, 7, 7, 7, 8, 8, 8, 9, 9, 9, 10, 10,
    10, 10, 11, 11, 11, 12, 12, 12, 13, 13, 13, 14, 14, 14, 14, 15,
    15, 15, 16, 16, 16, 17, 17, 17, 18, 18, 18, 18, 19, 19, 19, 20,
    20, 20, 21, 21, 21, 21, 22, 22, 22, 23, 23, 23, 24, 24, 24, 24,
    25, 25, 25, 26, 26, 26, 26, 27, 27, 27, 28, 28, 28, 28, 29, 29,
    29, 30, 30, 30, 30, 31, 31, 31, 31, 32, 32, 32, 33, 33, 33, 33,
    34, 34, 34, 34, 35, 35, 35, 35, 36, 36, 36, 36, 37, 37, 37, 38,
    38, 38, 38, 39, 39, 39, 39, 40, 40, 40, 40, 41, 41, 41, 41, 42,
    42, 42, 42, 42, 43, 43, 43, 43, 44, 44, 44, 44, 45, 45, 45, 45,
    46, 46, 46, 46, 46, 47, 47, 47, 47, 48, 48, 48, 48, 48, 49, 49,
    49, 49, 50, 50, 50, 50, 50, 51, 51, 51, 51, 51, 52, 52, 52, 52,
    52, 53, 53, 53, 53, 53, 54, 54, 54, 54, 54, 55, 55, 55, 55, 55,
    56, 56, 56, 56, 56, 57, 57, 57, 57, 57, 57, 58, 58, 58, 58, 58,
    59, 59, 59, 59, 59, 59, 60, 60, 60, 60, 60, 61, 61, 61, 61, 61,
    61, 62, 62, 62, 62, 62, 62, 63, 63, 63, 63, 63, 63, 64, 64, 64,
];

fn arctan(ratio: i32) -> i32 {
    // The quotient can round up to exactly 1.0 for nearly diagonal
    // vectors
    let ix = (ratio >> (16 - ATAN_BITS)).clamp(0, (1 << ATAN_BITS) - 1);
    ARCTAN[ix as usize] as i32
}

/// Returns the angle of the vector `(dx, dy)` in the range `(-PI, PI]`.
pub(crate) fn angle(dx: i32, dy: i32) -> i32 {
    // Trivial cases
    if dy == 0 {
        return if dx < 0 { PI } else { 0 };
    }
    if dx == 0 {
        return if dy < 0 { -HALF_PI } else { HALF_PI };
    }
    let (mut dx, mut dy) = (dx, dy);
    let mut angle = 0;
    if dx < 0 {
        dx = -dx;
        dy = -dy;
        angle = PI;
    }
    if dy < 0 {
        (dx, dy) = (-dy, dx);
        angle -= HALF_PI;
    }
    if dx == dy {
        angle += PI / 4;
    } else if dx > dy {
        angle += arctan(fixed_div(dy, dx));
    } else {
        angle += HALF_PI - arctan(fixed_div(dx, dy));
    }
    if angle > PI {
        angle -= TWO_PI;
    }
    angle
}

/// Returns the signed difference `a2 - a1` normalized to `(-PI, PI]`.
pub(crate) fn angle_diff(a1: i32, a2: i32) -> i32 {
    let mut delta = a2 - a1;
    if delta < 0 {
        delta += TWO_PI;
    }
    if delta > PI {
        delta -= TWO_PI;
    }
    delta
}
