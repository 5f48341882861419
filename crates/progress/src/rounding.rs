//! Integer division with explicit rounding.
//!
//! Expected progress rounds to nearest (half up); quotas and needed time
//! round up. Both work on exact integers so results do not depend on
//! floating-point behavior.

/// `ceil(numerator / denominator)`.
///
/// `denominator` must be non-zero.
pub fn div_ceil(numerator: u128, denominator: u128) -> u128 {
    numerator.div_ceil(denominator)
}

/// `numerator / denominator` rounded to nearest, ties away from zero.
///
/// `denominator` must be non-zero.
pub fn div_round_half_up(numerator: u128, denominator: u128) -> u128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder * 2 >= denominator {
        quotient + 1
    } else {
        quotient
    }
}
