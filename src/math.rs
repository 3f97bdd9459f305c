//! Exact arithmetic helpers over [`BigRational`].

use num::{BigInt, BigRational, Integer, One, Signed, Zero};

/// Converts a decimal number read from a chart into an exact fraction.
///
/// The value goes through its shortest round-trip decimal representation, so `0.1` becomes
/// exactly `1/10` instead of the nearest binary fraction. Returns `None` for NaN or infinity.
#[must_use]
pub fn ratio_from_f64(value: f64) -> Option<BigRational> {
    if !value.is_finite() {
        return None;
    }
    parse_decimal(&value.to_string())
}

/// Parses a plain decimal literal such as `-12.375` into an exact fraction.
fn parse_decimal(text: &str) -> Option<BigRational> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let mantissa: BigInt = format!("{int_part}{frac_part}").parse().ok()?;
    let scale = BigInt::from(10u32).pow(frac_part.len() as u32);
    let ratio = BigRational::new(mantissa, scale);
    Some(if negative { -ratio } else { ratio })
}

/// Reduces `value` into `[0, modulus)` like a floored modulo.
#[must_use]
pub fn rem_euclid(value: &BigRational, modulus: &BigRational) -> BigRational {
    let quotient = (value / modulus).floor();
    value - modulus * quotient
}

/// Returns whether `ratio` is `2^k` for some integer `k`, including `k = 0`.
#[must_use]
pub fn is_power_of_two(ratio: &BigRational) -> bool {
    if !ratio.is_positive() {
        return false;
    }
    let is_pow2 = |n: &BigInt| {
        let bits = n.magnitude();
        bits.count_ones() == 1
    };
    // One of numerator and denominator is always 1 for a reduced power of two.
    (ratio.denom().is_one() && is_pow2(ratio.numer()))
        || (ratio.numer().is_one() && is_pow2(ratio.denom()))
}

/// Splits a non-negative fraction into its integer part and the remainder in `[0, 1)`.
#[must_use]
pub fn split_whole(value: &BigRational) -> (BigInt, BigRational) {
    let whole = value.numer().div_floor(value.denom());
    let rest = value - BigRational::from_integer(whole.clone());
    (whole, rest)
}

/// The fraction `numer / denom` built from small integers.
#[must_use]
pub fn ratio(numer: i64, denom: i64) -> BigRational {
    debug_assert!(!denom.is_zero());
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_conversion_is_exact() {
        assert_eq!(ratio_from_f64(0.1), Some(ratio(1, 10)));
        assert_eq!(ratio_from_f64(-12.375), Some(ratio(-99, 8)));
        assert_eq!(ratio_from_f64(120.0), Some(ratio(120, 1)));
        assert_eq!(ratio_from_f64(f64::NAN), None);
        assert_eq!(ratio_from_f64(f64::INFINITY), None);
    }

    #[test]
    fn floored_modulo() {
        let full = ratio(360, 1);
        assert_eq!(rem_euclid(&ratio(-180, 1), &full), ratio(180, 1));
        assert_eq!(rem_euclid(&ratio(720, 1), &full), ratio(0, 1));
        assert_eq!(rem_euclid(&ratio(2880, 7), &full), ratio(360, 7));
    }

    #[test]
    fn powers_of_two() {
        assert!(is_power_of_two(&ratio(1, 1)));
        assert!(is_power_of_two(&ratio(2, 1)));
        assert!(is_power_of_two(&ratio(1, 4)));
        assert!(is_power_of_two(&ratio(8, 1)));
        assert!(!is_power_of_two(&ratio(6, 1)));
        assert!(!is_power_of_two(&ratio(3, 2)));
        assert!(!is_power_of_two(&ratio(2, 3)));
        assert!(!is_power_of_two(&ratio(0, 1)));
        assert!(!is_power_of_two(&ratio(-2, 1)));
    }

    #[test]
    fn whole_part_split() {
        let (whole, rest) = split_whole(&ratio(7, 3));
        assert_eq!(whole, BigInt::from(2));
        assert_eq!(rest, ratio(1, 3));
    }
}
