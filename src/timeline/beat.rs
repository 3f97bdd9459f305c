//! Beat positions and tempo segments of the output timeline.

use std::cmp::Ordering;

use num::{BigInt, BigRational, BigUint, Integer, One, ToPrimitive, Zero};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer, de::Error as _, ser::Error as _,
    ser::SerializeTuple,
};
use serde_json::value::RawValue;

/// An exact position on the timeline: a whole beat number and a fraction of the next beat.
///
/// The fraction is always in lowest terms and in `[0, 1)`, so two equal positions have equal
/// fields. Its parts are unbounded: charts with decimal angles and tempos easily need
/// denominators past 64 bits.
///
/// Serialized as the `[bar, numerator, denominator]` triple used by Malody. Parts are written as
/// plain JSON integers of any size. Reading accepts parts up to `u64::MAX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BeatPosition {
    bar: i64,
    numerator: BigUint,
    denominator: BigUint,
}

impl BeatPosition {
    /// The origin, `[0, 0, 1]`.
    #[must_use]
    pub fn origin() -> Self {
        Self {
            bar: 0,
            numerator: BigUint::zero(),
            denominator: BigUint::one(),
        }
    }

    /// Creates a position from `bar + numerator / denominator`, carrying whole beats of the
    /// fraction into `bar` and reducing the rest. Returns `None` for a zero denominator or when
    /// `bar` overflows.
    #[must_use]
    pub fn new(bar: i64, numerator: u64, denominator: u64) -> Option<Self> {
        Self::normalized(bar, BigUint::from(numerator), BigUint::from(denominator))
    }

    /// Creates a position from a whole beat number and a non-negative fraction. Returns `None` for
    /// a negative fraction or when carrying its whole part overflows `bar`.
    #[must_use]
    pub fn from_parts(bar: i64, fraction: &BigRational) -> Option<Self> {
        Self::normalized(
            bar,
            fraction.numer().to_biguint()?,
            fraction.denom().to_biguint()?,
        )
    }

    fn normalized(bar: i64, numerator: BigUint, denominator: BigUint) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        let (whole, numerator) = numerator.div_rem(&denominator);
        let bar = bar.checked_add(whole.to_i64()?)?;
        let divisor = numerator.gcd(&denominator);
        Some(Self {
            bar,
            numerator: numerator / &divisor,
            denominator: denominator / divisor,
        })
    }

    /// Whole beat number.
    #[must_use]
    pub const fn bar(&self) -> i64 {
        self.bar
    }

    /// Numerator of the fraction part.
    #[must_use]
    pub const fn numerator(&self) -> &BigUint {
        &self.numerator
    }

    /// Denominator of the fraction part.
    #[must_use]
    pub const fn denominator(&self) -> &BigUint {
        &self.denominator
    }

    /// The position as one exact number of beats.
    #[must_use]
    pub fn to_ratio(&self) -> BigRational {
        BigRational::from_integer(BigInt::from(self.bar))
            + BigRational::new(
                BigInt::from(self.numerator.clone()),
                BigInt::from(self.denominator.clone()),
            )
    }
}

impl PartialOrd for BeatPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BeatPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bar.cmp(&other.bar).then_with(|| {
            let lhs = &self.numerator * &other.denominator;
            let rhs = &other.numerator * &self.denominator;
            lhs.cmp(&rhs)
        })
    }
}

/// A fraction part written as a JSON integer, however large.
struct Part<'a>(&'a BigUint);

impl Serialize for Part<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.to_u64() {
            Some(small) => serializer.serialize_u64(small),
            None => RawValue::from_string(self.0.to_string())
                .map_err(S::Error::custom)?
                .serialize(serializer),
        }
    }
}

impl Serialize for BeatPosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut triple = serializer.serialize_tuple(3)?;
        triple.serialize_element(&self.bar)?;
        triple.serialize_element(&Part(&self.numerator))?;
        triple.serialize_element(&Part(&self.denominator))?;
        triple.end()
    }
}

impl<'de> Deserialize<'de> for BeatPosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (bar, numerator, denominator) = <(i64, u64, u64)>::deserialize(deserializer)?;
        Self::new(bar, numerator, denominator)
            .ok_or_else(|| D::Error::custom("beat denominator must not be zero"))
    }
}

/// A section of constant tempo, starting at `start` and lasting until the next segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempoSegment {
    /// Start position of the segment.
    pub start: BeatPosition,
    /// Beats per minute.
    pub bpm: BigRational,
}

impl TempoSegment {
    /// The BPM as a float, for output.
    #[must_use]
    pub fn bpm_f64(&self) -> f64 {
        self.bpm.to_f64().unwrap_or(f64::NAN)
    }
}
