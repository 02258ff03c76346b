//! # Extended rational numbers
//!
//! An arbitrary-precision signed rational together with two sentinel infinities. Finite values
//! are kept in lowest terms with a positive denominator (delegated to the backing
//! `num-rational` normalization); the infinities ignore any numerator or denominator.
//!
//! Arithmetic follows the extended-real rules. The two indeterminate forms `0 * inf` and
//! `inf - inf`, as well as division by rational zero, are program errors and panic.
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

#[cfg(test)]
mod test;

/// Direction in which a rational is rounded when converted to a double.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RoundMode {
    /// The returned double is at most the rational, and adjacent to it.
    Down,
    /// The returned double is at least the rational, and adjacent to it.
    Up,
    /// The representable double closest to the rational, ties to even.
    Nearest,
}

/// Whether a rational is exactly representable as a double.
///
/// This is a cache: it starts out `Unknown` and is filled in on demand. Two values whose flags
/// are `Yes` and `No` can never be equal, which lets comparisons short-circuit.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FpFlag {
    /// The value equals some finite or infinite double exactly.
    Yes,
    /// No double equals the value.
    No,
    /// Not determined yet.
    Unknown,
}

#[derive(Clone, Debug)]
enum Kind {
    NegInfinity,
    Finite(BigRational),
    PosInfinity,
}

/// An arbitrary-precision rational extended with `+inf` and `-inf`.
///
/// The total order places `-inf` below and `+inf` above every finite value. The
/// fp-representability cache is excluded from equality and ordering.
#[derive(Clone, Debug)]
pub struct Rational {
    kind: Kind,
    fp: FpFlag,
}

impl Rational {
    /// Create a finite rational from a numerator and denominator.
    ///
    /// # Panics
    ///
    /// When `denominator` is zero.
    #[must_use]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        assert_ne!(denominator, 0, "rational with zero denominator");
        Self::from_big(BigRational::new(BigInt::from(numerator), BigInt::from(denominator)))
    }

    /// Create a finite rational from an integer.
    #[must_use]
    pub fn from_integer(value: i64) -> Self {
        Self::from_big(BigRational::from_integer(BigInt::from(value)))
    }

    /// Wrap a backing rational, which is already normalized.
    #[must_use]
    pub fn from_big(value: BigRational) -> Self {
        // Small integers are representable; leave everything else to be classified on demand.
        let fp = if value.is_integer() && value.numer().bits() <= f64::MANTISSA_DIGITS as u64 {
            FpFlag::Yes
        } else {
            FpFlag::Unknown
        };

        Self { kind: Kind::Finite(value), fp }
    }

    /// The exact value of a double. Infinite doubles map to the sentinels.
    ///
    /// # Panics
    ///
    /// When `value` is NaN.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        assert!(!value.is_nan(), "rational from NaN");

        if value == f64::INFINITY {
            Self::infinity()
        } else if value == f64::NEG_INFINITY {
            Self::negative_infinity()
        } else {
            let exact = BigRational::from_float(value)
                .expect("finite double always has an exact rational value");
            Self { kind: Kind::Finite(exact), fp: FpFlag::Yes }
        }
    }

    /// The positive infinity sentinel.
    #[must_use]
    pub fn infinity() -> Self {
        Self { kind: Kind::PosInfinity, fp: FpFlag::Yes }
    }

    /// The negative infinity sentinel.
    #[must_use]
    pub fn negative_infinity() -> Self {
        Self { kind: Kind::NegInfinity, fp: FpFlag::Yes }
    }

    /// Whether the value is neither of the infinities.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        matches!(self.kind, Kind::Finite(_))
    }

    /// Whether the value is one of the infinities.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        !self.is_finite()
    }

    /// Whether the value is a finite integer.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        match &self.kind {
            Kind::Finite(value) => value.is_integer(),
            _ => false,
        }
    }

    /// The sign of the value: `-1`, `0` or `1`.
    #[must_use]
    pub fn signum(&self) -> i32 {
        match &self.kind {
            Kind::NegInfinity => -1,
            Kind::Finite(value) => match value.numer().sign() {
                num_bigint::Sign::Minus => -1,
                num_bigint::Sign::NoSign => 0,
                num_bigint::Sign::Plus => 1,
            },
            Kind::PosInfinity => 1,
        }
    }

    /// Whether the value is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.signum() > 0
    }

    /// Whether the value is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.signum() < 0
    }

    /// The absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        match &self.kind {
            Kind::NegInfinity | Kind::PosInfinity => Self::infinity(),
            Kind::Finite(value) => Self::from_big(value.abs()),
        }
    }

    /// The multiplicative inverse.
    ///
    /// The reciprocal of either infinity is zero.
    ///
    /// # Panics
    ///
    /// When the value is rational zero.
    #[must_use]
    pub fn reciprocal(&self) -> Self {
        match &self.kind {
            Kind::NegInfinity | Kind::PosInfinity => Self::zero(),
            Kind::Finite(value) => {
                assert!(!value.is_zero(), "DivideByZero: reciprocal of zero");
                Self::from_big(value.recip())
            },
        }
    }

    /// A reference to the finite backing value, if the value is finite.
    #[must_use]
    pub fn as_finite(&self) -> Option<&BigRational> {
        match &self.kind {
            Kind::Finite(value) => Some(value),
            _ => None,
        }
    }

    /// The cached fp-representability state, without computing it.
    #[must_use]
    pub fn fp_flag(&self) -> FpFlag {
        self.fp
    }

    /// Whether the value is exactly representable as a double, computing and caching the answer.
    pub fn classify_fp(&mut self) -> bool {
        if self.fp == FpFlag::Unknown {
            let representable = match &self.kind {
                Kind::NegInfinity | Kind::PosInfinity => true,
                Kind::Finite(value) => match value.to_f64() {
                    Some(nearest) if nearest.is_finite() => {
                        BigRational::from_float(nearest).as_ref() == Some(value)
                    },
                    _ => false,
                },
            };
            self.fp = if representable { FpFlag::Yes } else { FpFlag::No };
        }

        self.fp == FpFlag::Yes
    }

    /// Convert to a double with an explicit rounding direction.
    ///
    /// For a finite value and direction `Down` (`Up`), the result is the largest (smallest)
    /// double not above (below) the value: no representable double lies strictly between the
    /// two. `Nearest` rounds to the closest double with ties to even.
    #[must_use]
    pub fn to_f64(&self, direction: RoundMode) -> f64 {
        let value = match &self.kind {
            Kind::NegInfinity => return f64::NEG_INFINITY,
            Kind::PosInfinity => return f64::INFINITY,
            Kind::Finite(value) => value,
        };

        let nearest = value.to_f64().unwrap_or_else(|| {
            if value.is_negative() { f64::NEG_INFINITY } else { f64::INFINITY }
        });

        match direction {
            RoundMode::Nearest => nearest,
            RoundMode::Down => {
                if nearest == f64::INFINITY {
                    // The value overflows upward; the largest finite double is below it.
                    f64::MAX
                } else if nearest == f64::NEG_INFINITY {
                    f64::NEG_INFINITY
                } else {
                    let back = BigRational::from_float(nearest)
                        .expect("finite double always has an exact rational value");
                    if &back > value { nearest.next_down() } else { nearest }
                }
            },
            RoundMode::Up => {
                if nearest == f64::NEG_INFINITY {
                    f64::MIN
                } else if nearest == f64::INFINITY {
                    f64::INFINITY
                } else {
                    let back = BigRational::from_float(nearest)
                        .expect("finite double always has an exact rational value");
                    if &back < value { nearest.next_up() } else { nearest }
                }
            },
        }
    }

    /// Parse a decimal string such as `-3.25`, `4`, `1e-3` or `inf`.
    pub fn from_decimal_str(text: &str) -> Result<Self, ParseRationalError> {
        let trimmed = text.trim();
        match trimmed {
            "inf" | "+inf" => return Ok(Self::infinity()),
            "-inf" => return Ok(Self::negative_infinity()),
            _ => {},
        }

        let error = || ParseRationalError::new(text);

        let (mantissa, exponent) = match trimmed.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => {
                (mantissa, i32::from_str(exponent).map_err(|_| error())?)
            },
            None => (trimmed, 0),
        };

        let (sign, digits) = match mantissa.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };

        let (integer_part, fraction_part) = match digits.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (digits, ""),
        };
        if integer_part.is_empty() && fraction_part.is_empty() {
            return Err(error());
        }
        if !integer_part.chars().all(|c| c.is_ascii_digit())
            || !fraction_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(error());
        }

        let mut numerator = BigInt::from(0);
        for digit in integer_part.chars().chain(fraction_part.chars()) {
            numerator = numerator * 10 + digit.to_digit(10).unwrap();
        }
        if sign < 0 {
            numerator = -numerator;
        }

        let shift = exponent - fraction_part.len() as i32;
        let value = if shift >= 0 {
            BigRational::from_integer(numerator * num_traits::pow(BigInt::from(10), shift as usize))
        } else {
            BigRational::new(numerator, num_traits::pow(BigInt::from(10), -shift as usize))
        };

        Ok(Self::from_big(value))
    }
}

/// Failure to interpret a string as a decimal rational.
#[derive(Debug, Eq, PartialEq)]
pub struct ParseRationalError {
    input: String,
}

impl ParseRationalError {
    fn new(input: impl Into<String>) -> Self {
        Self { input: input.into() }
    }
}

impl fmt::Display for ParseRationalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "not a decimal rational: \"{}\"", self.input)
    }
}

impl std::error::Error for ParseRationalError {}

impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        // Representability differs, so the values must.
        match (self.fp, other.fp) {
            (FpFlag::Yes, FpFlag::No) | (FpFlag::No, FpFlag::Yes) => return false,
            _ => {},
        }

        match (&self.kind, &other.kind) {
            (Kind::NegInfinity, Kind::NegInfinity) | (Kind::PosInfinity, Kind::PosInfinity) => true,
            (Kind::Finite(left), Kind::Finite(right)) => left == right,
            _ => false,
        }
    }
}

impl Eq for Rational {}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.kind, &other.kind) {
            (Kind::NegInfinity, Kind::NegInfinity) => Ordering::Equal,
            (Kind::NegInfinity, _) => Ordering::Less,
            (_, Kind::NegInfinity) => Ordering::Greater,
            (Kind::PosInfinity, Kind::PosInfinity) => Ordering::Equal,
            (Kind::PosInfinity, _) => Ordering::Greater,
            (_, Kind::PosInfinity) => Ordering::Less,
            (Kind::Finite(left), Kind::Finite(right)) => left.cmp(right),
        }
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self::from_integer(0)
    }

    fn is_zero(&self) -> bool {
        matches!(&self.kind, Kind::Finite(value) if value.is_zero())
    }
}

impl One for Rational {
    fn one() -> Self {
        Self::from_integer(1)
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self.kind {
            Kind::NegInfinity => Self::infinity(),
            Kind::PosInfinity => Self::negative_infinity(),
            Kind::Finite(value) => Self { kind: Kind::Finite(-value), fp: self.fp },
        }
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Self::Output {
        self.clone().neg()
    }
}

impl Add<&Rational> for &Rational {
    type Output = Rational;

    fn add(self, rhs: &Rational) -> Self::Output {
        match (&self.kind, &rhs.kind) {
            (Kind::PosInfinity, Kind::NegInfinity) | (Kind::NegInfinity, Kind::PosInfinity) => {
                panic!("IndeterminateInfinity: inf + -inf");
            },
            (Kind::PosInfinity, _) | (_, Kind::PosInfinity) => Rational::infinity(),
            (Kind::NegInfinity, _) | (_, Kind::NegInfinity) => Rational::negative_infinity(),
            (Kind::Finite(left), Kind::Finite(right)) => Rational::from_big(left + right),
        }
    }
}

impl Sub<&Rational> for &Rational {
    type Output = Rational;

    fn sub(self, rhs: &Rational) -> Self::Output {
        match (&self.kind, &rhs.kind) {
            (Kind::PosInfinity, Kind::PosInfinity) | (Kind::NegInfinity, Kind::NegInfinity) => {
                panic!("IndeterminateInfinity: inf - inf");
            },
            (Kind::PosInfinity, _) | (_, Kind::NegInfinity) => Rational::infinity(),
            (Kind::NegInfinity, _) | (_, Kind::PosInfinity) => Rational::negative_infinity(),
            (Kind::Finite(left), Kind::Finite(right)) => Rational::from_big(left - right),
        }
    }
}

impl Mul<&Rational> for &Rational {
    type Output = Rational;

    fn mul(self, rhs: &Rational) -> Self::Output {
        if self.is_infinite() || rhs.is_infinite() {
            let (left, right) = (self.signum(), rhs.signum());
            assert!(left != 0 && right != 0, "IndeterminateInfinity: 0 * inf");
            return if left * right > 0 {
                Rational::infinity()
            } else {
                Rational::negative_infinity()
            };
        }

        match (&self.kind, &rhs.kind) {
            (Kind::Finite(left), Kind::Finite(right)) => Rational::from_big(left * right),
            _ => unreachable!(),
        }
    }
}

impl Div<&Rational> for &Rational {
    type Output = Rational;

    fn div(self, rhs: &Rational) -> Self::Output {
        assert!(!rhs.is_zero(), "DivideByZero: division by rational zero");
        assert!(
            !(self.is_infinite() && rhs.is_infinite()),
            "DivideByZero: inf / inf",
        );

        match (&self.kind, &rhs.kind) {
            (Kind::Finite(left), Kind::Finite(right)) => Rational::from_big(left / right),
            // Finite over infinite vanishes.
            (Kind::Finite(_), _) => Rational::zero(),
            _ => {
                if self.signum() * rhs.signum() > 0 {
                    Rational::infinity()
                } else {
                    Rational::negative_infinity()
                }
            },
        }
    }
}

macro_rules! forward_value_variants {
    ($operation:ident, $method:ident) => {
        impl $operation<Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Self::Output {
                (&self).$method(&rhs)
            }
        }

        impl $operation<&Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: &Rational) -> Self::Output {
                (&self).$method(rhs)
            }
        }

        impl $operation<Rational> for &Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Self::Output {
                self.$method(&rhs)
            }
        }
    };
}

forward_value_variants!(Add, add);
forward_value_variants!(Sub, sub);
forward_value_variants!(Mul, mul);
forward_value_variants!(Div, div);

impl AddAssign<&Rational> for Rational {
    fn add_assign(&mut self, rhs: &Rational) {
        *self = &*self + rhs;
    }
}

impl AddAssign<Rational> for Rational {
    fn add_assign(&mut self, rhs: Rational) {
        *self = &*self + &rhs;
    }
}

impl SubAssign<&Rational> for Rational {
    fn sub_assign(&mut self, rhs: &Rational) {
        *self = &*self - rhs;
    }
}

impl SubAssign<Rational> for Rational {
    fn sub_assign(&mut self, rhs: Rational) {
        *self = &*self - &rhs;
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |total, value| total + value)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            Kind::NegInfinity => write!(f, "-inf"),
            Kind::PosInfinity => write!(f, "+inf"),
            Kind::Finite(value) => {
                if value.is_integer() {
                    write!(f, "{}", value.numer())
                } else {
                    write!(f, "{}/{}", value.numer(), value.denom())
                }
            },
        }
    }
}
