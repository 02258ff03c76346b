//! # Directed-rounding intervals
//!
//! A closed double interval `[inf, sup]` guaranteed to contain the exact real result of the
//! operations that produced it. Outward rounding is realized by widening every floating-point
//! result by one ulp on each side: an IEEE operation is within half an ulp of the true value, so
//! the widened interval is a rigorous enclosure without touching the hardware rounding mode.
//!
//! Rows keep such an enclosure next to every rational coefficient so that the bound-shifting
//! post-processor can evaluate `c - A^T y` rigorously in double precision.
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::data::number_types::rational::{Rational, RoundMode};


/// A closed interval of doubles enclosing an exact real value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    inf: f64,
    sup: f64,
}

fn widen_down(value: f64) -> f64 {
    if value.is_finite() { value.next_down() } else { value }
}

fn widen_up(value: f64) -> f64 {
    if value.is_finite() { value.next_up() } else { value }
}

impl Interval {
    /// The exact point interval of a double.
    #[must_use]
    pub fn point(value: f64) -> Self {
        debug_assert!(!value.is_nan());

        Self { inf: value, sup: value }
    }

    /// The interval `[0, 0]`.
    #[must_use]
    pub fn zero() -> Self {
        Self::point(0.0)
    }

    /// The tightest double enclosure of a rational.
    #[must_use]
    pub fn from_rational(value: &Rational) -> Self {
        Self {
            inf: value.to_f64(RoundMode::Down),
            sup: value.to_f64(RoundMode::Up),
        }
    }

    /// Lower end of the interval.
    #[must_use]
    pub fn inf(&self) -> f64 {
        self.inf
    }

    /// Upper end of the interval.
    #[must_use]
    pub fn sup(&self) -> f64 {
        self.sup
    }

    /// Whether both ends are finite doubles.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.inf.is_finite() && self.sup.is_finite()
    }

    /// Whether the enclosure admits only the value zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.inf == 0.0 && self.sup == 0.0
    }

    /// The rational value of the lower end.
    #[must_use]
    pub fn inf_rational(&self) -> Rational {
        Rational::from_f64(self.inf)
    }

    /// The rational value of the upper end.
    #[must_use]
    pub fn sup_rational(&self) -> Rational {
        Rational::from_f64(self.sup)
    }
}

impl Neg for Interval {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { inf: -self.sup, sup: -self.inf }
    }
}

impl Add for Interval {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            inf: widen_down(self.inf + rhs.inf),
            sup: widen_up(self.sup + rhs.sup),
        }
    }
}

impl Sub for Interval {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Mul for Interval {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        // 0 * inf enclosures come up when a zero point interval meets an unbounded one; the
        // exact product is zero in that case.
        let corner = |x: f64, y: f64| {
            if x == 0.0 || y == 0.0 { 0.0 } else { x * y }
        };

        let corners = [
            corner(self.inf, rhs.inf),
            corner(self.inf, rhs.sup),
            corner(self.sup, rhs.inf),
            corner(self.sup, rhs.sup),
        ];

        let mut inf = f64::INFINITY;
        let mut sup = f64::NEG_INFINITY;
        for value in corners {
            inf = inf.min(value);
            sup = sup.max(value);
        }

        if inf == 0.0 && sup == 0.0 {
            // All corners are exactly zero; there is nothing to widen.
            return Self { inf, sup };
        }

        Self { inf: widen_down(inf), sup: widen_up(sup) }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.inf, self.sup)
    }
}
