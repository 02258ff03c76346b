use num_traits::{One, Zero};
use proptest::prelude::*;

use crate::data::number_types::rational::{FpFlag, Rational, RoundMode};

#[test]
fn eq() {
    let x = Rational::new(1, 2);
    let y = Rational::new(2, 4);
    assert_eq!(x, y);

    let x = Rational::new(1, 2);
    let y = Rational::new(-1, -2);
    assert_eq!(x, y);

    let x = Rational::new(1, 2);
    let y = Rational::new(1, 3);
    assert_ne!(x, y);

    assert_eq!(Rational::infinity(), Rational::infinity());
    assert_eq!(Rational::negative_infinity(), Rational::negative_infinity());
    assert_ne!(Rational::infinity(), Rational::negative_infinity());
    assert_ne!(Rational::infinity(), Rational::zero());
}

#[test]
fn ord() {
    assert!(Rational::negative_infinity() < Rational::new(-1_000_000, 1));
    assert!(Rational::new(1_000_000, 1) < Rational::infinity());
    assert!(Rational::negative_infinity() < Rational::infinity());
    assert!(Rational::new(1, 3) < Rational::new(1, 2));
    assert!(Rational::new(-1, 2) < Rational::new(-1, 3));
}

#[test]
fn arithmetic() {
    let x = Rational::new(1, 6);
    let y = Rational::new(1, 3);
    assert_eq!(&x + &y, Rational::new(1, 2));
    assert_eq!(&x - &y, Rational::new(-1, 6));
    assert_eq!(&x * &y, Rational::new(1, 18));
    assert_eq!(&x / &y, Rational::new(1, 2));
    assert_eq!(-x, Rational::new(-1, 6));

    assert_eq!(Rational::new(2, 3).reciprocal(), Rational::new(3, 2));
    assert_eq!(Rational::new(-5, 4).abs(), Rational::new(5, 4));
}

#[test]
fn infinities() {
    let inf = Rational::infinity();
    let ninf = Rational::negative_infinity();

    assert_eq!(&inf + &Rational::one(), Rational::infinity());
    assert_eq!(&ninf - &Rational::one(), Rational::negative_infinity());
    assert_eq!(&inf * &Rational::new(-2, 1), Rational::negative_infinity());
    assert_eq!(&Rational::one() / &inf, Rational::zero());
    assert_eq!(inf.reciprocal(), Rational::zero());
    assert_eq!(ninf.signum(), -1);
}

#[test]
#[should_panic]
fn indeterminate_sum() {
    let _ = Rational::infinity() + Rational::negative_infinity();
}

#[test]
#[should_panic]
fn indeterminate_product() {
    let _ = Rational::zero() * Rational::infinity();
}

#[test]
#[should_panic]
fn division_by_zero() {
    let _ = Rational::one() / Rational::zero();
}

#[test]
#[should_panic]
fn infinity_over_infinity() {
    let _ = Rational::infinity() / Rational::infinity();
}

#[test]
fn integrality() {
    assert!(Rational::new(4, 2).is_integral());
    assert!(!Rational::new(1, 2).is_integral());
    assert!(!Rational::infinity().is_integral());
}

#[test]
fn fp_classification() {
    let mut x = Rational::new(1, 2);
    assert!(x.classify_fp());
    assert_eq!(x.fp_flag(), FpFlag::Yes);

    let mut x = Rational::new(1, 3);
    assert!(!x.classify_fp());
    assert_eq!(x.fp_flag(), FpFlag::No);

    // A representable and a non-representable value can never be equal.
    let mut x = Rational::new(1, 4);
    let mut y = Rational::new(1, 3);
    x.classify_fp();
    y.classify_fp();
    assert_ne!(x, y);

    assert_eq!(Rational::from_f64(0.1).fp_flag(), FpFlag::Yes);
    assert_eq!(Rational::infinity().fp_flag(), FpFlag::Yes);
}

#[test]
fn rounding() {
    // 1/3 is not representable; down and up must straddle it with adjacent doubles.
    let x = Rational::new(1, 3);
    let down = x.to_f64(RoundMode::Down);
    let up = x.to_f64(RoundMode::Up);
    assert!(Rational::from_f64(down) < x);
    assert!(Rational::from_f64(up) > x);
    assert_eq!(down.next_up(), up);

    // Representable values round to themselves in every direction.
    let x = Rational::new(3, 4);
    assert_eq!(x.to_f64(RoundMode::Down), 0.75);
    assert_eq!(x.to_f64(RoundMode::Up), 0.75);
    assert_eq!(x.to_f64(RoundMode::Nearest), 0.75);

    assert_eq!(Rational::infinity().to_f64(RoundMode::Down), f64::INFINITY);
    assert_eq!(Rational::negative_infinity().to_f64(RoundMode::Up), f64::NEG_INFINITY);
}

#[test]
fn parse() {
    assert_eq!(Rational::from_decimal_str("4").unwrap(), Rational::from_integer(4));
    assert_eq!(Rational::from_decimal_str("-3.25").unwrap(), Rational::new(-13, 4));
    assert_eq!(Rational::from_decimal_str("0.1").unwrap(), Rational::new(1, 10));
    assert_eq!(Rational::from_decimal_str("1e-3").unwrap(), Rational::new(1, 1000));
    assert_eq!(Rational::from_decimal_str("2.5e2").unwrap(), Rational::from_integer(250));
    assert_eq!(Rational::from_decimal_str("-inf").unwrap(), Rational::negative_infinity());

    assert!(Rational::from_decimal_str("").is_err());
    assert!(Rational::from_decimal_str("1.2.3").is_err());
    assert!(Rational::from_decimal_str("abc").is_err());
}

#[test]
fn display() {
    assert_eq!(Rational::new(1, 2).to_string(), "1/2");
    assert_eq!(Rational::new(-4, 2).to_string(), "-2");
    assert_eq!(Rational::infinity().to_string(), "+inf");
}

proptest! {
    // The round-to-double contract: down and up enclose the value, and nothing representable
    // lies strictly between the rounded double and the value.
    #[test]
    fn directed_rounding_encloses(numerator in -1_000_000_i64..1_000_000, denominator in 1_i64..1_000_000) {
        let x = Rational::new(numerator, denominator);
        let down = x.to_f64(RoundMode::Down);
        let up = x.to_f64(RoundMode::Up);

        prop_assert!(Rational::from_f64(down) <= x);
        prop_assert!(Rational::from_f64(up) >= x);
        if down != up {
            prop_assert_eq!(down.next_up(), up);
        }
    }

    #[test]
    fn exact_double_round_trip(value in -1.0e9_f64..1.0e9) {
        let x = Rational::from_f64(value);
        prop_assert_eq!(x.to_f64(RoundMode::Down), value);
        prop_assert_eq!(x.to_f64(RoundMode::Up), value);
        prop_assert_eq!(x.to_f64(RoundMode::Nearest), value);
    }
}
