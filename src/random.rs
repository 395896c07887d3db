//! Pseudo-random draws used when spawning packets (position, speed, spin).
//!
//! All draws go through [`RandomSource`] so callers can swap the browser
//! crypto source for a seeded one and reproduce a layout exactly.

use std::fmt;

use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, SeedableRng};

/// Source of uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Seeded source for reproducible layouts.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed) }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

/// Browser `crypto.getRandomValues` (or OS entropy natively), seeded once
/// through `getrandom`.
#[derive(Clone, Debug)]
pub struct OsRandom {
    rng: StdRng,
}

impl OsRandom {
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }
}

impl Default for OsRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for OsRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

/// Result of [`random_value`]: either a whole number or a one-decimal string.
#[derive(Clone, Debug, PartialEq)]
pub enum RandomValue {
    Whole(i64),
    Fixed(String),
}

impl fmt::Display for RandomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RandomValue::Whole(v) => write!(f, "{v}"),
            RandomValue::Fixed(s) => f.write_str(s),
        }
    }
}

fn draw<R: RandomSource + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    rng.next_unit() * (max - min) + min
}

/// Uniform draw in `[min, max]` rounded to the nearest integer (ties away from zero).
/// `min <= max` is the caller's responsibility.
pub fn random_arbitrary<R: RandomSource + ?Sized>(rng: &mut R, min: f64, max: f64) -> i64 {
    draw(rng, min, max).round() as i64
}

/// Uniform draw in `[min, max]` formatted with exactly one decimal digit.
pub fn random_arbitrary_fixed<R: RandomSource + ?Sized>(rng: &mut R, min: f64, max: f64) -> String {
    to_fixed_1(draw(rng, min, max))
}

/// One-decimal formatting with `Number.prototype.toFixed(1)` rounding: exact
/// ties go away from zero, everything else rounds to nearest.
fn to_fixed_1(x: f64) -> String {
    // -0.0 prints as "0.0", like JS
    let x = if x == 0.0 { 0.0 } else { x };
    // Only multiples of 0.25 with an odd quarter count sit exactly on a tie.
    let quarters = x * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        format!("{:.1}", (x * 10.0).round() / 10.0)
    } else {
        format!("{x:.1}")
    }
}

pub fn random_value<R: RandomSource + ?Sized>(
    rng: &mut R,
    min: f64,
    max: f64,
    fixed: bool,
) -> RandomValue {
    if fixed {
        RandomValue::Fixed(random_arbitrary_fixed(rng, min, max))
    } else {
        RandomValue::Whole(random_arbitrary(rng, min, max))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Replays a fixed list of unit draws, cycling when exhausted.
    pub(crate) struct Scripted {
        values: Vec<f64>,
        pos: usize,
    }

    impl Scripted {
        pub(crate) fn new(values: &[f64]) -> Self {
            Self { values: values.to_vec(), pos: 0 }
        }
    }

    impl RandomSource for Scripted {
        fn next_unit(&mut self) -> f64 {
            let v = self.values[self.pos % self.values.len()];
            self.pos += 1;
            v
        }
    }

    fn is_one_decimal(s: &str) -> bool {
        let body = s.strip_prefix('-').unwrap_or(s);
        match body.split_once('.') {
            Some((int, frac)) => {
                !int.is_empty()
                    && int.chars().all(|c| c.is_ascii_digit())
                    && frac.len() == 1
                    && frac.chars().all(|c| c.is_ascii_digit())
            }
            None => false,
        }
    }

    #[test]
    fn seeded_units_stay_in_half_open_range() {
        let mut rng = SeededRandom::new(7);
        for _ in 0..10_000 {
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u), "unit draw {u} out of range");
        }
    }

    #[test]
    fn seeded_source_is_reproducible() {
        let a: Vec<f64> = {
            let mut r = SeededRandom::new(42);
            (0..5).map(|_| r.next_unit()).collect()
        };
        let mut r = SeededRandom::new(42);
        let b: Vec<f64> = (0..5).map(|_| r.next_unit()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn os_random_draws_units() {
        let mut rng = OsRandom::new();
        for _ in 0..100 {
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn whole_draw_within_bounds() {
        let mut rng = SeededRandom::new(1);
        for _ in 0..5_000 {
            let v = random_arbitrary(&mut rng, -20.0, 35.0);
            assert!((-20..=35).contains(&v), "{v} out of [-20, 35]");
        }
    }

    #[test]
    fn degenerate_range_returns_the_bound() {
        let mut rng = SeededRandom::new(3);
        for _ in 0..100 {
            assert_eq!(random_arbitrary(&mut rng, 5.0, 5.0), 5);
            assert_eq!(random_arbitrary_fixed(&mut rng, 5.0, 5.0), "5.0");
        }
    }

    #[test]
    fn whole_draw_rounds_half_away_from_zero() {
        // 0.5 * (1 - 0) + 0 = 0.5 -> 1
        assert_eq!(random_arbitrary(&mut Scripted::new(&[0.5]), 0.0, 1.0), 1);
        // 0.5 * (0 - -1) + -1 = -0.5 -> -1
        assert_eq!(random_arbitrary(&mut Scripted::new(&[0.5]), -1.0, 0.0), -1);
        assert_eq!(random_arbitrary(&mut Scripted::new(&[0.25]), 0.0, 10.0), 3);
    }

    #[test]
    fn fixed_draw_has_one_decimal_and_stays_near_bounds() {
        let mut rng = SeededRandom::new(99);
        for _ in 0..5_000 {
            let s = random_arbitrary_fixed(&mut rng, -3.0, 12.5);
            assert!(is_one_decimal(&s), "bad format '{s}'");
            let v: f64 = s.parse().unwrap();
            assert!((-3.05..=12.55).contains(&v), "{v} out of range");
        }
    }

    #[test]
    fn fixed_draw_formats_scripted_value() {
        let s = random_arbitrary_fixed(&mut Scripted::new(&[0.5]), 1.0, 2.0);
        assert_eq!(s, "1.5");
    }

    #[test]
    fn fixed_draw_rounds_exact_ties_away_from_zero() {
        // 0.25 * (1 - 0) + 0 = 0.25 sits exactly between 0.2 and 0.3
        assert_eq!(random_arbitrary_fixed(&mut Scripted::new(&[0.25]), 0.0, 1.0), "0.3");
        assert_eq!(to_fixed_1(-0.25), "-0.3");
        assert_eq!(to_fixed_1(1.25), "1.3");
        assert_eq!(to_fixed_1(0.75), "0.8");
    }

    #[test]
    fn fixed_format_uses_exact_binary_value() {
        // 0.15 and 1.45 are both stored just below the tie
        assert_eq!(to_fixed_1(0.15), "0.1");
        assert_eq!(to_fixed_1(1.45), "1.4");
        assert_eq!(to_fixed_1(0.35), "0.3");
        assert_eq!(to_fixed_1(-0.0), "0.0");
        assert_eq!(to_fixed_1(-0.01), "-0.0");
    }

    #[test]
    fn random_value_picks_variant_by_flag() {
        let mut rng = Scripted::new(&[0.25]);
        assert_eq!(random_value(&mut rng, 0.0, 4.0, false), RandomValue::Whole(1));
        assert_eq!(
            random_value(&mut rng, 0.0, 4.0, true),
            RandomValue::Fixed("1.0".to_string())
        );
        assert_eq!(RandomValue::Whole(-2).to_string(), "-2");
    }
}
