//! Exact rational arithmetic for the line-of-sight test. Every grid crossing the smoother
//! computes goes through [Fraction] so that a line passing exactly through a lattice vertex is
//! recognised as such instead of landing a rounding error away from it.
use core::fmt;
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A rational number `numer / denom` kept in lowest terms with a positive denominator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fraction {
    numer: i64,
    denom: i64,
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Fraction {
    /// Panics if `denom` is zero.
    pub fn new(numer: i64, denom: i64) -> Fraction {
        assert!(denom != 0, "fraction with zero denominator");
        let sign = denom.signum();
        let g = gcd(numer, denom).max(1);
        Fraction {
            numer: sign * numer / g,
            denom: sign * denom / g,
        }
    }

    pub const fn from_integer(value: i64) -> Fraction {
        Fraction {
            numer: value,
            denom: 1,
        }
    }

    pub fn numer(&self) -> i64 {
        self.numer
    }

    pub fn denom(&self) -> i64 {
        self.denom
    }

    pub fn is_integer(&self) -> bool {
        self.denom == 1
    }

    /// Largest integer not greater than the value.
    pub fn floor(&self) -> i64 {
        self.numer.div_euclid(self.denom)
    }

    /// Panics on zero.
    pub fn recip(&self) -> Fraction {
        Fraction::new(self.denom, self.numer)
    }

    pub fn abs(&self) -> Fraction {
        Fraction {
            numer: self.numer.abs(),
            denom: self.denom,
        }
    }

    // Products are formed in i128 and reduced before narrowing back.
    fn from_wide(numer: i128, denom: i128) -> Fraction {
        let mut a = numer.abs();
        let mut b = denom.abs();
        while b != 0 {
            (a, b) = (b, a % b);
        }
        let g = a.max(1);
        let sign = denom.signum();
        let numer = sign * numer / g;
        let denom = sign * denom / g;
        Fraction {
            numer: i64::try_from(numer).expect("fraction numerator overflow"),
            denom: i64::try_from(denom).expect("fraction denominator overflow"),
        }
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Fraction::from_integer(value)
    }
}

impl From<i32> for Fraction {
    fn from(value: i32) -> Self {
        Fraction::from_integer(value as i64)
    }
}

impl Add for Fraction {
    type Output = Fraction;
    fn add(self, rhs: Fraction) -> Fraction {
        Fraction::from_wide(
            self.numer as i128 * rhs.denom as i128 + rhs.numer as i128 * self.denom as i128,
            self.denom as i128 * rhs.denom as i128,
        )
    }
}

impl Sub for Fraction {
    type Output = Fraction;
    fn sub(self, rhs: Fraction) -> Fraction {
        self + (-rhs)
    }
}

impl Mul for Fraction {
    type Output = Fraction;
    fn mul(self, rhs: Fraction) -> Fraction {
        Fraction::from_wide(
            self.numer as i128 * rhs.numer as i128,
            self.denom as i128 * rhs.denom as i128,
        )
    }
}

impl Div for Fraction {
    type Output = Fraction;
    /// Panics when dividing by zero.
    fn div(self, rhs: Fraction) -> Fraction {
        assert!(rhs.numer != 0, "fraction division by zero");
        Fraction::from_wide(
            self.numer as i128 * rhs.denom as i128,
            self.denom as i128 * rhs.numer as i128,
        )
    }
}

impl Neg for Fraction {
    type Output = Fraction;
    fn neg(self) -> Fraction {
        Fraction {
            numer: -self.numer,
            denom: self.denom,
        }
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive so cross multiplication preserves order.
        (self.numer as i128 * other.denom as i128).cmp(&(other.numer as i128 * self.denom as i128))
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Zero for Fraction {
    fn zero() -> Self {
        Fraction::from_integer(0)
    }
    fn is_zero(&self) -> bool {
        self.numer == 0
    }
}

impl One for Fraction {
    fn one() -> Self {
        Fraction::from_integer(1)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}
