#![forbid(unsafe_code)]

//! Minimal physical-quantity support for sample rates and frequency axes.
//!
//! A sample rate carries units of inverse time; hanging bare floats on a
//! frequency axis silently corrupts downstream physical quantities, so the
//! axis is expressed in [`Frequency`] values instead.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A frequency, stored in hertz.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Frequency {
    hertz: f64,
}

impl Frequency {
    #[must_use]
    pub const fn from_hertz(hertz: f64) -> Self {
        Self { hertz }
    }

    #[must_use]
    pub fn from_kilohertz(kilohertz: f64) -> Self {
        Self {
            hertz: kilohertz * 1.0e3,
        }
    }

    #[must_use]
    pub fn from_megahertz(megahertz: f64) -> Self {
        Self {
            hertz: megahertz * 1.0e6,
        }
    }

    #[must_use]
    pub const fn hertz(self) -> f64 {
        self.hertz
    }

    #[must_use]
    pub fn kilohertz(self) -> f64 {
        self.hertz / 1.0e3
    }

    #[must_use]
    pub fn megahertz(self) -> f64 {
        self.hertz / 1.0e6
    }

    /// Sample spacing `1/rate`, in seconds.
    #[must_use]
    pub fn recip_seconds(self) -> f64 {
        1.0 / self.hertz
    }
}

impl Mul<f64> for Frequency {
    type Output = Frequency;

    fn mul(self, rhs: f64) -> Frequency {
        Frequency::from_hertz(self.hertz * rhs)
    }
}

impl Mul<Frequency> for f64 {
    type Output = Frequency;

    fn mul(self, rhs: Frequency) -> Frequency {
        Frequency::from_hertz(self * rhs.hertz)
    }
}

impl Div<f64> for Frequency {
    type Output = Frequency;

    fn div(self, rhs: f64) -> Frequency {
        Frequency::from_hertz(self.hertz / rhs)
    }
}

/// Ratio of two frequencies, dimensionless.
impl Div<Frequency> for Frequency {
    type Output = f64;

    fn div(self, rhs: Frequency) -> f64 {
        self.hertz / rhs.hertz
    }
}

impl Add for Frequency {
    type Output = Frequency;

    fn add(self, rhs: Frequency) -> Frequency {
        Frequency::from_hertz(self.hertz + rhs.hertz)
    }
}

impl Sub for Frequency {
    type Output = Frequency;

    fn sub(self, rhs: Frequency) -> Frequency {
        Frequency::from_hertz(self.hertz - rhs.hertz)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.hertz.abs();
        if hz >= 1.0e6 {
            write!(f, "{} MHz", self.megahertz())
        } else if hz >= 1.0e3 {
            write!(f, "{} kHz", self.kilohertz())
        } else {
            write!(f, "{} Hz", self.hertz)
        }
    }
}
