use crate::{Point, Point3, Vector3};
use std::ops::Neg;
use uom::si::f64::Length;
use uom::si::length::meter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A shift between the geocentric frames of two ellipsoids, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Translation {
    pub(crate) dx: f64,
    pub(crate) dy: f64,
    pub(crate) dz: f64,
}

/// Moves a GRS80 geocentric position into the WGS84 frame, as used for the Israeli grid.
pub const GRS80_TO_WGS84: Translation = Translation::new(-48., 55., 52.);

/// Moves a WGS84 geocentric position into the GRS80 frame; the inverse of [`GRS80_TO_WGS84`].
pub const WGS84_TO_GRS80: Translation = GRS80_TO_WGS84.inverse();

impl Translation {
    #[must_use]
    pub const fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    /// Constructs a translation from typed lengths.
    pub fn from_lengths(
        dx: impl Into<Length>,
        dy: impl Into<Length>,
        dz: impl Into<Length>,
    ) -> Self {
        Self::new(
            dx.into().get::<meter>(),
            dy.into().get::<meter>(),
            dz.into().get::<meter>(),
        )
    }

    /// Returns the (dx, dy, dz) components in meters.
    #[must_use]
    pub const fn components(&self) -> (f64, f64, f64) {
        (self.dx, self.dy, self.dz)
    }

    pub(crate) fn to_nalgebra_vector(self) -> Vector3 {
        Vector3::new(self.dx, self.dy, self.dz)
    }

    /// Returns `point` moved by this translation.
    #[must_use]
    pub fn apply(&self, point: &Point) -> Point {
        Point::from(Point3::from(*point) + self.to_nalgebra_vector())
    }

    /// Returns the translation that undoes this one.
    #[must_use]
    pub const fn inverse(&self) -> Self {
        Self::new(-self.dx, -self.dy, -self.dz)
    }
}

impl Neg for Translation {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.inverse()
    }
}
