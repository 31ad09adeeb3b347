use crate::Point3;
use std::fmt;
use std::fmt::{Display, Formatter};
use uom::si::f64::Length;
use uom::si::length::meter;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A cartesian position in meters.
///
/// The same type carries two different kinds of coordinate depending on where it came from:
///
/// - a geocentric (earth-centered, earth-fixed) position relative to some [`Ellipsoid`], as
///   produced by [`Ellipsoid::to_point`]; and
/// - a planar grid position (easting in `x`, northing in `y`, `z` unused), as produced by
///   [`TransverseMercator::project`] or [`grid_ref::parse`].
///
/// <div class="warning">
///
/// Nothing stops you from feeding a planar point into [`Ellipsoid::to_lat_lng`] or a geocentric
/// point into [`TransverseMercator::unproject`]. Doing so produces nonsense.
///
/// </div>
///
/// [`Ellipsoid`]: crate::Ellipsoid
/// [`Ellipsoid::to_point`]: crate::Ellipsoid::to_point
/// [`Ellipsoid::to_lat_lng`]: crate::Ellipsoid::to_lat_lng
/// [`TransverseMercator::project`]: crate::TransverseMercator::project
/// [`TransverseMercator::unproject`]: crate::TransverseMercator::unproject
/// [`grid_ref::parse`]: crate::grid_ref::parse
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Meters. Easting for grid positions.
    pub x: f64,
    /// Meters. Northing for grid positions.
    pub y: f64,
    /// Meters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub z: f64,
}

impl Point {
    /// Constructs a point with `z` set to zero.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0. }
    }

    #[must_use]
    pub const fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Constructs a point from typed lengths.
    pub fn from_lengths(x: impl Into<Length>, y: impl Into<Length>, z: impl Into<Length>) -> Self {
        Self::with_z(
            x.into().get::<meter>(),
            y.into().get::<meter>(),
            z.into().get::<meter>(),
        )
    }

    /// Returns the `x` component, which is the easting for grid positions.
    #[must_use]
    pub fn easting(&self) -> Length {
        Length::new::<meter>(self.x)
    }

    /// Returns the `y` component, which is the northing for grid positions.
    #[must_use]
    pub fn northing(&self) -> Length {
        Length::new::<meter>(self.y)
    }

    #[must_use]
    pub fn height(&self) -> Length {
        Length::new::<meter>(self.z)
    }
}

impl From<Point3> for Point {
    fn from(p: Point3) -> Self {
        Self::with_z(p.x, p.y, p.z)
    }
}

impl From<Point> for Point3 {
    fn from(p: Point) -> Self {
        Point3::new(p.x, p.y, p.z)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for Point {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        // grid references bottom out at 1m resolution; a millimeter is plenty
        Length::new::<meter>(0.001)
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        // NOTE: per-component, not the length of the difference vector
        Point3::from(*self).abs_diff_eq(&Point3::from(*other), epsilon.get::<meter>())
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for Point {
    fn default_max_relative() -> Self::Epsilon {
        Length::new::<meter>(Point3::default_max_relative())
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        Point3::from(*self).relative_eq(
            &Point3::from(*other),
            epsilon.get::<meter>(),
            max_relative.get::<meter>(),
        )
    }
}
