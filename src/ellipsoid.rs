use crate::error::{Error, Result};
use crate::{LatLng, Point, Translation, MAX_ITERATIONS};
use uom::si::f64::Length;
use uom::si::length::meter;

/// Latitude refinement in [`Ellipsoid::to_lat_lng`] stops once successive estimates differ by
/// at most this many radians.
const LATITUDE_TOLERANCE: f64 = 1e-9;

/// A reference ellipsoid of revolution, ie an idealized model of the Earth's shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major (equatorial) axis, in meters.
    pub(crate) a: f64,
    /// Semi-minor (polar) axis, in meters.
    pub(crate) b: f64,
    /// First eccentricity squared.
    pub(crate) e2: f64,
}

/// The [Geodetic Reference System 1980] ellipsoid, on which the Israeli grid is defined.
///
/// [Geodetic Reference System 1980]: https://en.wikipedia.org/wiki/Geodetic_Reference_System_1980
pub const GRS80: Ellipsoid = match Ellipsoid::new(6_378_137.0, 6_356_752.314_14) {
    Some(ellipsoid) => ellipsoid,
    None => panic!("GRS80 axes are valid"),
};

/// The [World Geodetic System 1984] ellipsoid used by GPS.
///
/// [World Geodetic System 1984]: https://en.wikipedia.org/wiki/World_Geodetic_System#WGS_84
pub const WGS84: Ellipsoid = match Ellipsoid::new(6_378_137.0, 6_356_752.314_245) {
    Some(ellipsoid) => ellipsoid,
    None => panic!("WGS84 axes are valid"),
};

impl Ellipsoid {
    /// Constructs an ellipsoid from its semi-major (`a`) and semi-minor (`b`) axes in meters.
    ///
    /// Returns `None` unless `a ≥ b > 0`.
    #[must_use]
    pub const fn new(a: f64, b: f64) -> Option<Self> {
        // also rejects NaN
        if !(a >= b && b > 0.) {
            return None;
        }
        // e^2 = (a^2 - b^2) / a^2
        let e2 = (a * a - b * b) / (a * a);
        Some(Self { a, b, e2 })
    }

    #[doc(alias = "equatorial radius")]
    #[doc(alias = "a")]
    #[must_use]
    pub fn semi_major_axis(&self) -> Length {
        Length::new::<meter>(self.a)
    }

    #[doc(alias = "polar radius")]
    #[doc(alias = "b")]
    #[must_use]
    pub fn semi_minor_axis(&self) -> Length {
        Length::new::<meter>(self.b)
    }

    /// Returns the square of the first eccentricity, `(a² - b²) / a²`.
    #[doc(alias = "e^2")]
    #[must_use]
    pub const fn eccentricity_sq(&self) -> f64 {
        self.e2
    }

    /// Radius of curvature in the prime vertical at geodetic latitude `lat` (radians).
    #[doc(alias = "nu")]
    fn prime_vertical_radius(&self, lat: f64) -> f64 {
        self.a / (1. - self.e2 * lat.sin().powi(2)).sqrt()
    }

    /// Converts a geodetic location on this ellipsoid to earth-centered, earth-fixed cartesian
    /// coordinates.
    ///
    /// See:
    /// <https://en.wikipedia.org/wiki/Geographic_coordinate_conversion#From_geodetic_to_ECEF_coordinates>
    #[must_use]
    pub fn to_point(&self, latlng: &LatLng) -> Point {
        let lat_phi = latlng.lat.to_radians();
        let lon_lambda = latlng.lng.to_radians();
        let height_h = latlng.alt;

        let n_phi = self.prime_vertical_radius(lat_phi);

        let x = (n_phi + height_h) * lat_phi.cos() * lon_lambda.cos();
        let y = (n_phi + height_h) * lat_phi.cos() * lon_lambda.sin();
        let z = (n_phi * (1. - self.e2) + height_h) * lat_phi.sin();

        Point::with_z(x, y, z)
    }

    /// Converts an earth-centered, earth-fixed cartesian point to a geodetic location on this
    /// ellipsoid.
    ///
    /// Latitude appears on both sides of the relation, so it is found by fixed-point iteration
    /// starting from the spherical estimate; this settles within a handful of rounds for any
    /// point near the surface. Longitude is closed-form.
    ///
    /// Returns [`Error::NonConvergence`] if the latitude has not settled after
    /// [`MAX_ITERATIONS`] rounds, which in practice means the input was not finite.
    pub fn to_lat_lng(&self, point: &Point) -> Result<LatLng> {
        let Point { x, y, z } = *point;
        let root_xy = x.hypot(y);

        let mut lat1 = z.atan2(root_xy * (1. - self.e2));
        let mut iterations = 0;
        let lat = loop {
            if iterations == MAX_ITERATIONS {
                tracing::warn!(?point, "geodetic latitude did not converge");
                return Err(Error::NonConvergence {
                    quantity: "geodetic latitude",
                    iterations,
                });
            }
            iterations += 1;

            let v = self.prime_vertical_radius(lat1);
            let lat2 = (z + self.e2 * v * lat1.sin()).atan2(root_xy);
            if (lat1 - lat2).abs() <= LATITUDE_TOLERANCE {
                break lat2;
            }
            lat1 = lat2;
        };
        tracing::trace!(iterations, "geodetic latitude converged");

        let lng = y.atan2(x);
        // a form without a 1/cos(lat) term, so it holds up at the poles too
        let alt = root_xy * lat.cos() + z * lat.sin()
            - self.a * (1. - self.e2 * lat.sin().powi(2)).sqrt();

        Ok(LatLng::with_alt(lat.to_degrees(), lng.to_degrees(), alt))
    }

    /// Moves a location on this ellipsoid to the `to` ellipsoid by shifting its geocentric
    /// position by `translation`.
    ///
    /// This is a plain 3-parameter datum shift: no rotation and no scale. The result keeps the
    /// input's display precision.
    #[doc(alias = "datum shift")]
    pub fn convert_grid(
        &self,
        latlng: &LatLng,
        to: &Ellipsoid,
        translation: &Translation,
    ) -> Result<LatLng> {
        let shifted = translation.apply(&self.to_point(latlng));
        Ok(to
            .to_lat_lng(&shifted)?
            .with_precision(latlng.precision))
    }
}
