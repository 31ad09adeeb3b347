//! Transverse Mercator grid projection.
//!
//! The series used here are the ones the Ordnance Survey publishes for the British National Grid
//! ("A guide to coordinate systems in Great Britain", annex C), which is also how the Israeli
//! grid is usually computed. They are truncated expansions around the central meridian, good to
//! well under a millimeter within a few degrees of it and increasingly wrong beyond that.

use crate::ellipsoid::{Ellipsoid, GRS80};
use crate::error::{Error, Result};
use crate::{LatLng, Point, MAX_ITERATIONS};
use std::f64::consts::PI;

/// Footpoint latitude refinement in [`TransverseMercator::unproject`] stops once the remaining
/// northing error is at most this many meters.
const NORTHING_TOLERANCE: f64 = 1e-5;

const RADIANS_PER_DEGREE: f64 = PI / 180.;

/// A Transverse Mercator projection between latitude/longitude on a reference ellipsoid and a
/// planar easting/northing grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    ellipsoid: Ellipsoid,
    /// Easting of the false origin, in meters.
    e0: f64,
    /// Northing of the false origin, in meters.
    n0: f64,
    /// Scale factor on the central meridian.
    f0: f64,
    /// Latitude of the true origin, in degrees.
    lat0: f64,
    /// Longitude of the true origin (ie, the central meridian), in degrees.
    lng0: f64,

    // derived from the above in `new`
    rad_lat0: f64,
    rad_lng0: f64,
    af0: f64,
    bf0: f64,
    /// Eccentricity squared of the scaled axes.
    e2: f64,
    n: f64,
    n2: f64,
    n3: f64,
}

/// The Israeli Transverse Mercator grid ("Israel 1993 / Israeli TM Grid").
#[doc(alias = "Israel Transverse Mercator")]
pub const ITM: TransverseMercator = TransverseMercator::new(
    GRS80,
    219_529.584,
    626_907.389_99,
    1.000_006_7,
    31.734_394,
    35.204_517,
);

impl TransverseMercator {
    /// Defines a projection on `ellipsoid` whose true origin at (`lat0`, `lng0`) degrees lands on
    /// grid position (`e0`, `n0`) meters, with scale factor `f0` along the central meridian.
    #[must_use]
    pub const fn new(
        ellipsoid: Ellipsoid,
        e0: f64,
        n0: f64,
        f0: f64,
        lat0: f64,
        lng0: f64,
    ) -> Self {
        let af0 = ellipsoid.a * f0;
        let bf0 = ellipsoid.b * f0;
        let e2 = (af0 * af0 - bf0 * bf0) / (af0 * af0);
        let n = (af0 - bf0) / (af0 + bf0);
        Self {
            ellipsoid,
            e0,
            n0,
            f0,
            lat0,
            lng0,
            rad_lat0: lat0 * RADIANS_PER_DEGREE,
            rad_lng0: lng0 * RADIANS_PER_DEGREE,
            af0,
            bf0,
            e2,
            n,
            n2: n * n,
            n3: n * n * n,
        }
    }

    /// The ellipsoid that latitudes and longitudes are taken relative to.
    #[must_use]
    pub const fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Grid position of the true origin, in meters.
    #[must_use]
    pub const fn false_origin(&self) -> Point {
        Point::new(self.e0, self.n0)
    }

    /// The true origin, on [`TransverseMercator::ellipsoid`].
    #[must_use]
    pub const fn true_origin(&self) -> LatLng {
        LatLng::new(self.lat0, self.lng0)
    }

    #[must_use]
    pub const fn scale_factor(&self) -> f64 {
        self.f0
    }

    /// Developed meridional arc from the origin latitude to `lat` (radians), scaled by `f0`.
    #[doc(alias = "Marc")]
    fn meridional_arc(&self, lat: f64) -> f64 {
        let Self { n, n2, n3, .. } = *self;
        let dlat = lat - self.rad_lat0;
        let slat = lat + self.rad_lat0;

        self.bf0
            * ((1. + n + 5. / 4. * n2 + 5. / 4. * n3) * dlat
                - (3. * n + 3. * n2 + 21. / 8. * n3) * dlat.sin() * slat.cos()
                + (15. / 8. * n2 + 15. / 8. * n3) * (2. * dlat).sin() * (2. * slat).cos()
                - 35. / 24. * n3 * (3. * dlat).sin() * (3. * slat).cos())
    }

    /// Radii of curvature at `lat` (radians): (nu, rho, eta²), where nu is in the prime vertical
    /// and rho is along the meridian, both scaled by `f0`.
    fn radii(&self, lat: f64) -> (f64, f64, f64) {
        let w = 1. - self.e2 * lat.sin().powi(2);
        let nu = self.af0 / w.sqrt();
        let rho = nu * (1. - self.e2) / w;
        let eta2 = nu / rho - 1.;
        (nu, rho, eta2)
    }

    /// Projects `latlng` (on [`TransverseMercator::ellipsoid`]) onto the grid.
    ///
    /// The returned point has easting in `x` and northing in `y`; altitude is dropped.
    #[must_use]
    pub fn project(&self, latlng: &LatLng) -> Point {
        let lat = latlng.lat.to_radians();
        let lng = latlng.lng.to_radians();

        let (sin_lat, cos_lat) = lat.sin_cos();
        let tan2 = lat.tan().powi(2);
        let tan4 = tan2 * tan2;
        let (nu, rho, eta2) = self.radii(lat);

        let p = lng - self.rad_lng0;
        let m = self.meridional_arc(lat);

        let i = m + self.n0;
        let ii = nu / 2. * sin_lat * cos_lat;
        let iii = nu / 24. * sin_lat * cos_lat.powi(3) * (5. - tan2 + 9. * eta2);
        let iiia = nu / 720. * sin_lat * cos_lat.powi(5) * (61. - 58. * tan2 + tan4);
        let iv = nu * cos_lat;
        let v = nu / 6. * cos_lat.powi(3) * (nu / rho - tan2);
        let vi = nu / 120.
            * cos_lat.powi(5)
            * (5. - 18. * tan2 + tan4 + 14. * eta2 - 58. * tan2 * eta2);

        let y = i + p.powi(2) * ii + p.powi(4) * iii + p.powi(6) * iiia;
        let x = self.e0 + p * iv + p.powi(3) * v + p.powi(5) * vi;

        Point::new(x, y)
    }

    /// Finds the latitude (radians) whose meridional arc matches `northing`, ie the latitude of
    /// the foot of the perpendicular from the point to the central meridian.
    #[doc(alias = "InitialLat")]
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    fn footpoint_latitude(&self, northing: f64) -> Result<f64> {
        let mut lat = (northing - self.n0) / self.af0 + self.rad_lat0;
        let mut m = self.meridional_arc(lat);
        let mut iterations = 0;
        // NOTE: written so that NaN keeps the loop going rather than stopping it
        while !((northing - self.n0 - m).abs() <= NORTHING_TOLERANCE) {
            if iterations == MAX_ITERATIONS {
                tracing::warn!(northing, "footpoint latitude did not converge");
                return Err(Error::NonConvergence {
                    quantity: "footpoint latitude",
                    iterations,
                });
            }
            iterations += 1;

            lat += (northing - self.n0 - m) / self.af0;
            m = self.meridional_arc(lat);
        }
        tracing::trace!(iterations, "footpoint latitude converged");
        Ok(lat)
    }

    /// Maps a grid position back to latitude/longitude on [`TransverseMercator::ellipsoid`].
    ///
    /// `z` is ignored and the returned altitude is zero. Returns [`Error::NonConvergence`] if the
    /// footpoint latitude cannot be found, which in practice means the input was not finite.
    pub fn unproject(&self, point: &Point) -> Result<LatLng> {
        let et = point.x - self.e0;
        let lat = self.footpoint_latitude(point.y)?;

        let tan = lat.tan();
        let tan2 = tan * tan;
        let tan4 = tan2 * tan2;
        let tan6 = tan4 * tan2;
        let sec = lat.cos().recip();
        let (nu, rho, eta2) = self.radii(lat);

        let vii = tan / (2. * rho * nu);
        let viii = tan / (24. * rho * nu.powi(3)) * (5. + 3. * tan2 + eta2 - 9. * tan2 * eta2);
        let ix = tan / (720. * rho * nu.powi(5)) * (61. + 90. * tan2 + 45. * tan4);
        let x = sec / nu;
        let xi = sec / (6. * nu.powi(3)) * (nu / rho + 2. * tan2);
        let xii = sec / (120. * nu.powi(5)) * (5. + 28. * tan2 + 24. * tan4);
        let xiia = sec / (5040. * nu.powi(7)) * (61. + 662. * tan2 + 1320. * tan4 + 720. * tan6);

        let lat = lat - et.powi(2) * vii + et.powi(4) * viii - et.powi(6) * ix;
        let lng = self.rad_lng0 + et * x - et.powi(3) * xi + et.powi(5) * xii - et.powi(7) * xiia;

        Ok(LatLng::new(lat.to_degrees(), lng.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::{TransverseMercator, ITM};
    use crate::ellipsoid::{GRS80, WGS84};
    use crate::error::Error;
    use crate::{LatLng, Point};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use quickcheck::{quickcheck, TestResult};
    use rstest::rstest;
    use uom::si::f64::Length;
    use uom::si::length::meter;

    fn m(meters: f64) -> Length {
        Length::new::<meter>(meters)
    }

    /// The British National Grid, whose worked example in the OS guide pins down the series.
    fn osgb36() -> TransverseMercator {
        let airy1830 = crate::Ellipsoid::new(6_377_563.396, 6_356_256.909).unwrap();
        TransverseMercator::new(airy1830, 400_000., -100_000., 0.999_601_271_7, 49., -2.)
    }

    #[test]
    fn itm_definition() {
        assert_eq!(ITM.ellipsoid(), &GRS80);
        assert_eq!(ITM.false_origin(), Point::new(219_529.584, 626_907.389_99));
        assert_eq!(ITM.true_origin(), LatLng::new(31.734_394, 35.204_517));
        assert_eq!(ITM.scale_factor(), 1.000_006_7);
        assert_relative_eq!(ITM.n, 0.001_679_220_394_66, epsilon = 1e-13);
        // scaling both axes by f0 leaves the eccentricity alone
        assert_relative_eq!(ITM.e2, GRS80.eccentricity_sq(), epsilon = 1e-15);
    }

    #[test]
    fn origin_maps_to_false_origin() {
        let p = ITM.project(&ITM.true_origin());
        assert_abs_diff_eq!(p, ITM.false_origin(), epsilon = m(1e-6));

        let ll = ITM.unproject(&ITM.false_origin()).unwrap();
        assert_abs_diff_eq!(ll, ITM.true_origin(), epsilon = 1e-9);
    }

    #[test]
    fn os_worked_example() {
        // OS guide, annex C: 52°39'27.2531"N 1°43'4.5177"E is E 651409.903, N 313177.270
        let lat = 52. + 39. / 60. + 27.2531 / 3600.;
        let lng = 1. + 43. / 60. + 4.5177 / 3600.;
        let p = osgb36().project(&LatLng::new(lat, lng));
        // the published angles are rounded to 0.0001", which is ~3mm on the ground
        assert_abs_diff_eq!(p, Point::new(651_409.903, 313_177.270), epsilon = m(0.005));

        let back = osgb36()
            .unproject(&Point::new(651_409.903, 313_177.270))
            .unwrap();
        assert_abs_diff_eq!(back, LatLng::new(lat, lng), epsilon = 5e-8);
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let origin = ITM.true_origin();
        let north = ITM.project(&LatLng::new(origin.lat + 0.1, origin.lng));
        let east = ITM.project(&LatLng::new(origin.lat, origin.lng + 0.1));
        assert!(north.y > ITM.false_origin().y);
        assert_abs_diff_eq!(north.x, ITM.false_origin().x, epsilon = 1e-6);
        assert!(east.x > ITM.false_origin().x);
        // ~11km per 0.1° of latitude
        assert_abs_diff_eq!(north.y - ITM.false_origin().y, 11_090., epsilon = 30.);
    }

    #[test]
    fn altitude_is_dropped() {
        let high = ITM.project(&LatLng::with_alt(31.5, 35., 800.));
        let low = ITM.project(&LatLng::new(31.5, 35.));
        assert_eq!(high, low);
        assert_eq!(high.z, 0.);
    }

    #[rstest]
    #[case(29.5, 34.9)]
    #[case(31.7683, 35.2137)]
    #[case(33.2, 35.6)]
    #[case(30.0, 34.27)]
    fn roundtrip_within_israel(#[case] lat: f64, #[case] lng: f64) {
        let ll = LatLng::new(lat, lng);
        let back = ITM.unproject(&ITM.project(&ll)).unwrap();
        assert_abs_diff_eq!(back, ll, epsilon = 1e-9);
    }

    quickcheck! {
        fn roundtrip_near_central_meridian(dlat: f64, dlng: f64) -> TestResult {
            if !dlat.is_finite() || !dlng.is_finite() {
                return TestResult::discard();
            }
            // roughly the extent of the grid
            let ll = LatLng::new(
                31.7 + dlat.rem_euclid(5.) - 2.5,
                35.2 + dlng.rem_euclid(2.) - 1.,
            );
            let back = ITM.unproject(&ITM.project(&ll)).unwrap();
            TestResult::from_bool(
                (back.lat - ll.lat).abs() < 1e-8 && (back.lng - ll.lng).abs() < 1e-8,
            )
        }
    }

    #[test]
    fn other_ellipsoid() {
        let wgs_itm = TransverseMercator::new(
            WGS84,
            219_529.584,
            626_907.389_99,
            1.000_006_7,
            31.734_394,
            35.204_517,
        );
        let ll = LatLng::new(32.08, 34.78);
        // the ellipsoids are close enough that the grids agree to well under a millimeter
        assert_abs_diff_eq!(wgs_itm.project(&ll), ITM.project(&ll), epsilon = m(0.001));
    }

    #[rstest]
    #[case(Point::new(200_000., f64::NAN))]
    #[case(Point::new(200_000., f64::INFINITY))]
    fn non_finite_northing_does_not_converge(#[case] point: Point) {
        assert!(matches!(
            ITM.unproject(&point),
            Err(Error::NonConvergence {
                quantity: "footpoint latitude",
                ..
            })
        ));
    }

    #[test]
    fn non_finite_easting_propagates() {
        let ll = ITM.unproject(&Point::new(f64::NAN, 600_000.)).unwrap();
        assert!(ll.lat.is_nan());
        assert!(ll.lng.is_nan());
    }
}
