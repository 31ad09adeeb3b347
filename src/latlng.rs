use crate::error::ParseError;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uom::si::f64::{Angle, Length};
use uom::si::{angle::degree, length::meter};

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of decimals [`LatLng`]'s [`Display`] impl uses unless told otherwise.
pub const DEFAULT_PRECISION: u8 = 5;

/// A geographic location on some reference ellipsoid.
///
/// Which ellipsoid is implied by where the value came from: [`TransverseMercator::unproject`]
/// returns positions on the projection's ellipsoid (GRS80 for [`ITM`]), while the functions in
/// [`convert`] deal in WGS84.
///
/// Latitude and longitude are decimal degrees and are _not_ normalized or range-checked; values
/// outside [-90°, 90°] and [-180°, 180°] pass through unchanged.
///
/// [`TransverseMercator::unproject`]: crate::TransverseMercator::unproject
/// [`ITM`]: crate::ITM
/// [`convert`]: crate::convert
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatLng {
    pub(crate) lat: f64,
    pub(crate) lng: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) alt: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_precision"))]
    pub(crate) precision: u8,
}

#[cfg(feature = "serde")]
fn default_precision() -> u8 {
    DEFAULT_PRECISION
}

impl LatLng {
    /// Constructs a location from decimal degrees, at zero altitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self::with_alt(lat, lng, 0.)
    }

    /// Constructs a location from decimal degrees and an altitude in meters above the ellipsoid.
    #[must_use]
    pub const fn with_alt(lat: f64, lng: f64, alt: f64) -> Self {
        Self {
            lat,
            lng,
            alt,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Constructs a location from typed angles and altitude.
    #[must_use]
    pub fn build(
        Components {
            latitude,
            longitude,
            altitude,
        }: Components,
    ) -> Self {
        Self::with_alt(
            latitude.get::<degree>(),
            longitude.get::<degree>(),
            altitude.get::<meter>(),
        )
    }

    /// Returns a copy that displays with `precision` decimals.
    #[must_use]
    pub const fn with_precision(self, precision: u8) -> Self {
        Self { precision, ..self }
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Altitude in meters above the reference ellipsoid.
    #[must_use]
    pub const fn alt(&self) -> f64 {
        self.alt
    }

    /// Number of decimals used when displaying this location.
    #[must_use]
    pub const fn precision(&self) -> u8 {
        self.precision
    }

    #[must_use]
    pub fn latitude(&self) -> Angle {
        Angle::new::<degree>(self.lat)
    }

    #[must_use]
    pub fn longitude(&self) -> Angle {
        Angle::new::<degree>(self.lng)
    }

    #[must_use]
    pub fn altitude(&self) -> Length {
        Length::new::<meter>(self.alt)
    }
}

/// Argument type for [`LatLng::build`].
#[derive(Debug, Default)]
#[must_use]
pub struct Components {
    pub latitude: Angle,
    pub longitude: Angle,
    /// Measured above the reference ellipsoid.
    pub altitude: Length,
}

impl Display for LatLng {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let precision = usize::from(self.precision);
        write!(f, "{:.*}, {:.*}", precision, self.lat, precision, self.lng)
    }
}

/// Splits a leading `[+-]?digits(.digits)?` off `s`.
fn split_decimal(s: &str) -> Option<(&str, &str)> {
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        start
            + bytes[start..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
    };

    let int_start = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut end = digits_from(int_start);
    if end == int_start {
        return None;
    }
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 {
            end = frac_end;
        }
    }
    Some(s.split_at(end))
}

/// Reads `"<lat><sep><lng>"` where `<sep>` is optional whitespace around an optional single `,`
/// or `:`, eg `"31.7683, 35.2137"`, `"31.7683:35.2137"`, or `"31.7683 35.2137"`.
impl FromStr for LatLng {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::LatLng(s.to_owned());

        let (lat, rest) = split_decimal(s.trim_start()).ok_or_else(invalid)?;
        let rest = rest.trim_start();
        let rest = rest
            .strip_prefix(|c| c == ',' || c == ':')
            .unwrap_or(rest)
            .trim_start();
        let (lng, rest) = split_decimal(rest).ok_or_else(invalid)?;
        if !rest.trim_end().is_empty() {
            return Err(invalid());
        }

        let lat = lat.parse().map_err(|_| invalid())?;
        let lng = lng.parse().map_err(|_| invalid())?;
        Ok(Self::new(lat, lng))
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for LatLng {
    /// Degrees. Altitude and display precision are not compared.
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        // ~0.1mm on the ground
        0.000_000_001
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lng.abs_diff_eq(&other.lng, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for LatLng {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.lat.relative_eq(&other.lat, epsilon, max_relative)
            && self.lng.relative_eq(&other.lng, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::{Components, LatLng, DEFAULT_PRECISION};
    use crate::error::ParseError;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use uom::si::f64::{Angle, Length};
    use uom::si::{
        angle::{degree, radian},
        length::meter,
    };

    #[rstest]
    #[case("31.7683, 35.2137", 31.7683, 35.2137)]
    #[case("31.7683,35.2137", 31.7683, 35.2137)]
    #[case("31.7683:35.2137", 31.7683, 35.2137)]
    #[case("31.7683 35.2137", 31.7683, 35.2137)]
    #[case("  31.7683 :  35.2137  ", 31.7683, 35.2137)]
    #[case("-33.5,+151", -33.5, 151.)]
    #[case("32 35", 32., 35.)]
    fn parses(#[case] input: &str, #[case] lat: f64, #[case] lng: f64) {
        let ll: LatLng = input.parse().unwrap();
        assert_eq!(ll, LatLng::new(lat, lng));
    }

    #[rstest]
    #[case("not a coordinate")]
    #[case("")]
    #[case("31.7683")]
    #[case("31.7683,,35.2137")]
    #[case("31.7683;35.2137")]
    #[case("31.7683, 35.2137, 12")]
    #[case("31.7683N 35.2137E")]
    #[case(".5, 35")]
    #[case("31., 35")]
    #[case("--31, 35")]
    #[case("3235")]
    #[case("31.57")]
    fn rejects(#[case] input: &str) {
        assert_eq!(
            input.parse::<LatLng>(),
            Err(ParseError::LatLng(input.to_owned()))
        );
    }

    #[test]
    fn defaults() {
        let ll = LatLng::new(31., 35.);
        assert_eq!(ll.alt(), 0.);
        assert_eq!(ll.precision(), DEFAULT_PRECISION);
    }

    #[test]
    fn out_of_range_passes_through() {
        let ll = LatLng::new(123., -400.);
        assert_eq!((ll.lat(), ll.lng()), (123., -400.));
    }

    #[test]
    fn typed_components() {
        let ll = LatLng::build(Components {
            latitude: Angle::new::<radian>(std::f64::consts::FRAC_PI_6),
            longitude: Angle::new::<degree>(35.),
            altitude: Length::new::<meter>(800.),
        });
        assert_relative_eq!(ll.lat(), 30., epsilon = 1e-12);
        assert_eq!(ll.lng(), 35.);
        assert_eq!(ll.alt(), 800.);
        assert_relative_eq!(
            ll.latitude().get::<radian>(),
            std::f64::consts::FRAC_PI_6,
            epsilon = 1e-12
        );
        assert_eq!(ll.altitude().get::<meter>(), 800.);
    }

    #[test]
    fn display() {
        let ll = LatLng::new(31.768_319_3, 35.213_709_8);
        insta::assert_snapshot!(ll, @"31.76832, 35.21371");
        insta::assert_snapshot!(ll.with_precision(2), @"31.77, 35.21");
        insta::assert_snapshot!(ll.with_precision(0), @"32, 35");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde() {
        let ll = LatLng::with_alt(31.5, 35.25, 10.).with_precision(3);
        let ser = serde_yaml::to_string(&ll).unwrap();
        assert_eq!(serde_yaml::from_str::<LatLng>(&ser).unwrap(), ll);

        let de = serde_json::from_str::<LatLng>(r#"{"lat": 31.5, "lng": 35.25}"#).unwrap();
        assert_eq!(de, LatLng::new(31.5, 35.25));
    }
}
