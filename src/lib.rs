//! This library converts coordinates between the [Israeli Transverse Mercator][itm] grid (ITM)
//! and WGS84, the latitude/longitude system used by GPS.
//!
//! ITM is a [Transverse Mercator] projection of the GRS80 ellipsoid. Positions on it are given as
//! an easting and a northing in meters, and are commonly written as a [grid reference] string
//! such as `"200000 500000"` (or `"200 500"` at kilometer resolution). GPS positions are
//! latitude and longitude on the WGS84 ellipsoid.
//!
//! The two ellipsoids are nearly identical in shape, but their centers are a few dozen meters
//! apart. Converting between them is done by going through earth-centered cartesian coordinates
//! and applying a fixed [`Translation`] (the usual 3-parameter approximation; no rotation or
//! scale is applied).
//!
//! Most users will only need the [`convert`] module:
//!
//! ```
//! use itm::convert::{gps_ref_to_itm_ref, itm_ref_to_gps};
//!
//! // a grid reference to GPS
//! let latlng = itm_ref_to_gps("200000 500000")?;
//! assert!((30.5..30.7).contains(&latlng.lat()));
//! assert!((34.9..35.1).contains(&latlng.lng()));
//!
//! // and back, at decameter resolution
//! let text = format!("{}, {}", latlng.lat(), latlng.lng());
//! assert_eq!(gps_ref_to_itm_ref(&text, 5)?, "20000 50000");
//! # Ok::<(), itm::Error>(())
//! ```
//!
//! The building blocks are public too, should you need to, say, work with a different
//! Transverse Mercator grid:
//!
//! ```
//! use itm::{GRS80, ITM};
//!
//! let on_grs80 = ITM.unproject(&ITM.false_origin())?;
//! approx::assert_abs_diff_eq!(on_grs80, ITM.true_origin(), epsilon = 1e-9);
//!
//! // the cartesian position of that spot
//! let ecef = GRS80.to_point(&on_grs80);
//! assert!(ecef.x > 4_000_000.);
//! # Ok::<(), itm::Error>(())
//! ```
//!
//! [itm]: https://en.wikipedia.org/wiki/Israeli_Transverse_Mercator
//! [Transverse Mercator]: https://en.wikipedia.org/wiki/Transverse_Mercator_projection
//! [grid reference]: grid_ref

mod ellipsoid;
mod error;
mod latlng;
mod point;
mod projection;
mod translation;

pub mod convert;
pub mod grid_ref;
#[cfg(feature = "serde")]
pub mod stream;

pub(crate) type Point3 = nalgebra::Point3<f64>;
pub(crate) type Vector3 = nalgebra::Vector3<f64>;

/// The most rounds any iterative refinement in this crate runs before giving up with
/// [`Error::NonConvergence`].
///
/// Well-behaved input settles in well under ten.
pub const MAX_ITERATIONS: usize = 100;

pub use ellipsoid::{Ellipsoid, GRS80, WGS84};
pub use error::{Error, ParseError, Result};
pub use latlng::{Components, LatLng, DEFAULT_PRECISION};
pub use point::Point;
pub use projection::{TransverseMercator, ITM};
pub use translation::{Translation, GRS80_TO_WGS84, WGS84_TO_GRS80};
