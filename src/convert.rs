//! Conversions between the Israeli grid and WGS84, ie GPS coordinates.
//!
//! Going from the grid to WGS84 takes two steps: first the grid position is unprojected to a
//! latitude/longitude on GRS80 (the ellipsoid [`ITM`] is defined on), then that location is moved
//! to WGS84 with a small datum shift. Going the other way runs the same steps in reverse.
//!
//! Every function here stops at the first step that fails and returns its error as is.

use crate::ellipsoid::{GRS80, WGS84};
use crate::error::Result;
use crate::grid_ref;
use crate::projection::ITM;
use crate::translation::{GRS80_TO_WGS84, WGS84_TO_GRS80};
use crate::{LatLng, Point};

/// Converts an ITM grid position to a WGS84 location.
#[doc(alias = "itm2gps")]
pub fn itm_to_gps(point: &Point) -> Result<LatLng> {
    let on_grs80 = ITM.unproject(point)?;
    GRS80.convert_grid(&on_grs80, &WGS84, &GRS80_TO_WGS84)
}

/// Converts a WGS84 location to an ITM grid position.
#[doc(alias = "gps2itm")]
pub fn gps_to_itm(latlng: &LatLng) -> Result<Point> {
    let on_grs80 = WGS84.convert_grid(latlng, &GRS80, &WGS84_TO_GRS80)?;
    Ok(ITM.project(&on_grs80))
}

/// Reads an ITM grid reference (see [`grid_ref::parse`]) and converts it to a WGS84 location.
#[doc(alias = "itmRef2gps")]
pub fn itm_ref_to_gps(grid_ref: &str) -> Result<LatLng> {
    let point = grid_ref::parse(grid_ref)?;
    itm_to_gps(&point)
}

/// Converts a WGS84 location to an ITM grid reference at the given precision (see
/// [`grid_ref::format`]).
pub fn gps_to_itm_ref(latlng: &LatLng, precision: u8) -> Result<String> {
    let point = gps_to_itm(latlng)?;
    Ok(grid_ref::format(&point, precision))
}

/// Reads a WGS84 `"lat, lng"` pair (see [`LatLng`]'s `FromStr`) and converts it to an ITM grid
/// reference at the given precision.
#[doc(alias = "gpsRef2itmRef")]
pub fn gps_ref_to_itm_ref(latlng: &str, precision: u8) -> Result<String> {
    let latlng: LatLng = latlng.parse()?;
    gps_to_itm_ref(&latlng, precision)
}

/// Converts each ITM grid position to WGS84, in order.
///
/// The output has one entry per input. Fails on the first position that cannot be converted.
pub fn itm_to_gps_batch(points: &[Point]) -> Result<Vec<LatLng>> {
    points.iter().map(itm_to_gps).collect()
}

/// Converts each WGS84 location to an ITM grid position, in order.
///
/// The output has one entry per input. Fails on the first location that cannot be converted.
pub fn gps_to_itm_batch(latlngs: &[LatLng]) -> Result<Vec<Point>> {
    latlngs.iter().map(gps_to_itm).collect()
}
