//! Grid references: an easting and a northing written as two equal-width groups of digits.
//!
//! The width of each group sets the resolution. Six digits per group give meters, five give
//! decameters, four give hundreds of meters, and three give kilometers. A position is
//! `"200000 500000"` at meter resolution and `"200 500"` at kilometer resolution.
//!
//! This module only deals with the text. Which grid the numbers refer to (ITM, in this crate) is
//! up to the caller.

use crate::error::ParseError;
use crate::Point;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Digits per group of a grid reference, in `3..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u8", into = "u8"))]
pub struct Precision(u8);

impl Precision {
    pub const KILOMETER: Self = Self(3);
    pub const HECTOMETER: Self = Self(4);
    pub const DECAMETER: Self = Self(5);
    pub const METER: Self = Self(6);

    /// Every precision, coarsest first.
    pub const ALL: [Self; 4] = [Self::KILOMETER, Self::HECTOMETER, Self::DECAMETER, Self::METER];

    /// Returns the precision with `digits` per group, moving out-of-range values to the nearest
    /// of 3 and 6.
    #[must_use]
    pub const fn clamped(digits: u8) -> Self {
        if digits < Self::KILOMETER.0 {
            Self::KILOMETER
        } else if digits > Self::METER.0 {
            Self::METER
        } else {
            Self(digits)
        }
    }

    #[must_use]
    pub const fn digits(self) -> u8 {
        self.0
    }

    /// Meters per unit of the last digit.
    #[must_use]
    pub fn resolution(self) -> f64 {
        10_f64.powi(i32::from(Self::METER.0 - self.0))
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::METER
    }
}

impl From<u8> for Precision {
    fn from(digits: u8) -> Self {
        Self::clamped(digits)
    }
}

impl From<Precision> for u8 {
    fn from(precision: Precision) -> Self {
        precision.0
    }
}

/// Writes `point` as a grid reference.
///
/// Each coordinate is rounded to the nearest multiple of the precision's resolution and written
/// zero-padded to the precision's width, easting first, separated by a single space. Precisions
/// outside `3..=6` are clamped.
///
/// Coordinates are expected to be finite. A NaN coordinate is written as zero, and one beyond
/// the precision's width is written in full, so neither produces a reference [`parse`] accepts
/// back as the same point. Positions from [`gps_to_itm`](crate::convert::gps_to_itm) are always
/// finite, since non-finite input fails there with [`Error::NonConvergence`](crate::Error::NonConvergence).
#[must_use]
pub fn format(point: &Point, precision: u8) -> String {
    let precision = Precision::clamped(precision);
    let width = usize::from(precision.digits());
    let resolution = precision.resolution();
    let [x, y] = [point.x, point.y].map(|v| (v / resolution).round() as i64);
    format!("{x:0width$} {y:0width$}")
}

/// Reads a grid reference into a point in meters (with `z` of zero).
///
/// Accepts two groups of the same width (3 to 6 ASCII digits) separated by optional whitespace,
/// an optional colon, and more optional whitespace. Nothing else is allowed, not even leading or
/// trailing whitespace. Wider groups are tried first, so `"200500"` is the kilometer reference
/// `200 500`, while `"131550:44000"` is rejected because its groups differ in width.
pub fn parse(s: &str) -> Result<Point, ParseError> {
    Precision::ALL
        .iter()
        .rev()
        .find_map(|&precision| {
            let (x, y) = split_groups(s, usize::from(precision.digits()))?;
            let resolution = precision.resolution();
            Some(Point::new(
                f64::from(x) * resolution,
                f64::from(y) * resolution,
            ))
        })
        .ok_or_else(|| ParseError::GridRef(s.to_owned()))
}

/// Splits `s` into two `width`-digit groups around a `\s*:?\s*` separator.
fn split_groups(s: &str, width: usize) -> Option<(u32, u32)> {
    let x = s.get(..width)?;
    let rest = s.get(width..)?;
    let (separator, y) = rest.split_at_checked(rest.len().checked_sub(width)?)?;

    let is_group = |group: &str| group.bytes().all(|b| b.is_ascii_digit());
    if !is_group(x) || !is_group(y) {
        return None;
    }

    let separator = separator.trim_start();
    let separator = separator.strip_prefix(':').unwrap_or(separator);
    if !separator.trim_start().is_empty() {
        return None;
    }

    Some((x.parse().ok()?, y.parse().ok()?))
}
