//! A line-oriented adapter over [`convert`](crate::convert) for bulk conversion.
//!
//! Each non-blank input line holds one coordinate and produces exactly one line of JSON output,
//! in the same order. A coordinate may be given as JSON (a [`Point`] or [`LatLng`] object) or
//! as text (a grid reference or a `"lat, lng"` pair). A line that cannot be converted produces
//! an `{"line": <n>, "error": "<message>"}` object in its place, so the output stays aligned
//! with the input.

use crate::convert::{gps_to_itm, itm_to_gps};
use crate::{grid_ref, LatLng, Point};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Which way [`convert_lines`] converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// ITM grid positions or references in, WGS84 [`LatLng`]s out.
    ItmToGps,
    /// WGS84 locations in, ITM grid [`Point`]s out.
    GpsToItm,
}

/// Failures that abort a [`convert_lines`] run.
///
/// Bad input lines do _not_ abort; they are reported inline.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a [`convert_lines`] run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    pub failed: usize,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Record {
    LatLng(LatLng),
    Point(Point),
    Failed { line: usize, error: String },
}

fn convert_line(line: &str, direction: Direction, precision: u8) -> Result<Record, String> {
    let is_json = line.starts_with('{');
    match direction {
        Direction::ItmToGps => {
            let point = if is_json {
                serde_json::from_str::<Point>(line).map_err(|e| e.to_string())?
            } else {
                grid_ref::parse(line).map_err(|e| e.to_string())?
            };
            let latlng = itm_to_gps(&point).map_err(|e| e.to_string())?;
            Ok(Record::LatLng(latlng.with_precision(precision)))
        }
        Direction::GpsToItm => {
            let latlng = if is_json {
                serde_json::from_str::<LatLng>(line).map_err(|e| e.to_string())?
            } else {
                line.parse::<LatLng>().map_err(|e| e.to_string())?
            };
            let point = gps_to_itm(&latlng).map_err(|e| e.to_string())?;
            Ok(Record::Point(point))
        }
    }
}

/// Converts every coordinate read from `reader` and writes one JSON line per coordinate to
/// `writer`.
///
/// Leading and trailing whitespace on each line is ignored, and blank lines are skipped without
/// producing output. Converted [`LatLng`]s carry `precision` as their display precision. Line
/// numbers in error records count from 1 and include skipped blank lines.
pub fn convert_lines<R, W>(
    reader: R,
    mut writer: W,
    direction: Direction,
    precision: u8,
) -> Result<Summary, StreamError>
where
    R: BufRead,
    W: Write,
{
    let mut summary = Summary::default();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record = convert_line(line, direction, precision).unwrap_or_else(|error| {
            tracing::warn!(line = i + 1, %error, "could not convert coordinate");
            Record::Failed {
                line: i + 1,
                error,
            }
        });
        match record {
            Record::Failed { .. } => summary.failed += 1,
            _ => summary.converted += 1,
        }

        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    tracing::debug!(
        converted = summary.converted,
        failed = summary.failed,
        ?direction,
        "finished converting"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::{convert_lines, Direction, Summary};
    use crate::convert::{gps_to_itm, itm_ref_to_gps};
    use crate::{LatLng, Point};
    use approx::assert_abs_diff_eq;
    use std::io::Cursor;
    use uom::si::f64::Length;
    use uom::si::length::meter;

    fn run(input: &str, direction: Direction, precision: u8) -> (Vec<serde_json::Value>, Summary) {
        let mut out = Vec::new();
        let summary = convert_lines(Cursor::new(input), &mut out, direction, precision).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (lines, summary)
    }

    #[test]
    fn itm_to_gps_one_line_per_coordinate() {
        let input = "200000 500000\n{\"x\": 200000, \"y\": 500000}\n\n  200500  \nnope\n200000 500000\n";
        let (lines, summary) = run(input, Direction::ItmToGps, 7);
        assert_eq!(
            summary,
            Summary {
                converted: 4,
                failed: 1
            }
        );
        assert_eq!(lines.len(), 5);

        let expected = itm_ref_to_gps("200000 500000").unwrap().with_precision(7);
        for i in [0, 1, 2, 4] {
            let ll: LatLng = serde_json::from_value(lines[i].clone()).unwrap();
            assert_abs_diff_eq!(ll, expected, epsilon = 1e-12);
            assert_eq!(ll.precision(), 7, "line {i}");
        }

        assert_eq!(lines[3]["line"], 5);
        insta::assert_snapshot!(
            lines[3]["error"].as_str().unwrap(),
            @r#""nope" is not a grid reference"#
        );
    }

    #[test]
    fn gps_to_itm_accepts_text_and_json() {
        let input = "31.7683, 35.2137\r\n{\"lat\": 31.7683, \"lng\": 35.2137}\n{\"lat\": \"north\"}\n";
        let (lines, summary) = run(input, Direction::GpsToItm, 5);
        assert_eq!(summary.converted, 2);
        assert_eq!(summary.failed, 1);

        let expected = gps_to_itm(&LatLng::new(31.7683, 35.2137)).unwrap();
        for line in &lines[..2] {
            let p: Point = serde_json::from_value(line.clone()).unwrap();
            assert_abs_diff_eq!(p, expected, epsilon = Length::new::<meter>(1e-6));
        }
        assert_eq!(lines[2]["line"], 3);
        assert!(lines[2]["error"].is_string());
    }

    #[test]
    fn empty_input() {
        let (lines, summary) = run("", Direction::ItmToGps, 5);
        assert!(lines.is_empty());
        assert_eq!(summary, Summary::default());
    }
}
