use thiserror::Error;

/// Result type for fallible conversions in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting coordinates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The input text was not a coordinate in any accepted form.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An iterative latitude refinement did not settle within its iteration cap.
    ///
    /// This happens for non-finite input, or input far enough outside the valid domain that the
    /// refinement oscillates.
    #[error("{quantity} did not converge within {iterations} iterations")]
    NonConvergence {
        /// The quantity that was being refined.
        quantity: &'static str,
        /// How many iterations were attempted.
        iterations: usize,
    },
}

/// Text that could not be read as a coordinate.
///
/// Each variant carries the rejected input so callers can echo it back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not two equal-width groups of 3 to 6 digits.
    #[error("{0:?} is not a grid reference")]
    GridRef(String),

    /// Not two decimal numbers separated by whitespace, a comma, or a colon.
    #[error("{0:?} is not a latitude/longitude pair")]
    LatLng(String),
}

#[cfg(test)]
mod tests {
    use super::{Error, ParseError};

    #[test]
    fn messages() {
        insta::assert_snapshot!(
            Error::from(ParseError::GridRef("131550:44000".into())),
            @r#""131550:44000" is not a grid reference"#
        );
        insta::assert_snapshot!(
            Error::NonConvergence { quantity: "geodetic latitude", iterations: 100 },
            @"geodetic latitude did not converge within 100 iterations"
        );
    }
}
