use serde::Serialize;
use thiserror::Error;

use crate::error::AppError;

/// A latitude/longitude pair within standard geographic bounds.
/// Constructed transiently per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum MalformedCoordinate {
    #[error("expected exactly two comma-separated values, got {0}")]
    WrongTokenCount(usize),
    #[error("'{0}' is not a valid number")]
    NotANumber(String),
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl From<MalformedCoordinate> for AppError {
    fn from(err: MalformedCoordinate) -> Self {
        AppError::BadRequest(format!("Invalid coordinate: {}", err))
    }
}

impl Coordinate {
    /// Parse a "LAT,LON" string, tolerating whitespace around either token.
    pub fn parse(input: &str) -> Result<Self, MalformedCoordinate> {
        let tokens: Vec<&str> = input.split(',').collect();
        if tokens.len() != 2 {
            return Err(MalformedCoordinate::WrongTokenCount(tokens.len()));
        }

        let lat = parse_number(tokens[0])?;
        let lon = parse_number(tokens[1])?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(MalformedCoordinate::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(MalformedCoordinate::LongitudeOutOfRange(lon));
        }

        Ok(Self { lat, lon })
    }
}

fn parse_number(token: &str) -> Result<f64, MalformedCoordinate> {
    let trimmed = token.trim();
    trimmed
        .parse::<f64>()
        .ok()
        // f64::parse accepts "inf" and "NaN"; neither is a coordinate
        .filter(|value| value.is_finite())
        .ok_or_else(|| MalformedCoordinate::NotANumber(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_coordinate() {
        let coord = Coordinate::parse("-90,57.938").unwrap();
        assert_eq!(coord.lat, -90.0);
        assert_eq!(coord.lon, 57.938);
    }

    #[test]
    fn tolerates_whitespace() {
        let coord = Coordinate::parse(" 45.0 , -120.5 ").unwrap();
        assert_eq!(coord.lat, 45.0);
        assert_eq!(coord.lon, -120.5);
    }

    #[test]
    fn rejects_non_numeric_token() {
        assert_eq!(
            Coordinate::parse("7sse,88"),
            Err(MalformedCoordinate::NotANumber("7sse".to_string()))
        );
    }

    #[test]
    fn rejects_wrong_token_counts() {
        assert_eq!(
            Coordinate::parse("45"),
            Err(MalformedCoordinate::WrongTokenCount(1))
        );
        assert_eq!(
            Coordinate::parse("1,2,3"),
            Err(MalformedCoordinate::WrongTokenCount(3))
        );
        assert_eq!(
            Coordinate::parse(""),
            Err(MalformedCoordinate::WrongTokenCount(1))
        );
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert_eq!(
            Coordinate::parse("90.001,0"),
            Err(MalformedCoordinate::LatitudeOutOfRange(90.001))
        );
        assert_eq!(
            Coordinate::parse("-91,0"),
            Err(MalformedCoordinate::LatitudeOutOfRange(-91.0))
        );
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert_eq!(
            Coordinate::parse("0,180.5"),
            Err(MalformedCoordinate::LongitudeOutOfRange(180.5))
        );
        assert_eq!(
            Coordinate::parse("0,-181",),
            Err(MalformedCoordinate::LongitudeOutOfRange(-181.0))
        );
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(matches!(
            Coordinate::parse("NaN,0"),
            Err(MalformedCoordinate::NotANumber(_))
        ));
        assert!(matches!(
            Coordinate::parse("0,inf"),
            Err(MalformedCoordinate::NotANumber(_))
        ));
    }

    #[test]
    fn accepts_boundary_values() {
        assert!(Coordinate::parse("90,180").is_ok());
        assert!(Coordinate::parse("-90,-180").is_ok());
    }
}
