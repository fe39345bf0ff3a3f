//! Coercion of raw extract strings into typed field values.
//!
//! Every helper treats an absent value as `Ok(None)` and reports a present but
//! unparsable value as a [`CoerceError`]. Callers decide whether the error is
//! fatal; row processors null the field and record a warning.

use chrono::NaiveDate;
use geo::Point;
use thiserror::Error;

/// A present value that does not have the expected shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoerceError {
    /// Not a `YYYYMMDD` calendar date.
    #[error("invalid date {0:?}")]
    Date(String),
    /// Not an integer.
    #[error("invalid number {0:?}")]
    Number(String),
    /// Neither `J` nor `N`.
    #[error("invalid indicator {0:?}")]
    Indicator(String),
    /// Not a numeric coordinate.
    #[error("invalid coordinate {0:?}")]
    Coordinate(String),
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Parse a `YYYYMMDD` date.
///
/// # Examples
/// ```
/// use atlas_core::coerce::parse_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_date(Some("20150612")), Ok(NaiveDate::from_ymd_opt(2015, 6, 12)));
/// assert_eq!(parse_date(None), Ok(None));
/// assert!(parse_date(Some("12-06-2015")).is_err());
/// ```
pub fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, CoerceError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };
    if value.len() != 8 {
        return Err(CoerceError::Date(value.to_owned()));
    }
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map(Some)
        .map_err(|_| CoerceError::Date(value.to_owned()))
}

/// Parse a `J`/`N` indicator into a boolean.
pub fn parse_indicator(raw: Option<&str>) -> Result<Option<bool>, CoerceError> {
    match present(raw) {
        None => Ok(None),
        Some("J" | "j") => Ok(Some(true)),
        Some("N" | "n") => Ok(Some(false)),
        Some(other) => Err(CoerceError::Indicator(other.to_owned())),
    }
}

/// Parse a signed integer.
pub fn parse_number(raw: Option<&str>) -> Result<Option<i64>, CoerceError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };
    value
        .parse()
        .map(Some)
        .map_err(|_| CoerceError::Number(value.to_owned()))
}

/// Build a point from X/Y coordinate fields; both must be present.
///
/// One coordinate without the other yields `Ok(None)`.
pub fn point_from_coordinates(
    x: Option<&str>,
    y: Option<&str>,
) -> Result<Option<Point<f64>>, CoerceError> {
    let (Some(x), Some(y)) = (present(x), present(y)) else {
        return Ok(None);
    };
    let parse = |value: &str| {
        value
            .parse::<f64>()
            .ok()
            .filter(|coordinate| coordinate.is_finite())
            .ok_or_else(|| CoerceError::Coordinate(value.to_owned()))
    };
    Ok(Some(Point::new(parse(x)?, parse(y)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("J"), Ok(Some(true)))]
    #[case(Some("N"), Ok(Some(false)))]
    #[case(Some(" "), Ok(None))]
    #[case(None, Ok(None))]
    #[case(Some("X"), Err(CoerceError::Indicator("X".into())))]
    fn indicators(#[case] raw: Option<&str>, #[case] expected: Result<Option<bool>, CoerceError>) {
        assert_eq!(parse_indicator(raw), expected);
    }

    #[rstest]
    #[case(Some("42"), Ok(Some(42)))]
    #[case(Some("-1"), Ok(Some(-1)))]
    #[case(Some(""), Ok(None))]
    #[case(Some("4.2"), Err(CoerceError::Number("4.2".into())))]
    fn numbers(#[case] raw: Option<&str>, #[case] expected: Result<Option<i64>, CoerceError>) {
        assert_eq!(parse_number(raw), expected);
    }

    #[rstest]
    fn rejects_impossible_dates() {
        assert_eq!(
            parse_date(Some("20150231")),
            Err(CoerceError::Date("20150231".into()))
        );
    }

    #[rstest]
    fn builds_points_only_from_complete_pairs() {
        assert_eq!(
            point_from_coordinates(Some("121394"), Some("487383")),
            Ok(Some(Point::new(121_394.0, 487_383.0)))
        );
        assert_eq!(point_from_coordinates(Some("121394"), None), Ok(None));
        assert!(point_from_coordinates(Some("x"), Some("1")).is_err());
    }
}
