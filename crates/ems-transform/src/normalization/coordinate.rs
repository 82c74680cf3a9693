//! Coordinate parsing: decimal degrees, degrees-minutes-seconds and
//! hemisphere letters.

use ems_model::CoordinateAxis;

/// Parses a latitude or longitude into signed decimal degrees.
///
/// Accepted shapes include `39.7392`, `-104.99`, `39.7392 N`, `W104.99`,
/// `40°26'46"N`, `40 26 46 N` and `40°26.767'`. A hemisphere letter must
/// belong to `axis` (N/S for latitude, E/W for longitude), and the result
/// must lie within ±90 or ±180.
pub fn parse_coordinate(value: &str, axis: CoordinateAxis) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (hemisphere, body) = split_hemisphere(trimmed);
    let negative_hemisphere = match hemisphere {
        None => false,
        Some(letter) => match (axis, letter) {
            (CoordinateAxis::Latitude, 'N') | (CoordinateAxis::Longitude, 'E') => false,
            (CoordinateAxis::Latitude, 'S') | (CoordinateAxis::Longitude, 'W') => true,
            _ => return None,
        },
    };

    let cleaned: String = body
        .chars()
        .map(|c| match c {
            '°' | 'º' | '\'' | '"' | '′' | '″' | ':' => ' ',
            other => other,
        })
        .collect();
    let parts: Vec<f64> = cleaned
        .split_whitespace()
        .map(|part| part.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<_>>>()?;

    let degrees = match parts.as_slice() {
        [decimal] => *decimal,
        [deg, min] => dms(*deg, *min, 0.0)?,
        [deg, min, sec] => dms(*deg, *min, *sec)?,
        _ => return None,
    };

    let signed = if negative_hemisphere {
        -degrees.abs()
    } else {
        degrees
    };
    (signed.abs() <= axis.limit()).then_some(signed)
}

fn dms(degrees: f64, minutes: f64, seconds: f64) -> Option<f64> {
    if !(0.0..60.0).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return None;
    }
    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    Some(if degrees.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    })
}

fn split_hemisphere(value: &str) -> (Option<char>, &str) {
    let is_hemisphere = |c: char| matches!(c.to_ascii_uppercase(), 'N' | 'S' | 'E' | 'W');
    if let Some(last) = value.chars().last()
        && is_hemisphere(last)
    {
        let body = &value[..value.len() - last.len_utf8()];
        return (Some(last.to_ascii_uppercase()), body.trim());
    }
    if let Some(first) = value.chars().next()
        && is_hemisphere(first)
    {
        return (Some(first.to_ascii_uppercase()), value[first.len_utf8()..].trim());
    }
    (None, value)
}

/// Decimal text with at most six fractional digits.
pub fn format_coordinate(degrees: f64) -> String {
    let fixed = format!("{degrees:.6}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

pub fn transform_to_coordinate(value: &str, axis: CoordinateAxis) -> Option<String> {
    parse_coordinate(value, axis).map(format_coordinate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAT: CoordinateAxis = CoordinateAxis::Latitude;
    const LON: CoordinateAxis = CoordinateAxis::Longitude;

    #[test]
    fn decimal_and_hemisphere() {
        assert_eq!(transform_to_coordinate("39.7392", LAT).as_deref(), Some("39.7392"));
        assert_eq!(transform_to_coordinate("104.9903 W", LON).as_deref(), Some("-104.9903"));
        assert_eq!(transform_to_coordinate("s33.8688", LAT).as_deref(), Some("-33.8688"));
        assert_eq!(
            transform_to_coordinate("-104.99034567891", LON).as_deref(),
            Some("-104.990346")
        );
    }

    #[test]
    fn degrees_minutes_seconds() {
        assert_eq!(
            transform_to_coordinate("40°26'46\"N", LAT).as_deref(),
            Some("40.446111")
        );
        assert_eq!(
            transform_to_coordinate("79 58 56 W", LON).as_deref(),
            Some("-79.982222")
        );
        assert_eq!(transform_to_coordinate("40°30'", LAT).as_deref(), Some("40.5"));
    }

    #[test]
    fn rejects_out_of_range_and_wrong_axis() {
        assert_eq!(parse_coordinate("91", LAT), None);
        assert_eq!(parse_coordinate("-180.5", LON), None);
        assert_eq!(parse_coordinate("45 E", LAT), None);
        assert_eq!(parse_coordinate("40 75 00 N", LAT), None);
        assert_eq!(parse_coordinate("north", LAT), None);
        assert_eq!(parse_coordinate("", LAT), None);
    }
}
