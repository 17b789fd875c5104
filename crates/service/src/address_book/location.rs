//! Parsing of `"longitude,latitude"` strings.

use std::str::FromStr;

use super::errors::AddressBookError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

impl FromStr for Coordinates {
    type Err = AddressBookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |why: &str| AddressBookError::InvalidLocation(format!("{why}: {s:?}"));
        let mut parts = s.split(',');
        let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid("expected \"longitude,latitude\""));
        };
        let lon: f64 = lon.trim().parse().map_err(|_| invalid("longitude is not a number"))?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid("latitude is not a number"))?;
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(invalid("longitude out of range"));
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(invalid("latitude out of range"));
        }
        Ok(Self { lon, lat })
    }
}

/// `None` for a missing or blank location, otherwise the parsed pair.
pub fn parse_location(location: Option<&str>) -> Result<Option<Coordinates>, AddressBookError> {
    match location.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lon_then_lat() {
        let c: Coordinates = "116.4,39.9".parse().unwrap();
        assert_eq!(c, Coordinates { lon: 116.4, lat: 39.9 });
    }

    #[test]
    fn tolerates_spaces_around_parts() {
        let c: Coordinates = " 121.47 , 31.23 ".parse().unwrap();
        assert_eq!(c.lon, 121.47);
        assert_eq!(c.lat, 31.23);
    }

    #[test]
    fn rejects_wrong_arity_and_garbage() {
        for bad in ["116.4", "116.4,39.9,1", "abc,39.9", "116.4,", "NaN,1", "inf,1"] {
            assert!(
                matches!(bad.parse::<Coordinates>(), Err(AddressBookError::InvalidLocation(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!("181,0".parse::<Coordinates>().is_err());
        assert!("0,-90.5".parse::<Coordinates>().is_err());
        assert!("-180,90".parse::<Coordinates>().is_ok());
    }

    #[test]
    fn blank_is_absent() {
        assert_eq!(parse_location(None).unwrap(), None);
        assert_eq!(parse_location(Some("  ")).unwrap(), None);
        assert!(parse_location(Some("1,2")).unwrap().is_some());
    }
}
