// Distance unit classification for hotel listings

use crate::{error::PortalError, records::HotelRecord};

// Unit codes as sent by the portal in `distanceUnit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DistanceUnit {
    Blocks = 1,
    Yards = 2,
    Miles = 3,
    Meters = 4,
    Kilometers = 5,
}

impl DistanceUnit {
    pub fn name(self) -> &'static str {
        match self {
            DistanceUnit::Blocks => "blocks",
            DistanceUnit::Yards => "yards",
            DistanceUnit::Miles => "miles",
            DistanceUnit::Meters => "meters",
            DistanceUnit::Kilometers => "kilometers",
        }
    }
}

impl TryFrom<i64> for DistanceUnit {
    type Error = PortalError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(DistanceUnit::Blocks),
            2 => Ok(DistanceUnit::Yards),
            3 => Ok(DistanceUnit::Miles),
            4 => Ok(DistanceUnit::Meters),
            5 => Ok(DistanceUnit::Kilometers),
            other => Err(PortalError::UnknownUnit(other)),
        }
    }
}

pub fn unit_name(code: i64) -> Result<&'static str, PortalError> {
    DistanceUnit::try_from(code).map(DistanceUnit::name)
}

// "3 blocks", "0.5 miles"
pub fn format_distance(hotel: &HotelRecord) -> Result<String, PortalError> {
    Ok(format!(
        "{} {}",
        hotel.distance_from_event,
        unit_name(hotel.distance_unit)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_names() {
        let expected = [
            (1, "blocks"),
            (2, "yards"),
            (3, "miles"),
            (4, "meters"),
            (5, "kilometers"),
        ];
        for (code, name) in expected {
            assert_eq!(unit_name(code).unwrap(), name);
        }
    }

    #[test]
    fn test_unknown_unit() {
        for code in [0, 6, -1, 42] {
            match unit_name(code) {
                Err(PortalError::UnknownUnit(c)) => assert_eq!(c, code),
                other => panic!("expected UnknownUnit for {code}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_format_distance() {
        let mut hotel = HotelRecord::default();
        hotel.distance_unit = 1;
        hotel.distance_from_event = 3.0;
        assert_eq!(format_distance(&hotel).unwrap(), "3 blocks");

        hotel.distance_unit = 3;
        hotel.distance_from_event = 0.5;
        assert_eq!(format_distance(&hotel).unwrap(), "0.5 miles");

        hotel.distance_unit = 9;
        assert!(format_distance(&hotel).is_err());
    }

    #[test]
    fn test_units_order_by_code() {
        assert!(DistanceUnit::Blocks < DistanceUnit::Yards);
        assert!(DistanceUnit::Miles < DistanceUnit::Meters);
        assert_eq!(DistanceUnit::Miles as i64, 3);
    }
}
