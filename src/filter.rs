// Per-hotel inclusion rules

use crate::{distance::DistanceUnit, records::HotelRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterConfig {
    pub max_distance: Option<f64>,
    pub prefer_miles: bool,
    pub require_connected: bool,
    pub show_all: bool,
}

fn is_miles(hotel: &HotelRecord) -> bool {
    hotel.distance_unit == DistanceUnit::Miles as i64
}

pub fn should_include(hotel: &HotelRecord, config: &FilterConfig) -> bool {
    !reject_hotel(hotel, config)
}

fn reject_hotel(hotel: &HotelRecord, config: &FilterConfig) -> bool {
    // listings measured in miles stay hidden unless everything is shown
    if is_miles(hotel) && !config.show_all {
        return true;
    }

    not_cheap_enough(hotel, config) || not_close_enough(hotel, config) || not_matched(hotel, config)
}

fn not_close_enough(hotel: &HotelRecord, config: &FilterConfig) -> bool {
    if config.require_connected && !hotel.is_connected() {
        return true;
    }

    match config.max_distance {
        // A mile listing survives only when preferring miles and inside the cap
        Some(max) if is_miles(hotel) => !config.prefer_miles || hotel.distance_from_event > max,
        // With prefer_miles set, every non-mile listing passes the cap
        Some(max) => !config.prefer_miles && hotel.distance_from_event > max,
        None => false,
    }
}

// Price ceiling hook, nothing is too expensive yet
pub fn not_cheap_enough(_hotel: &HotelRecord, _config: &FilterConfig) -> bool {
    false
}

// Name/room matching hook, everything matches yet
pub fn not_matched(_hotel: &HotelRecord, _config: &FilterConfig) -> bool {
    false
}
