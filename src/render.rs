// Console table for one poll cycle

use std::fmt::Write;

use chrono::{DateTime, TimeZone};

use crate::offers::RoomOffer;

pub fn header() -> String {
    format!("{:<15} {:<10} {:<80} {}", "Distance", "Price", "Hotel", "Room")
}

pub fn offer_line(offer: &RoomOffer) -> String {
    format!(
        "{:<15} ${:<9} {:<80} ({}) {}",
        offer.distance, offer.price, offer.name, offer.rooms, offer.room
    )
}

pub fn footer<Tz: TimeZone>(finished_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "-----------end search at {}------------",
        finished_at.format("%Y-%m-%d %H:%M:%S %z")
    )
}

// Whole table as one string so a cycle is printed all at once or not at all
pub fn render_table<Tz: TimeZone>(offers: &[RoomOffer], finished_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    let _ = writeln!(out, "{}", header());
    for offer in offers {
        let _ = writeln!(out, "{}", offer_line(offer));
    }
    let _ = writeln!(out, "{}", footer(finished_at));
    out
}
