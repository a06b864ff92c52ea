// Room offers: aggregation of room blocks and the sort/filter pipeline

use crate::{
    distance::format_distance,
    error::PortalError,
    filter::{should_include, FilterConfig},
    records::{decode_html, HotelRecord, RoomBlock},
};

pub const CONNECTED_DISTANCE: &str = "Skywalk";

#[derive(Debug, Clone, PartialEq)]
pub struct RoomOffer {
    pub name: String,
    pub distance: String,
    // combined nightly rate of every inventory line in the block
    pub price: f64,
    // scarcest inventory line bounds the block
    pub rooms: i64,
    pub room: String,
}

pub fn aggregate(hotel: &HotelRecord) -> Result<Vec<RoomOffer>, PortalError> {
    let name = decode_html(&hotel.name);
    let distance = if hotel.is_connected() {
        CONNECTED_DISTANCE.to_string()
    } else {
        format_distance(hotel)?
    };

    hotel
        .blocks
        .iter()
        .map(|block| build_offer(&name, &distance, block))
        .collect()
}

fn build_offer(name: &str, distance: &str, block: &RoomBlock) -> Result<RoomOffer, PortalError> {
    let rooms = block
        .inventory
        .iter()
        .map(|line| line.available)
        .min()
        .ok_or_else(|| PortalError::EmptyInventory {
            hotel: name.to_string(),
            block: block.name.clone(),
        })?;

    Ok(RoomOffer {
        name: name.to_string(),
        distance: distance.to_string(),
        price: block.inventory.iter().map(|line| line.rate).sum(),
        rooms,
        room: decode_html(&block.name),
    })
}

// Hotels closest first: unit code, then distance within the unit
pub fn sort_hotels(hotels: &mut [HotelRecord]) {
    hotels.sort_by(|a, b| {
        a.distance_unit
            .cmp(&b.distance_unit)
            .then(a.distance_from_event.total_cmp(&b.distance_from_event))
    });
}

pub fn run(
    hotels: Vec<HotelRecord>,
    config: &FilterConfig,
) -> Result<Vec<RoomOffer>, PortalError> {
    let mut hotels: Vec<HotelRecord> = hotels
        .into_iter()
        .filter(|hotel| !hotel.blocks.is_empty())
        .collect();
    sort_hotels(&mut hotels);

    let mut offers = Vec::new();
    for hotel in &hotels {
        if !should_include(hotel, config) {
            tracing::trace!(hotel = %hotel.name, "hotel rejected");
            continue;
        }
        offers.extend(aggregate(hotel)?);
    }

    tracing::debug!(
        hotels = hotels.len(),
        offers = offers.len(),
        "search results filtered"
    );
    Ok(offers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::InventoryLine;
    use serde_json::json;

    fn line(rate: f64, available: i64) -> InventoryLine {
        InventoryLine { rate, available }
    }

    fn block(name: &str, inventory: Vec<InventoryLine>) -> RoomBlock {
        RoomBlock {
            name: name.to_string(),
            inventory,
        }
    }

    fn hotel(name: &str, unit: i64, distance: f64, blocks: Vec<RoomBlock>) -> HotelRecord {
        HotelRecord {
            name: name.to_string(),
            distance_unit: unit,
            distance_from_event: distance,
            blocks,
            ..Default::default()
        }
    }

    fn one_block() -> Vec<RoomBlock> {
        vec![block("King", vec![line(100.0, 2)])]
    }

    #[test]
    fn test_aggregate_sums_price_and_takes_min_rooms() {
        let blocks = vec![
            block("Double Queen", vec![line(100.0, 3), line(50.0, 1)]),
            block("King &amp; Sofa", vec![line(100.0, 3), line(50.0, 1)]),
        ];
        let offers = aggregate(&hotel("Hyatt &amp; Co", 1, 2.0, blocks)).unwrap();

        assert_eq!(offers.len(), 2);
        for offer in &offers {
            assert_eq!(offer.price, 150.0);
            assert_eq!(offer.rooms, 1);
            assert_eq!(offer.name, "Hyatt & Co");
            assert_eq!(offer.distance, "2 blocks");
        }
        assert_eq!(offers[0].room, "Double Queen");
        assert_eq!(offers[1].room, "King & Sofa");
    }

    #[test]
    fn test_aggregate_connected_shows_skywalk() {
        let mut h = hotel("JW", 9, 0.0, one_block());
        h.message_map = Some(json!("Skywalk to ICC"));

        // connected hotels never format their distance, so the unit is not checked
        let offers = aggregate(&h).unwrap();
        assert_eq!(offers[0].distance, "Skywalk");
    }

    #[test]
    fn test_aggregate_empty_inventory() {
        let h = hotel("Westin", 1, 1.0, vec![block("King", vec![])]);
        match aggregate(&h) {
            Err(PortalError::EmptyInventory { hotel, block }) => {
                assert_eq!(hotel, "Westin");
                assert_eq!(block, "King");
            }
            other => panic!("expected EmptyInventory, got {other:?}"),
        }
    }

    #[test]
    fn test_aggregate_unknown_unit() {
        let h = hotel("Westin", 8, 1.0, one_block());
        assert!(matches!(aggregate(&h), Err(PortalError::UnknownUnit(8))));
    }

    #[test]
    fn test_sort_is_stable_by_unit_then_distance() {
        let mut hotels = vec![
            hotel("a", 3, 2.0, one_block()),
            hotel("b", 1, 10.0, one_block()),
            hotel("c", 1, 3.0, one_block()),
            hotel("d", 5, 1.0, one_block()),
            hotel("e", 1, 3.0, one_block()),
        ];
        sort_hotels(&mut hotels);

        let units: Vec<i64> = hotels.iter().map(|h| h.distance_unit).collect();
        let names: Vec<&str> = hotels.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(units, vec![1, 1, 1, 3, 5]);
        assert_eq!(names, vec!["c", "e", "b", "a", "d"]);
    }

    #[test]
    fn test_run_orders_and_filters() {
        let hotels = vec![
            hotel("Mile Inn", 3, 2.0, one_block()),
            hotel("Ten Blocks", 1, 10.0, one_block()),
            hotel(
                "Three Blocks",
                1,
                3.0,
                vec![block("A", vec![line(1.0, 1)]), block("B", vec![line(2.0, 2)])],
            ),
            hotel("Km Lodge", 5, 1.0, one_block()),
            hotel("Sold Out", 1, 0.5, vec![]),
        ];

        let config = FilterConfig {
            show_all: true,
            ..Default::default()
        };
        let offers = run(hotels.clone(), &config).unwrap();
        let rows: Vec<(&str, &str)> = offers
            .iter()
            .map(|o| (o.name.as_str(), o.room.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Three Blocks", "A"),
                ("Three Blocks", "B"),
                ("Ten Blocks", "King"),
                ("Mile Inn", "King"),
                ("Km Lodge", "King"),
            ]
        );

        // default config drops the mile listing entirely
        let offers = run(hotels, &FilterConfig::default()).unwrap();
        assert!(offers.iter().all(|o| o.name != "Mile Inn"));
        assert_eq!(offers.len(), 4);
    }

    #[test]
    fn test_run_rejected_hotel_is_never_aggregated() {
        // broken inventory on a hidden mile listing does not fail the run
        let hotels = vec![
            hotel("Mile Inn", 3, 2.0, vec![block("King", vec![])]),
            hotel("Near", 2, 100.0, one_block()),
        ];
        let offers = run(hotels, &FilterConfig::default()).unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].distance, "100 yards");
    }

    #[test]
    fn test_run_fails_whole_cycle_on_bad_block() {
        let hotels = vec![
            hotel("Good", 1, 1.0, one_block()),
            hotel("Bad", 1, 2.0, vec![block("Suite", vec![])]),
        ];
        assert!(matches!(
            run(hotels, &FilterConfig::default()),
            Err(PortalError::EmptyInventory { .. })
        ));
    }
}
