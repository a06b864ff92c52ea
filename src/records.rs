// Search result records embedded in the portal's room selection page

use quick_xml::escape::unescape;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PortalError;

// Marker the portal puts in `messageMap` for hotels joined to the venue
pub const SKYWALK_MARKER: &str = "Skywalk to ICC";

// The script element holding the last search as JSON
pub const RESULTS_SELECTOR: &str = "script#last-search-results";

// Longest character reference we try to decode, "&CounterClockwiseContourIntegral;"
const MAX_ENTITY_LEN: usize = 40;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelRecord {
    #[serde(default)]
    pub id: Option<Value>,
    pub name: String,
    pub distance_unit: i64,
    pub distance_from_event: f64,
    #[serde(default)]
    pub message_map: Option<Value>,
    #[serde(default)]
    pub blocks: Vec<RoomBlock>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RoomBlock {
    pub name: String,
    pub inventory: Vec<InventoryLine>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct InventoryLine {
    pub rate: f64,
    pub available: i64,
}

impl HotelRecord {
    // True when the message text carries the skywalk marker.
    // Structured message maps are searched through every nested string.
    pub fn is_connected(&self) -> bool {
        self.message_map.as_ref().map_or(false, contains_marker)
    }
}

fn contains_marker(value: &Value) -> bool {
    match value {
        Value::String(text) => text.contains(SKYWALK_MARKER),
        Value::Array(items) => items.iter().any(contains_marker),
        Value::Object(map) => map.values().any(contains_marker),
        _ => false,
    }
}

// Decode HTML character references, leaving anything undecodable untouched
pub fn decode_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        // a reference ends at the first ';' and never spans whitespace or another '&'
        let decoded = tail[1..]
            .char_indices()
            .take_while(|&(i, c)| i < MAX_ENTITY_LEN && c != '&' && !c.is_whitespace())
            .find(|&(_, c)| c == ';')
            .and_then(|(i, _)| {
                let end = i + 1;
                unescape(&tail[..=end]).ok().map(|text| (end, text))
            });

        match decoded {
            Some((end, text)) => {
                out.push_str(&text);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

// Pull the hotel array out of a search results page
pub fn parse_search_page(html: &str) -> Result<Vec<HotelRecord>, PortalError> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse(RESULTS_SELECTOR).map_err(|e| PortalError::ParseFailure(e.to_string()))?;

    let script = document.select(&selector).next().ok_or_else(|| {
        PortalError::ParseFailure(format!("{RESULTS_SELECTOR} not found in response"))
    })?;

    let payload: String = script.text().collect();
    let hotels: Vec<HotelRecord> = serde_json::from_str(payload.trim())?;

    tracing::debug!(hotels = hotels.len(), "parsed search results");
    Ok(hotels)
}
