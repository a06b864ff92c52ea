// Command line options and the configuration derived from them

use std::time::Duration;

use chrono::{Days, NaiveDate};
use clap::Parser;

use crate::{
    filter::FilterConfig,
    portal::{
        PortalConfig, SearchDates, DEFAULT_BASE_URL, DEFAULT_EVENT_ID, DEFAULT_HOST,
        DEFAULT_OWNER_ID, DEFAULT_TIMEOUT_SECS,
    },
};

pub const FIRST_EVENT_DAY: &str = "2018-08-02";
pub const LAST_EVENT_DAY: &str = "2018-08-05";

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected a YYYY-MM-DD date: {e}"))
}

// The key becomes a URL path segment, so only unreserved characters pass
fn parse_key(value: &str) -> Result<String, String> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'));
    if valid {
        Ok(value.to_string())
    } else {
        Err("expected letters, digits, '-', '_', '.' or '~'".to_string())
    }
}

/// Watch a hotel block reservation portal for open rooms.
#[derive(Parser, Debug, Clone)]
#[command(name = "hotel-block-watch", version)]
pub struct Args {
    /// Include hotels measured in miles
    #[arg(short = 'a', long)]
    pub show_all: bool,

    /// Check in the day before the first event day
    #[arg(short = 'w', long)]
    pub wednesday: bool,

    /// Check out the day after the last event day
    #[arg(short = 'm', long)]
    pub monday: bool,

    /// Only hotels with a skywalk to the venue
    #[arg(short = 'c', long)]
    pub connected: bool,

    /// Apply --max-distance to mile listings instead of block listings
    #[arg(long)]
    pub miles: bool,

    #[arg(long)]
    pub max_distance: Option<u32>,

    /// Explicit check-in date, overrides --wednesday
    #[arg(long, value_parser = parse_date)]
    pub checkin: Option<NaiveDate>,

    /// Explicit check-out date, overrides --monday
    #[arg(long, value_parser = parse_date)]
    pub checkout: Option<NaiveDate>,

    /// Registration key from the housing confirmation link
    #[arg(short = 'k', long, value_parser = parse_key)]
    pub key: String,

    /// Minutes between searches
    #[arg(short = 't', long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub minutes: u64,

    /// Open the reservation page once rooms show up
    #[arg(short = 'b', long)]
    pub browser: bool,

    #[arg(long, value_parser = parse_date, default_value = FIRST_EVENT_DAY)]
    pub first_day: NaiveDate,

    #[arg(long, value_parser = parse_date, default_value = LAST_EVENT_DAY)]
    pub last_day: NaiveDate,

    #[arg(long, default_value_t = DEFAULT_EVENT_ID)]
    pub event_id: u64,

    #[arg(long, default_value_t = DEFAULT_OWNER_ID)]
    pub owner_id: u64,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout for each portal call
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl Args {
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            max_distance: self.max_distance.map(f64::from),
            prefer_miles: self.miles,
            require_connected: self.connected,
            show_all: self.show_all,
        }
    }

    pub fn check_in(&self) -> NaiveDate {
        match self.checkin {
            Some(date) => date,
            None if self.wednesday => self
                .first_day
                .checked_sub_days(Days::new(1))
                .unwrap_or(self.first_day),
            None => self.first_day,
        }
    }

    pub fn check_out(&self) -> NaiveDate {
        match self.checkout {
            Some(date) => date,
            None if self.monday => self
                .last_day
                .checked_add_days(Days::new(1))
                .unwrap_or(self.last_day),
            None => self.last_day,
        }
    }

    pub fn search_dates(&self) -> SearchDates {
        SearchDates {
            check_in: self.check_in(),
            check_out: self.check_out(),
        }
    }

    pub fn portal_config(&self) -> PortalConfig {
        PortalConfig {
            base_url: self.base_url.clone(),
            key: self.key.clone(),
            event_id: self.event_id,
            owner_id: self.owner_id,
            host: DEFAULT_HOST.to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.minutes * 60)
    }
}
