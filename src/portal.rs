// Reservation portal client: session setup and the room search request

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{COOKIE, HOST, SET_COOKIE};

use crate::{
    error::PortalError,
    records::{parse_search_page, HotelRecord},
};

pub const DEFAULT_BASE_URL: &str = "https://aws.passkey.com";
pub const DEFAULT_HOST: &str = "book.passkey.com";
pub const DEFAULT_EVENT_ID: u64 = 49547714;
pub const DEFAULT_OWNER_ID: u64 = 10909638;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub base_url: String,
    pub key: String,
    pub event_id: u64,
    pub owner_id: u64,
    pub host: String,
    pub timeout: Duration,
}

impl PortalConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            key: key.into(),
            event_id: DEFAULT_EVENT_ID,
            owner_id: DEFAULT_OWNER_ID,
            host: DEFAULT_HOST.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    // Registration landing page, also where the browser is sent
    pub fn start_url(&self) -> String {
        format!(
            "{}/reg/{}/null/null/1/0/null",
            self.base_url.trim_end_matches('/'),
            self.key
        )
    }

    pub fn search_url(&self) -> String {
        format!(
            "{}/event/{}/owner/{}/rooms/select",
            self.base_url.trim_end_matches('/'),
            self.event_id,
            self.owner_id
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchDates {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

// Form fields of the room search, one room for one guest
pub fn search_form(dates: &SearchDates) -> Vec<(&'static str, String)> {
    vec![
        ("hotelId", "0".to_string()),
        ("blockMap.blocks[0].blockId", "0".to_string()),
        ("blockMap.blocks[0].checkIn", dates.check_in.to_string()),
        ("blockMap.blocks[0].checkOut", dates.check_out.to_string()),
        ("blockMap.blocks[0].numberOfGuests", "1".to_string()),
        ("blockMap.blocks[0].numberOfRooms", "1".to_string()),
        ("blockMap.blocks[0].numberOfChildren", "0".to_string()),
    ]
}

// Fold Set-Cookie values into a single Cookie header value.
// Attributes are dropped and a repeated cookie name keeps its last value.
pub fn cookie_header<'a, I>(set_cookies: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut jar: Vec<(String, String)> = Vec::new();

    for set_cookie in set_cookies {
        let pair = set_cookie.split(';').next().unwrap_or_default();
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        let value = value.trim().to_string();
        match jar.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = value,
            None => jar.push((name.to_string(), value)),
        }
    }

    jar.iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

// Anything that can hand the poller a search results page
#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn fetch_page(&self) -> Result<String, PortalError>;

    async fn search(&self) -> Result<Vec<HotelRecord>, PortalError> {
        let page = self.fetch_page().await?;
        parse_search_page(&page)
    }
}

pub struct PortalClient {
    client: reqwest::Client,
    config: PortalConfig,
    dates: SearchDates,
}

impl PortalClient {
    pub fn new(config: PortalConfig, dates: SearchDates) -> Result<Self, PortalError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            config,
            dates,
        })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn dates(&self) -> &SearchDates {
        &self.dates
    }

    async fn open_session(&self) -> Result<String, PortalError> {
        let resp = self
            .client
            .get(self.config.start_url())
            .send()
            .await?
            .error_for_status()?;

        let cookies = cookie_header(
            resp.headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        );
        tracing::debug!(status = %resp.status(), has_cookies = !cookies.is_empty(), "session opened");
        Ok(cookies)
    }
}

#[async_trait]
impl SearchSource for PortalClient {
    async fn fetch_page(&self) -> Result<String, PortalError> {
        let cookies = self.open_session().await?;

        let mut request = self
            .client
            .post(self.config.search_url())
            .header(HOST, self.config.host.as_str())
            .form(&search_form(&self.dates));
        if !cookies.is_empty() {
            request = request.header(COOKIE, cookies);
        }

        let resp = request.send().await?.error_for_status()?;
        tracing::debug!(status = %resp.status(), "search response received");
        Ok(resp.text().await?)
    }
}

// Canned portal for tests and benchmarks
pub mod mock_portal {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    use crate::records::RESULTS_SELECTOR;

    pub struct MockPortal {
        pages: Mutex<VecDeque<Result<String, PortalError>>>,
        fetch_count: AtomicUsize,
    }

    impl MockPortal {
        pub fn new() -> Self {
            Self {
                pages: Mutex::new(VecDeque::new()),
                fetch_count: AtomicUsize::new(0),
            }
        }

        pub async fn push_page(&self, page: String) {
            self.pages.lock().await.push_back(Ok(page));
        }

        pub async fn push_hotels(&self, hotels: &[HotelRecord]) {
            self.push_page(results_page(hotels)).await;
        }

        pub async fn push_error(&self, error: PortalError) {
            self.pages.lock().await.push_back(Err(error));
        }

        pub fn fetch_count(&self) -> usize {
            self.fetch_count.load(Ordering::SeqCst)
        }
    }

    impl Default for MockPortal {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl SearchSource for MockPortal {
        async fn fetch_page(&self) -> Result<String, PortalError> {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);
            self.pages
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| Err(PortalError::FetchFailure("Service unavailable".to_string())))
        }
    }

    // Minimal room selection page carrying the given hotels
    pub fn results_page(hotels: &[HotelRecord]) -> String {
        let payload = serde_json::to_string(hotels).unwrap_or_else(|_| "[]".to_string());
        let id = RESULTS_SELECTOR.trim_start_matches("script#");
        format!(
            "<!DOCTYPE html><html><body><form id=\"search\"></form>\
             <script type=\"application/json\" id=\"{id}\">{payload}</script></body></html>"
        )
    }
}
