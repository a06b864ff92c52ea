// Poll scheduler: one search cycle per interval, forever

use std::{io::Write, process::Command, time::Duration};

use chrono::Local;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::{
    error::PortalError,
    filter::FilterConfig,
    offers::{run, RoomOffer},
    portal::SearchSource,
    render::render_table,
};

// Granularity of the clock check between cycles
pub const TICK: Duration = Duration::from_secs(1);

pub trait BrowserLauncher {
    fn open(&self, url: &str) -> Result<(), PortalError>;
}

// Hands the URL to the platform opener
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), PortalError> {
        #[cfg(target_os = "macos")]
        let mut command = Command::new("open");

        // cmd's `start` would split the URL at '&', the URL handler takes it whole
        #[cfg(target_os = "windows")]
        let mut command = {
            let mut command = Command::new("rundll32");
            command.arg("url.dll,FileProtocolHandler");
            command
        };

        #[cfg(all(not(target_os = "macos"), not(target_os = "windows")))]
        let mut command = Command::new("xdg-open");

        let status = command
            .arg(url)
            .status()
            .map_err(|e| PortalError::BrowserLaunch(format!("failed to run opener: {e}")))?;
        if status.success() {
            Ok(())
        } else {
            Err(PortalError::BrowserLaunch(format!(
                "opener exited with status {status}"
            )))
        }
    }
}

// One-shot latch: the first cycle with offers opens the browser, never again
#[derive(Debug, Clone)]
pub struct BrowserAlert {
    enabled: bool,
    url: String,
    fired: bool,
}

impl BrowserAlert {
    pub fn new(enabled: bool, url: impl Into<String>) -> Self {
        Self {
            enabled,
            url: url.into(),
            fired: false,
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, String::new())
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn should_fire(&mut self, offer_count: usize) -> bool {
        if !self.enabled || self.fired || offer_count == 0 {
            return false;
        }
        self.fired = true;
        true
    }
}

#[derive(Debug, Clone)]
pub struct PollReport {
    pub offers: Vec<RoomOffer>,
    pub table: String,
    pub browser_opened: bool,
}

pub fn is_due(last_run: Instant, now: Instant, interval: Duration) -> bool {
    now.saturating_duration_since(last_run) >= interval
}

pub struct Poller<S: SearchSource> {
    source: S,
    filter: FilterConfig,
    interval: Duration,
    alert: BrowserAlert,
    launcher: Box<dyn BrowserLauncher>,
}

impl<S: SearchSource> Poller<S> {
    pub fn new(source: S, filter: FilterConfig, interval: Duration) -> Self {
        Self {
            source,
            filter,
            interval,
            alert: BrowserAlert::disabled(),
            launcher: Box::new(SystemBrowser),
        }
    }

    pub fn with_browser(mut self, alert: BrowserAlert, launcher: Box<dyn BrowserLauncher>) -> Self {
        self.alert = alert;
        self.launcher = launcher;
        self
    }

    pub fn alert(&self) -> &BrowserAlert {
        &self.alert
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    // Fetch, filter and render one cycle. Nothing is printed or opened here,
    // `browser_opened` only records that the latch fired for this report.
    pub async fn poll_once(&mut self) -> Result<PollReport, PortalError> {
        let hotels = self.source.search().await?;
        let offers = run(hotels, &self.filter)?;
        let table = render_table(&offers, &Local::now());
        let browser_opened = self.alert.should_fire(offers.len());

        Ok(PollReport {
            offers,
            table,
            browser_opened,
        })
    }

    fn launch_browser(&self) {
        info!(url = %self.alert.url(), "rooms available, opening browser");
        if let Err(e) = self.launcher.open(self.alert.url()) {
            warn!(error = %e, "could not open browser");
        }
    }

    // One full cycle: the table goes out first, then the browser opens
    pub async fn cycle<W: Write>(&mut self, out: &mut W) -> Result<PollReport, PortalError> {
        let report = self.poll_once().await?;

        if let Err(e) = out
            .write_all(report.table.as_bytes())
            .and_then(|_| out.flush())
        {
            warn!(error = %e, "could not write results table");
        }
        if report.browser_opened {
            self.launch_browser();
        }

        info!(offers = report.offers.len(), "poll cycle complete");
        Ok(report)
    }

    async fn tick(&mut self) {
        if let Err(e) = self.cycle(&mut std::io::stdout()).await {
            error!(error = %e, "poll cycle failed");
        }
    }

    pub async fn run_forever(&mut self) {
        info!(interval_secs = self.interval.as_secs(), "polling started");
        self.tick().await;
        let mut last_run = Instant::now();

        loop {
            if !is_due(last_run, Instant::now(), self.interval) {
                tokio::time::sleep(TICK).await;
                continue;
            }
            last_run = Instant::now();
            self.tick().await;
        }
    }
}
