use thiserror::Error;

// Error types for a single poll cycle
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Fetch failed: {0}")]
    FetchFailure(String),

    #[error("Parse failed: {0}")]
    ParseFailure(String),

    #[error("Unknown distance unit code: {0}")]
    UnknownUnit(i64),

    #[error("Room block {block} at {hotel} has no inventory lines")]
    EmptyInventory { hotel: String, block: String },

    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),
}

impl From<reqwest::Error> for PortalError {
    fn from(e: reqwest::Error) -> Self {
        PortalError::FetchFailure(e.to_string())
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(e: serde_json::Error) -> Self {
        PortalError::ParseFailure(e.to_string())
    }
}
