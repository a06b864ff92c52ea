// Hotel block watcher: polls a reservation portal and ranks open rooms

// Export modules for each stage of a poll cycle
pub mod config;
pub mod distance;
pub mod error;
pub mod filter;
pub mod offers;
pub mod poller;
pub mod portal;
pub mod records;
pub mod render;

// Re-export key types for convenience
pub use error::PortalError;
pub use filter::{should_include, FilterConfig};
pub use offers::{aggregate, run, RoomOffer};
pub use poller::{BrowserAlert, BrowserLauncher, PollReport, Poller, SystemBrowser};
pub use portal::{PortalClient, PortalConfig, SearchDates, SearchSource};
pub use records::{HotelRecord, InventoryLine, RoomBlock};
