//! Browser automation module
//!
//! Handles launching and controlling a single Chrome/Chromium instance
//! over CDP. Service pages are opened as extra tabs sharing the
//! authenticated session of the login tab.

mod errors;
mod session;

pub use errors::BrowserError;
pub use session::{BrowserSession, BrowserSessionConfig};
