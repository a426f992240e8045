//! Provider console flows
//!
//! Each flow is a fixed, linear sequence of UI interactions against the
//! provider's live console: navigate, fill the login form, dismiss the
//! optional consent dialogs, open the service tabs, then idle forever.

pub mod aws;
pub mod azure;

use std::fmt;

use clap::ValueEnum;
use tracing::info;

/// Supported cloud providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CloudProvider {
    Aws,
    Azure,
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudProvider::Aws => write!(f, "AWS"),
            CloudProvider::Azure => write!(f, "Azure"),
        }
    }
}

/// Log the PID and park the task forever. The browser stays open for
/// manual use; termination is external (kill by PID).
pub(crate) async fn idle_forever(provider: CloudProvider) {
    let pid = std::process::id();
    info!("{provider} console is running. PID: {pid}");
    info!("To terminate this process, use: kill -9 {pid}");
    info!("Use Ctrl+Z followed by \"bg\" to background it; kill it later by PID if needed.");

    std::future::pending::<()>().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_display_names() {
        assert_eq!(CloudProvider::Aws.to_string(), "AWS");
        assert_eq!(CloudProvider::Azure.to_string(), "Azure");
    }
}
