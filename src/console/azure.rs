//! Azure portal flow
//!
//! Logs in through the Microsoft identity pages the portal redirects to
//! (email, then password, then the optional "Stay signed in?" popup) and
//! opens the common portal blades as tabs, retitling each so the tab
//! strip stays readable.

use std::time::Duration;

use tracing::{info, warn};

use super::{idle_forever, CloudProvider};
use crate::browser::{BrowserError, BrowserSession, BrowserSessionConfig};
use crate::secrets::AzureSecrets;

/// Selectors for the Microsoft login pages
mod selectors {
    pub const EMAIL_INPUT: &str = r#"input[type="email"]"#;
    pub const PASSWORD_INPUT: &str = r#"input[type="password"]"#;
    pub const SUBMIT_BUTTON: &str = "#idSIButton9";
    pub const STAY_SIGNED_IN_YES: &str = r#"input#idSIButton9[value="Yes"]"#;
}

const PORTAL: &str = "https://portal.azure.com/";

/// How long to wait for the login form fields to render
const LOGIN_FIELD_TIMEOUT: Duration = Duration::from_secs(10);

/// How long to wait for the optional "Stay signed in?" popup
const STAY_SIGNED_IN_TIMEOUT: Duration = Duration::from_secs(10);

/// The portal re-renders the password field while the page settles;
/// typing immediately after focus loses the first characters
const PASSWORD_FOCUS_PAUSE: Duration = Duration::from_secs(1);

/// Common portal pages opened after login, as (url, tab title)
pub const TABS: &[(&str, &str)] = &[
    (
        "https://portal.azure.com/#browse/resourcegroups",
        "Resource Groups",
    ),
    (
        "https://portal.azure.com/#browse/Microsoft.ContainerService%2FmanagedClusters",
        "AKS",
    ),
    (
        "https://portal.azure.com/#browse/Microsoft.Compute%2FVirtualMachines",
        "Virtual Machines",
    ),
    (
        "https://portal.azure.com/#blade/Microsoft_AAD_RegisteredApps/ApplicationsListBlade",
        "IAM/RBAC",
    ),
    (
        "https://portal.azure.com/#blade/HubsExtension/BrowseResource/resourceType/Microsoft.Network%2FvirtualNetworks",
        "Networking",
    ),
];

/// Run the Azure portal login and tab fan-out, then idle forever.
pub async fn run(secrets: &AzureSecrets, headless: bool) -> Result<(), BrowserError> {
    info!("Cloud provider: Azure");

    let session = BrowserSession::launch(BrowserSessionConfig::default().headless(headless)).await?;

    info!("Navigating to Azure portal...");
    session.goto(PORTAL).await?;

    // The portal redirects to the Microsoft login page; wait for the
    // email field to render before typing
    session
        .wait_for_element(selectors::EMAIL_INPUT, LOGIN_FIELD_TIMEOUT)
        .await?;

    info!("Entering email...");
    session.fill(selectors::EMAIL_INPUT, &secrets.email).await?;
    session.click(selectors::SUBMIT_BUTTON).await?;
    session.wait_for_navigation().await?;

    info!("Waiting for the password field...");
    session
        .wait_for_element(selectors::PASSWORD_INPUT, LOGIN_FIELD_TIMEOUT)
        .await?;
    session.click(selectors::PASSWORD_INPUT).await?;
    tokio::time::sleep(PASSWORD_FOCUS_PAUSE).await;
    session.fill(selectors::PASSWORD_INPUT, &secrets.password).await?;
    session.click(selectors::SUBMIT_BUTTON).await?;
    session.wait_for_navigation().await?;

    // The popup is optional; absence is logged and the run continues
    info!("Waiting for the \"Stay signed in?\" popup...");
    match session
        .wait_for_element(selectors::STAY_SIGNED_IN_YES, STAY_SIGNED_IN_TIMEOUT)
        .await
    {
        Ok(()) => match session.click(selectors::STAY_SIGNED_IN_YES).await {
            Ok(()) => info!("Clicked \"Yes\" on the \"Stay signed in?\" popup."),
            Err(e) => warn!("Failed to click \"Yes\" on the \"Stay signed in?\" popup: {e}"),
        },
        Err(e) => info!("No \"Stay signed in?\" popup appeared: {e}"),
    }

    info!("Opening common Azure tabs...");
    let mut tabs = Vec::with_capacity(TABS.len());
    for (url, name) in TABS {
        let page = session.open_tab(url).await?;
        BrowserSession::set_tab_title(&page, name).await?;
        info!("Opened tab: {name}");
        tabs.push(page);
    }

    info!("Successfully logged into Azure portal and opened common tabs.");
    idle_forever(CloudProvider::Azure).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_list_is_the_fixed_portal_set() {
        let names: Vec<&str> = TABS.iter().map(|(_, name)| *name).collect();
        assert_eq!(
            names,
            vec![
                "Resource Groups",
                "AKS",
                "Virtual Machines",
                "IAM/RBAC",
                "Networking"
            ]
        );
    }

    #[test]
    fn tab_urls_all_point_at_the_portal() {
        for (tab_url, _) in TABS {
            assert!(tab_url.starts_with(PORTAL), "unexpected tab url: {tab_url}");
            let parsed = url::Url::parse(tab_url).unwrap();
            assert_eq!(parsed.host_str(), Some("portal.azure.com"));
        }
    }

    #[test]
    fn tab_titles_are_unique() {
        let mut names: Vec<&str> = TABS.iter().map(|(_, name)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TABS.len());
    }
}
