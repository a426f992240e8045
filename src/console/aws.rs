//! AWS console flow
//!
//! Signs in through the aws.amazon.com header sign-in link, lands on the
//! regional console home, then opens the common service pages as
//! concurrent tabs. Every page may show a cookie consent banner which is
//! dismissed opportunistically within a fixed timeout.

use std::time::Duration;

use futures::future;
use tracing::info;

use super::{idle_forever, CloudProvider};
use crate::browser::{BrowserError, BrowserSession, BrowserSessionConfig};
use crate::secrets::AwsSecrets;

/// Selectors for the AWS sign-in flow and console chrome
mod selectors {
    pub const SIGNIN_LINK: &str = r#"a[href*="console/home?nc2=h_ct&src=header-signin"]"#;
    pub const ACCOUNT_INPUT: &str = r#"input[name="account"]"#;
    pub const USERNAME_INPUT: &str = r#"input[name="username"]"#;
    pub const PASSWORD_INPUT: &str = r#"input[name="password"]"#;
    pub const SIGNIN_BUTTON: &str = "#signin_button";
    pub const COOKIE_ACCEPT: &str = r#"button[data-id="awsccc-cb-btn-accept"]"#;
}

const HOMEPAGE: &str = "https://aws.amazon.com/";

/// How long to wait for the optional cookie banner before moving on
const COOKIE_BANNER_TIMEOUT: Duration = Duration::from_secs(10);

/// How long to wait for the sign-in form fields to render
const LOGIN_FIELD_TIMEOUT: Duration = Duration::from_secs(10);

/// Services opened as tabs after login, as console path segments
const SERVICES: &[&str] = &["iam", "vpc", "ec2", "eks"];

/// Console home page for a region.
pub fn console_home_url(region: &str) -> String {
    format!("https://{region}.console.aws.amazon.com/console/home?region={region}")
}

/// Home pages of the common services, in the order their tabs open.
pub fn service_urls(region: &str) -> Vec<String> {
    SERVICES
        .iter()
        .map(|service| format!("https://{region}.console.aws.amazon.com/{service}/home"))
        .collect()
}

/// Run the AWS login and tab fan-out, then idle forever.
pub async fn run(secrets: &AwsSecrets, region: &str, headless: bool) -> Result<(), BrowserError> {
    info!("Cloud provider: AWS, region: {region}");

    let session = BrowserSession::launch(BrowserSessionConfig::default().headless(headless)).await?;

    info!("Navigating to AWS homepage...");
    session.goto(HOMEPAGE).await?;

    info!("Clicking sign-in...");
    session
        .wait_for_element(selectors::SIGNIN_LINK, LOGIN_FIELD_TIMEOUT)
        .await?;
    session.click(selectors::SIGNIN_LINK).await?;
    session.wait_for_navigation().await?;

    info!("Filling in account credentials...");
    session
        .wait_for_element(selectors::ACCOUNT_INPUT, LOGIN_FIELD_TIMEOUT)
        .await?;
    session.fill(selectors::ACCOUNT_INPUT, &secrets.account).await?;
    session.fill(selectors::USERNAME_INPUT, &secrets.username).await?;
    session.fill(selectors::PASSWORD_INPUT, &secrets.password).await?;
    session.click(selectors::SIGNIN_BUTTON).await?;
    session.wait_for_navigation().await?;

    info!("Navigating to console home for region: {region}...");
    session.goto(&console_home_url(region)).await?;
    BrowserSession::accept_cookie_banner(
        session.page(),
        selectors::COOKIE_ACCEPT,
        COOKIE_BANNER_TIMEOUT,
    )
    .await;

    // Open all service tabs concurrently; each dismisses its own banner
    let results = future::join_all(service_urls(region).into_iter().map(|url| {
        let session = &session;
        async move {
            let page = session.open_tab(&url).await?;
            BrowserSession::accept_cookie_banner(
                &page,
                selectors::COOKIE_ACCEPT,
                COOKIE_BANNER_TIMEOUT,
            )
            .await;
            Ok::<_, BrowserError>(page)
        }
    }))
    .await;

    // Keep the Page handles alive while the process idles
    let mut tabs = Vec::with_capacity(results.len());
    for result in results {
        tabs.push(result?);
    }

    info!("All AWS service pages opened successfully.");
    idle_forever(CloudProvider::Aws).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_home_url_carries_region_in_host_and_query() {
        let url = console_home_url("eu-central-1");
        assert_eq!(
            url,
            "https://eu-central-1.console.aws.amazon.com/console/home?region=eu-central-1"
        );

        let parsed = url::Url::parse(&url).unwrap();
        assert_eq!(
            parsed.host_str(),
            Some("eu-central-1.console.aws.amazon.com")
        );
        assert_eq!(parsed.query(), Some("region=eu-central-1"));
    }

    #[test]
    fn service_urls_are_deterministic_for_a_region() {
        assert_eq!(
            service_urls("eu-west-1"),
            vec![
                "https://eu-west-1.console.aws.amazon.com/iam/home",
                "https://eu-west-1.console.aws.amazon.com/vpc/home",
                "https://eu-west-1.console.aws.amazon.com/ec2/home",
                "https://eu-west-1.console.aws.amazon.com/eks/home",
            ]
        );
    }

    #[test]
    fn service_urls_parse_and_share_the_regional_host() {
        for url in service_urls("ap-south-1") {
            let parsed = url::Url::parse(&url).unwrap();
            assert_eq!(parsed.scheme(), "https");
            assert_eq!(
                parsed.host_str(),
                Some("ap-south-1.console.aws.amazon.com")
            );
        }
    }
}
