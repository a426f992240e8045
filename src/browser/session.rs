//! Browser session management
//!
//! Handles launching and controlling a Chrome browser instance over CDP.
//! The session keeps one login tab for the provider flow; `open_tab`
//! creates additional tabs that share the authenticated context.

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tracing::{debug, info, warn};

use super::BrowserError;

/// Default window size; wide enough that the AWS console keeps its full toolbar
pub const DEFAULT_WINDOW_WIDTH: u32 = 1700;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 1080;

/// How often `wait_for_element` re-probes the DOM
const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Find Chrome/Chromium executable on the system
fn find_chrome() -> Option<PathBuf> {
    let candidates: Vec<PathBuf> = if cfg!(target_os = "windows") {
        let mut paths = vec![
            PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
            PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
        ];
        // Also check %LOCALAPPDATA%
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            paths.push(PathBuf::from(format!(
                r"{}\Google\Chrome\Application\chrome.exe",
                local
            )));
        }
        paths
    } else if cfg!(target_os = "macos") {
        vec![PathBuf::from(
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        )]
    } else {
        vec![
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/usr/bin/google-chrome-stable"),
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/usr/bin/chromium-browser"),
        ]
    };

    candidates.into_iter().find(|p| p.exists())
}

/// Configuration for a browser session
#[derive(Debug, Clone)]
pub struct BrowserSessionConfig {
    /// Path to Chrome/Chromium executable
    pub chrome_path: Option<String>,
    /// Run in headless mode
    pub headless: bool,
    /// Navigation / page-load timeout in seconds
    pub nav_timeout_secs: u64,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
}

impl Default for BrowserSessionConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: false,
            nav_timeout_secs: 60,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

impl BrowserSessionConfig {
    /// Set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set Chrome path
    pub fn chrome_path(mut self, path: Option<String>) -> Self {
        self.chrome_path = path;
        self
    }
}

/// A browser session for console automation
pub struct BrowserSession {
    /// The browser instance
    browser: Browser,
    /// The login tab the provider flow drives
    page: Page,
    /// Session configuration
    config: BrowserSessionConfig,
}

impl BrowserSession {
    /// Launch Chrome and adopt its initial blank tab as the login tab.
    pub async fn launch(config: BrowserSessionConfig) -> Result<Self, BrowserError> {
        info!("Launching browser session (headless: {})", config.headless);

        // Check if Chrome is available before attempting launch
        if config.chrome_path.is_none() && find_chrome().is_none() {
            return Err(BrowserError::LaunchFailed(
                "Google Chrome not found. Please install Chrome or Chromium and retry.".to_string(),
            ));
        }

        let mut builder = BrowserConfig::builder();

        // chromiumoxide defaults to headless; only headful needs a flag
        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = config.chrome_path {
            builder = builder.chrome_executable(path);
        } else if let Some(chrome_path) = find_chrome() {
            info!("Auto-detected Chrome at: {}", chrome_path.display());
            builder = builder.chrome_executable(chrome_path);
        }

        builder = builder
            .window_size(config.window_width, config.window_height)
            // No "restore tabs" prompt from a previous run
            .arg("--disable-session-crashed-bubble")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");

        let browser_config = builder.build().map_err(BrowserError::LaunchFailed)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        // Drive the CDP event stream; when it ends, Chrome has disconnected
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser event error: {e}");
                }
            }
            warn!("Chrome disconnected (event handler ended)");
        });

        // Adopt the initial blank tab; close any extras Chrome opened
        let page = {
            let mut pages = browser
                .pages()
                .await
                .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

            let main_page = if !pages.is_empty() {
                pages.remove(0)
            } else {
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?
            };

            for extra_page in pages {
                debug!("Closing extra blank tab");
                let _ = extra_page.close().await;
            }

            main_page
        };

        info!(
            "Browser session ready ({}x{})",
            config.window_width, config.window_height
        );

        Ok(Self {
            browser,
            page,
            config,
        })
    }

    /// The login tab.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate the login tab to a URL.
    pub async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        debug!("Navigating to: {url}");
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed(format!("{url}: {e}")))?;
        Ok(())
    }

    /// Wait for the login tab's pending navigation to complete.
    pub async fn wait_for_navigation(&self) -> Result<(), BrowserError> {
        tokio::time::timeout(
            Duration::from_secs(self.config.nav_timeout_secs),
            self.page.wait_for_navigation(),
        )
        .await
        .map_err(|_| BrowserError::Timeout("Navigation timeout".into()))?
        .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;

        Ok(())
    }

    /// Click an element on the login tab.
    pub async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        Self::click_on(&self.page, selector).await
    }

    /// Fill a form field on the login tab: focus it, then type the text.
    pub async fn fill(&self, selector: &str, text: &str) -> Result<(), BrowserError> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| BrowserError::ElementNotFound(format!("{selector}: {e}")))?;

        element
            .click()
            .await
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?;
        element
            .type_str(text)
            .await
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?;

        Ok(())
    }

    /// Wait until a selector matches on the login tab, up to `timeout`.
    pub async fn wait_for_element(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        Self::wait_for_element_on(&self.page, selector, timeout).await
    }

    /// Open a URL as a new tab sharing the authenticated session context,
    /// waiting for its initial load to settle.
    pub async fn open_tab(&self, url: &str) -> Result<Page, BrowserError> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed(format!("{url}: {e}")))?;

        tokio::time::timeout(
            Duration::from_secs(self.config.nav_timeout_secs),
            page.wait_for_navigation(),
        )
        .await
        .map_err(|_| BrowserError::Timeout(format!("Page load timeout: {url}")))?
        .map_err(|e| BrowserError::NavigationFailed(format!("{url}: {e}")))?;

        info!("Page loaded: {url}");
        Ok(page)
    }

    /// Click an element on an arbitrary tab.
    pub async fn click_on(page: &Page, selector: &str) -> Result<(), BrowserError> {
        let element = page
            .find_element(selector)
            .await
            .map_err(|e| BrowserError::ElementNotFound(format!("{selector}: {e}")))?;

        element
            .click()
            .await
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?;

        Ok(())
    }

    /// Wait until a selector matches on an arbitrary tab, up to `timeout`.
    pub async fn wait_for_element_on(
        page: &Page,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(BrowserError::Timeout(format!(
                    "Element did not appear within {}s: {selector}",
                    timeout.as_secs()
                )));
            }
            tokio::time::sleep(ELEMENT_POLL_INTERVAL).await;
        }
    }

    /// Opportunistically dismiss a cookie consent banner on a tab.
    /// The banner is optional; its absence is logged and tolerated.
    pub async fn accept_cookie_banner(page: &Page, selector: &str, timeout: Duration) {
        let url = Self::page_url(page).await;

        let attempt = async {
            Self::wait_for_element_on(page, selector, timeout).await?;
            Self::click_on(page, selector).await
        };

        match attempt.await {
            Ok(()) => info!("Cookies accepted on: {url}"),
            Err(e) => info!("No cookie banner found on {url} ({e})"),
        }
    }

    /// Override a tab's document title so the tab strip is readable.
    pub async fn set_tab_title(page: &Page, title: &str) -> Result<(), BrowserError> {
        let quoted =
            serde_json::to_string(title).map_err(|e| BrowserError::ScriptError(e.to_string()))?;

        page.evaluate(format!("document.title = {quoted}"))
            .await
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?;

        Ok(())
    }

    async fn page_url(page: &Page) -> String {
        page.url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| "<unknown>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_console_viewport() {
        let config = BrowserSessionConfig::default();
        assert_eq!(config.window_width, 1700);
        assert_eq!(config.window_height, 1080);
        assert!(!config.headless);
    }

    #[test]
    fn builder_style_setters() {
        let config = BrowserSessionConfig::default()
            .headless(true)
            .chrome_path(Some("/opt/chrome".to_string()));
        assert!(config.headless);
        assert_eq!(config.chrome_path.as_deref(), Some("/opt/chrome"));
    }
}
