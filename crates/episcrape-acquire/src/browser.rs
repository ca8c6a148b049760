use crate::config::{FetchConfig, Locator, WaitFor};
use crate::source::{FetchError, Page, PageSource};
use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// How to start the browser process.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Chrome/Chromium executable; auto-detected when `None`.
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    pub user_agent: Option<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            user_agent: None,
        }
    }
}

/// Tab operations one page load is made of.
trait Driver {
    /// Navigate to `url` and block until the new document has loaded.
    fn goto(&self, url: &str) -> Result<(), FetchError>;
    fn wait_for(&self, wait: &WaitFor) -> Result<(), FetchError>;
    fn snapshot(&self) -> Result<String, FetchError>;
}

impl Driver for Tab {
    fn goto(&self, url: &str) -> Result<(), FetchError> {
        // navigate_to only issues the request; without the second wait the
        // previous page's DOM would still satisfy the element waits.
        self.navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| FetchError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    fn wait_for(&self, wait: &WaitFor) -> Result<(), FetchError> {
        let timeout = wait.timeout();
        let found = match &wait.locator {
            Locator::Css(selector) => self
                .wait_for_element_with_custom_timeout(selector, timeout)
                .map(|_| ()),
            Locator::Xpath(xpath) => self
                .wait_for_xpath_with_custom_timeout(xpath, timeout)
                .map(|_| ()),
        };

        found.map_err(|e| FetchError::MarkerMissing {
            locator: wait.locator.clone(),
            waited: timeout,
            message: e.to_string(),
        })
    }

    fn snapshot(&self) -> Result<String, FetchError> {
        self.get_content().map_err(|e| FetchError::Content(e.to_string()))
    }
}

/// Load one detail page: navigate, wait for the marker and secondary
/// elements, then snapshot the DOM.
fn load_page<D: Driver + ?Sized>(
    driver: &D,
    config: &FetchConfig,
    external_id: &str,
) -> Result<Page, FetchError> {
    let url = config.page_url(external_id);
    tracing::debug!(url = %url, "Navigating");

    driver.goto(&url)?;
    driver.wait_for(&config.ready)?;

    for wait in &config.waits {
        match driver.wait_for(wait) {
            Ok(()) => {}
            Err(e) if !wait.required => {
                tracing::debug!(id = %external_id, "Optional element absent: {e}");
            }
            Err(e) => return Err(e),
        }
    }

    let page = Page::new(external_id, &url, driver.snapshot()?);
    tracing::debug!(url = %page.url(), bytes = page.html().len(), "Captured page");
    Ok(page)
}

/// A single Chrome tab reused for every page load.
pub struct ChromeSource {
    // Dropping the browser kills the Chrome process, so it lives as long as the tab.
    _browser: Browser,
    tab: Arc<Tab>,
    config: FetchConfig,
}

impl ChromeSource {
    /// Launch Chrome and open the working tab.
    ///
    /// Failure here is fatal for the run: nothing has been fetched yet.
    pub fn launch(options: &BrowserOptions, config: FetchConfig) -> Result<Self> {
        let launch = LaunchOptions::default_builder()
            .headless(options.headless)
            .path(options.chrome_path.clone())
            .args(vec![OsStr::new("--disable-blink-features=AutomationControlled")])
            .idle_browser_timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid browser launch options: {e}"))?;

        tracing::info!(
            headless = options.headless,
            chrome = ?options.chrome_path,
            "Launching browser"
        );
        let browser = Browser::new(launch).context("Failed to launch Chrome")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;

        if let Some(agent) = &options.user_agent {
            tracing::debug!(user_agent = %agent, "Overriding user agent");
            tab.set_user_agent(agent, None, None)
                .context("Failed to set user agent")?;
        }

        Ok(Self {
            _browser: browser,
            tab,
            config,
        })
    }
}

impl PageSource for ChromeSource {
    fn navigate(&mut self, external_id: &str) -> Result<Page, FetchError> {
        load_page(self.tab.as_ref(), &self.config, external_id)
    }
}
