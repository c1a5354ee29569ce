//! chromiumoxide-backed driver.
//!
//! One long-lived Chrome process, launched lazily on first use. The launch
//! runs under the runtime lock, so concurrent first callers single-flight
//! onto one process. Element lookups run as page-side scripts: a matched
//! element is tagged with a private attribute whose value becomes the
//! [`ElementRef`] token, and later interactions address it through that
//! tag. Clicks are dispatched as DOM clicks.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use futures_util::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{Driver, ElementRef, Locator, Page};
use crate::config::DriverOptions;
use crate::error::{BookingError, Result};

/// Attribute used to hand matched elements back as [`ElementRef`] tokens.
const REF_ATTRIBUTE: &str = "data-nb-ref";

pub struct CdpDriver {
    options: DriverOptions,
    runtime: Mutex<Option<BrowserRuntime>>,
}

struct BrowserRuntime {
    browser: Browser,
    /// Drives the CDP websocket; when it ends the process is unusable.
    event_loop: JoinHandle<()>,
}

impl CdpDriver {
    pub fn new(options: DriverOptions) -> Self {
        Self {
            options,
            runtime: Mutex::new(None),
        }
    }

    /// Creates a blank page on the shared browser, launching it first if
    /// needed. Holding the lock across the launch keeps it single-flight.
    async fn new_raw_page(&self) -> Result<chromiumoxide::Page> {
        let mut slot = self.runtime.lock().await;

        if slot.as_ref().is_some_and(|runtime| runtime.event_loop.is_finished()) {
            warn!(target = "nordbook.driver", "browser event loop ended; relaunching");
            *slot = None;
        }

        if let Some(runtime) = slot.as_ref() {
            return runtime.browser.new_page("about:blank").await.map_err(driver_err);
        }

        let runtime = self.launch().await?;
        let page = runtime.browser.new_page("about:blank").await.map_err(driver_err)?;
        *slot = Some(runtime);
        Ok(page)
    }

    async fn launch(&self) -> Result<BrowserRuntime> {
        info!(
            target = "nordbook.driver",
            headless = self.options.headless,
            executable = ?self.options.executable,
            "launching browser"
        );

        let mut builder = BrowserConfig::builder().no_sandbox();
        if !self.options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.options.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(BookingError::BrowserLaunch)?;

        let launch_ms = self.options.launch_timeout.as_millis() as u64;
        let (browser, mut handler) = timeout(self.options.launch_timeout, Browser::launch(config))
            .await
            .map_err(|_| {
                BookingError::BrowserLaunch(format!("browser did not come up within {launch_ms}ms"))
            })?
            .map_err(|err| BookingError::BrowserLaunch(err.to_string()))?;

        let event_loop = tokio::spawn(async move { while handler.next().await.is_some() {} });

        Ok(BrowserRuntime { browser, event_loop })
    }
}

#[async_trait]
impl Driver for CdpDriver {
    async fn open(&self, url: &str) -> Result<Box<dyn Page>> {
        let raw = self.new_raw_page().await?;
        let page = CdpPage {
            page: raw,
            options: self.options.clone(),
            next_ref: AtomicU64::new(0),
        };

        debug!(target = "nordbook.driver", %url, "navigating new page");
        if let Err(err) = page.goto(url).await {
            // The caller never sees this handle; close it before surfacing
            // the navigation error.
            if let Err(close_err) = page.close().await {
                warn!(
                    target = "nordbook.driver",
                    error = %close_err,
                    "failed to close page after navigation failure"
                );
            }
            return Err(err);
        }

        Ok(Box::new(page))
    }

    async fn shutdown(&self) -> Result<()> {
        let mut slot = self.runtime.lock().await;
        if let Some(mut runtime) = slot.take() {
            info!(target = "nordbook.driver", "shutting browser down");
            if let Err(err) = runtime.browser.close().await {
                warn!(target = "nordbook.driver", error = %err, "browser close failed");
            }
            runtime.event_loop.abort();
        }
        Ok(())
    }
}

struct CdpPage {
    page: chromiumoxide::Page,
    options: DriverOptions,
    next_ref: AtomicU64,
}

impl CdpPage {
    async fn goto(&self, url: &str) -> Result<()> {
        let ms = self.options.navigation_timeout.as_millis() as u64;
        timeout(self.options.navigation_timeout, async {
            self.page.goto(url).await.map_err(driver_err)?;
            self.page.wait_for_navigation().await.map_err(driver_err)?;
            Ok(())
        })
        .await
        .map_err(|_| BookingError::NavigationTimeout { ms })?
    }

    async fn eval(&self, expression: String) -> Result<serde_json::Value> {
        let outcome = self.page.evaluate(expression).await.map_err(driver_err)?;
        Ok(outcome.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    /// Script addressing an element previously tagged by `wait_for`.
    fn element_script(element: &ElementRef, body: &str) -> String {
        format!(
            r#"(() => {{
                const el = document.querySelector('[{REF_ATTRIBUTE}="{token}"]');
                if (!el) return null;
                {body}
            }})()"#,
            token = element.0,
        )
    }
}

/// Script that tags the first match for `locator` with `token` and reports
/// whether anything matched.
fn locate_script(locator: &Locator, token: &str) -> Result<String> {
    let token_json = serde_json::to_string(token)?;
    match locator {
        Locator::Css(selector) => {
            let selector_json = serde_json::to_string(selector)?;
            Ok(format!(
                r#"(() => {{
                    const el = document.querySelector({selector_json});
                    if (!el) return false;
                    el.setAttribute("{REF_ATTRIBUTE}", {token_json});
                    return true;
                }})()"#
            ))
        }
        // Exact visible-text equality over every text node in the document,
        // the way the site's stable labels are found amid unstable markup.
        Locator::Text(label) => {
            let label_json = serde_json::to_string(label)?;
            Ok(format!(
                r#"(() => {{
                    for (const el of document.querySelectorAll("*")) {{
                        for (const node of el.childNodes) {{
                            if (node.nodeType === Node.TEXT_NODE && node.nodeValue === {label_json}) {{
                                el.setAttribute("{REF_ATTRIBUTE}", {token_json});
                                return true;
                            }}
                        }}
                    }}
                    return false;
                }})()"#
            ))
        }
    }
}

#[async_trait]
impl Page for CdpPage {
    async fn wait_for(&self, locator: &Locator, bound: Duration) -> Result<ElementRef> {
        let token = format!("e{}", self.next_ref.fetch_add(1, Ordering::Relaxed));
        let script = locate_script(locator, &token)?;
        let deadline = tokio::time::Instant::now() + bound;

        loop {
            if self.eval(script.clone()).await?.as_bool().unwrap_or(false) {
                return Ok(ElementRef(token));
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(BookingError::ElementNotFound {
                    locator: locator.to_string(),
                });
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        let script = Self::element_script(element, "el.click(); return true;");
        if self.eval(script).await?.as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(BookingError::ElementNotFound {
                locator: element.to_string(),
            })
        }
    }

    async fn wait_for_navigation(&self, bound: Duration) -> Result<()> {
        let ms = bound.as_millis() as u64;
        timeout(bound, self.page.wait_for_navigation())
            .await
            .map_err(|_| BookingError::NavigationTimeout { ms })?
            .map_err(driver_err)?;
        Ok(())
    }

    async fn fill(&self, element: &ElementRef, value: &str) -> Result<()> {
        let value_json = serde_json::to_string(value)?;
        let script =
            Self::element_script(element, &format!("el.value = {value_json}; return true;"));
        if self.eval(script).await?.as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(BookingError::ElementNotFound {
                locator: element.to_string(),
            })
        }
    }

    async fn read_value(&self, element: &ElementRef) -> Result<Option<String>> {
        let script = Self::element_script(
            element,
            "if (el.value !== undefined) return el.value; return el.textContent;",
        );
        Ok(self.eval(script).await?.as_str().map(str::to_string))
    }

    async fn inner_html(&self, element: &ElementRef) -> Result<String> {
        let script = Self::element_script(element, "return el.innerHTML;");
        self.eval(script)
            .await?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| BookingError::ElementNotFound {
                locator: element.to_string(),
            })
    }

    async fn url(&self) -> Result<String> {
        Ok(self.page.url().await.map_err(driver_err)?.unwrap_or_default())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let data = self.page.screenshot(params).await.map_err(driver_err)?;
        tokio::fs::write(path, &data).await?;
        debug!(target = "nordbook.driver", path = %path.display(), "screenshot saved");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.page.clone().close().await.map_err(driver_err)?;
        Ok(())
    }
}

fn driver_err(err: chromiumoxide::error::CdpError) -> BookingError {
    BookingError::Driver(err.to_string())
}
