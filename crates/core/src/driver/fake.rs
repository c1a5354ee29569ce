//! Scripted in-memory driver for exercising workflows without a browser.
//!
//! Each [`FakePage`] is a script for one page handle: per-call outcomes are
//! popped in order, and an empty queue means success. The
//! [`FakeController`] returned by the builder counts handle opens and
//! closes and records every interaction, so tests can assert the resource
//! ledger and what actually reached the page.
//!
//! # Example
//!
//! ```ignore
//! let (driver, controller) = FakeDriver::builder()
//!     .page(FakePage::at("https://site/profile"))
//!     .build();
//! let service = BookingService::new(Arc::new(driver), SiteConfig::default());
//! assert!(service.check_logged_in().await?);
//! assert_eq!(controller.opened(), controller.closed());
//! ```

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Driver, ElementRef, Locator, Page};
use crate::error::{BookingError, Result};

/// A recorded call against a fake page, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    WaitFor(String),
    Click(String),
    Fill { element: String, value: String },
    AwaitNavigation,
    ReadValue(String),
    InnerHtml(String),
    Screenshot(String),
}

/// Script for one page handle.
pub struct FakePage {
    url: String,
    waits: VecDeque<Result<()>>,
    navigations: VecDeque<Result<()>>,
    values: VecDeque<Option<String>>,
    html: VecDeque<String>,
}

impl FakePage {
    /// A page whose landing URL is `url` and on which every call succeeds.
    pub fn at(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            waits: VecDeque::new(),
            navigations: VecDeque::new(),
            values: VecDeque::new(),
            html: VecDeque::new(),
        }
    }

    /// Outcome for the next unscripted `wait_for`; `Ok` mints a fresh ref.
    pub fn wait_outcome(mut self, outcome: Result<()>) -> Self {
        self.waits.push_back(outcome);
        self
    }

    /// Outcome for the next unscripted `wait_for_navigation`.
    pub fn navigation_outcome(mut self, outcome: Result<()>) -> Self {
        self.navigations.push_back(outcome);
        self
    }

    /// Value for the next unscripted `read_value`.
    pub fn value(mut self, value: Option<&str>) -> Self {
        self.values.push_back(value.map(str::to_string));
        self
    }

    /// Markup for the next unscripted `inner_html`.
    pub fn cell_html(mut self, raw: &str) -> Self {
        self.html.push_back(raw.to_string());
        self
    }
}

enum ScriptedOpen {
    Page(FakePage),
    Failure(BookingError),
}

pub struct FakeDriverBuilder {
    script: VecDeque<ScriptedOpen>,
}

impl FakeDriverBuilder {
    /// Scripts the next successful `open`.
    pub fn page(mut self, page: FakePage) -> Self {
        self.script.push_back(ScriptedOpen::Page(page));
        self
    }

    /// Scripts the next `open` to fail without handing out a handle.
    pub fn open_failure(mut self, error: BookingError) -> Self {
        self.script.push_back(ScriptedOpen::Failure(error));
        self
    }

    pub fn build(self) -> (FakeDriver, FakeController) {
        let stats = Arc::new(FakeStats::default());
        let interactions = Arc::new(Mutex::new(Vec::new()));

        let driver = FakeDriver {
            script: Mutex::new(self.script),
            stats: Arc::clone(&stats),
            interactions: Arc::clone(&interactions),
        };
        let controller = FakeController { stats, interactions };

        (driver, controller)
    }
}

/// Counters and the interaction log, shared with the test.
pub struct FakeController {
    stats: Arc<FakeStats>,
    interactions: Arc<Mutex<Vec<Interaction>>>,
}

impl FakeController {
    /// Page handles handed out so far.
    pub fn opened(&self) -> usize {
        self.stats.opened.load(Ordering::SeqCst)
    }

    /// Page handles released so far.
    pub fn closed(&self) -> usize {
        self.stats.closed.load(Ordering::SeqCst)
    }

    /// Snapshot of every recorded interaction, across all pages.
    pub async fn interactions(&self) -> Vec<Interaction> {
        self.interactions.lock().await.clone()
    }
}

#[derive(Default)]
struct FakeStats {
    opened: AtomicUsize,
    closed: AtomicUsize,
}

pub struct FakeDriver {
    script: Mutex<VecDeque<ScriptedOpen>>,
    stats: Arc<FakeStats>,
    interactions: Arc<Mutex<Vec<Interaction>>>,
}

impl FakeDriver {
    pub fn builder() -> FakeDriverBuilder {
        FakeDriverBuilder {
            script: VecDeque::new(),
        }
    }
}

#[async_trait]
impl Driver for FakeDriver {
    async fn open(&self, url: &str) -> Result<Box<dyn Page>> {
        match self.script.lock().await.pop_front() {
            Some(ScriptedOpen::Page(page)) => {
                self.stats.opened.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(FakePageHandle {
                    state: Mutex::new(page),
                    stats: Arc::clone(&self.stats),
                    interactions: Arc::clone(&self.interactions),
                    next_ref: AtomicUsize::new(0),
                    closed: AtomicBool::new(false),
                }))
            }
            Some(ScriptedOpen::Failure(error)) => Err(error),
            None => Err(BookingError::Driver(format!("no page scripted for open of {url}"))),
        }
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

struct FakePageHandle {
    state: Mutex<FakePage>,
    stats: Arc<FakeStats>,
    interactions: Arc<Mutex<Vec<Interaction>>>,
    next_ref: AtomicUsize,
    closed: AtomicBool,
}

impl FakePageHandle {
    async fn record(&self, interaction: Interaction) {
        self.interactions.lock().await.push(interaction);
    }
}

#[async_trait]
impl Page for FakePageHandle {
    async fn wait_for(&self, locator: &Locator, _timeout: Duration) -> Result<ElementRef> {
        self.record(Interaction::WaitFor(locator.to_string())).await;
        match self.state.lock().await.waits.pop_front() {
            Some(Err(error)) => Err(error),
            Some(Ok(())) | None => {
                let token = format!("e{}", self.next_ref.fetch_add(1, Ordering::SeqCst));
                Ok(ElementRef(token))
            }
        }
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        self.record(Interaction::Click(element.0.clone())).await;
        Ok(())
    }

    async fn wait_for_navigation(&self, _timeout: Duration) -> Result<()> {
        self.record(Interaction::AwaitNavigation).await;
        match self.state.lock().await.navigations.pop_front() {
            Some(outcome) => outcome,
            None => Ok(()),
        }
    }

    async fn fill(&self, element: &ElementRef, value: &str) -> Result<()> {
        self.record(Interaction::Fill {
            element: element.0.clone(),
            value: value.to_string(),
        })
        .await;
        Ok(())
    }

    async fn read_value(&self, element: &ElementRef) -> Result<Option<String>> {
        self.record(Interaction::ReadValue(element.0.clone())).await;
        Ok(self.state.lock().await.values.pop_front().flatten())
    }

    async fn inner_html(&self, element: &ElementRef) -> Result<String> {
        self.record(Interaction::InnerHtml(element.0.clone())).await;
        Ok(self.state.lock().await.html.pop_front().unwrap_or_default())
    }

    async fn url(&self) -> Result<String> {
        Ok(self.state.lock().await.url.clone())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.record(Interaction::Screenshot(path.display().to_string())).await;
        tokio::fs::write(path, b"fake screenshot").await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(BookingError::Driver("page handle closed twice".into()));
        }
        self.stats.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
