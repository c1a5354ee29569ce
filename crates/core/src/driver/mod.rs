//! Narrow seam over a headless-browser binding.
//!
//! Workflows speak only [`Driver`] and [`Page`], so the concrete binding can
//! be swapped: [`cdp::CdpDriver`] in production, [`fake::FakeDriver`] in
//! tests. A click never awaits the navigation it may trigger; the upstream
//! site is not a single-page application, so callers that expect a full
//! document navigation after a click must issue
//! [`Page::wait_for_navigation`] as an explicit second step.

pub mod cdp;
pub mod fake;

use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// How to find an element on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector.
    Css(String),
    /// Exact visible-text equality, scanned over the whole document tree.
    /// The site renders its buttons with no stable markup, but the labels
    /// themselves are stable.
    Text(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn text(label: impl Into<String>) -> Self {
        Locator::Text(label.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css={selector}"),
            Locator::Text(label) => write!(f, "text={label}"),
        }
    }
}

/// Token for an element previously matched by [`Page::wait_for`]. Only
/// meaningful on the page that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef(pub(crate) String);

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ref={}", self.0)
    }
}

/// One shared browser process handing out independent page handles.
///
/// The process is launched lazily on first use and torn down once at process
/// shutdown. Launching is single-flight: concurrent first callers never
/// start a second process. Pages are independent; a wait issued on one page
/// does not block operations on another.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Opens a new page and navigates it to `url`, blocking until the load
    /// settles or the navigation bound elapses. A page whose initial
    /// navigation fails is closed internally before the error is returned,
    /// so callers only ever release handles they were actually given.
    async fn open(&self, url: &str) -> Result<Box<dyn Page>>;

    /// Tears the browser process down.
    async fn shutdown(&self) -> Result<()>;
}

/// One page handle for the duration of one logical operation.
#[async_trait]
pub trait Page: Send + Sync {
    /// Blocks until the locator matches an element or `timeout` elapses,
    /// failing with [`crate::BookingError::ElementNotFound`].
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<ElementRef>;

    /// Dispatches a DOM click. Does not await any navigation the click
    /// triggers; pair with [`Page::wait_for_navigation`] when one is
    /// expected.
    async fn click(&self, element: &ElementRef) -> Result<()>;

    /// Awaits the next full document navigation, failing with
    /// [`crate::BookingError::NavigationTimeout`] when the bound elapses.
    async fn wait_for_navigation(&self, timeout: Duration) -> Result<()>;

    /// Writes a form-field value directly, without simulated keystrokes.
    async fn fill(&self, element: &ElementRef, value: &str) -> Result<()>;

    /// Form-field value when the element has one, text content otherwise;
    /// `None` when the element is gone.
    async fn read_value(&self, element: &ElementRef) -> Result<Option<String>>;

    /// Raw inner markup of the element.
    async fn inner_html(&self, element: &ElementRef) -> Result<String>;

    /// URL the page currently rests on.
    async fn url(&self) -> Result<String>;

    /// Captures the viewport to `path`.
    async fn screenshot(&self, path: &Path) -> Result<()>;

    /// Releases the page. Called exactly once per handle, on every exit
    /// path of the owning operation.
    async fn close(&self) -> Result<()>;
}
