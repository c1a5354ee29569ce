//! Site constants and driver tuning.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

/// Upstream URLs, selectors, and button labels for the booking site.
///
/// Defaults target the Nordkraft instance of halbooking.dk. Every field can
/// be overridden from a JSON file; the upstream markup occasionally moves
/// and a redeploy should not be needed to follow it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    /// Landing page carrying the login affordance.
    pub home_page_url: String,
    /// Page the site navigates to after a successful login.
    pub logged_in_page_url: String,
    /// Protected profile page; unauthenticated visitors get redirected away.
    pub profile_page_url: String,
    /// Page reached only after a reservation is genuinely confirmed.
    pub receipt_page_url: String,

    pub login_trigger_selector: String,
    pub username_selector: String,
    pub password_selector: String,
    pub submit_selector: String,
    pub profile_name_selector: String,
    pub profile_username_selector: String,

    /// Exact visible text of the add-to-basket affordance, including the
    /// leading space the site renders it with.
    pub basket_label: String,
    /// Exact visible text of the confirm-booking affordance.
    pub confirm_label: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            home_page_url: "https://clipnfitnordkraft.halbooking.dk/newlook/default.asp".into(),
            logged_in_page_url: "https://clipnfitnordkraft.halbooking.dk/newlook/proc_mineopl.asp"
                .into(),
            profile_page_url: "https://clipnfitnordkraft.halbooking.dk/newlook/proc_konto.asp"
                .into(),
            receipt_page_url: "https://clipnfitnordkraft.halbooking.dk/newlook/proc_kvittering.asp"
                .into(),
            login_trigger_selector: r##"[data-target="#loginModal"]"##.into(),
            username_selector: r#"[id$="loginname"]"#.into(),
            password_selector: r#"[id$="password"]"#.into(),
            submit_selector: r#"[id$="sub"]"#.into(),
            profile_name_selector: r#"[id$="konto_navn"]"#.into(),
            profile_username_selector: r#"[id$="konto_loginid"]"#.into(),
            basket_label: " Læg i kurv - brug 2 klip".into(),
            confirm_label: "Bekræft tilmelding".into(),
        }
    }
}

impl SiteConfig {
    /// Loads overrides from a JSON file; absent fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Launch and wait bounds for the browser driver.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub headless: bool,
    /// Explicit Chrome/Chromium executable; the binding's own discovery is
    /// used when unset.
    pub executable: Option<PathBuf>,
    pub launch_timeout: Duration,
    /// Bound on the initial navigation when a page is opened.
    pub navigation_timeout: Duration,
    /// Interval between DOM polls while waiting for an element.
    pub poll_interval: Duration,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            launch_timeout: Duration::from_secs(30),
            navigation_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(250),
        }
    }
}
