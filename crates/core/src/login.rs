//! Login state machine: home page, modal, submission, landing-URL check.

use std::time::Duration;

use tracing::info;

use crate::config::SiteConfig;
use crate::driver::{Locator, Page};
use crate::error::Result;
use crate::types::{Credentials, PASSWORD_PLACEHOLDER};

/// The login affordance ships with the static page; a short bound is enough
/// for it to attach.
const LOGIN_TRIGGER_TIMEOUT: Duration = Duration::from_secs(1);
/// The modal is client-rendered after the trigger click.
const MODAL_TIMEOUT: Duration = Duration::from_secs(30);
/// Bound on the full-page navigation the submit click triggers.
const SUBMIT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Drives the login modal to completion on an already-opened home page.
///
/// Returns whether the site accepted the credentials; rejection is a normal
/// outcome, not a fault. Faults while driving the modal
/// (`ElementNotFound`, `NavigationTimeout`) abort the flow.
pub(crate) async fn run(
    page: &dyn Page,
    site: &SiteConfig,
    credentials: &Credentials,
) -> Result<bool> {
    info!(target = "nordbook", "opening login modal");
    let trigger = page
        .wait_for(&Locator::css(site.login_trigger_selector.as_str()), LOGIN_TRIGGER_TIMEOUT)
        .await?;
    // Opens a client-side modal; no navigation follows this click.
    page.click(&trigger).await?;

    let username_field = page
        .wait_for(&Locator::css(site.username_selector.as_str()), MODAL_TIMEOUT)
        .await?;
    let password_field = page
        .wait_for(&Locator::css(site.password_selector.as_str()), MODAL_TIMEOUT)
        .await?;
    let submit = page
        .wait_for(&Locator::css(site.submit_selector.as_str()), MODAL_TIMEOUT)
        .await?;

    info!(
        target = "nordbook",
        username = %credentials.username(),
        password = PASSWORD_PLACEHOLDER,
        "entering credentials"
    );
    page.fill(&username_field, credentials.username()).await?;
    page.fill(&password_field, credentials.password()).await?;

    info!(target = "nordbook", "submitting login");
    page.click(&submit).await?;
    page.wait_for_navigation(SUBMIT_NAVIGATION_TIMEOUT).await?;

    let landed = page.url().await?;
    if landed == site.logged_in_page_url {
        info!(target = "nordbook", "login accepted");
        Ok(true)
    } else {
        info!(target = "nordbook", %landed, "login rejected");
        Ok(false)
    }
}
