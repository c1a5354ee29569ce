//! Side-effect-free login probing and profile reads.

use std::time::Duration;

use tracing::debug;

use crate::config::SiteConfig;
use crate::driver::{Locator, Page};
use crate::error::{BookingError, Result};
use crate::types::Profile;

/// Sentinel reported when a profile field is unexpectedly absent.
const MISSING_FIELD: &str = "N/A";

const PROFILE_FIELD_TIMEOUT: Duration = Duration::from_secs(10);

/// Compares the landing URL against the requested profile URL. The site
/// redirects unauthenticated visitors elsewhere, so any difference means
/// logged out; the session cookie itself is never inspected.
pub(crate) async fn is_logged_in(page: &dyn Page, site: &SiteConfig) -> Result<bool> {
    let landed = page.url().await?;
    let logged_in = landed == site.profile_page_url;
    debug!(target = "nordbook", %landed, logged_in, "probed login state");
    Ok(logged_in)
}

/// Reads the two labeled profile fields from an opened profile page. An
/// absent field degrades to the sentinel instead of failing the call.
pub(crate) async fn read_profile(page: &dyn Page, site: &SiteConfig) -> Result<Profile> {
    let profile_name = field_value(page, &site.profile_name_selector).await?;
    let username = field_value(page, &site.profile_username_selector).await?;

    Ok(Profile {
        profile_name,
        username,
    })
}

async fn field_value(page: &dyn Page, selector: &str) -> Result<String> {
    match page.wait_for(&Locator::css(selector), PROFILE_FIELD_TIMEOUT).await {
        Ok(field) => Ok(page
            .read_value(&field)
            .await?
            .unwrap_or_else(|| MISSING_FIELD.to_string())),
        Err(BookingError::ElementNotFound { .. }) => Ok(MISSING_FIELD.to_string()),
        Err(err) => Err(err),
    }
}
