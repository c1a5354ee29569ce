//! Operation facade: one page handle per operation, opened and released
//! here so every workflow exit path balances the handle ledger.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::SiteConfig;
use crate::discipline::Discipline;
use crate::driver::{Driver, Page};
use crate::error::{BookingError, Result};
use crate::types::{Credentials, LoginStatus, ReservationOutcome, TimeslotRecord};
use crate::{login, probe, reservation};

pub struct BookingService {
    driver: Arc<dyn Driver>,
    site: SiteConfig,
}

impl BookingService {
    pub fn new(driver: Arc<dyn Driver>, site: SiteConfig) -> Self {
        Self { driver, site }
    }

    /// Probes the upstream session by visiting the protected profile page.
    /// Derived fresh on every call; nothing is cached.
    pub async fn check_logged_in(&self) -> Result<bool> {
        let page = self.driver.open(&self.site.profile_page_url).await?;
        let result = probe::is_logged_in(page.as_ref(), &self.site).await;
        self.release(page).await;
        result
    }

    /// Login state plus profile details. "Not logged in" is a normal
    /// result, not an error.
    pub async fn login_status(&self) -> Result<LoginStatus> {
        if !self.check_logged_in().await? {
            return Ok(LoginStatus::logged_out());
        }

        let page = self.driver.open(&self.site.profile_page_url).await?;
        let result = probe::read_profile(page.as_ref(), &self.site).await;
        self.release(page).await;

        Ok(LoginStatus {
            is_logged_in: true,
            profile: Some(result?),
        })
    }

    /// Drives the login modal with the given credentials. Returns whether
    /// the site accepted them; rejection is a normal outcome.
    pub async fn login(&self, credentials: &Credentials) -> Result<bool> {
        let page = self.driver.open(&self.site.home_page_url).await?;
        let result = login::run(page.as_ref(), &self.site, credentials).await;
        self.release(page).await;
        result
    }

    /// Currently posted timeslots for a discipline.
    pub async fn list_timeslots(&self, discipline: Discipline) -> Result<Vec<TimeslotRecord>> {
        if !self.check_logged_in().await? {
            return Err(BookingError::Precondition(
                "You must be logged in to view timeslots.".into(),
            ));
        }

        let listing_url = discipline.listing_url()?;
        info!(target = "nordbook", %discipline, url = listing_url, "visiting timeslot listing");

        let page = self.driver.open(listing_url).await?;
        // TODO: extract slot rows once the listing markup exposes a stable
        // structure; today the visit only confirms the listing resolves.
        self.release(page).await;

        Ok(Vec::new())
    }

    /// Attempts to reserve the timeslot behind a listing URL. The URL is
    /// caller-supplied and trusted as-is.
    pub async fn make_reservation(&self, listing_url: &str) -> Result<ReservationOutcome> {
        if !self.check_logged_in().await? {
            return Err(BookingError::Precondition(
                "You must be logged in to make a reservation.".into(),
            ));
        }

        let page = self.driver.open(listing_url).await?;
        let result = reservation::run(page.as_ref(), &self.site).await;
        self.release(page).await;
        result
    }

    /// Captures a page on the site to an image file.
    pub async fn screenshot(&self, url: &str, path: &Path) -> Result<()> {
        info!(target = "nordbook", %url, path = %path.display(), "capturing screenshot");
        let page = self.driver.open(url).await?;
        let result = page.screenshot(path).await;
        self.release(page).await;
        result
    }

    /// Releases the shared browser process. Call once at process shutdown.
    pub async fn shutdown(&self) -> Result<()> {
        self.driver.shutdown().await
    }

    async fn release(&self, page: Box<dyn Page>) {
        if let Err(err) = page.close().await {
            warn!(target = "nordbook", error = %err, "failed to release page handle");
        }
    }
}
