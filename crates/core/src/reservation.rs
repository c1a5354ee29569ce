//! Reservation state machine: basket gate, confirmation gate, receipt.

use std::time::Duration;

use tracing::info;

use crate::config::SiteConfig;
use crate::driver::{Locator, Page};
use crate::error::{BookingError, Result};
use crate::receipt;
use crate::types::ReservationOutcome;

const AFFORDANCE_TIMEOUT: Duration = Duration::from_secs(30);
const GATE_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
const RECEIPT_CELL_TIMEOUT: Duration = Duration::from_secs(30);

/// Walks an already-opened listing page through both confirmation gates.
///
/// The flow is strictly linear with no internal retry: each text-matched
/// affordance is assumed unique, and a changed label fails fast with
/// `ElementNotFound` instead of degrading silently. A navigation timeout
/// after the confirming click yields [`ReservationOutcome::Unknown`]: the
/// order may have been accepted server-side, and the caller must re-check
/// existing reservations before retrying.
pub(crate) async fn run(page: &dyn Page, site: &SiteConfig) -> Result<ReservationOutcome> {
    let basket = page
        .wait_for(&Locator::text(site.basket_label.as_str()), AFFORDANCE_TIMEOUT)
        .await?;
    info!(target = "nordbook", "placing timeslot in basket");
    page.click(&basket).await?;
    page.wait_for_navigation(GATE_NAVIGATION_TIMEOUT).await?;

    let confirm = page
        .wait_for(&Locator::text(site.confirm_label.as_str()), AFFORDANCE_TIMEOUT)
        .await?;
    info!(target = "nordbook", "confirming order");
    page.click(&confirm).await?;
    match page.wait_for_navigation(GATE_NAVIGATION_TIMEOUT).await {
        Ok(()) => {}
        Err(BookingError::NavigationTimeout { .. }) => {
            info!(target = "nordbook", "no navigation after the confirming click; outcome unknown");
            return Ok(ReservationOutcome::Unknown);
        }
        Err(err) => return Err(err),
    }

    let cell = page.wait_for(&Locator::css("td"), RECEIPT_CELL_TIMEOUT).await?;
    let raw = page.inner_html(&cell).await?;

    // Only the receipt page itself counts as confirmation; the site gives
    // no stronger signal when a slot was taken or the session expired.
    let landed = page.url().await?;
    if landed != site.receipt_page_url {
        info!(target = "nordbook", %landed, "did not land on the receipt page");
        return Ok(ReservationOutcome::NotConfirmed);
    }

    match receipt::parse_receipt(&raw) {
        Some(parsed) => {
            info!(target = "nordbook", discipline = %parsed.discipline, date = %parsed.date, "reservation confirmed");
            Ok(ReservationOutcome::Confirmed { receipt: parsed })
        }
        None => Ok(ReservationOutcome::NotConfirmed),
    }
}
