//! Data carried across the workflow boundary.

use std::fmt;

use serde::Serialize;

use crate::discipline::Discipline;

/// Rendered in place of the password anywhere credentials are logged.
pub(crate) const PASSWORD_PLACEHOLDER: &str = "***********";

/// A username/password pair supplied per call.
///
/// Never persisted. `Debug` substitutes the redaction placeholder for the
/// password, so the cleartext cannot reach log output through formatting.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &PASSWORD_PLACEHOLDER)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub profile_name: String,
    pub username: String,
}

/// Login state derived by probing the profile page; never cached, since the
/// upstream session cookie is the only source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatus {
    pub is_logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

impl LoginStatus {
    pub(crate) fn logged_out() -> Self {
        Self {
            is_logged_in: false,
            profile: None,
        }
    }
}

/// One posted timeslot scraped from a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeslotRecord {
    pub date: String,
    pub time: String,
    pub discipline: Discipline,
    pub location: String,
}

/// Parsed confirmation-page summary.
///
/// The upstream flow never exposes a real booking identifier; `reference`
/// carries the placeholder the confirmation page leaves us with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationReceipt {
    pub reference: String,
    pub discipline: String,
    pub date: String,
    pub time: String,
    pub location: String,
}

/// Outcome of a reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ReservationOutcome {
    /// The flow ended on the receipt page and the receipt parsed.
    Confirmed { receipt: ReservationReceipt },
    /// The flow completed somewhere other than the receipt page. The site
    /// gives no stronger failure signal than that: the slot may be taken,
    /// or the session may have expired mid-flow.
    NotConfirmed,
    /// The confirming click was issued but the navigation after it never
    /// settled; the order may still have been accepted server-side. Check
    /// existing reservations before retrying.
    Unknown,
}
