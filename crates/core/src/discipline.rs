//! The closed set of activity types the site takes reservations for.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{BookingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    Badminton,
    #[serde(rename = "styrketræning")]
    Styrketraening,
}

const BADMINTON_LISTING_URL: &str = "https://dgihusetnordkraft.dk/holdbeskrivelse/badminton/";

impl Discipline {
    /// Listing page carrying the discipline's posted timeslots. The mapping
    /// is fixed; a discipline without a listing page fails fast rather than
    /// guessing a URL.
    pub fn listing_url(self) -> Result<&'static str> {
        match self {
            Discipline::Badminton => Ok(BADMINTON_LISTING_URL),
            Discipline::Styrketraening => Err(BookingError::InvalidParameter(format!(
                "no timeslot listing for discipline {self}"
            ))),
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discipline::Badminton => write!(f, "badminton"),
            Discipline::Styrketraening => write!(f, "styrketræning"),
        }
    }
}

impl FromStr for Discipline {
    type Err = BookingError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "badminton" => Ok(Discipline::Badminton),
            // Accept the ASCII spelling for callers that cannot type æ.
            "styrketræning" | "styrketraening" => Ok(Discipline::Styrketraening),
            other => Err(BookingError::InvalidParameter(format!(
                "unknown discipline {other}"
            ))),
        }
    }
}
