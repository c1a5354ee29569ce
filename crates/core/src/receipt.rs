//! Confirmation-page parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::ReservationReceipt;

/// The receipt cell is one run of text with inline markup tags as the only
/// separators between fragments.
static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("markup tag pattern"));

/// Placeholder carried in [`ReservationReceipt::reference`]; the
/// confirmation page exposes no booking identifier to read.
pub(crate) const RECEIPT_REFERENCE_PLACEHOLDER: &str = "TBD";

/// Splits the raw receipt cell into its fragments, in order: kind, summary
/// ("Discipline - Location"), date, time range, duplicated time range, and
/// location. Returns `None` when the cell does not carry all of them.
pub(crate) fn parse_receipt(raw: &str) -> Option<ReservationReceipt> {
    let mut fragments = MARKUP_TAG.split(raw).filter(|fragment| !fragment.is_empty());

    let _kind = fragments.next()?;
    let summary = fragments.next()?;
    let date = fragments.next()?;
    let time = fragments.next()?;
    let _duplicate_time = fragments.next()?;
    let location = fragments.next()?;

    let discipline = summary.split(" - ").next().unwrap_or(summary).trim().to_string();

    Some(ReservationReceipt {
        reference: RECEIPT_REFERENCE_PLACEHOLDER.to_string(),
        discipline,
        date: date.to_string(),
        time: time.to_string(),
        location: location.to_string(),
    })
}
