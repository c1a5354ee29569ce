use thiserror::Error;

pub type Result<T> = std::result::Result<T, BookingError>;

/// Faults raised by the browser-driven workflows.
///
/// Business non-success (rejected credentials, no receipt produced, "not
/// logged in") is never an error; those are ordinary return values so that
/// callers can tell a malfunction apart from an attempt that simply did not
/// succeed.
#[derive(Debug, Error)]
pub enum BookingError {
    /// No usable browser runtime: the launch failed, timed out, or the
    /// process exited immediately.
    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    /// A bounded navigation wait elapsed. Transient; never retried
    /// internally, and any caller retry must restart the workflow from its
    /// initial state.
    #[error("navigation timed out after {ms}ms")]
    NavigationTimeout { ms: u64 },

    /// Expected markup or state missing on the upstream page. A hard fault:
    /// a blind retry could repeat a side effect such as a confirming click.
    #[error("element not found: {locator}")]
    ElementNotFound { locator: String },

    /// The operation requires an authenticated upstream session.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Caller-supplied input outside the supported set.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Browser protocol failure below the page abstraction.
    #[error("driver error: {0}")]
    Driver(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BookingError {
    /// True for faults a caller may retry by restarting the whole workflow.
    pub fn is_transient(&self) -> bool {
        matches!(self, BookingError::NavigationTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_timeout_is_transient() {
        assert!(BookingError::NavigationTimeout { ms: 10_000 }.is_transient());
        assert!(
            !BookingError::ElementNotFound {
                locator: "text=Bekræft tilmelding".into()
            }
            .is_transient()
        );
    }

    #[test]
    fn messages_name_the_failure() {
        let err = BookingError::NavigationTimeout { ms: 10_000 };
        assert_eq!(err.to_string(), "navigation timed out after 10000ms");

        let err = BookingError::InvalidParameter("unknown discipline tennis".into());
        assert_eq!(err.to_string(), "invalid parameter: unknown discipline tennis");
    }
}
