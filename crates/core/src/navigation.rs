//! Click-through navigation for alerts and panel rows.

use crate::constants::{REPORTS_ROUTE, VERIFICATION_ROUTE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dashboard view a notification can lead to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationTarget {
    VerificationReview,
    Reports,
}

impl NavigationTarget {
    /// Resolve the target for an event kind. Only the exact kinds below navigate.
    pub fn for_kind(kind: &str) -> Option<Self> {
        match kind {
            "new_verification_request" | "verification_approved" | "verification_rejected" => {
                Some(NavigationTarget::VerificationReview)
            }
            "new_report_filed" | "report_approved" | "report_rejected" => {
                Some(NavigationTarget::Reports)
            }
            _ => None,
        }
    }

    /// Route path of the view.
    pub fn path(&self) -> &'static str {
        match self {
            NavigationTarget::VerificationReview => VERIFICATION_ROUTE,
            NavigationTarget::Reports => REPORTS_ROUTE,
        }
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_family() {
        for kind in [
            "new_verification_request",
            "verification_approved",
            "verification_rejected",
        ] {
            assert_eq!(
                NavigationTarget::for_kind(kind),
                Some(NavigationTarget::VerificationReview)
            );
        }
    }

    #[test]
    fn test_report_family() {
        for kind in ["new_report_filed", "report_approved", "report_rejected"] {
            let target = NavigationTarget::for_kind(kind).unwrap();
            assert_eq!(target, NavigationTarget::Reports);
            assert_eq!(target.path(), "/reports");
        }
    }

    #[test]
    fn test_unmapped_kinds() {
        assert_eq!(NavigationTarget::for_kind("unregistered_kind"), None);
        assert_eq!(NavigationTarget::for_kind("NEW_REPORT_FILED"), None);
        assert_eq!(NavigationTarget::for_kind("system_warning_maintenance"), None);
    }
}
