//! Detection of password-recovery email links.
//!
//! A recovery link lands on the page with a URL fragment containing a
//! marker token. The backend client consumes and rewrites the fragment
//! shortly after load, so the decision has to be taken synchronously, once,
//! before any asynchronous processing can race it.

/// Returns true if the fragment carries the recovery marker. Pure substring
/// match; the exact token format is owned by the backend provider.
pub fn fragment_is_recovery_link(fragment: &str, marker: &str) -> bool {
    !marker.is_empty() && fragment.contains(marker)
}

/// The recovery-link decision, captured once at page load and frozen.
///
/// Later fragment mutation must not change the captured value; callers keep
/// this snapshot for the lifetime of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryLinkSnapshot {
    from_url: bool,
}

impl RecoveryLinkSnapshot {
    /// Inspect the fragment exactly once and freeze the result.
    pub fn capture(fragment: &str, marker: &str) -> Self {
        Self {
            from_url: fragment_is_recovery_link(fragment, marker),
        }
    }

    /// Whether this page load originated from a recovery email link.
    pub fn from_url(&self) -> bool {
        self.from_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "type=recovery";

    #[test]
    fn test_detects_marker_anywhere_in_fragment() {
        assert!(fragment_is_recovery_link("type=recovery", MARKER));
        assert!(fragment_is_recovery_link(
            "access_token=abc&refresh_token=def&type=recovery",
            MARKER
        ));
    }

    #[test]
    fn test_other_fragments_are_not_recovery_links() {
        assert!(!fragment_is_recovery_link("", MARKER));
        assert!(!fragment_is_recovery_link("access_token=abc", MARKER));
        assert!(!fragment_is_recovery_link("type=signup", MARKER));
    }

    #[test]
    fn test_empty_marker_never_matches() {
        assert!(!fragment_is_recovery_link("anything", ""));
    }

    #[test]
    fn test_snapshot_is_frozen_at_capture() {
        let snapshot = RecoveryLinkSnapshot::capture("type=recovery&token=abc", MARKER);
        assert!(snapshot.from_url());

        // A fresh capture of the rewritten fragment is a different decision;
        // the original snapshot keeps its value.
        let after_rewrite = RecoveryLinkSnapshot::capture("", MARKER);
        assert!(!after_rewrite.from_url());
        assert!(snapshot.from_url());
    }
}
