//! Keyword classification of event kinds.
//!
//! Rules are checked in order against the lowercased kind; the first rule with a matching
//! keyword wins. A kind containing "pending" has no rule of its own and falls through to
//! [`Category::Info`] unless an earlier keyword matches.

use notify_types::Category;

const RULES: &[(&[&str], Category)] = &[
    (&["approved", "success", "verified"], Category::Success),
    (&["rejected", "error", "failed"], Category::Error),
    (&["warning"], Category::Warning),
];

/// Classify an event kind into a category.
pub fn classify(kind: &str) -> Category {
    let lower = kind.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Info)
}

/// Human-formatted title for an event kind.
///
/// Underscores become spaces and the first character of every word is upper-cased; the rest of
/// each word is left as sent (`new_report_filed` becomes `New Report Filed`).
pub fn title_for(kind: &str) -> String {
    let mut title = String::with_capacity(kind.len());
    let mut at_word_start = true;
    for ch in kind.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if at_word_start && ch.is_alphanumeric() {
            title.extend(ch.to_uppercase());
        } else {
            title.push(ch);
        }
        at_word_start = !ch.is_alphanumeric();
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_examples() {
        assert_eq!(classify("verification_approved"), Category::Success);
        assert_eq!(classify("report_rejected"), Category::Error);
        assert_eq!(classify("new_verification_request"), Category::Info);
        assert_eq!(classify("system_warning_maintenance"), Category::Warning);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("ACCOUNT_VERIFIED"), Category::Success);
        assert_eq!(classify("Upload_Failed"), Category::Error);
        assert_eq!(classify("SYSTEM_WARNING"), Category::Warning);
    }

    #[test]
    fn test_rule_precedence() {
        // success keywords are checked before error keywords
        assert_eq!(classify("approved_then_rejected"), Category::Success);
        assert_eq!(classify("payment_error_warning"), Category::Error);
        assert_eq!(classify("pending_warning"), Category::Warning);
    }

    #[test]
    fn test_pending_alone_is_info() {
        assert_eq!(classify("verification_pending"), Category::Info);
        assert_eq!(classify("new_report_filed"), Category::Info);
        assert_eq!(classify(""), Category::Info);
    }

    #[test]
    fn test_title_formatting() {
        assert_eq!(title_for("new_report_filed"), "New Report Filed");
        assert_eq!(title_for("verification_approved"), "Verification Approved");
        assert_eq!(title_for("already Spaced"), "Already Spaced");
        assert_eq!(title_for("mixedCase_kind"), "MixedCase Kind");
        assert_eq!(title_for("v2_rollout"), "V2 Rollout");
        assert_eq!(title_for("__x"), "  X");
    }
}
