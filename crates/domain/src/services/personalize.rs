//! Message template personalization.
//!
//! Campaign templates carry `{{name}}` and `{{email}}` placeholders. The
//! substituted text is computed once per customer at fan-out time and frozen
//! on the delivery record.

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};

lazy_static! {
    static ref NAME_RE: Regex = Regex::new(r"(?i)\{\{name\}\}").expect("valid placeholder regex");
    static ref EMAIL_RE: Regex = Regex::new(r"(?i)\{\{email\}\}").expect("valid placeholder regex");
}

/// Substitute `{{name}}` and `{{email}}` (case-insensitive) with the
/// customer's values. Missing values substitute as the empty string.
pub fn personalize_message(template: &str, name: &str, email: &str) -> String {
    let with_name = NAME_RE.replace_all(template, NoExpand(name));
    EMAIL_RE.replace_all(&with_name, NoExpand(email)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_both_placeholders() {
        let out = personalize_message(
            "Hi {{name}}, we sent a voucher to {{email}}!",
            "Alice",
            "alice@example.com",
        );
        assert_eq!(out, "Hi Alice, we sent a voucher to alice@example.com!");
    }

    #[test]
    fn test_placeholder_match_is_case_insensitive() {
        let out = personalize_message("Hi {{Name}} ({{EMAIL}})", "Bob", "bob@example.com");
        assert_eq!(out, "Hi Bob (bob@example.com)");
    }

    #[test]
    fn test_repeated_placeholders() {
        let out = personalize_message("{{name}} {{name}}", "Cara", "cara@example.com");
        assert_eq!(out, "Cara Cara");
    }

    #[test]
    fn test_missing_values_become_empty() {
        let out = personalize_message("Hi {{name}}!", "", "");
        assert_eq!(out, "Hi !");
    }

    #[test]
    fn test_no_literal_placeholders_remain() {
        let out = personalize_message("{{name}} / {{email}}", "D", "d@example.com");
        assert!(!out.contains("{{name}}"));
        assert!(!out.contains("{{email}}"));
    }

    #[test]
    fn test_dollar_signs_in_values_are_literal() {
        let out = personalize_message("Hi {{name}}", "$1 $name", "x@example.com");
        assert_eq!(out, "Hi $1 $name");
    }

    #[test]
    fn test_template_without_placeholders_is_unchanged() {
        let out = personalize_message("Flat 20% off today", "E", "e@example.com");
        assert_eq!(out, "Flat 20% off today");
    }
}
