//! RPZ trigger-rule rendering.

use rpz_core::PolicyAction;

/// Stateless per-line transform from a trigger domain to a zone rule line.
///
/// One instance exists per (destination, policy) output lane; different
/// lanes may render the same domain differently.
#[derive(Debug, Clone, Copy)]
pub struct RpzFormatter {
    action: PolicyAction,
}

impl RpzFormatter {
    /// Bind a formatter to a policy action.
    #[must_use]
    pub const fn new(action: PolicyAction) -> Self {
        Self { action }
    }

    /// Render one trigger rule.
    #[must_use]
    pub fn format_entry(&self, domain: &str) -> String {
        format!("{domain} {}", self.action.rule_suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_each_policy_form() {
        assert_eq!(
            RpzFormatter::new(PolicyAction::Nxdomain).format_entry("ads.example.com"),
            "ads.example.com CNAME ."
        );
        assert_eq!(
            RpzFormatter::new(PolicyAction::Nodata).format_entry("ads.example.com"),
            "ads.example.com CNAME *."
        );
        assert_eq!(
            RpzFormatter::new(PolicyAction::NullRoute).format_entry("ads.example.com"),
            "ads.example.com A 0.0.0.0"
        );
    }

    #[test]
    fn renders_wildcard_triggers_unchanged() {
        assert_eq!(
            RpzFormatter::new(PolicyAction::Nxdomain).format_entry("*.ads.example.com"),
            "*.ads.example.com CNAME ."
        );
    }
}
