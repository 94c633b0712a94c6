//! Tests for integration acceptance rules.

use std::sync::Arc;

use rstest::rstest;

use crate::library::domain::{AcceptanceRule, NameAcceptanceRule, unite_acceptance_rules};

fn rules(rules: Vec<NameAcceptanceRule>) -> Vec<Arc<dyn AcceptanceRule<str>>> {
    rules
        .into_iter()
        .map(|rule| Arc::new(rule) as Arc<dyn AcceptanceRule<str>>)
        .collect()
}

#[rstest]
fn no_rules_accept_everything() {
    let empty: Vec<Arc<dyn AcceptanceRule<str>>> = Vec::new();
    assert!(unite_acceptance_rules(&empty, "org.example.Anything"));
}

#[rstest]
#[case("org.example.Both", false)]
#[case("org.example.OnlyA", true)]
#[case("org.other.OnlyB", false)]
#[case("net.elsewhere.Neither", true)]
fn last_applicable_rule_wins(#[case] name: &str, #[case] allowed: bool) {
    let combined = rules(vec![
        NameAcceptanceRule::new(true, |candidate| candidate.starts_with("org.example.")),
        NameAcceptanceRule::new(false, |candidate| {
            candidate.ends_with("Both") || candidate.ends_with("OnlyB")
        }),
    ]);
    assert_eq!(unite_acceptance_rules(&combined, name), allowed);
}

#[rstest]
fn later_accept_overrides_earlier_reject() {
    let combined = rules(vec![
        NameAcceptanceRule::new(false, |candidate| candidate.starts_with("org.")),
        NameAcceptanceRule::new(true, |candidate| candidate == "org.example.Trusted"),
    ]);
    assert!(unite_acceptance_rules(&combined, "org.example.Trusted"));
    assert!(!unite_acceptance_rules(&combined, "org.example.Other"));
}

#[rstest]
fn rule_ignores_non_matching_names() {
    let rule = NameAcceptanceRule::new(true, |candidate| candidate.contains("Plot"));
    assert_eq!(rule.accepts("Table"), None);
    assert_eq!(rule.accepts("Plot"), Some(true));
    assert!(rule.verdict());
}
