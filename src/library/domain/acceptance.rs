//! Acceptance rules for transitively discovered integrations.

use std::fmt;
use std::sync::Arc;

/// A rule that may accept, reject, or ignore an object.
pub trait AcceptanceRule<T: ?Sized>: Send + Sync {
    /// Returns `Some(verdict)` when the rule applies to `object`.
    fn accepts(&self, object: &T) -> Option<bool>;
}

/// Signature of type-name predicates.
pub type NamePredicate = dyn Fn(&str) -> bool + Send + Sync;

/// Accepts or rejects type names matching a predicate.
///
/// # Examples
///
/// ```
/// use kernel_results::library::domain::{AcceptanceRule, NameAcceptanceRule};
///
/// let rule = NameAcceptanceRule::new(false, |name| name.starts_with("org.legacy."));
/// assert_eq!(rule.accepts("org.legacy.Plot"), Some(false));
/// assert_eq!(rule.accepts("org.modern.Plot"), None);
/// ```
#[derive(Clone)]
pub struct NameAcceptanceRule {
    accept: bool,
    predicate: Arc<NamePredicate>,
}

impl NameAcceptanceRule {
    /// Creates a rule returning `accept` for names matching `predicate`.
    #[must_use]
    pub fn new<F>(accept: bool, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            accept,
            predicate: Arc::new(predicate),
        }
    }

    /// Returns the verdict given to matching names.
    #[must_use]
    pub const fn verdict(&self) -> bool {
        self.accept
    }
}

impl fmt::Debug for NameAcceptanceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameAcceptanceRule")
            .field("accept", &self.accept)
            .finish_non_exhaustive()
    }
}

impl AcceptanceRule<str> for NameAcceptanceRule {
    fn accepts(&self, object: &str) -> Option<bool> {
        (self.predicate)(object).then_some(self.accept)
    }
}

/// Combines rules: the last rule that applies decides; none applying accepts.
#[must_use]
pub fn unite_acceptance_rules<T, R>(rules: &[R], object: &T) -> bool
where
    T: ?Sized,
    R: AsRef<dyn AcceptanceRule<T>>,
{
    rules
        .iter()
        .rev()
        .find_map(|rule| rule.as_ref().accepts(object))
        .unwrap_or(true)
}
