//! Registration priorities shared by all renderer registries.

use std::fmt;

/// Precedence of a registered handler; higher values are consulted first.
///
/// # Examples
///
/// ```
/// use kernel_results::rendering::domain::Priority;
///
/// assert!(Priority::HIGH > Priority::DEFAULT);
/// assert!(Priority::LOW > Priority::LOWER);
/// assert_eq!(Priority::default(), Priority::DEFAULT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Priority(i32);

impl Priority {
    /// Escape-hatch handlers that must win over everything else.
    pub const HIGH: Self = Self(100);
    /// Ordinary handlers.
    pub const DEFAULT: Self = Self(0);
    /// Broad fallbacks such as generic collections.
    pub const LOW: Self = Self(-100);
    /// Last-resort handlers such as reflective object dumps.
    pub const LOWER: Self = Self(-1000);

    /// Creates a priority from a raw value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
