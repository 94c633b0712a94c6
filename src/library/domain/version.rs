//! Kernel version numbers.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::library::error::LibraryError;

/// A kernel version such as `0.12.0.322` or `0.12.0.322-dev1`.
///
/// Missing trailing components compare as zero, and a development build
/// sorts before the release with the same components.
///
/// # Examples
///
/// ```
/// use kernel_results::library::domain::KernelVersion;
///
/// let running = KernelVersion::parse("0.12.0.322").expect("valid version");
/// let required = KernelVersion::parse("0.12").expect("valid version");
/// assert!(running >= required);
/// assert!(KernelVersion::parse("0.12.0-dev3").expect("valid") < required);
/// ```
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KernelVersion {
    components: Vec<u32>,
    dev: Option<u32>,
}

/// Largest number of dotted components accepted.
const MAX_COMPONENTS: usize = 4;

impl KernelVersion {
    /// Parses a dotted version with an optional `-devN` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::InvalidKernelVersion`] when the text is empty,
    /// has more than four components, or contains non-numeric parts.
    pub fn parse(text: &str) -> Result<Self, LibraryError> {
        let invalid = || LibraryError::InvalidKernelVersion(text.to_owned());
        let trimmed = text.trim();
        let (release, dev) = match trimmed.split_once("-dev") {
            Some((numbers, build)) => {
                let number = build.parse::<u32>().map_err(|_| invalid())?;
                (numbers, Some(number))
            }
            None => (trimmed, None),
        };
        let components = release
            .split('.')
            .map(|part| part.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        if components.is_empty() || components.len() > MAX_COMPONENTS {
            return Err(invalid());
        }
        Ok(Self { components, dev })
    }

    /// Returns the numeric components.
    #[must_use]
    pub fn components(&self) -> &[u32] {
        &self.components
    }

    /// Returns the development build number, if any.
    #[must_use]
    pub const fn dev(&self) -> Option<u32> {
        self.dev
    }

    fn component(&self, index: usize) -> u32 {
        self.components.get(index).copied().unwrap_or_default()
    }
}

impl PartialEq for KernelVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for KernelVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (0..MAX_COMPONENTS)
            .map(|index| self.component(index).cmp(&other.component(index)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| match (self.dev, other.dev) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(mine), Some(theirs)) => mine.cmp(&theirs),
            })
    }
}

impl PartialOrd for KernelVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for KernelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let release: Vec<String> = self.components.iter().map(u32::to_string).collect();
        f.write_str(&release.join("."))?;
        if let Some(dev) = self.dev {
            write!(f, "-dev{dev}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for KernelVersion {
    type Error = LibraryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for KernelVersion {
    type Error = LibraryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<KernelVersion> for String {
    fn from(version: KernelVersion) -> Self {
        version.to_string()
    }
}
