//! Compiler diagnostics reported by `list_errors_reply`.
//!
//! Diagnostics only travel from the kernel to the client, so the wire codec
//! is encode-only: deserialising one reports "not implemented" instead of
//! fabricating a value.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Severity of a diagnostic, serialised by its upper-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Unrecoverable error.
    Fatal,
    /// Compilation error.
    Error,
    /// Compilation warning.
    Warning,
    /// Informational message.
    Info,
    /// Debug-level message.
    Debug,
}

impl Severity {
    /// Returns the wire name of the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fatal => "FATAL",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A one-based line/column position in a code fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourcePosition {
    /// Line number.
    pub line: u32,
    /// Column number.
    pub col: u32,
}

impl SourcePosition {
    /// Creates a position.
    #[must_use]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Start and optional end of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// First character covered by the diagnostic.
    pub start: SourcePosition,
    /// Last character covered, when known.
    pub end: Option<SourcePosition>,
}

/// A single compiler diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDiagnostic {
    /// Human-readable message.
    pub message: String,
    /// Severity of the diagnostic.
    pub severity: Severity,
    /// Location in the fragment, when known.
    pub location: Option<SourceLocation>,
}

impl ScriptDiagnostic {
    /// Creates a diagnostic without a location.
    #[must_use]
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            location: None,
        }
    }

    /// Attaches a start position and optional end position.
    #[must_use]
    pub const fn at(mut self, start: SourcePosition, end: Option<SourcePosition>) -> Self {
        self.location = Some(SourceLocation { start, end });
        self
    }
}

impl Serialize for ScriptDiagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("message", &self.message)?;
        map.serialize_entry("severity", self.severity.as_str())?;
        if let Some(location) = &self.location {
            map.serialize_entry("start", &location.start)?;
            if let Some(end) = &location.end {
                map.serialize_entry("end", end)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScriptDiagnostic {
    fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
        Err(serde::de::Error::custom(
            "decoding is not implemented for script diagnostics",
        ))
    }
}
