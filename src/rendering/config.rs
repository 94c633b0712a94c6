//! Rendering configuration.
//!
//! Both structs deserialise from JSON with every field optional, so an
//! embedding kernel can override a single knob.

use serde::{Deserialize, Serialize};

/// Default cap on nested composite rendering.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default per-level indentation in multiline mode.
pub const DEFAULT_INDENT: &str = "    ";

/// Default placeholder for truncated or cyclic structures.
pub const DEFAULT_TRUNCATION_MARKER: &str = "...";

/// Default template wrapping a specialised renderer method.
pub const DEFAULT_METHOD_TEMPLATE: &str =
    "fun {{ method_name }}({{ param_name }}: {{ type_name }}): Any? = {{ body }}";

/// Default prefix of generated renderer method names.
pub const DEFAULT_METHOD_PREFIX: &str = "___renderResult";

/// Settings for the text rendering engine.
///
/// # Examples
///
/// ```
/// use kernel_results::rendering::config::TextRenderingConfig;
///
/// let config = TextRenderingConfig::from_json(r#"{"multiline": true}"#)
///     .expect("valid config");
/// assert!(config.multiline);
/// assert_eq!(config.max_depth, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRenderingConfig {
    /// Maximum nesting depth before the truncation marker is emitted.
    pub max_depth: usize,
    /// Lay out composites one element per line.
    pub multiline: bool,
    /// Indentation added per nesting level in multiline mode.
    pub indent: String,
    /// Type-name prefixes rendered only through their default string form.
    pub avoided_type_prefixes: Vec<String>,
    /// Placeholder emitted in place of truncated or cyclic structures.
    pub truncation_marker: String,
}

impl Default for TextRenderingConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            multiline: false,
            indent: DEFAULT_INDENT.to_owned(),
            avoided_type_prefixes: Vec::new(),
            truncation_marker: DEFAULT_TRUNCATION_MARKER.to_owned(),
        }
    }
}

impl TextRenderingConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the text is not a valid
    /// configuration object.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Switches multiline layout on or off.
    #[must_use]
    pub const fn with_multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    /// Sets the nesting cap.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Adds a type-name prefix to the avoid list.
    #[must_use]
    pub fn with_avoided_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.avoided_type_prefixes.push(prefix.into());
        self
    }
}

/// Settings for specialised renderer methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecompileConfig {
    /// `minijinja` template with `method_name`, `param_name`, `type_name`
    /// and `body` in scope.
    pub method_template: String,
    /// Prefix of generated method names.
    pub method_prefix: String,
}

impl Default for PrecompileConfig {
    fn default() -> Self {
        Self {
            method_template: DEFAULT_METHOD_TEMPLATE.to_owned(),
            method_prefix: DEFAULT_METHOD_PREFIX.to_owned(),
        }
    }
}
