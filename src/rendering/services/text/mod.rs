//! Text rendering engine.
//!
//! Turns any value into a plain-text string. Renderers are consulted in
//! priority order and the first one returning a string wins. Composite
//! renderers re-enter the engine through [`TextRenderSession`], which caps
//! nesting depth and breaks object cycles.

mod defaults;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ptr;
use std::sync::Arc;

pub use defaults::{
    AVOID, CLASS, FAILED_FIELD, INACCESSIBLE_FIELD, ITERABLES, MAPS, NULL, OBJECT, PRIMITIVES,
    register_default_renderers,
};

use super::registry::{Prioritized, PriorityRegistry};
use crate::rendering::config::TextRenderingConfig;
use crate::rendering::domain::{ObjectValue, Priority, TypeDescriptor, Value};

/// Renders a value to text, or declines with `None`.
pub trait TextRenderer: Send + Sync + fmt::Debug + fmt::Display {
    /// Renders `value`, re-entering `session` for nested values.
    fn render(&self, session: &TextRenderSession<'_>, value: &Value) -> Option<String>;
}

/// Signature of closure-based text renderers.
pub type TextRenderFn = dyn Fn(&TextRenderSession<'_>, &Value) -> Option<String> + Send + Sync;

/// A text renderer built from a closure and a description.
#[derive(Clone)]
pub struct TextRendererWithDescription {
    description: String,
    body: Arc<TextRenderFn>,
}

impl TextRendererWithDescription {
    /// Creates the renderer.
    #[must_use]
    pub fn new<F>(description: impl Into<String>, body: F) -> Self
    where
        F: Fn(&TextRenderSession<'_>, &Value) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            body: Arc::new(body),
        }
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for TextRendererWithDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRendererWithDescription")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TextRendererWithDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Text renderer: {}", self.description)
    }
}

impl TextRenderer for TextRendererWithDescription {
    fn render(&self, session: &TextRenderSession<'_>, value: &Value) -> Option<String> {
        (self.body)(session, value)
    }
}

/// A registered text renderer with its priority.
pub type TextRendererWithPriority = Prioritized<Arc<dyn TextRenderer>>;

/// Ordered registry of text renderers.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use kernel_results::rendering::config::TextRenderingConfig;
/// use kernel_results::rendering::domain::{TypeDescriptor, Value};
/// use kernel_results::rendering::services::TextRenderersProcessor;
///
/// let processor = TextRenderersProcessor::with_default_renderers(TextRenderingConfig::default());
/// let list_type = TypeDescriptor::new("collections.ListOf").into_shared();
/// let list = Value::list(list_type, vec![Value::from("a"), Value::from("b")]);
/// assert_eq!(processor.render(&list), "ListOf[a, b]");
/// ```
#[derive(Debug, Default)]
pub struct TextRenderersProcessor {
    registry: PriorityRegistry<Arc<dyn TextRenderer>>,
    config: TextRenderingConfig,
}

impl TextRenderersProcessor {
    /// Creates an engine with no renderers.
    #[must_use]
    pub fn new(config: TextRenderingConfig) -> Self {
        Self {
            registry: PriorityRegistry::new(),
            config,
        }
    }

    /// Creates an engine with the default renderer set.
    #[must_use]
    pub fn with_default_renderers(config: TextRenderingConfig) -> Self {
        let processor = Self::new(config);
        register_default_renderers(&processor);
        processor
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &TextRenderingConfig {
        &self.config
    }

    /// Registers `renderer`.
    pub fn register(&self, renderer: Arc<dyn TextRenderer>, priority: Priority) {
        tracing::debug!(%renderer, %priority, "registering text renderer");
        self.registry.register(renderer, priority);
    }

    /// Removes the first registration of `renderer`.
    ///
    /// Returns `false` when it was not registered.
    #[must_use = "unregistering an absent renderer is a no-op"]
    pub fn unregister(&self, renderer: &dyn TextRenderer) -> bool {
        self.registry.remove_first(|registered| {
            ptr::addr_eq(Arc::as_ptr(registered), ptr::from_ref(renderer))
        })
    }

    /// Returns the renderers in dispatch order.
    #[must_use]
    pub fn registered_renderers(&self) -> Vec<TextRendererWithPriority> {
        self.registry.snapshot().to_vec()
    }

    /// Renders `value` to text.
    ///
    /// Never fails: values no renderer accepts use their default string
    /// form, and structures nested beyond the configured depth or cycling
    /// back to an object being rendered become the truncation marker.
    #[must_use]
    pub fn render(&self, value: &Value) -> String {
        TextRenderSession::new(self.registry.snapshot(), &self.config).render(value)
    }
}

/// State of one top-level [`TextRenderersProcessor::render`] call.
pub struct TextRenderSession<'a> {
    renderers: Arc<Vec<TextRendererWithPriority>>,
    config: &'a TextRenderingConfig,
    depth: Cell<usize>,
    in_progress: RefCell<Vec<Arc<ObjectValue>>>,
    overrun_reported: Cell<bool>,
}

impl<'a> TextRenderSession<'a> {
    fn new(
        renderers: Arc<Vec<TextRendererWithPriority>>,
        config: &'a TextRenderingConfig,
    ) -> Self {
        Self {
            renderers,
            config,
            depth: Cell::new(0),
            in_progress: RefCell::new(Vec::new()),
            overrun_reported: Cell::new(false),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &TextRenderingConfig {
        self.config
    }

    /// Returns the current nesting depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Renders a nested value.
    #[must_use]
    pub fn render(&self, value: &Value) -> String {
        if self.depth.get() >= self.config.max_depth {
            if !self.overrun_reported.replace(true) {
                tracing::warn!(
                    max_depth = self.config.max_depth,
                    "text rendering exceeded the nesting limit; output truncated"
                );
            }
            return self.config.truncation_marker.clone();
        }

        let tracked = match value {
            Value::Object(object) => Some(object),
            _ => None,
        };
        if let Some(object) = tracked {
            if self.is_in_progress(object) {
                return self.config.truncation_marker.clone();
            }
            self.in_progress.borrow_mut().push(Arc::clone(object));
        }

        self.depth.set(self.depth.get().saturating_add(1));
        let rendered = self.dispatch(value);
        self.depth.set(self.depth.get().saturating_sub(1));

        if tracked.is_some() {
            self.in_progress.borrow_mut().pop();
        }
        rendered
    }

    /// Renders the title of a composite value at the current depth.
    ///
    /// Titles do not count towards the nesting limit, so a composite that
    /// is laid out always carries its own title.
    #[must_use]
    pub fn render_title(&self, ty: &Arc<TypeDescriptor>) -> String {
        self.dispatch(&Value::Class(Arc::clone(ty)))
    }

    fn dispatch(&self, value: &Value) -> String {
        self.renderers
            .iter()
            .find_map(|entry| entry.item.render(self, value))
            .unwrap_or_else(|| value.default_display())
    }

    /// Renders an ordered collection as `title[a, b]`.
    #[must_use]
    pub fn render_iterable(
        &self,
        title: &str,
        items: &[Value],
        opening: &str,
        closing: &str,
    ) -> String {
        let multiline = self.config.multiline;
        let mut output = format!("{title}{opening}");
        if multiline {
            output.push('\n');
        }
        let last = items.len().saturating_sub(1);
        for (index, item) in items.iter().enumerate() {
            let rendered = self.render(item);
            if multiline {
                output.push_str(&indent(&rendered, &self.config.indent, false));
            } else {
                output.push_str(&rendered);
            }
            if index < last {
                output.push(',');
                if !multiline {
                    output.push(' ');
                }
            }
            if multiline {
                output.push('\n');
            }
        }
        output.push_str(closing);
        output
    }

    /// Renders key/value entries as `title{k => v}`.
    ///
    /// In multiline mode the first line of each value follows its key, so
    /// only the value's later lines are indented.
    #[must_use]
    pub fn render_map(
        &self,
        title: &str,
        entries: &[(Value, Value)],
        arrow: &str,
        opening: &str,
        closing: &str,
    ) -> String {
        let multiline = self.config.multiline;
        let mut output = format!("{title}{opening}");
        if multiline {
            output.push('\n');
        }
        let last = entries.len().saturating_sub(1);
        for (index, (key, value)) in entries.iter().enumerate() {
            let rendered_key = self.render(key);
            let rendered_value = self.render(value);
            if multiline {
                output.push_str(&indent(&rendered_key, &self.config.indent, false));
                output.push_str(arrow);
                output.push_str(&indent(&rendered_value, &self.config.indent, true));
            } else {
                output.push_str(&rendered_key);
                output.push_str(arrow);
                output.push_str(&rendered_value);
            }
            if index < last {
                output.push(',');
                if !multiline {
                    output.push(' ');
                }
            }
            if multiline {
                output.push('\n');
            }
        }
        output.push_str(closing);
        output
    }

    fn is_in_progress(&self, object: &Arc<ObjectValue>) -> bool {
        self.in_progress
            .borrow()
            .iter()
            .any(|seen| Arc::ptr_eq(seen, object))
    }
}

impl fmt::Debug for TextRenderSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRenderSession")
            .field("depth", &self.depth.get())
            .field("renderers", &self.renderers.len())
            .finish_non_exhaustive()
    }
}

fn indent(text: &str, indent: &str, except_first: bool) -> String {
    text.split('\n')
        .enumerate()
        .map(|(index, line)| {
            if except_first && index == 0 {
                line.to_owned()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
