//! The default text renderer set.

use std::sync::{Arc, LazyLock};

use super::{TextRenderer, TextRendererWithDescription, TextRenderersProcessor};
use crate::rendering::domain::{FieldOrigin, FieldSlot, Priority, Value};

/// Shown for a field whose access was denied.
pub const INACCESSIBLE_FIELD: &str = "[inaccessible field]";

/// Shown for a field whose read raised an error.
pub const FAILED_FIELD: &str = "[exception thrown]";

/// Renders null.
pub static NULL: LazyLock<Arc<dyn TextRenderer>> = LazyLock::new(|| {
    Arc::new(TextRendererWithDescription::new("renders null", |_, value| {
        value.is_null().then(|| "null".to_owned())
    }))
});

/// Renders strings, booleans and numbers.
pub static PRIMITIVES: LazyLock<Arc<dyn TextRenderer>> = LazyLock::new(|| {
    Arc::new(TextRendererWithDescription::new(
        "renders strings, booleans and numbers",
        |_, value| match value {
            Value::Str(text) => Some(text.clone()),
            Value::Int(number) => Some(number.to_string()),
            Value::Float(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        },
    ))
});

/// Renders ordered collections; elements are rendered transitively.
pub static ITERABLES: LazyLock<Arc<dyn TextRenderer>> = LazyLock::new(|| {
    Arc::new(TextRendererWithDescription::new(
        "renders iterables, elements are rendered transitively",
        |session, value| {
            let Value::List(list) = value else {
                return None;
            };
            let title = session.render_title(&list.ty);
            Some(session.render_iterable(&title, &list.items, "[", "]"))
        },
    ))
});

/// Renders maps; keys and values are rendered transitively.
pub static MAPS: LazyLock<Arc<dyn TextRenderer>> = LazyLock::new(|| {
    Arc::new(TextRendererWithDescription::new(
        "renders maps, keys and values are rendered transitively",
        |session, value| {
            let Value::Map(map) = value else {
                return None;
            };
            let title = session.render_title(&map.ty);
            Some(session.render_map(&title, &map.entries, " => ", "{", "}"))
        },
    ))
});

/// Renders class descriptors by simple name.
pub static CLASS: LazyLock<Arc<dyn TextRenderer>> = LazyLock::new(|| {
    Arc::new(TextRendererWithDescription::new(
        "renders class descriptors",
        |_, value| match value {
            Value::Class(ty) => Some(ty.simple_name().to_owned()),
            _ => None,
        },
    ))
});

/// Renders objects from their declared fields.
///
/// Inherited fields are skipped; unreadable fields become a sentinel.
pub static OBJECT: LazyLock<Arc<dyn TextRenderer>> = LazyLock::new(|| {
    Arc::new(TextRendererWithDescription::new(
        "renders any objects",
        |session, value| {
            let Value::Object(object) = value else {
                return None;
            };
            let entries: Vec<(Value, Value)> = object
                .fields()
                .into_iter()
                .filter(|field| field.origin == FieldOrigin::Declared)
                .map(|field| {
                    let shown = match field.slot {
                        FieldSlot::Readable(inner) => inner,
                        FieldSlot::Inaccessible => Value::str(INACCESSIBLE_FIELD),
                        FieldSlot::Failed(_) => Value::str(FAILED_FIELD),
                    };
                    (Value::Str(field.name), shown)
                })
                .collect();
            let title = session.render_title(object.ty());
            Some(session.render_map(&title, &entries, "=", "(", ")"))
        },
    ))
});

/// Shows opaque values and avoided types through their default string form.
pub static AVOID: LazyLock<Arc<dyn TextRenderer>> = LazyLock::new(|| {
    Arc::new(TextRendererWithDescription::new(
        "skips structural rendering for opaque and avoided types",
        |session, value| {
            if let Value::Opaque(opaque) = value {
                return Some(opaque.display.clone());
            }
            let ty = value.runtime_type()?;
            session
                .config()
                .avoided_type_prefixes
                .iter()
                .any(|prefix| ty.name().starts_with(prefix.as_str()))
                .then(|| value.default_display())
        },
    ))
});

/// Registers the default renderers at their recommended priorities.
pub fn register_default_renderers(processor: &TextRenderersProcessor) {
    processor.register(Arc::clone(&NULL), Priority::DEFAULT);
    processor.register(Arc::clone(&MAPS), Priority::DEFAULT);
    processor.register(Arc::clone(&ITERABLES), Priority::LOW);
    processor.register(Arc::clone(&PRIMITIVES), Priority::DEFAULT);
    processor.register(Arc::clone(&CLASS), Priority::DEFAULT);
    processor.register(Arc::clone(&OBJECT), Priority::LOWER);
    processor.register(Arc::clone(&AVOID), Priority::HIGH);
}
