//! Runtime values produced by cell execution.
//!
//! Values are a snapshot of what the host reported. Objects are shared and
//! their fields may be replaced after construction, so object graphs can be
//! cyclic; renderers must guard against that.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Map;

use super::type_descriptor::{TypeDescriptor, builtin};

/// MIME type of the plain-text representation.
pub const TEXT_PLAIN: &str = "text/plain";

/// MIME type of the HTML representation.
pub const TEXT_HTML: &str = "text/html";

/// A rich display result keyed by MIME type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MimeBundle(Map<String, serde_json::Value>);

impl MimeBundle {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a representation.
    #[must_use]
    pub fn with(
        mut self,
        mime_type: impl Into<String>,
        data: impl Into<serde_json::Value>,
    ) -> Self {
        self.0.insert(mime_type.into(), data.into());
        self
    }

    /// Creates a bundle holding only plain text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().with(TEXT_PLAIN, text.into())
    }

    /// Creates a bundle holding only HTML.
    #[must_use]
    pub fn html(html: impl Into<String>) -> Self {
        Self::new().with(TEXT_HTML, html.into())
    }

    /// Returns a representation by MIME type.
    #[must_use]
    pub fn get(&self, mime_type: &str) -> Option<&serde_json::Value> {
        self.0.get(mime_type)
    }

    /// Returns the bundle as a JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, serde_json::Value> {
        &self.0
    }

    /// Converts the bundle into a JSON value.
    #[must_use]
    pub fn into_json(self) -> serde_json::Value {
        serde_json::Value::Object(self.0)
    }
}

/// An ordered collection value.
#[derive(Debug, Clone, PartialEq)]
pub struct ListValue {
    /// Runtime type of the collection.
    pub ty: Arc<TypeDescriptor>,
    /// Elements in iteration order.
    pub items: Vec<Value>,
}

/// A key/value collection value.
#[derive(Debug, Clone, PartialEq)]
pub struct MapValue {
    /// Runtime type of the map.
    pub ty: Arc<TypeDescriptor>,
    /// Entries in iteration order.
    pub entries: Vec<(Value, Value)>,
}

/// A host value the kernel can only show through its own string form.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueValue {
    /// Runtime type of the value.
    pub ty: Arc<TypeDescriptor>,
    /// The host's default string form.
    pub display: String,
}

/// Where an object field comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrigin {
    /// Declared directly on the object's type.
    Declared,
    /// Inherited from a supertype.
    Inherited,
}

/// Result of reading a field through reflection.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSlot {
    /// The field was read.
    Readable(Value),
    /// Access to the field was denied.
    Inaccessible,
    /// Reading the field raised an error.
    Failed(String),
}

/// A named field of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    /// Field name.
    pub name: String,
    /// Declared or inherited.
    pub origin: FieldOrigin,
    /// Field contents.
    pub slot: FieldSlot,
}

/// A structured object with reflectable fields.
pub struct ObjectValue {
    ty: Arc<TypeDescriptor>,
    display: Option<String>,
    fields: RwLock<Vec<ObjectField>>,
}

impl ObjectValue {
    /// Starts building an object of the given type.
    #[must_use]
    pub const fn builder(ty: Arc<TypeDescriptor>) -> ObjectValueBuilder {
        ObjectValueBuilder {
            ty,
            display: None,
            fields: Vec::new(),
        }
    }

    /// Returns the runtime type.
    #[must_use]
    pub const fn ty(&self) -> &Arc<TypeDescriptor> {
        &self.ty
    }

    /// Returns the host's default string form.
    ///
    /// Falls back to the type name when the host did not report one.
    #[must_use]
    pub fn default_display(&self) -> String {
        self.display
            .clone()
            .unwrap_or_else(|| self.ty.name().to_owned())
    }

    /// Returns a snapshot of the fields.
    #[must_use]
    pub fn fields(&self) -> Vec<ObjectField> {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces a field's contents, adding the field if it is missing.
    pub fn set_field(&self, name: &str, value: Value) {
        let mut fields = self.fields.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(field) = fields.iter_mut().find(|field| field.name == name) {
            field.slot = FieldSlot::Readable(value);
        } else {
            fields.push(ObjectField {
                name: name.to_owned(),
                origin: FieldOrigin::Declared,
                slot: FieldSlot::Readable(value),
            });
        }
    }
}

impl fmt::Debug for ObjectValue {
    // Field values are omitted: object graphs may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.fields().into_iter().map(|field| field.name).collect();
        f.debug_struct("ObjectValue")
            .field("ty", &self.ty.name())
            .field("fields", &names)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ObjectValue`].
#[derive(Debug)]
pub struct ObjectValueBuilder {
    ty: Arc<TypeDescriptor>,
    display: Option<String>,
    fields: Vec<ObjectField>,
}

impl ObjectValueBuilder {
    /// Sets the host's default string form.
    #[must_use]
    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Adds a declared field.
    #[must_use]
    pub fn field(self, name: impl Into<String>, value: Value) -> Self {
        self.slot(name, FieldOrigin::Declared, FieldSlot::Readable(value))
    }

    /// Adds an inherited field.
    #[must_use]
    pub fn inherited_field(self, name: impl Into<String>, value: Value) -> Self {
        self.slot(name, FieldOrigin::Inherited, FieldSlot::Readable(value))
    }

    /// Adds a field with explicit origin and contents.
    #[must_use]
    pub fn slot(mut self, name: impl Into<String>, origin: FieldOrigin, slot: FieldSlot) -> Self {
        self.fields.push(ObjectField {
            name: name.into(),
            origin,
            slot,
        });
        self
    }

    /// Finishes the object.
    #[must_use]
    pub fn build(self) -> Arc<ObjectValue> {
        Arc::new(ObjectValue {
            ty: self.ty,
            display: self.display,
            fields: RwLock::new(self.fields),
        })
    }
}

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    Str(String),
    /// Ordered collection.
    List(ListValue),
    /// Key/value collection.
    Map(MapValue),
    /// A class descriptor.
    Class(Arc<TypeDescriptor>),
    /// A structured object.
    Object(Arc<ObjectValue>),
    /// A value known only by its string form.
    Opaque(OpaqueValue),
    /// A rich display result.
    Mime(MimeBundle),
}

impl Value {
    /// Creates a string value.
    #[must_use]
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// Creates a list value.
    #[must_use]
    pub const fn list(ty: Arc<TypeDescriptor>, items: Vec<Self>) -> Self {
        Self::List(ListValue { ty, items })
    }

    /// Creates a map value.
    #[must_use]
    pub const fn map(ty: Arc<TypeDescriptor>, entries: Vec<(Self, Self)>) -> Self {
        Self::Map(MapValue { ty, entries })
    }

    /// Creates an opaque value.
    #[must_use]
    pub fn opaque(ty: Arc<TypeDescriptor>, display: impl Into<String>) -> Self {
        Self::Opaque(OpaqueValue {
            ty,
            display: display.into(),
        })
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the runtime type, or `None` for null.
    #[must_use]
    pub fn runtime_type(&self) -> Option<Arc<TypeDescriptor>> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(builtin::BOOLEAN.clone()),
            Self::Int(_) => Some(builtin::INT.clone()),
            Self::Float(_) => Some(builtin::FLOAT.clone()),
            Self::Str(_) => Some(builtin::STRING.clone()),
            Self::Class(_) => Some(builtin::CLASS.clone()),
            Self::Mime(_) => Some(builtin::MIME_BUNDLE.clone()),
            Self::List(list) => Some(list.ty.clone()),
            Self::Map(map) => Some(map.ty.clone()),
            Self::Object(object) => Some(object.ty().clone()),
            Self::Opaque(opaque) => Some(opaque.ty.clone()),
        }
    }

    /// Returns the host's default string form, without any renderer.
    #[must_use]
    pub fn default_display(&self) -> String {
        match self {
            Self::Null => "null".to_owned(),
            Self::Bool(value) => value.to_string(),
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Str(value) => value.clone(),
            Self::Class(ty) => format!("class {}", ty.name()),
            Self::Object(object) => object.default_display(),
            Self::Opaque(opaque) => opaque.display.clone(),
            Self::List(list) => list.ty.name().to_owned(),
            Self::Map(map) => map.ty.name().to_owned(),
            Self::Mime(bundle) => bundle
                .get(TEXT_PLAIN)
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| builtin::MIME_BUNDLE.name().to_owned(), str::to_owned),
        }
    }
}

impl PartialEq for Value {
    // Objects compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Class(a), Self::Class(b)) => a.name() == b.name(),
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::Opaque(a), Self::Opaque(b)) => a == b,
            (Self::Mime(a), Self::Mime(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<MimeBundle> for Value {
    fn from(value: MimeBundle) -> Self {
        Self::Mime(value)
    }
}

/// A value together with the variable name that holds it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    /// The value.
    pub value: Value,
    /// Name of the variable holding the value.
    pub name: Option<String>,
}

impl FieldValue {
    /// Creates a field value bound to a variable.
    #[must_use]
    pub fn named(value: Value, name: impl Into<String>) -> Self {
        Self {
            value,
            name: Some(name.into()),
        }
    }

    /// Creates a field value with no variable.
    #[must_use]
    pub const fn unnamed(value: Value) -> Self {
        Self { value, name: None }
    }
}
