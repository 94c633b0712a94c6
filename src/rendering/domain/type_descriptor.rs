//! Runtime type information reported by the execution host.
//!
//! Types form an acyclic hierarchy of shared descriptors. Ancestry may be
//! unresolved when the host could not load a type's supertypes; callers
//! decide how to treat such types.

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::rendering::error::RenderError;

/// Fully qualified type name as reported by the host.
pub type TypeName = String;

/// Supertypes of a type, or the reason they are unknown.
#[derive(Debug, Clone)]
pub enum Ancestry {
    /// Direct supertypes and implemented capabilities.
    Known(Vec<Arc<TypeDescriptor>>),
    /// The host failed to load the type's supertypes.
    Unresolved(String),
}

/// Descriptor of a runtime type.
///
/// # Examples
///
/// ```
/// use kernel_results::rendering::domain::TypeDescriptor;
///
/// let iterable = TypeDescriptor::new("collections.Iterable").into_shared();
/// let list = TypeDescriptor::new("collections.ArrayList")
///     .with_supertype(iterable.clone())
///     .into_shared();
/// assert_eq!(list.is_subtype_of(&iterable).ok(), Some(true));
/// assert_eq!(list.simple_name(), "ArrayList");
/// ```
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: TypeName,
    type_parameters: usize,
    ancestry: Ancestry,
}

impl TypeDescriptor {
    /// Creates a descriptor with no supertypes.
    #[must_use]
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            type_parameters: 0,
            ancestry: Ancestry::Known(Vec::new()),
        }
    }

    /// Creates a descriptor whose supertypes could not be loaded.
    #[must_use]
    pub fn unresolved(name: impl Into<TypeName>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_parameters: 0,
            ancestry: Ancestry::Unresolved(reason.into()),
        }
    }

    /// Adds a direct supertype.
    ///
    /// Has no effect on a descriptor with unresolved ancestry.
    #[must_use]
    pub fn with_supertype(mut self, supertype: Arc<Self>) -> Self {
        if let Ancestry::Known(supertypes) = &mut self.ancestry {
            supertypes.push(supertype);
        }
        self
    }

    /// Sets the number of generic type parameters.
    #[must_use]
    pub const fn with_type_parameters(mut self, count: usize) -> Self {
        self.type_parameters = count;
        self
    }

    /// Wraps the descriptor for sharing between values and handlers.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Returns the fully qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name without its package or module path.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit(['.', ':'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.name)
    }

    /// Returns the number of generic type parameters.
    #[must_use]
    pub const fn type_parameters(&self) -> usize {
        self.type_parameters
    }

    /// Returns the ancestry of this type.
    #[must_use]
    pub const fn ancestry(&self) -> &Ancestry {
        &self.ancestry
    }

    /// Checks whether this type is `other` or one of its descendants.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TypeResolution`] when the ancestry of this type
    /// or of an intermediate supertype is unresolved.
    pub fn is_subtype_of(&self, other: &Self) -> Result<bool, RenderError> {
        self.is_subtype_of_name(other.name())
    }

    /// Checks ancestry against a fully qualified name.
    ///
    /// # Errors
    ///
    /// See [`TypeDescriptor::is_subtype_of`].
    pub fn is_subtype_of_name(&self, other: &str) -> Result<bool, RenderError> {
        if self.name == other {
            return Ok(true);
        }
        match &self.ancestry {
            Ancestry::Unresolved(reason) => Err(RenderError::TypeResolution {
                type_name: self.name.clone(),
                reason: reason.clone(),
            }),
            Ancestry::Known(supertypes) => {
                for supertype in supertypes {
                    if supertype.is_subtype_of_name(other)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

// Descriptors are identified by their fully qualified name.
impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Descriptors for the value kinds the host reports without type metadata.
pub mod builtin {
    use super::{Arc, LazyLock, TypeDescriptor};

    /// Root of the hierarchy.
    pub static ANY: LazyLock<Arc<TypeDescriptor>> =
        LazyLock::new(|| TypeDescriptor::new("builtin.Any").into_shared());

    /// Supertype of numeric values.
    pub static NUMBER: LazyLock<Arc<TypeDescriptor>> = LazyLock::new(|| {
        TypeDescriptor::new("builtin.Number")
            .with_supertype(ANY.clone())
            .into_shared()
    });

    /// Boolean values.
    pub static BOOLEAN: LazyLock<Arc<TypeDescriptor>> = LazyLock::new(|| {
        TypeDescriptor::new("builtin.Boolean")
            .with_supertype(ANY.clone())
            .into_shared()
    });

    /// Integer values.
    pub static INT: LazyLock<Arc<TypeDescriptor>> = LazyLock::new(|| {
        TypeDescriptor::new("builtin.Int")
            .with_supertype(NUMBER.clone())
            .into_shared()
    });

    /// Floating point values.
    pub static FLOAT: LazyLock<Arc<TypeDescriptor>> = LazyLock::new(|| {
        TypeDescriptor::new("builtin.Float")
            .with_supertype(NUMBER.clone())
            .into_shared()
    });

    /// String values.
    pub static STRING: LazyLock<Arc<TypeDescriptor>> = LazyLock::new(|| {
        TypeDescriptor::new("builtin.String")
            .with_supertype(ANY.clone())
            .into_shared()
    });

    /// Class-descriptor values.
    pub static CLASS: LazyLock<Arc<TypeDescriptor>> = LazyLock::new(|| {
        TypeDescriptor::new("builtin.Class")
            .with_supertype(ANY.clone())
            .into_shared()
    });

    /// Rich display bundles.
    pub static MIME_BUNDLE: LazyLock<Arc<TypeDescriptor>> = LazyLock::new(|| {
        TypeDescriptor::new("builtin.MimeBundle")
            .with_supertype(ANY.clone())
            .into_shared()
    });
}
