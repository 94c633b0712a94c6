//! Resources, dependencies and repositories contributed by a library.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of front-end resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// A script loaded into the client.
    Js,
    /// A stylesheet loaded into the client.
    Css,
}

/// How a resource path is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourcePathType {
    /// Loaded by the client from a URL.
    Url,
    /// Fetched by the kernel and embedded into the output.
    UrlEmbed,
    /// Read from the kernel's file system.
    LocalPath,
    /// Read from the library's bundled resources.
    Bundled,
}

/// One place a resource can be loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLocation {
    /// URL or path.
    pub path: String,
    /// How `path` is resolved.
    #[serde(rename = "type")]
    pub path_type: ResourcePathType,
}

impl ResourceLocation {
    /// Creates a location.
    #[must_use]
    pub fn new(path: impl Into<String>, path_type: ResourcePathType) -> Self {
        Self {
            path: path.into(),
            path_type,
        }
    }
}

/// A front-end resource with fallback locations tried in order.
///
/// # Examples
///
/// ```
/// use kernel_results::library::domain::{
///     LibraryResource, ResourceLocation, ResourcePathType, ResourceType,
/// };
///
/// let resource = LibraryResource::new("plotly", ResourceType::Js)
///     .with_location(ResourceLocation::new("https://cdn.example/plotly.js", ResourcePathType::Url))
///     .with_location(ResourceLocation::new("plotly.js", ResourcePathType::Bundled));
/// assert_eq!(resource.locations.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryResource {
    /// Resource name, unique within the kernel.
    pub name: String,
    /// Resource kind.
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// Candidate locations.
    #[serde(default)]
    pub locations: Vec<ResourceLocation>,
}

impl LibraryResource {
    /// Creates a resource with no locations.
    #[must_use]
    pub fn new(name: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            name: name.into(),
            resource_type,
            locations: Vec::new(),
        }
    }

    /// Appends a fallback location.
    #[must_use]
    pub fn with_location(mut self, location: ResourceLocation) -> Self {
        self.locations.push(location);
        self
    }
}

/// A package repository the dependency resolver should consult.
///
/// The password is never written by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelRepository {
    /// Repository URL or directory.
    pub path: String,
    /// Optional user name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Optional password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl KernelRepository {
    /// Creates an anonymous repository.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            username: None,
            password: None,
        }
    }

    /// Adds credentials.
    #[must_use]
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

impl fmt::Debug for KernelRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelRepository")
            .field("path", &self.path)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl From<&str> for KernelRepository {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
