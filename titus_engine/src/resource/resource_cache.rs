/// Resource cache - deduplicated, loader-dispatched asset loading
///
/// The cache maps asset paths to weak references, so a resource's lifetime
/// is governed entirely by its strong-reference holders: the cache never
/// extends a resource's lifetime and never forces eviction - it simply
/// forgets once nobody else remembers. Liveness is the `Arc` strong count,
/// consulted on every access via `Weak::upgrade`.

use std::fmt;
use std::sync::{Arc, Weak};

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::resource::{Manifest, MeshResource, Pipeline, ShaderResource, TextureResource};

// ============================================================================
// Resource
// ============================================================================

/// Type-specific payload of a loaded resource.
///
/// A tagged sum of the concrete variants rather than an open class
/// hierarchy; open extension happens at the loader table, not here.
pub enum ResourceData {
    Shader(ShaderResource),
    Mesh(MeshResource),
    Texture(TextureResource),
    Pipeline(Arc<dyn Pipeline>),
}

/// A shared engine asset, identified by the path it was loaded from.
///
/// Shared among every holder that requested it by path; the cache holds a
/// weak reference only.
pub struct Resource {
    path: String,
    type_tag: String,
    data: ResourceData,
}

impl Resource {
    /// Path the resource was loaded from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Type tag declared by the manifest (e.g. "mesh")
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Type-specific payload
    pub fn data(&self) -> &ResourceData {
        &self.data
    }

    /// Mesh payload, if this resource is a mesh
    pub fn as_mesh(&self) -> Option<&MeshResource> {
        match &self.data {
            ResourceData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Shader payload, if this resource is a shader
    pub fn as_shader(&self) -> Option<&ShaderResource> {
        match &self.data {
            ResourceData::Shader(shader) => Some(shader),
            _ => None,
        }
    }

    /// Pipeline payload, if this resource is a pipeline
    pub fn as_pipeline(&self) -> Option<&Arc<dyn Pipeline>> {
        match &self.data {
            ResourceData::Pipeline(pipeline) => Some(pipeline),
            _ => None,
        }
    }
}

// Manual impl: the Pipeline payload is an opaque trait object
impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path)
            .field("type_tag", &self.type_tag)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ResourceCache
// ============================================================================

/// Loader function materializing one resource type from its manifest.
///
/// Receives the manifest path (for resolving relative file references) and
/// the parsed manifest. Loaders needing a renderer capture it.
pub type ResourceLoader = Box<dyn Fn(&str, &Manifest) -> Result<ResourceData> + Send + Sync>;

/// Deduplicated asset cache.
///
/// Explicitly constructed and passed by reference to every subsystem that
/// needs asset access; there is no global instance. Loaders must be
/// registered before the first request for their type.
pub struct ResourceCache {
    resources: FxHashMap<String, Weak<Resource>>,
    loaders: FxHashMap<String, ResourceLoader>,
}

impl ResourceCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            resources: FxHashMap::default(),
            loaders: FxHashMap::default(),
        }
    }

    /// Install the loader for a manifest type tag.
    ///
    /// Re-registering the same tag replaces the previous loader.
    pub fn register_loader(&mut self, type_tag: &str, loader: ResourceLoader) {
        self.loaders.insert(type_tag.to_string(), loader);
    }

    /// Get the resource at `path`, loading it if no live copy exists.
    ///
    /// While a strong reference is outstanding, repeated calls return the
    /// same underlying resource and the loader is not invoked again. Once
    /// every strong reference drops, the entry is stale and the next call
    /// reloads from disk.
    pub fn get(&mut self, path: &str) -> Result<Arc<Resource>> {
        if let Some(weak) = self.resources.get(path) {
            if let Some(resource) = weak.upgrade() {
                return Ok(resource);
            }
        }

        let resource = self.load(path)?;
        self.resources
            .insert(path.to_string(), Arc::downgrade(&resource));
        Ok(resource)
    }

    /// Every currently-live resource whose declared type matches `type_tag`.
    ///
    /// Order is unspecified. Resources whose last strong reference has been
    /// released are excluded.
    pub fn get_all(&self, type_tag: &str) -> Vec<Arc<Resource>> {
        self.resources
            .values()
            .filter_map(Weak::upgrade)
            .filter(|r| r.type_tag() == type_tag)
            .collect()
    }

    /// Drop stale entries whose resources are no longer alive
    pub fn purge_expired(&mut self) {
        self.resources.retain(|_, weak| weak.strong_count() > 0);
    }

    /// Number of live resources currently tracked
    pub fn live_count(&self) -> usize {
        self.resources
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    fn load(&self, path: &str) -> Result<Arc<Resource>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::ResourceLoad(format!("{}: {}", path, e)))?;

        let manifest = Manifest::parse(path, &text)?;

        let loader = self
            .loaders
            .get(&manifest.resource_type)
            .ok_or_else(|| Error::UnknownResourceType(manifest.resource_type.clone()))?;

        let data = loader(path, &manifest)?;

        crate::engine_debug!(
            "titus::ResourceCache",
            "loaded '{}' resource from {}",
            manifest.resource_type,
            path
        );

        Ok(Arc::new(Resource {
            path: path.to_string(),
            type_tag: manifest.resource_type,
            data,
        }))
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "resource_cache_tests.rs"]
mod tests;
