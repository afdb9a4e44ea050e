/// Default loaders for the built-in resource types
///
/// The pipeline loader is backend-specific and lives in the backend crate;
/// everything else is materialized here. File references inside a manifest
/// are resolved relative to the manifest's directory.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::renderer::{BufferDesc, BufferUsage, MemoryClass, Renderer};
use crate::resource::{
    Manifest, MeshResource, ResourceCache, ResourceData, ShaderResource, ShaderStage,
    TextureResource,
};

/// Resolve a manifest-relative file reference
fn sibling(manifest_path: &str, relative: &str) -> PathBuf {
    Path::new(manifest_path)
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(relative)
}

fn read_sibling(manifest_path: &str, relative: &str) -> Result<Vec<u8>> {
    let path = sibling(manifest_path, relative);
    std::fs::read(&path).map_err(|e| Error::ResourceLoad(format!("{}: {}", path.display(), e)))
}

// ============================================================================
// Shader loader
// ============================================================================

/// Loader for `"type": "shader"` manifests.
///
/// Fields: `"path"` (SPIR-V file), `"stage"` (`"vertex"`, `"fragment"` or
/// `"compute"`).
pub fn shader_loader() -> impl Fn(&str, &Manifest) -> Result<ResourceData> + Send + Sync {
    |manifest_path: &str, manifest: &Manifest| {
        let stage = match manifest.str_field("stage")? {
            "vertex" => ShaderStage::Vertex,
            "fragment" => ShaderStage::Fragment,
            "compute" => ShaderStage::Compute,
            other => {
                return Err(Error::ResourceParse(format!(
                    "unknown shader stage '{}'",
                    other
                )))
            }
        };

        let code = read_sibling(manifest_path, manifest.str_field("path")?)?;
        if code.len() % 4 != 0 {
            return Err(Error::ResourceParse(format!(
                "SPIR-V code size {} is not a multiple of 4",
                code.len()
            )));
        }

        Ok(ResourceData::Shader(ShaderResource { code, stage }))
    }
}

// ============================================================================
// Mesh loader
// ============================================================================

/// Loader for `"type": "mesh"` manifests.
///
/// Fields: `"vertices"` (flat float array), `"indices"` (u16 array).
/// Creates the mesh's GPU buffers through the captured renderer and uploads
/// the data.
pub fn mesh_loader(
    renderer: Arc<Mutex<dyn Renderer>>,
) -> impl Fn(&str, &Manifest) -> Result<ResourceData> + Send + Sync {
    move |_manifest_path: &str, manifest: &Manifest| {
        let vertices = manifest.f32_array("vertices")?;
        let indices = manifest.u16_array("indices")?;
        if vertices.is_empty() || indices.is_empty() {
            return Err(Error::ResourceParse(
                "mesh manifest has empty vertex or index data".to_string(),
            ));
        }

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(&indices);

        let mut renderer = renderer
            .lock()
            .map_err(|_| Error::Backend("renderer lock poisoned".to_string()))?;

        let vertex_buffer = renderer.create_buffer(BufferDesc {
            size: vertex_bytes.len() as u64,
            usage: BufferUsage::VERTEX | BufferUsage::TRANSFER_DST,
            memory: MemoryClass::CpuToGpu,
        })?;
        vertex_buffer.update(0, vertex_bytes)?;

        let index_buffer = renderer.create_buffer(BufferDesc {
            size: index_bytes.len() as u64,
            usage: BufferUsage::INDEX | BufferUsage::TRANSFER_DST,
            memory: MemoryClass::CpuToGpu,
        })?;
        index_buffer.update(0, index_bytes)?;

        Ok(ResourceData::Mesh(MeshResource {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }))
    }
}

// ============================================================================
// Texture loader
// ============================================================================

/// Loader for `"type": "texture"` manifests.
///
/// Fields: `"width"`, `"height"`, `"path"` (raw tightly-packed RGBA8 file).
pub fn texture_loader() -> impl Fn(&str, &Manifest) -> Result<ResourceData> + Send + Sync {
    |manifest_path: &str, manifest: &Manifest| {
        let width = manifest.u32_field("width")?;
        let height = manifest.u32_field("height")?;
        let pixels = read_sibling(manifest_path, manifest.str_field("path")?)?;

        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(Error::ResourceParse(format!(
                "texture pixel data is {} bytes, expected {} for {}x{} RGBA8",
                pixels.len(),
                expected,
                width,
                height
            )));
        }

        Ok(ResourceData::Texture(TextureResource {
            width,
            height,
            pixels,
        }))
    }
}

/// Register the default shader/mesh/texture loaders on a cache.
///
/// The backend's pipeline loader is registered separately by the backend.
pub fn register_default_loaders(cache: &mut ResourceCache, renderer: Arc<Mutex<dyn Renderer>>) {
    cache.register_loader("shader", Box::new(shader_loader()));
    cache.register_loader("mesh", Box::new(mesh_loader(renderer)));
    cache.register_loader("texture", Box::new(texture_loader()));
}

#[cfg(test)]
#[path = "loaders_tests.rs"]
mod tests;
