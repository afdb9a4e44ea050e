use super::*;
use crate::renderer::mock_renderer::MockRenderer;
use std::path::PathBuf;

// ============================================================================
// Helpers
// ============================================================================

/// Asset directory on disk, removed when the test ends
struct TestAssetDir {
    dir: PathBuf,
}

impl TestAssetDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "titus_loaders_{}_{}",
            std::process::id(),
            name
        ));
        std::fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    fn write(&self, name: &str, contents: &[u8]) -> String {
        let path = self.dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }
}

impl Drop for TestAssetDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

fn mock_renderer() -> Arc<Mutex<dyn Renderer>> {
    Arc::new(Mutex::new(MockRenderer::new()))
}

fn load(cache: &mut ResourceCache, path: &str) -> Result<Arc<crate::resource::Resource>> {
    cache.get(path)
}

// ============================================================================
// Shader loader
// ============================================================================

#[test]
fn test_shader_loader_reads_spirv() {
    let assets = TestAssetDir::new("shader_ok");
    assets.write("triangle.vert.spv", &[3, 2, 35, 7, 0, 0, 1, 0]);
    let manifest = assets.write(
        "triangle.json",
        br#"{"type": "shader", "stage": "vertex", "path": "triangle.vert.spv"}"#,
    );

    let mut cache = ResourceCache::new();
    cache.register_loader("shader", Box::new(shader_loader()));

    let resource = load(&mut cache, &manifest).unwrap();
    let shader = resource.as_shader().unwrap();
    assert_eq!(shader.stage, ShaderStage::Vertex);
    assert_eq!(shader.code, vec![3, 2, 35, 7, 0, 0, 1, 0]);
}

#[test]
fn test_shader_loader_rejects_unknown_stage() {
    let assets = TestAssetDir::new("shader_stage");
    assets.write("s.spv", &[0; 8]);
    let manifest = assets.write(
        "s.json",
        br#"{"type": "shader", "stage": "geometry", "path": "s.spv"}"#,
    );

    let mut cache = ResourceCache::new();
    cache.register_loader("shader", Box::new(shader_loader()));
    let err = load(&mut cache, &manifest).unwrap_err();
    assert!(matches!(err, Error::ResourceParse(_)));
}

#[test]
fn test_shader_loader_rejects_unaligned_code() {
    let assets = TestAssetDir::new("shader_align");
    assets.write("bad.spv", &[0; 7]);
    let manifest = assets.write(
        "bad.json",
        br#"{"type": "shader", "stage": "fragment", "path": "bad.spv"}"#,
    );

    let mut cache = ResourceCache::new();
    cache.register_loader("shader", Box::new(shader_loader()));
    let err = load(&mut cache, &manifest).unwrap_err();
    assert!(matches!(err, Error::ResourceParse(_)));
}

// ============================================================================
// Mesh loader
// ============================================================================

#[test]
fn test_mesh_loader_uploads_buffers() {
    let assets = TestAssetDir::new("mesh_ok");
    let manifest = assets.write(
        "quad.json",
        br#"{
            "type": "mesh",
            "vertices": [-0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, 0.5],
            "indices": [0, 1, 2, 2, 3, 0]
        }"#,
    );

    let renderer = Arc::new(Mutex::new(MockRenderer::new()));
    let mut cache = ResourceCache::new();
    cache.register_loader(
        "mesh",
        Box::new(mesh_loader(Arc::clone(&renderer) as Arc<Mutex<dyn Renderer>>)),
    );

    let resource = load(&mut cache, &manifest).unwrap();
    let mesh = resource.as_mesh().unwrap();
    assert_eq!(mesh.index_count, 6);
    assert_eq!(mesh.vertex_buffer.size(), 8 * 4);
    assert_eq!(mesh.index_buffer.size(), 6 * 2);

    // The uploaded bytes match the manifest data
    let renderer = renderer.lock().unwrap();
    let vertices: &[f32] = &[-0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, 0.5];
    let indices: &[u16] = &[0, 1, 2, 2, 3, 0];
    assert_eq!(
        renderer.buffers[0].bytes(0, 32),
        bytemuck::cast_slice::<f32, u8>(vertices)
    );
    assert_eq!(
        renderer.buffers[1].bytes(0, 12),
        bytemuck::cast_slice::<u16, u8>(indices)
    );
}

#[test]
fn test_mesh_loader_rejects_empty_data() {
    let assets = TestAssetDir::new("mesh_empty");
    let manifest = assets.write(
        "empty.json",
        br#"{"type": "mesh", "vertices": [], "indices": []}"#,
    );

    let mut cache = ResourceCache::new();
    cache.register_loader("mesh", Box::new(mesh_loader(mock_renderer())));
    let err = load(&mut cache, &manifest).unwrap_err();
    assert!(matches!(err, Error::ResourceParse(_)));
}

// ============================================================================
// Texture loader
// ============================================================================

#[test]
fn test_texture_loader_validates_pixel_size() {
    let assets = TestAssetDir::new("texture_short");
    assets.write("t.rgba", &[255; 8]);
    let manifest = assets.write(
        "t.json",
        br#"{"type": "texture", "width": 2, "height": 2, "path": "t.rgba"}"#,
    );

    let mut cache = ResourceCache::new();
    cache.register_loader("texture", Box::new(texture_loader()));
    let err = load(&mut cache, &manifest).unwrap_err();
    assert!(matches!(err, Error::ResourceParse(_)));
}

#[test]
fn test_texture_loader_reads_pixels() {
    let assets = TestAssetDir::new("texture_ok");
    assets.write("t.rgba", &[128; 16]);
    let manifest = assets.write(
        "t.json",
        br#"{"type": "texture", "width": 2, "height": 2, "path": "t.rgba"}"#,
    );

    let mut cache = ResourceCache::new();
    cache.register_loader("texture", Box::new(texture_loader()));
    let resource = load(&mut cache, &manifest).unwrap();
    match resource.data() {
        ResourceData::Texture(texture) => {
            assert_eq!((texture.width, texture.height), (2, 2));
            assert_eq!(texture.pixels, vec![128; 16]);
        }
        _ => panic!("expected texture payload"),
    }
}

// ============================================================================
// Registration helper
// ============================================================================

#[test]
fn test_register_default_loaders_covers_builtin_types() {
    let assets = TestAssetDir::new("defaults");
    assets.write("s.spv", &[0; 4]);
    let manifest = assets.write(
        "s.json",
        br#"{"type": "shader", "stage": "fragment", "path": "s.spv"}"#,
    );

    let mut cache = ResourceCache::new();
    register_default_loaders(&mut cache, mock_renderer());
    assert!(load(&mut cache, &manifest).is_ok());
}
