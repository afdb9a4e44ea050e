/// Resource module - shared assets loaded by path through the cache

// Module declarations
pub mod loaders;
pub mod manifest;
pub mod mesh;
pub mod pipeline;
pub mod resource_cache;
pub mod shader;
pub mod texture;

// Re-export from the individual modules
pub use loaders::*;
pub use manifest::*;
pub use mesh::*;
pub use pipeline::*;
pub use resource_cache::*;
pub use shader::*;
pub use texture::*;
