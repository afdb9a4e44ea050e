/// Shader resource payload

/// Shader pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

/// A loaded shader: SPIR-V bytecode plus its pipeline stage.
///
/// Compilation from source is out of scope; shaders are loaded as
/// pre-compiled SPIR-V referenced from the manifest.
pub struct ShaderResource {
    /// SPIR-V bytecode (length is a multiple of 4)
    pub code: Vec<u8>,
    /// Pipeline stage this shader runs at
    pub stage: ShaderStage,
}
