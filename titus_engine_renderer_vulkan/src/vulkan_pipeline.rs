/// VulkanPipeline - graphics pipeline resource and its manifest loader
///
/// A pipeline manifest names the vertex and fragment SPIR-V files (resolved
/// relative to the manifest) and the vertex stride. The loader materializes
/// shader modules, the per-object descriptor set layout (binding 0, dynamic
/// uniform buffer), the pipeline layout and the graphics pipeline itself.
///
/// Viewport and scissor are dynamic states, so the pipeline is not tied to a
/// particular framebuffer size.

use ash::vk;
use std::path::Path;
use std::sync::Arc;

use titus_engine::{Error, Manifest, Pipeline, Resource, ResourceData, Result};

use crate::vulkan_context::GpuContext;

/// Vulkan pipeline implementation
pub struct VulkanPipeline {
    /// Vulkan graphics pipeline
    pub(crate) pipeline: vk::Pipeline,
    /// Pipeline layout
    pub(crate) layout: vk::PipelineLayout,
    /// Descriptor set layout for the per-object dynamic uniform binding
    pub(crate) set_layout: vk::DescriptorSetLayout,
    /// Vulkan device (for cleanup)
    device: ash::Device,
}

impl Pipeline for VulkanPipeline {}

impl Drop for VulkanPipeline {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_pipeline(self.pipeline, None);
            self.device.destroy_pipeline_layout(self.layout, None);
            self.device.destroy_descriptor_set_layout(self.set_layout, None);
        }
    }
}

/// Downcast a cached pipeline resource to the Vulkan implementation.
///
/// # Safety
///
/// The resource must have been produced by this crate's pipeline loader.
pub(crate) unsafe fn as_vulkan_pipeline(resource: &Arc<Resource>) -> Result<&VulkanPipeline> {
    match resource.data() {
        ResourceData::Pipeline(pipeline) => {
            let raw = pipeline.as_ref() as *const dyn Pipeline as *const VulkanPipeline;
            Ok(&*raw)
        }
        _ => Err(Error::ResourceParse(format!(
            "resource '{}' is not a pipeline",
            resource.path()
        ))),
    }
}

fn read_spirv(manifest_path: &str, relative: &str) -> Result<Vec<u32>> {
    let path = Path::new(manifest_path)
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(relative);
    let bytes =
        std::fs::read(&path).map_err(|e| Error::ResourceLoad(format!("{}: {}", path.display(), e)))?;
    if bytes.is_empty() || bytes.len() % 4 != 0 {
        return Err(Error::ResourceParse(format!(
            "{}: SPIR-V code size {} is not a positive multiple of 4",
            path.display(),
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn create_shader_module(ctx: &GpuContext, code: &[u32]) -> Result<vk::ShaderModule> {
    let create_info = vk::ShaderModuleCreateInfo::default().code(code);
    unsafe {
        ctx.device.create_shader_module(&create_info, None).map_err(|e| {
            Error::DeviceObjectCreation(format!("failed to create shader module: {:?}", e))
        })
    }
}

/// Build the graphics pipeline a mesh-rendering manifest describes
fn create_pipeline(
    ctx: &GpuContext,
    render_pass: vk::RenderPass,
    vertex_code: &[u32],
    fragment_code: &[u32],
    vertex_stride: u32,
) -> Result<VulkanPipeline> {
    let vertex_module = create_shader_module(ctx, vertex_code)?;
    let fragment_module = create_shader_module(ctx, fragment_code).map_err(|e| {
        unsafe { ctx.device.destroy_shader_module(vertex_module, None) };
        e
    })?;

    let result = create_pipeline_objects(ctx, render_pass, vertex_module, fragment_module, vertex_stride);

    // Modules are compiled into the pipeline; they are not needed afterwards
    unsafe {
        ctx.device.destroy_shader_module(vertex_module, None);
        ctx.device.destroy_shader_module(fragment_module, None);
    }

    result
}

fn create_pipeline_objects(
    ctx: &GpuContext,
    render_pass: vk::RenderPass,
    vertex_module: vk::ShaderModule,
    fragment_module: vk::ShaderModule,
    vertex_stride: u32,
) -> Result<VulkanPipeline> {
    unsafe {
        // Per-object binding: one dynamic uniform buffer in the vertex stage
        let bindings = [vk::DescriptorSetLayoutBinding::default()
            .binding(0)
            .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC)
            .descriptor_count(1)
            .stage_flags(vk::ShaderStageFlags::VERTEX)];

        let layout_create = vk::DescriptorSetLayoutCreateInfo::default().bindings(&bindings);

        let set_layout = ctx
            .device
            .create_descriptor_set_layout(&layout_create, None)
            .map_err(|e| {
                Error::DeviceObjectCreation(format!(
                    "failed to create descriptor set layout: {:?}",
                    e
                ))
            })?;

        let set_layouts = [set_layout];
        let layout_create_info = vk::PipelineLayoutCreateInfo::default().set_layouts(&set_layouts);

        let layout = ctx
            .device
            .create_pipeline_layout(&layout_create_info, None)
            .map_err(|e| {
                ctx.device.destroy_descriptor_set_layout(set_layout, None);
                Error::DeviceObjectCreation(format!("failed to create pipeline layout: {:?}", e))
            })?;

        let shader_stages = [
            vk::PipelineShaderStageCreateInfo::default()
                .stage(vk::ShaderStageFlags::VERTEX)
                .module(vertex_module)
                .name(c"main"),
            vk::PipelineShaderStageCreateInfo::default()
                .stage(vk::ShaderStageFlags::FRAGMENT)
                .module(fragment_module)
                .name(c"main"),
        ];

        // Vertex input: one binding of interleaved position data
        let vertex_bindings = [vk::VertexInputBindingDescription {
            binding: 0,
            stride: vertex_stride,
            input_rate: vk::VertexInputRate::VERTEX,
        }];
        let vertex_attributes = [vk::VertexInputAttributeDescription {
            location: 0,
            binding: 0,
            format: vk::Format::R32G32B32_SFLOAT,
            offset: 0,
        }];
        let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::default()
            .vertex_binding_descriptions(&vertex_bindings)
            .vertex_attribute_descriptions(&vertex_attributes);

        let input_assembly_state = vk::PipelineInputAssemblyStateCreateInfo::default()
            .topology(vk::PrimitiveTopology::TRIANGLE_LIST)
            .primitive_restart_enable(false);

        // Viewport state (dynamic)
        let viewports = [vk::Viewport::default()];
        let scissors = [vk::Rect2D::default()];
        let viewport_state = vk::PipelineViewportStateCreateInfo::default()
            .viewports(&viewports)
            .scissors(&scissors);

        let rasterization_state = vk::PipelineRasterizationStateCreateInfo::default()
            .depth_clamp_enable(false)
            .rasterizer_discard_enable(false)
            .polygon_mode(vk::PolygonMode::FILL)
            .line_width(1.0)
            .cull_mode(vk::CullModeFlags::BACK)
            .front_face(vk::FrontFace::COUNTER_CLOCKWISE)
            .depth_bias_enable(false);

        let multisample_state = vk::PipelineMultisampleStateCreateInfo::default()
            .sample_shading_enable(false)
            .rasterization_samples(vk::SampleCountFlags::TYPE_1);

        let color_blend_attachment = vk::PipelineColorBlendAttachmentState::default()
            .color_write_mask(vk::ColorComponentFlags::RGBA)
            .blend_enable(false);

        let color_blend_state = vk::PipelineColorBlendStateCreateInfo::default()
            .logic_op_enable(false)
            .attachments(std::slice::from_ref(&color_blend_attachment));

        let dynamic_states = [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
        let dynamic_state =
            vk::PipelineDynamicStateCreateInfo::default().dynamic_states(&dynamic_states);

        let pipeline_create_info = vk::GraphicsPipelineCreateInfo::default()
            .stages(&shader_stages)
            .vertex_input_state(&vertex_input_state)
            .input_assembly_state(&input_assembly_state)
            .viewport_state(&viewport_state)
            .rasterization_state(&rasterization_state)
            .multisample_state(&multisample_state)
            .color_blend_state(&color_blend_state)
            .dynamic_state(&dynamic_state)
            .layout(layout)
            .render_pass(render_pass)
            .subpass(0);

        let pipelines = ctx
            .device
            .create_graphics_pipelines(vk::PipelineCache::null(), &[pipeline_create_info], None)
            .map_err(|e| {
                ctx.device.destroy_pipeline_layout(layout, None);
                ctx.device.destroy_descriptor_set_layout(set_layout, None);
                Error::DeviceObjectCreation(format!("failed to create graphics pipeline: {:?}", e.1))
            })?;

        Ok(VulkanPipeline {
            pipeline: pipelines[0],
            layout,
            set_layout,
            device: ctx.device.clone(),
        })
    }
}

/// Loader for `"type": "pipeline"` manifests.
///
/// Fields: `"vertex"` and `"fragment"` (SPIR-V files, manifest-relative) and
/// optional `"vertex_stride"` in bytes (default 12, a packed vec3 position).
///
/// Register on a cache as the `"pipeline"` tag; the pipeline targets subpass
/// 0 of the given render pass.
pub fn pipeline_loader(
    ctx: Arc<GpuContext>,
    render_pass: vk::RenderPass,
) -> impl Fn(&str, &Manifest) -> Result<ResourceData> + Send + Sync {
    move |manifest_path: &str, manifest: &Manifest| {
        let vertex_code = read_spirv(manifest_path, manifest.str_field("vertex")?)?;
        let fragment_code = read_spirv(manifest_path, manifest.str_field("fragment")?)?;
        let vertex_stride = manifest.u32_field("vertex_stride").unwrap_or(12);

        let pipeline = create_pipeline(&ctx, render_pass, &vertex_code, &fragment_code, vertex_stride)?;
        Ok(ResourceData::Pipeline(Arc::new(pipeline)))
    }
}
