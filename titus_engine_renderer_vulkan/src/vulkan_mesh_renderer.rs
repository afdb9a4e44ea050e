/// MeshRenderer - per-frame GPU state for drawing a list of meshes
///
/// Owns one dynamic uniform array and one descriptor set per frame in
/// flight, all bound to a single shared pipeline resource. Frames alternate
/// through the slots so the CPU can write frame N+1's transforms while the
/// GPU still reads frame N's.
///
/// The caller is responsible for frame pacing: a slot must not be recorded
/// into until the fence of its previous use has signalled, and a retired
/// instance index must wait out the in-flight window before reuse (the
/// engine's SlotAllocator implements that discipline).

use ash::vk;
use std::sync::Arc;

use titus_engine::{
    engine_warn, Buffer as RendererBuffer, DrawItem, DynamicUniformArray, Error, Resource,
    ResourceCache, Result,
};
use titus_engine::glam::Mat4;

use crate::vulkan_buffer::Buffer;
use crate::vulkan_context::GpuContext;
use crate::vulkan_pipeline::{as_vulkan_pipeline, VulkanPipeline};
use crate::vulkan_renderer::VulkanRenderer;

/// One frame-in-flight's uniform storage and its descriptor set
struct FrameSlot {
    uniforms: DynamicUniformArray<Mat4>,
    descriptor_set: vk::DescriptorSet,
}

/// Renders a draw list of mesh resources with per-object transforms
pub struct MeshRenderer {
    ctx: Arc<GpuContext>,
    /// Shared pipeline resource; held strongly so the cache keeps it live
    pipeline: Arc<Resource>,
    descriptor_pool: vk::DescriptorPool,
    slots: Vec<FrameSlot>,
}

impl MeshRenderer {
    /// Create per-frame rendering state for up to `max_objects` meshes.
    ///
    /// Fetches the pipeline resource at `pipeline_path` through the cache
    /// (loading it on first use), then creates `frame_count` uniform arrays,
    /// a descriptor pool sized for them, and one descriptor set per frame
    /// written against its array's buffer.
    pub fn new(
        renderer: &mut VulkanRenderer,
        cache: &mut ResourceCache,
        pipeline_path: &str,
        max_objects: u32,
        frame_count: u32,
    ) -> Result<Self> {
        if frame_count == 0 {
            return Err(Error::DeviceObjectCreation(
                "mesh renderer needs at least one frame in flight".to_string(),
            ));
        }

        let ctx = renderer.context().clone();
        let pipeline = cache.get(pipeline_path)?;
        let set_layout = unsafe { as_vulkan_pipeline(&pipeline)?.set_layout };

        let mut uniform_arrays = Vec::with_capacity(frame_count as usize);
        for _ in 0..frame_count {
            uniform_arrays.push(DynamicUniformArray::<Mat4>::new(renderer, max_objects)?);
        }

        let pool_sizes = [vk::DescriptorPoolSize {
            ty: vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC,
            descriptor_count: frame_count,
        }];
        let pool_info = vk::DescriptorPoolCreateInfo::default()
            .pool_sizes(&pool_sizes)
            .max_sets(frame_count);

        unsafe {
            let descriptor_pool = ctx
                .device
                .create_descriptor_pool(&pool_info, None)
                .map_err(|e| {
                    Error::DeviceObjectCreation(format!(
                        "failed to create descriptor pool for {} frames: {:?}",
                        frame_count, e
                    ))
                })?;

            // One set per frame from the pipeline's layout; on failure the
            // pool goes with everything allocated from it
            let set_layouts = vec![set_layout; frame_count as usize];
            let allocate_info = vk::DescriptorSetAllocateInfo::default()
                .descriptor_pool(descriptor_pool)
                .set_layouts(&set_layouts);

            let descriptor_sets = match ctx.device.allocate_descriptor_sets(&allocate_info) {
                Ok(sets) => sets,
                Err(e) => {
                    ctx.device.destroy_descriptor_pool(descriptor_pool, None);
                    return Err(Error::DeviceObjectCreation(format!(
                        "failed to allocate {} descriptor sets: {:?}",
                        frame_count, e
                    )));
                }
            };

            let mut slots = Vec::with_capacity(frame_count as usize);
            for (uniforms, descriptor_set) in uniform_arrays.into_iter().zip(descriptor_sets) {
                let vk_buffer =
                    uniforms.buffer().as_ref() as *const dyn RendererBuffer as *const Buffer;
                let buffer_info = vk::DescriptorBufferInfo::default()
                    .buffer((*vk_buffer).buffer)
                    .offset(0)
                    .range(std::mem::size_of::<Mat4>() as u64);

                let write = vk::WriteDescriptorSet::default()
                    .dst_set(descriptor_set)
                    .dst_binding(0)
                    .dst_array_element(0)
                    .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC)
                    .buffer_info(std::slice::from_ref(&buffer_info));

                ctx.device.update_descriptor_sets(&[write], &[]);

                slots.push(FrameSlot {
                    uniforms,
                    descriptor_set,
                });
            }

            Ok(Self {
                ctx,
                pipeline,
                descriptor_pool,
                slots,
            })
        }
    }

    /// Number of frame slots (frames in flight)
    pub fn frame_count(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Maximum number of simultaneously drawable objects
    pub fn max_objects(&self) -> u32 {
        self.slots[0].uniforms.capacity()
    }

    /// Record draw commands for one frame into `command_buffer`.
    ///
    /// Binds the shared pipeline once, then per item writes
    /// `view_proj * transform` into the frame slot's uniform array at the
    /// item's instance index and issues an indexed draw with the matching
    /// dynamic offset.
    ///
    /// Items that cannot be drawn (index out of range, resource not a mesh,
    /// uniform write failure) are dropped with a warning; the rest of the
    /// frame still renders.
    pub fn draw(
        &self,
        frame: u32,
        command_buffer: vk::CommandBuffer,
        draw_list: &[DrawItem],
        view_proj: Mat4,
    ) -> Result<()> {
        let slot = self.slots.get(frame as usize).ok_or(Error::IndexOutOfRange {
            index: frame,
            capacity: self.slots.len() as u32,
        })?;

        let vk_pipeline = unsafe { as_vulkan_pipeline(&self.pipeline)? };

        unsafe {
            self.ctx.device.cmd_bind_pipeline(
                command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                vk_pipeline.pipeline,
            );

            for item in draw_list {
                if let Err(e) = self.draw_item(slot, vk_pipeline, command_buffer, item, view_proj) {
                    engine_warn!(
                        "titus::MeshRenderer",
                        "skipping draw of '{}': {}",
                        item.mesh.path(),
                        e
                    );
                }
            }
        }

        Ok(())
    }

    unsafe fn draw_item(
        &self,
        slot: &FrameSlot,
        vk_pipeline: &VulkanPipeline,
        command_buffer: vk::CommandBuffer,
        item: &DrawItem,
        view_proj: Mat4,
    ) -> Result<()> {
        let mesh = item.mesh.as_mesh().ok_or_else(|| {
            Error::ResourceParse(format!("resource '{}' is not a mesh", item.mesh.path()))
        })?;

        slot.uniforms
            .update(item.instance_index, &(view_proj * item.transform))?;

        self.ctx.device.cmd_bind_descriptor_sets(
            command_buffer,
            vk::PipelineBindPoint::GRAPHICS,
            vk_pipeline.layout,
            0,
            &[slot.descriptor_set],
            &[slot.uniforms.offset_of(item.instance_index) as u32],
        );

        let vertex_buffer =
            mesh.vertex_buffer.as_ref() as *const dyn RendererBuffer as *const Buffer;
        let index_buffer =
            mesh.index_buffer.as_ref() as *const dyn RendererBuffer as *const Buffer;

        self.ctx.device.cmd_bind_vertex_buffers(
            command_buffer,
            0,
            &[(*vertex_buffer).buffer],
            &[0],
        );
        self.ctx.device.cmd_bind_index_buffer(
            command_buffer,
            (*index_buffer).buffer,
            0,
            vk::IndexType::UINT16,
        );
        self.ctx
            .device
            .cmd_draw_indexed(command_buffer, mesh.index_count, 1, 0, 0, 0);

        Ok(())
    }
}

impl Drop for MeshRenderer {
    fn drop(&mut self) {
        unsafe {
            // Frees every descriptor set allocated from it
            self.ctx
                .device
                .destroy_descriptor_pool(self.descriptor_pool, None);
        }
    }
}
