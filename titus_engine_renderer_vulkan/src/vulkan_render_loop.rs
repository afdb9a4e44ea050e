/// RenderLoop - per-frame record/submit cycle over collaborator-supplied
/// presentation objects
///
/// The loop owns no swapchain: render pass, framebuffers, extent and the
/// per-frame command buffers are created by the integrating application and
/// handed in. Each frame is re-recorded from scratch (the command pool the
/// buffers came from must allow reset), drawn through a [`MeshRenderer`],
/// then submitted.
///
/// Frame pacing is the caller's job: before `begin_frame` re-records a
/// frame's command buffer, the fence guarding that frame's previous
/// submission must have signalled.

use ash::vk;
use std::sync::Arc;

use titus_engine::glam::Mat4;
use titus_engine::{engine_bail, engine_err, DrawItem, Result};

use crate::vulkan_context::GpuContext;
use crate::vulkan_mesh_renderer::MeshRenderer;

/// Where the active frame is in its record/submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// No commands recorded since the last submit (or ever)
    Idle,
    /// begin_frame has recorded the active command buffer
    CommandsRecorded,
    /// end_frame has submitted; the next begin_frame starts a new frame
    Submitted,
}

/// Drives the per-frame render cycle
pub struct RenderLoop {
    ctx: Arc<GpuContext>,
    render_pass: vk::RenderPass,
    framebuffers: Vec<vk::Framebuffer>,
    extent: vk::Extent2D,
    command_buffers: Vec<vk::CommandBuffer>,
    clear_color: [f32; 4],
    state: FrameState,
    current_frame: usize,
    /// Monotonic frame counter, fed to slot reclamation
    frame_counter: u64,
}

impl RenderLoop {
    /// Create a render loop over existing presentation objects.
    ///
    /// `framebuffers` and `command_buffers` must pair up one per frame in
    /// flight.
    pub fn new(
        ctx: Arc<GpuContext>,
        render_pass: vk::RenderPass,
        framebuffers: Vec<vk::Framebuffer>,
        extent: vk::Extent2D,
        command_buffers: Vec<vk::CommandBuffer>,
        clear_color: [f32; 4],
    ) -> Result<Self> {
        if framebuffers.is_empty() || framebuffers.len() != command_buffers.len() {
            engine_bail!(
                "titus::RenderLoop",
                "frame resources mismatched: {} framebuffers, {} command buffers",
                framebuffers.len(),
                command_buffers.len()
            );
        }

        Ok(Self {
            ctx,
            render_pass,
            framebuffers,
            extent,
            command_buffers,
            clear_color,
            state: FrameState::Idle,
            current_frame: 0,
            frame_counter: 0,
        })
    }

    /// Re-record the active frame's command buffer.
    ///
    /// Begins the render pass on the active framebuffer, delegates the draw
    /// list to `mesh_renderer`, then ends the pass. Valid from `Idle` or
    /// `Submitted`; calling it twice without an intervening `end_frame`
    /// fails.
    pub fn begin_frame(
        &mut self,
        mesh_renderer: &MeshRenderer,
        draw_list: &[DrawItem],
        view_proj: Mat4,
    ) -> Result<()> {
        if self.state == FrameState::CommandsRecorded {
            engine_bail!(
                "titus::RenderLoop",
                "begin_frame called twice without end_frame (frame {})",
                self.frame_counter
            );
        }

        let command_buffer = self.command_buffers[self.current_frame];
        let framebuffer = self.framebuffers[self.current_frame];

        unsafe {
            let begin_info = vk::CommandBufferBeginInfo::default();
            self.ctx
                .device
                .begin_command_buffer(command_buffer, &begin_info)
                .map_err(|e| {
                    engine_err!("titus::RenderLoop", "Failed to begin command buffer: {:?}", e)
                })?;

            let clear_values = [vk::ClearValue {
                color: vk::ClearColorValue {
                    float32: self.clear_color,
                },
            }];
            let render_area = vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent: self.extent,
            };
            let render_pass_begin = vk::RenderPassBeginInfo::default()
                .render_pass(self.render_pass)
                .framebuffer(framebuffer)
                .render_area(render_area)
                .clear_values(&clear_values);

            self.ctx.device.cmd_begin_render_pass(
                command_buffer,
                &render_pass_begin,
                vk::SubpassContents::INLINE,
            );

            // Pipelines leave viewport and scissor dynamic
            let viewport = vk::Viewport {
                x: 0.0,
                y: 0.0,
                width: self.extent.width as f32,
                height: self.extent.height as f32,
                min_depth: 0.0,
                max_depth: 1.0,
            };
            self.ctx
                .device
                .cmd_set_viewport(command_buffer, 0, &[viewport]);
            self.ctx
                .device
                .cmd_set_scissor(command_buffer, 0, &[render_area]);

            let draw_result = mesh_renderer.draw(
                self.current_frame as u32,
                command_buffer,
                draw_list,
                view_proj,
            );

            self.ctx.device.cmd_end_render_pass(command_buffer);

            // Close the buffer even when the draw failed so it never stays
            // in the recording state
            let end_result = self
                .ctx
                .device
                .end_command_buffer(command_buffer)
                .map_err(|e| {
                    engine_err!("titus::RenderLoop", "Failed to end command buffer: {:?}", e)
                });

            draw_result?;
            end_result?;
        }

        self.state = FrameState::CommandsRecorded;
        Ok(())
    }

    /// Submit the recorded frame and advance to the next frame slot.
    ///
    /// `fence` (optionally null) signals when the submission retires; the
    /// caller waits on it before re-recording this slot. Valid only from
    /// `CommandsRecorded`.
    pub fn end_frame(&mut self, fence: vk::Fence) -> Result<()> {
        if self.state != FrameState::CommandsRecorded {
            engine_bail!(
                "titus::RenderLoop",
                "end_frame called with no recorded commands (state {:?})",
                self.state
            );
        }

        let command_buffers = [self.command_buffers[self.current_frame]];
        let submit_info = vk::SubmitInfo::default().command_buffers(&command_buffers);

        unsafe {
            self.ctx
                .device
                .queue_submit(self.ctx.graphics_queue, &[submit_info], fence)
                .map_err(|e| {
                    engine_err!("titus::RenderLoop", "Failed to submit frame: {:?}", e)
                })?;
        }

        self.state = FrameState::Submitted;
        self.current_frame = (self.current_frame + 1) % self.command_buffers.len();
        self.frame_counter += 1;
        Ok(())
    }

    /// Index of the frame slot the next `begin_frame` records into
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Total frames submitted since creation
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Number of frame slots
    pub fn frame_count(&self) -> usize {
        self.command_buffers.len()
    }

    /// Current position in the record/submit cycle
    pub fn state(&self) -> FrameState {
        self.state
    }
}
