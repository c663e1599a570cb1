//! egui overlay drawn on top of the post-processed frame.
//!
//! [`Overlay`] bundles the egui context with its winit input state and wgpu
//! renderer. Each frame the flows build their UI through [`Overlay::run`], the
//! resulting shapes are painted with [`Overlay::paint`] after the last
//! post-processing pass wrote the surface.

use winit::{event::WindowEvent, window::Window};

pub struct Overlay {
    ctx: egui::Context,
    input: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Overlay")
    }
}

impl Overlay {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();
        let input = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(device.limits().max_texture_dimension_2d as usize),
        );
        let renderer =
            egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());
        Self {
            ctx,
            input,
            renderer,
        }
    }

    /// Feed a window event to egui; returns whether a widget consumed it.
    pub fn handle_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.input.on_window_event(window, event).consumed
    }

    /// Run one UI frame.
    pub fn run(&mut self, window: &Window, build: impl FnMut(&egui::Context)) -> egui::FullOutput {
        let raw_input = self.input.take_egui_input(window);
        let mut output = self.ctx.run(raw_input, build);
        let platform_output = std::mem::take(&mut output.platform_output);
        self.input.handle_platform_output(window, platform_output);
        output
    }

    /// Upload the font and image textures `output` asks for.
    ///
    /// Deltas are only sent once, so this runs even for frames that never
    /// reach [`Overlay::paint`].
    pub fn update_textures(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        output: &egui::FullOutput,
    ) {
        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
    }

    /// Paint `output` over `view`; its textures must have been updated.
    ///
    /// Returns the command buffers egui filled while uploading its vertex
    /// data; they have to be submitted before `encoder`.
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        output: egui::FullOutput,
    ) -> Vec<wgpu::CommandBuffer> {
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: output.pixels_per_point,
        };
        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        let uploads = self
            .renderer
            .update_buffers(device, queue, encoder, &primitives, &screen);

        if !primitives.is_empty() {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            self.renderer.render(&mut render_pass, &primitives, &screen);
        }

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
        uploads
    }
}
