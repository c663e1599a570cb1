use super::{PostPass, SceneInputs, draw_fullscreen, fullscreen_shader, sampled_bind_group, sampled_layout};
use crate::pipelines::basic::mk_fullscreen_pipeline;

/// Copies its input unchanged; presents the scene when no other pass exists.
pub struct BlitPass {
    layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
}

impl BlitPass {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let layout = sampled_layout(device, "blit_bind_group_layout", 1, false);
        let pipeline = mk_fullscreen_pipeline(
            device,
            &[&layout],
            format,
            None,
            fullscreen_shader("Blit Shader", include_str!("blit.wgsl")),
            "Blit Pipeline",
        );
        Self { layout, pipeline }
    }
}

impl PostPass for BlitPass {
    fn name(&self) -> &'static str {
        "blit"
    }

    fn resize(&mut self, _device: &wgpu::Device, _queue: &wgpu::Queue, _width: u32, _height: u32) {}

    fn configure(&mut self, _queue: &wgpu::Queue, _setting: &super::PassSetting) -> bool {
        false
    }

    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        device: &wgpu::Device,
        _scene: &SceneInputs,
        input: &wgpu::TextureView,
        output: &wgpu::TextureView,
    ) {
        let bind_group = sampled_bind_group(device, &self.layout, &[input], None);
        draw_fullscreen(
            encoder,
            "Blit Pass",
            &self.pipeline,
            &bind_group,
            output,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        );
    }
}
