use super::{PassSetting, PostPass, SceneInputs, draw_fullscreen, fullscreen_shader, sampled_bind_group, sampled_layout};
use crate::pipelines::basic::mk_fullscreen_pipeline;

/// Fast approximate anti-aliasing over the final image.
pub struct FxaaPass {
    layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
}

impl FxaaPass {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let layout = sampled_layout(device, "fxaa_bind_group_layout", 1, false);
        let pipeline = mk_fullscreen_pipeline(
            device,
            &[&layout],
            format,
            None,
            fullscreen_shader("FXAA Shader", include_str!("fxaa.wgsl")),
            "FXAA Pipeline",
        );
        Self { layout, pipeline }
    }
}

impl PostPass for FxaaPass {
    fn name(&self) -> &'static str {
        "fxaa"
    }

    // The texel size is read from the input texture itself.
    fn resize(&mut self, _device: &wgpu::Device, _queue: &wgpu::Queue, _width: u32, _height: u32) {}

    fn configure(&mut self, _queue: &wgpu::Queue, _setting: &PassSetting) -> bool {
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
            "FXAA Pass",
            &self.pipeline,
            &bind_group,
            output,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        );
    }
}
