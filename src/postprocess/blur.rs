use wgpu::util::DeviceExt;

use super::{draw_fullscreen, fullscreen_shader, sampled_bind_group, sampled_layout};
use crate::{data_structures::texture::Texture, pipelines::basic::mk_fullscreen_pipeline};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct BlurUniform {
    direction: [f32; 2],
    scale: f32,
    _pad: f32,
}

/// Separable gaussian blur: horizontal into a scratch target, vertical back out.
pub(crate) struct Blur {
    layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
    horizontal: wgpu::Buffer,
    vertical: wgpu::Buffer,
    scratch: Texture,
    format: wgpu::TextureFormat,
    size: [u32; 2],
    scale: f32,
}

impl Blur {
    pub(crate) fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: [u32; 2],
        scale: f32,
        label: &str,
    ) -> Self {
        let layout = sampled_layout(device, "blur_bind_group_layout", 1, true);
        let pipeline = mk_fullscreen_pipeline(
            device,
            &[&layout],
            format,
            None,
            fullscreen_shader("Blur Shader", include_str!("blur.wgsl")),
            label,
        );
        let [horizontal, vertical] = uniforms(size, scale).map(|uniform| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Blur Uniform Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        });
        Self {
            layout,
            pipeline,
            horizontal,
            vertical,
            scratch: Texture::create_render_target(device, size, format, "Blur Scratch"),
            format,
            size,
            scale,
        }
    }

    pub(crate) fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, size: [u32; 2]) {
        self.size = size;
        self.scratch = Texture::create_render_target(device, size, self.format, "Blur Scratch");
        self.write(queue);
    }

    pub(crate) fn set_scale(&mut self, queue: &wgpu::Queue, scale: f32) {
        self.scale = scale;
        self.write(queue);
    }

    fn write(&self, queue: &wgpu::Queue) {
        let [h, v] = uniforms(self.size, self.scale);
        queue.write_buffer(&self.horizontal, 0, bytemuck::cast_slice(&[h]));
        queue.write_buffer(&self.vertical, 0, bytemuck::cast_slice(&[v]));
    }

    pub(crate) fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        device: &wgpu::Device,
        source: &wgpu::TextureView,
        target: &wgpu::TextureView,
    ) {
        let first = sampled_bind_group(device, &self.layout, &[source], Some(&self.horizontal));
        draw_fullscreen(
            encoder,
            "Blur Horizontal",
            &self.pipeline,
            &first,
            &self.scratch.view,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        );
        let second = sampled_bind_group(device, &self.layout, &[&self.scratch.view], Some(&self.vertical));
        draw_fullscreen(
            encoder,
            "Blur Vertical",
            &self.pipeline,
            &second,
            target,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        );
    }
}

fn uniforms(size: [u32; 2], scale: f32) -> [BlurUniform; 2] {
    let texel = [1.0 / size[0].max(1) as f32, 1.0 / size[1].max(1) as f32];
    [
        BlurUniform {
            direction: [texel[0], 0.0],
            scale,
            _pad: 0.0,
        },
        BlurUniform {
            direction: [0.0, texel[1]],
            scale,
            _pad: 0.0,
        },
    ]
}
