use serde::{Deserialize, Serialize};
use wgpu::util::DeviceExt;

use super::{
    PassSetting, PostPass, SceneInputs, blur::Blur, draw_fullscreen, fullscreen_shader,
    half_size, sampled_bind_group, sampled_layout,
};
use crate::{data_structures::texture::Texture, pipelines::basic::mk_fullscreen_pipeline};

/// Thresholded additive glow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomParams {
    pub strength: f32,
    /// Blur spread in half-resolution texels per tap.
    pub radius: f32,
    /// Luminance above which pixels start to glow.
    pub threshold: f32,
}

impl Default for BloomParams {
    fn default() -> Self {
        Self {
            strength: 0.35,
            radius: 0.4,
            threshold: 0.85,
        }
    }
}

impl BloomParams {
    fn blur_scale(&self) -> f32 {
        1.0 + 4.0 * self.radius.max(0.0)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ThresholdUniform {
    threshold: f32,
    knee: f32,
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CompositeUniform {
    strength: f32,
    _pad: [f32; 3],
}

fn threshold_uniform(params: &BloomParams) -> ThresholdUniform {
    ThresholdUniform {
        threshold: params.threshold,
        knee: 0.1,
        _pad: [0.0; 2],
    }
}

fn composite_uniform(params: &BloomParams) -> CompositeUniform {
    CompositeUniform {
        strength: params.strength.max(0.0),
        _pad: [0.0; 3],
    }
}

pub struct BloomPass {
    params: BloomParams,
    format: wgpu::TextureFormat,
    bright: Texture,
    threshold_layout: wgpu::BindGroupLayout,
    threshold_pipeline: wgpu::RenderPipeline,
    threshold_buffer: wgpu::Buffer,
    blur: Blur,
    composite_layout: wgpu::BindGroupLayout,
    composite_pipeline: wgpu::RenderPipeline,
    composite_buffer: wgpu::Buffer,
}

impl BloomPass {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        size: [u32; 2],
        params: BloomParams,
    ) -> Self {
        let bright_size = half_size(size);
        let threshold_layout = sampled_layout(device, "bloom_threshold_bind_group_layout", 1, true);
        let threshold_pipeline = mk_fullscreen_pipeline(
            device,
            &[&threshold_layout],
            format,
            None,
            fullscreen_shader("Bloom Threshold Shader", include_str!("bloom_threshold.wgsl")),
            "Bloom Threshold Pipeline",
        );
        let threshold_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Bloom Threshold Buffer"),
            contents: bytemuck::cast_slice(&[threshold_uniform(&params)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let composite_layout = sampled_layout(device, "bloom_composite_bind_group_layout", 2, true);
        let composite_pipeline = mk_fullscreen_pipeline(
            device,
            &[&composite_layout],
            format,
            None,
            fullscreen_shader("Bloom Composite Shader", include_str!("bloom_composite.wgsl")),
            "Bloom Composite Pipeline",
        );
        let composite_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Bloom Composite Buffer"),
            contents: bytemuck::cast_slice(&[composite_uniform(&params)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let mut blur = Blur::new(device, format, bright_size, params.blur_scale(), "Bloom Blur Pipeline");
        blur.set_scale(queue, params.blur_scale());
        Self {
            format,
            bright: Texture::create_render_target(device, bright_size, format, "Bloom Bright"),
            threshold_layout,
            threshold_pipeline,
            threshold_buffer,
            blur,
            composite_layout,
            composite_pipeline,
            composite_buffer,
            params,
        }
    }

    pub fn params(&self) -> &BloomParams {
        &self.params
    }
}

impl PostPass for BloomPass {
    fn name(&self) -> &'static str {
        "bloom"
    }

    fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) {
        let bright_size = half_size([width, height]);
        self.bright = Texture::create_render_target(device, bright_size, self.format, "Bloom Bright");
        self.blur.resize(device, queue, bright_size);
    }

    fn configure(&mut self, queue: &wgpu::Queue, setting: &PassSetting) -> bool {
        let PassSetting::Bloom(params) = setting else {
            return false;
        };
        self.params = params.clone();
        queue.write_buffer(
            &self.threshold_buffer,
            0,
            bytemuck::cast_slice(&[threshold_uniform(&self.params)]),
        );
        queue.write_buffer(
            &self.composite_buffer,
            0,
            bytemuck::cast_slice(&[composite_uniform(&self.params)]),
        );
        self.blur.set_scale(queue, self.params.blur_scale());
        true
    }

    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        device: &wgpu::Device,
        _scene: &SceneInputs,
        input: &wgpu::TextureView,
        output: &wgpu::TextureView,
    ) {
        let threshold_group =
            sampled_bind_group(device, &self.threshold_layout, &[input], Some(&self.threshold_buffer));
        draw_fullscreen(
            encoder,
            "Bloom Threshold Pass",
            &self.threshold_pipeline,
            &threshold_group,
            &self.bright.view,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        );
        self.blur.render(encoder, device, &self.bright.view, &self.bright.view);
        let composite_group = sampled_bind_group(
            device,
            &self.composite_layout,
            &[input, &self.bright.view],
            Some(&self.composite_buffer),
        );
        draw_fullscreen(
            encoder,
            "Bloom Composite Pass",
            &self.composite_pipeline,
            &composite_group,
            output,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        );
    }
}
