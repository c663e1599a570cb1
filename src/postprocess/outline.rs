//! Coloured outline around selected meshes.
//!
//! Outlined meshes are drawn flat white into a mask, the mask edge is found
//! with a radius that grows with `edge_thickness`, the edge is optionally
//! blurred into a glow, and both are added onto the scene in the edge colour.

use serde::{Deserialize, Serialize};
use wgpu::util::DeviceExt;

use super::{
    PassSetting, PostPass, SceneInputs, blur::Blur, draw_fullscreen, fullscreen_shader,
    half_size, sampled_bind_group, sampled_layout,
};
use crate::{
    color::Rgb,
    data_structures::{model::DrawSilhouette, texture::Texture},
    pipelines::basic::{mk_fullscreen_pipeline, mk_silhouette_pipeline},
};

const MASK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutlineParams {
    pub visible_edge_color: Rgb,
    pub edge_strength: f32,
    pub edge_thickness: f32,
    pub edge_glow: f32,
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self {
            visible_edge_color: Rgb::from_u32(0xaa87f4),
            edge_strength: 1.5,
            edge_thickness: 0.1,
            edge_glow: 0.0,
        }
    }
}

impl OutlineParams {
    /// Edge search radius in pixels.
    pub fn radius_px(&self) -> f32 {
        1.0 + 2.0 * self.edge_thickness.max(0.0)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct EdgeUniform {
    texel: [f32; 2],
    radius: f32,
    _pad: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CompositeUniform {
    color: [f32; 3],
    strength: f32,
    glow: f32,
    _pad: [f32; 3],
}

impl From<&OutlineParams> for CompositeUniform {
    fn from(params: &OutlineParams) -> Self {
        Self {
            color: params.visible_edge_color.to_linear(),
            strength: params.edge_strength.max(0.0),
            glow: params.edge_glow.max(0.0),
            _pad: [0.0; 3],
        }
    }
}

pub struct OutlinePass {
    params: OutlineParams,
    size: [u32; 2],
    silhouette: wgpu::RenderPipeline,
    mask: Texture,
    edge: Texture,
    glow: Texture,
    edge_layout: wgpu::BindGroupLayout,
    edge_pipeline: wgpu::RenderPipeline,
    edge_buffer: wgpu::Buffer,
    glow_blur: Blur,
    composite_layout: wgpu::BindGroupLayout,
    composite_pipeline: wgpu::RenderPipeline,
    composite_buffer: wgpu::Buffer,
}

impl OutlinePass {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        size: [u32; 2],
        params: OutlineParams,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let silhouette = mk_silhouette_pipeline(device, MASK_FORMAT, camera_layout);

        let edge_layout = sampled_layout(device, "outline_edge_bind_group_layout", 1, true);
        let edge_pipeline = mk_fullscreen_pipeline(
            device,
            &[&edge_layout],
            MASK_FORMAT,
            None,
            fullscreen_shader("Outline Edge Shader", include_str!("outline_edge.wgsl")),
            "Outline Edge Pipeline",
        );
        let edge_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Outline Edge Buffer"),
            contents: bytemuck::cast_slice(&[edge_uniform(size, &params)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let composite_layout = sampled_layout(device, "outline_composite_bind_group_layout", 3, true);
        let composite_pipeline = mk_fullscreen_pipeline(
            device,
            &[&composite_layout],
            format,
            None,
            fullscreen_shader("Outline Composite Shader", include_str!("outline_composite.wgsl")),
            "Outline Composite Pipeline",
        );
        let composite_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Outline Composite Buffer"),
            contents: bytemuck::cast_slice(&[CompositeUniform::from(&params)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let glow_size = half_size(size);
        let mut pass = Self {
            size,
            silhouette,
            mask: Texture::create_render_target(device, size, MASK_FORMAT, "Outline Mask"),
            edge: Texture::create_render_target(device, size, MASK_FORMAT, "Outline Edge"),
            glow: Texture::create_render_target(device, glow_size, MASK_FORMAT, "Outline Glow"),
            edge_layout,
            edge_pipeline,
            edge_buffer,
            glow_blur: Blur::new(device, MASK_FORMAT, glow_size, 1.0, "Outline Glow Blur Pipeline"),
            composite_layout,
            composite_pipeline,
            composite_buffer,
            params,
        };
        pass.write(queue);
        pass
    }

    pub fn params(&self) -> &OutlineParams {
        &self.params
    }

    fn write(&mut self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.edge_buffer,
            0,
            bytemuck::cast_slice(&[edge_uniform(self.size, &self.params)]),
        );
        queue.write_buffer(
            &self.composite_buffer,
            0,
            bytemuck::cast_slice(&[CompositeUniform::from(&self.params)]),
        );
        self.glow_blur.set_scale(queue, self.params.radius_px());
    }
}

fn edge_uniform(size: [u32; 2], params: &OutlineParams) -> EdgeUniform {
    EdgeUniform {
        texel: [1.0 / size[0].max(1) as f32, 1.0 / size[1].max(1) as f32],
        radius: params.radius_px(),
        _pad: 0.0,
    }
}

impl PostPass for OutlinePass {
    fn name(&self) -> &'static str {
        "outline"
    }

    fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) {
        self.size = [width, height];
        self.mask = Texture::create_render_target(device, self.size, MASK_FORMAT, "Outline Mask");
        self.edge = Texture::create_render_target(device, self.size, MASK_FORMAT, "Outline Edge");
        let glow_size = half_size(self.size);
        self.glow = Texture::create_render_target(device, glow_size, MASK_FORMAT, "Outline Glow");
        self.glow_blur.resize(device, queue, glow_size);
        self.write(queue);
    }

    fn configure(&mut self, queue: &wgpu::Queue, setting: &PassSetting) -> bool {
        match setting {
            PassSetting::Outline(params) => {
                self.params = params.clone();
                self.write(queue);
                true
            }
            _ => false,
        }
    }

    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        device: &wgpu::Device,
        scene: &SceneInputs,
        input: &wgpu::TextureView,
        output: &wgpu::TextureView,
    ) {
        {
            let mut mask_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Outline Mask Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.mask.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                multiview_mask: None,
                timestamp_writes: None,
            });
            mask_pass.set_pipeline(&self.silhouette);
            for instanced in scene.outlined {
                if instanced.amount == 0 {
                    continue;
                }
                mask_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                mask_pass.draw_silhouette(
                    instanced.model,
                    0..instanced.amount as u32,
                    scene.camera_bind_group,
                );
            }
        }

        let edge_group = sampled_bind_group(device, &self.edge_layout, &[&self.mask.view], Some(&self.edge_buffer));
        draw_fullscreen(
            encoder,
            "Outline Edge Pass",
            &self.edge_pipeline,
            &edge_group,
            &self.edge.view,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        );

        if self.params.edge_glow > 0.0 {
            self.glow_blur.render(encoder, device, &self.edge.view, &self.glow.view);
        }

        let composite_group = sampled_bind_group(
            device,
            &self.composite_layout,
            &[input, &self.edge.view, &self.glow.view],
            Some(&self.composite_buffer),
        );
        draw_fullscreen(
            encoder,
            "Outline Composite Pass",
            &self.composite_pipeline,
            &composite_group,
            output,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        );
    }
}
