//! Screen-space post-processing.
//!
//! The base scene render lands in offscreen target A. Every enabled pass then
//! reads the previous result and writes the next one, alternating between the
//! targets A and B, and the last pass writes straight to the surface:
//!
//! ```text
//!   scene ─▶ A ─▶ outline ─▶ B ─▶ bloom ─▶ A ─▶ fxaa ─▶ surface
//! ```
//!
//! Which passes exist is decided once at construction; their parameters can be
//! changed at runtime through [`PostChain::configure`]. Without any pass a plain
//! blit presents target A.

mod blit;
mod blur;
mod bloom;
mod fxaa;
mod outline;

use serde::{Deserialize, Serialize};

pub use blit::BlitPass;
pub use bloom::{BloomParams, BloomPass};
pub use fxaa::FxaaPass;
pub use outline::{OutlineParams, OutlinePass};

use crate::{data_structures::texture::Texture, render::Instanced};

/// Which passes the chain is built with, in this fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostSelection {
    pub outline: bool,
    pub bloom: bool,
    pub fxaa: bool,
}

impl Default for PostSelection {
    fn default() -> Self {
        Self {
            outline: true,
            bloom: false,
            fxaa: true,
        }
    }
}

/// A runtime parameter change addressed to one kind of pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PassSetting {
    Outline(OutlineParams),
    Bloom(BloomParams),
}

/// Scene data a pass may need besides its input image.
pub struct SceneInputs<'a> {
    /// Meshes that get an outline.
    pub outlined: &'a [Instanced<'a>],
    pub camera_bind_group: &'a wgpu::BindGroup,
}

pub trait PostPass {
    fn name(&self) -> &'static str;

    /// Recreate size dependent resources.
    fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32);

    /// Apply a setting if it is addressed to this pass; returns whether it was.
    fn configure(&mut self, queue: &wgpu::Queue, setting: &PassSetting) -> bool;

    /// Record the pass: read `input`, write the full `output`.
    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        device: &wgpu::Device,
        scene: &SceneInputs,
        input: &wgpu::TextureView,
        output: &wgpu::TextureView,
    );
}

/// Where a pass reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
    Surface,
}

/// `(input, output)` of every step for a chain of `passes` passes.
///
/// With no passes the single step is the presenting blit.
pub fn ping_pong_plan(passes: usize) -> Vec<(Slot, Slot)> {
    if passes == 0 {
        return vec![(Slot::A, Slot::Surface)];
    }
    (0..passes)
        .map(|i| {
            let input = if i % 2 == 0 { Slot::A } else { Slot::B };
            let output = if i + 1 == passes {
                Slot::Surface
            } else if i % 2 == 0 {
                Slot::B
            } else {
                Slot::A
            };
            (input, output)
        })
        .collect()
}

/// Offscreen targets, the transmission copy of the scene and the ordered passes.
pub struct PostChain {
    pub format: wgpu::TextureFormat,
    targets: [Texture; 2],
    pub depth: Texture,
    transmission: Texture,
    pub transmission_layout: wgpu::BindGroupLayout,
    pub transmission_bind_group: wgpu::BindGroup,
    passes: Vec<Box<dyn PostPass>>,
    blit: BlitPass,
}

impl std::fmt::Debug for PostChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostChain")
            .field("format", &self.format)
            .field("passes", &self.describe())
            .finish()
    }
}

impl PostChain {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        size: [u32; 2],
        selection: &PostSelection,
        outline: &OutlineParams,
        bloom: &BloomParams,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let transmission_layout = sampled_layout(device, "transmission_bind_group_layout", 1, false);
        let targets = mk_targets(device, format, size);
        let transmission = Texture::create_render_target(device, size, format, "Transmission Texture");
        let transmission_bind_group =
            sampled_bind_group(device, &transmission_layout, &[&transmission.view], None);

        let mut passes: Vec<Box<dyn PostPass>> = Vec::new();
        if selection.outline {
            passes.push(Box::new(OutlinePass::new(
                device,
                queue,
                format,
                size,
                outline.clone(),
                camera_layout,
            )));
        }
        if selection.bloom {
            passes.push(Box::new(BloomPass::new(device, queue, format, size, bloom.clone())));
        }
        if selection.fxaa {
            passes.push(Box::new(FxaaPass::new(device, format)));
        }
        log::info!("Post-processing chain: scene -> {:?}", passes.iter().map(|p| p.name()).collect::<Vec<_>>());

        Self {
            format,
            depth: Texture::create_depth_texture(device, size, "depth_texture"),
            targets,
            transmission,
            transmission_layout,
            transmission_bind_group,
            passes,
            blit: BlitPass::new(device, format),
        }
    }

    /// Pass names in execution order.
    pub fn describe(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Where the base scene is rendered.
    pub fn scene_target(&self) -> &Texture {
        &self.targets[0]
    }

    /// Snapshot the current scene so glass can sample what lies behind it.
    pub fn copy_scene_to_transmission(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_texture_to_texture(
            self.targets[0].texture.as_image_copy(),
            self.transmission.texture.as_image_copy(),
            self.targets[0].texture.size(),
        );
    }

    pub fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) {
        let size = [width, height];
        self.targets = mk_targets(device, self.format, size);
        self.depth = Texture::create_depth_texture(device, size, "depth_texture");
        self.transmission = Texture::create_render_target(device, size, self.format, "Transmission Texture");
        self.transmission_bind_group = sampled_bind_group(
            device,
            &self.transmission_layout,
            &[&self.transmission.view],
            None,
        );
        for pass in self.passes.iter_mut() {
            pass.resize(device, queue, width, height);
        }
    }

    /// Hand a setting to the passes; returns whether any of them took it.
    pub fn configure(&mut self, queue: &wgpu::Queue, setting: &PassSetting) -> bool {
        let mut applied = false;
        for pass in self.passes.iter_mut() {
            applied |= pass.configure(queue, setting);
        }
        if !applied {
            log::debug!("No pass in the chain takes {:?}", setting);
        }
        applied
    }

    /// Run every pass after the base scene render and present to `surface`.
    pub fn execute(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        device: &wgpu::Device,
        scene: &SceneInputs,
        surface: &wgpu::TextureView,
    ) {
        let view = |slot: Slot| match slot {
            Slot::A => &self.targets[0].view,
            Slot::B => &self.targets[1].view,
            Slot::Surface => surface,
        };
        let plan = ping_pong_plan(self.passes.len());
        if self.passes.is_empty() {
            let (input, output) = plan[0];
            self.blit.render(encoder, device, scene, view(input), view(output));
            return;
        }
        for (pass, (input, output)) in self.passes.iter().zip(plan) {
            pass.render(encoder, device, scene, view(input), view(output));
        }
    }
}

/// Half resolution used by the blur chains, never below one texel.
pub(crate) fn half_size(size: [u32; 2]) -> [u32; 2] {
    [(size[0] / 2).max(1), (size[1] / 2).max(1)]
}

fn mk_targets(device: &wgpu::Device, format: wgpu::TextureFormat, size: [u32; 2]) -> [Texture; 2] {
    [
        Texture::create_render_target(device, size, format, "Post Target A"),
        Texture::create_render_target(device, size, format, "Post Target B"),
    ]
}

/// Layout with `textures` sampled textures at bindings `0..textures`, one
/// filtering sampler after them and optionally a uniform buffer last.
pub(crate) fn sampled_layout(
    device: &wgpu::Device,
    label: &str,
    textures: u32,
    uniform: bool,
) -> wgpu::BindGroupLayout {
    let mut entries: Vec<wgpu::BindGroupLayoutEntry> = (0..textures)
        .map(|binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        })
        .collect();
    entries.push(wgpu::BindGroupLayoutEntry {
        binding: textures,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    });
    if uniform {
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: textures + 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        });
    }
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}

/// Bind group matching [`sampled_layout`] with a fresh clamped sampler.
pub(crate) fn sampled_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    views: &[&wgpu::TextureView],
    uniform: Option<&wgpu::Buffer>,
) -> wgpu::BindGroup {
    let sampler = crate::data_structures::texture::create_clamped_sampler(device);
    let sampler_binding = views.len() as u32;
    let mut entries: Vec<wgpu::BindGroupEntry> = views
        .iter()
        .enumerate()
        .map(|(i, view)| wgpu::BindGroupEntry {
            binding: i as u32,
            resource: wgpu::BindingResource::TextureView(view),
        })
        .collect();
    entries.push(wgpu::BindGroupEntry {
        binding: sampler_binding,
        resource: wgpu::BindingResource::Sampler(&sampler),
    });
    if let Some(buffer) = uniform {
        entries.push(wgpu::BindGroupEntry {
            binding: sampler_binding + 1,
            resource: buffer.as_entire_binding(),
        });
    }
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: None,
        layout,
        entries: &entries,
    })
}

/// Shader for a full-screen pass: the shared triangle vertex stage plus `body`.
pub(crate) fn fullscreen_shader(
    label: &'static str,
    body: &str,
) -> wgpu::ShaderModuleDescriptor<'static> {
    wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(format!("{}\n{}", include_str!("fullscreen.wgsl"), body).into()),
    }
}

/// Record a full-screen draw of `pipeline` into `output`.
pub(crate) fn draw_fullscreen(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
    output: &wgpu::TextureView,
    load: wgpu::LoadOp<wgpu::Color>,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: output,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        occlusion_query_set: None,
        multiview_mask: None,
        timestamp_writes: None,
    });
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.draw(0..3, 0..1);
}
