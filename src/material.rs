//! The frosted glass material and the applier that puts it on every mesh.
//!
//! Materials are never patched in place: whenever a parameter changes the
//! applier walks the hierarchy again and gives each mesh a freshly built
//! [`GlassMaterial`] (uniform buffer + bind group at group 0 of the glass
//! pipeline).

use serde::{Deserialize, Serialize};
use wgpu::util::DeviceExt;

use crate::{color::Rgb, data_structures::scene_graph::SceneNode};

/// Physical glass parameters, named like their counterparts in the debug panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlassParams {
    pub color: Rgb,
    pub roughness: f32,
    pub transmission: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub thickness: f32,
    pub env_map_intensity: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub metalness: f32,
}

impl Default for GlassParams {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            roughness: 0.6,
            transmission: 1.0,
            opacity: 1.0,
            transparent: true,
            thickness: 0.5,
            env_map_intensity: 1.0,
            clearcoat: 1.0,
            clearcoat_roughness: 0.2,
            metalness: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlassUniform {
    pub color: [f32; 3],
    pub opacity: f32,
    pub roughness: f32,
    pub transmission: f32,
    pub thickness: f32,
    pub env_map_intensity: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub metalness: f32,
    // 1.0 when blending with the scene behind, 0.0 for an opaque surface
    pub transparent: f32,
}

impl From<&GlassParams> for GlassUniform {
    fn from(params: &GlassParams) -> Self {
        let unit = |v: f32| v.clamp(0.0, 1.0);
        Self {
            color: params.color.to_linear(),
            // an opaque material ignores opacity entirely
            opacity: if params.transparent {
                unit(params.opacity)
            } else {
                1.0
            },
            roughness: unit(params.roughness),
            transmission: unit(params.transmission),
            thickness: params.thickness.max(0.0),
            env_map_intensity: params.env_map_intensity.max(0.0),
            clearcoat: unit(params.clearcoat),
            clearcoat_roughness: unit(params.clearcoat_roughness),
            metalness: unit(params.metalness),
            transparent: if params.transparent { 1.0 } else { 0.0 },
        }
    }
}

#[derive(Debug)]
pub struct GlassMaterial {
    pub uniform: GlassUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl GlassMaterial {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, params: &GlassParams) -> Self {
        let uniform = GlassUniform::from(params);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Glass Material Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("glass_material_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group,
        }
    }
}

pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("glass_material_bind_group_layout"),
    })
}

/// Replace the material of every mesh below `node` with one built from `params`.
///
/// Returns how many meshes received the new material.
pub fn apply_glass_material(
    node: &mut dyn SceneNode,
    params: &GlassParams,
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
) -> usize {
    let mut count = 0;
    node.traverse_models_mut(&mut |model| {
        for mesh in model.meshes.iter_mut() {
            mesh.material = Some(GlassMaterial::new(device, layout, params));
            count += 1;
        }
    });
    log::debug!("Applied glass material to {} meshes", count);
    count
}
