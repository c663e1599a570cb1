//! Background images behind the logo.
//!
//! A background is a textured plane at a fixed depth behind the model, sized to
//! the view frustum so it covers the canvas and keeps the image aspect ratio.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};
use wgpu::util::DeviceExt;

use crate::data_structures::{
    instance::Instance,
    model::ModelVertex,
    texture::Texture,
};

/// Depth of the background plane.
pub const BACKGROUND_Z: f32 = -5.0;

/// Where a catalog entry's pixels come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// `<name>.png` in the asset directory.
    Png,
    /// The user supplied URL in [`BackgroundParams::custom_image_href`].
    Web,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundImage {
    pub name: &'static str,
    pub source: ImageSource,
}

pub const BACKGROUNDS: [BackgroundImage; 10] = [
    BackgroundImage { name: "skyline", source: ImageSource::Png },
    BackgroundImage { name: "grid-1", source: ImageSource::Png },
    BackgroundImage { name: "grid-2", source: ImageSource::Png },
    BackgroundImage { name: "astro-layers", source: ImageSource::Png },
    BackgroundImage { name: "astro-rays", source: ImageSource::Png },
    BackgroundImage { name: "studiocms-blobs", source: ImageSource::Png },
    BackgroundImage { name: "studiocms-blobs-light", source: ImageSource::Png },
    BackgroundImage { name: "studiocms-curves", source: ImageSource::Png },
    BackgroundImage { name: "studiocms-curves-light", source: ImageSource::Png },
    BackgroundImage { name: "custom", source: ImageSource::Web },
];

impl BackgroundImage {
    pub fn find(name: &str) -> Option<BackgroundImage> {
        BACKGROUNDS.iter().find(|image| image.name == name).copied()
    }

    /// Path or URL handed to the loader.
    pub fn location(&self, params: &BackgroundParams) -> String {
        match self.source {
            ImageSource::Png => format!("{}.png", self.name),
            ImageSource::Web => params.custom_image_href.clone(),
        }
    }

    pub fn format_hint(&self) -> Option<&'static str> {
        match self.source {
            ImageSource::Png => Some("png"),
            ImageSource::Web => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundParams {
    pub background: String,
    pub custom_image_href: String,
}

impl Default for BackgroundParams {
    fn default() -> Self {
        Self {
            background: BACKGROUNDS[0].name.to_string(),
            custom_image_href: "https://images.unsplash.com/photo-1451187580459-43490279c0fa"
                .to_string(),
        }
    }
}

impl BackgroundParams {
    /// The selected catalog entry, falling back to the first one for unknown names.
    pub fn selected(&self) -> BackgroundImage {
        BackgroundImage::find(&self.background).unwrap_or_else(|| {
            log::warn!(
                "Unknown background '{}', using '{}'",
                self.background,
                BACKGROUNDS[0].name
            );
            BACKGROUNDS[0]
        })
    }
}

/// Height the background plane needs to cover the frustum with room for motion.
pub fn frustum_height(fovy_degrees: f32, camera_z: f32, plane_z: f32) -> f32 {
    9.0 * (fovy_degrees / 2.0 * PI / 180.0).tan() * (camera_z - plane_z).abs()
}

/// Plane size keeping the image aspect ratio at the given height.
pub fn plane_size(height: f32, image_size: (u32, u32)) -> (f32, f32) {
    let (w, h) = (image_size.0 as f32, image_size.1.max(1) as f32);
    (height * (w / h), height)
}

/// Centred quad in the xy plane facing +z.
pub fn plane_geometry(width: f32, height: f32) -> ([ModelVertex; 4], [u32; 6]) {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let normal = [0.0, 0.0, 1.0];
    let vertices = [
        ModelVertex { position: [-hw, -hh, 0.0], tex_coords: [0.0, 1.0], normal },
        ModelVertex { position: [hw, -hh, 0.0], tex_coords: [1.0, 1.0], normal },
        ModelVertex { position: [hw, hh, 0.0], tex_coords: [1.0, 0.0], normal },
        ModelVertex { position: [-hw, hh, 0.0], tex_coords: [0.0, 0.0], normal },
    ];
    (vertices, [0, 1, 2, 0, 2, 3])
}

pub fn background_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("background_bind_group_layout"),
    })
}

/// The textured background plane, ready to draw.
#[derive(Debug)]
pub struct BackgroundMesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub instance_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub num_elements: u32,
    pub size: (f32, f32),
}

impl BackgroundMesh {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        name: &str,
        texture: &Texture,
        height: f32,
    ) -> Self {
        let size = plane_size(height, (texture.width(), texture.height()));
        let (vertices, indices) = plane_geometry(size.0, size.1);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Background Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Background Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let instance = Instance::from(cgmath::Vector3::new(0.0, 0.0, BACKGROUND_Z));
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Background Instance Buffer"),
            contents: bytemuck::cast_slice(&[instance.to_raw()]),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let sampler = texture
            .sampler
            .clone()
            .unwrap_or_else(|| crate::data_structures::texture::create_clamped_sampler(device));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some("background_bind_group"),
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            instance_buffer,
            bind_group,
            num_elements: indices.len() as u32,
            size,
        }
    }
}
