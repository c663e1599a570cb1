//! Loading of the logo model and images from the asset directory or the web.

use std::io::{BufReader, Cursor};

use anyhow::Context as _;

use crate::data_structures::scene_graph::{SceneNode, scene_root, to_scene_node};

pub mod texture;

pub use texture::{load_binary, load_string, load_texture};

/// Load a binary glTF file into a scene node hierarchy.
///
/// Materials of the file are not loaded. The root nodes of the scene are
/// always wrapped in one container, see [`scene_root`].
pub async fn load_model_glb(
    file_name: &str,
    asset_base: Option<&str>,
    device: &wgpu::Device,
) -> anyhow::Result<Box<dyn SceneNode>> {
    let glb = load_binary(file_name, asset_base).await?;
    let gltf_reader = BufReader::new(Cursor::new(glb));
    let gltf = gltf::Gltf::from_reader(gltf_reader)
        .with_context(|| format!("Failed to parse {}", file_name))?;

    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .with_context(|| format!("{} references a missing binary chunk", file_name))?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary(uri, asset_base).await?;
                buffer_data.push(bin);
            }
        }
    }

    let mut roots = Vec::new();
    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .with_context(|| format!("{} contains no scene", file_name))?;
    for node in scene.nodes() {
        roots.push(to_scene_node(node, &buffer_data, device));
    }
    log::info!("Loaded {} with {} root nodes", file_name, roots.len());

    Ok(scene_root(roots))
}
