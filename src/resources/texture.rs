use anyhow::Context as _;

use crate::data_structures::texture;

/// Where an asset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocation {
    Url(String),
    Path(std::path::PathBuf),
}

pub fn is_remote(file_name: &str) -> bool {
    file_name.starts_with("http://") || file_name.starts_with("https://")
}

/// Resolve `file_name` against `asset_base`, or the platform default base.
///
/// Absolute URLs are used as they are.
pub fn resolve_location(file_name: &str, asset_base: Option<&str>) -> anyhow::Result<AssetLocation> {
    if is_remote(file_name) {
        return Ok(AssetLocation::Url(file_name.to_string()));
    }
    match asset_base {
        Some(base) if is_remote(base) => {
            let base = reqwest::Url::parse(&format!("{}/", base.trim_end_matches('/')))?;
            Ok(AssetLocation::Url(base.join(file_name)?.to_string()))
        }
        Some(base) => Ok(AssetLocation::Path(std::path::Path::new(base).join(file_name))),
        None => default_location(file_name),
    }
}

#[cfg(target_arch = "wasm32")]
fn default_location(file_name: &str) -> anyhow::Result<AssetLocation> {
    let window = web_sys::window().context("No window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("Page origin unavailable"))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(AssetLocation::Url(base.join(file_name)?.to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
fn default_location(file_name: &str) -> anyhow::Result<AssetLocation> {
    Ok(AssetLocation::Path(
        std::path::Path::new("./").join("assets").join(file_name),
    ))
}

async fn fetch(url: &str) -> anyhow::Result<reqwest::Response> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;
    response
        .error_for_status()
        .with_context(|| format!("Failed to fetch {}", url))
}

pub async fn load_string(file_name: &str, asset_base: Option<&str>) -> anyhow::Result<String> {
    let txt = match resolve_location(file_name, asset_base)? {
        AssetLocation::Url(url) => fetch(&url).await?.text().await?,
        AssetLocation::Path(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
    };
    Ok(txt)
}

pub async fn load_binary(file_name: &str, asset_base: Option<&str>) -> anyhow::Result<Vec<u8>> {
    let data = match resolve_location(file_name, asset_base)? {
        AssetLocation::Url(url) => fetch(&url).await?.bytes().await?.to_vec(),
        AssetLocation::Path(path) => {
            std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?
        }
    };
    Ok(data)
}

pub async fn load_texture(
    file_name: &str,
    asset_base: Option<&str>,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    format: Option<&str>,
) -> anyhow::Result<texture::Texture> {
    let data = load_binary(file_name, asset_base).await?;
    texture::Texture::from_bytes(device, queue, &data, file_name, format)
        .with_context(|| format!("Failed to decode image {}", file_name))
}
