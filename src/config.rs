//! Start-up configuration of the logo.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration and any subset of fields can be overridden.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

use crate::{
    background::BackgroundParams,
    color::Rgb,
    material::GlassParams,
    postprocess::{BloomParams, OutlineParams, PostSelection},
    resources,
    viewport::ResizePolicy,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogoConfig {
    /// Model file, relative to the asset base or an absolute URL.
    pub model: String,
    /// Where relative asset paths are resolved; `None` uses `assets/` natively
    /// and `<origin>/assets/` on the web.
    pub asset_base: Option<String>,
    pub clear_colour: Rgb,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub ambient: Rgb,
    /// Extra point light; the page version only has the ambient term.
    pub key_light: KeyLight,
    pub post: PostSelection,
    pub glass: GlassParams,
    pub outline: OutlineParams,
    pub bloom: BloomParams,
    pub background: BackgroundParams,
    pub resize: ResizePolicy,
    /// Start with the debug panel visible.
    pub panel: bool,
    /// Follow the pointer; off for reduced motion.
    pub track_pointer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyLight {
    pub position: [f32; 3],
    pub color: Rgb,
    pub intensity: f32,
}

impl Default for KeyLight {
    fn default() -> Self {
        Self {
            position: [5.0, 10.0, 10.0],
            color: Rgb::WHITE,
            intensity: 0.0,
        }
    }
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            model: "studiocms-logo.glb".to_string(),
            asset_base: None,
            clear_colour: Rgb::from_u32(0x101010),
            fov: 75.0,
            ambient: Rgb::from_u32(0x606060),
            key_light: KeyLight::default(),
            post: PostSelection::default(),
            glass: GlassParams::default(),
            outline: OutlineParams::default(),
            bloom: BloomParams::default(),
            background: BackgroundParams::default(),
            resize: ResizePolicy::default(),
            panel: false,
            track_pointer: true,
        }
    }
}

impl LogoConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid logo configuration")
    }

    /// Read a JSON configuration from the assets; any failure yields the defaults.
    pub async fn load(file_name: &str) -> Self {
        let loaded = async {
            let json = resources::load_string(file_name, None).await?;
            Self::from_json(&json)
        }
        .await;
        match loaded {
            Ok(config) => {
                log::info!("Loaded configuration from {}", file_name);
                config
            }
            Err(e) => {
                log::warn!("Using default configuration: {:#}", e);
                Self::default()
            }
        }
    }
}
