//! glass-logo
//!
//! A decorative 3D logo for login pages: a glass model in front of a
//! background image, drawn through outline, bloom and FXAA passes. It runs as
//! a native window or inside a `<canvas>` on the web.
//!
//! High-level modules
//! - `flow`: event loop and the flow trait scene parts implement
//! - `logo`: the logo flow itself
//! - `context`: GPU and window context that owns device, camera and pipelines
//! - `postprocess`: the ordered chain of fullscreen passes
//! - `fit`, `motion`, `viewport`: camera fitting, pointer easing, resize policy
//! - `tweak`, `overlay`: the debug panel and the egui overlay it is drawn in
//! - `resources`: asset loading from disk or the network
//!

pub mod background;
pub mod camera;
pub mod color;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod env;
pub mod fit;
pub mod flow;
pub mod logo;
pub mod material;
pub mod motion;
pub mod overlay;
pub mod pipelines;
pub mod postprocess;
pub mod render;
pub mod resources;
pub mod tweak;
pub mod viewport;

pub use config::LogoConfig;
pub use logo::{GlassLogo, LogoEvent};

use flow::FlowConstructor;

/// Show the logo with `config`.
///
/// Nothing is set up on pages too narrow for the canvas. With reduced motion
/// requested the logo stays in its resting pose.
pub fn run(mut config: LogoConfig) -> anyhow::Result<()> {
    flow::init_logging();
    let environment = env::Environment::detect(config.resize.min_page_width);
    if environment.narrow_viewport {
        log::info!("Viewport too narrow, skipping the 3D logo");
        return Ok(());
    }
    if environment.reduced_motion {
        config.track_pointer = false;
    }

    let logo = GlassLogo::new(&config);
    let constructor: FlowConstructor<(), LogoEvent> = Box::new(move |_| {
        Box::pin(async move { Box::new(logo) as Box<dyn flow::GraphicsFlow<(), LogoEvent>> })
    });
    flow::run(vec![constructor], config)
}

/// Web entry point: read `logo.json` from the assets and start.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub async fn mount() -> Result<(), wasm_bindgen::JsValue> {
    flow::init_logging();
    let config = LogoConfig::load("logo.json").await;
    run(config).map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{:#}", e)))
}
