//! The login page logo: one glass model in front of one background image.
//!
//! [`GlassLogo`] is the only flow of the app. It starts both asset loads in
//! `on_init`, attaches each result with replace semantics when it arrives,
//! eases the model towards the pointer every frame and routes debug panel
//! changes to the material, the background or the post-processing chain.

use instant::Duration;
use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::{
    background::{BACKGROUND_Z, BackgroundMesh, frustum_height},
    config::LogoConfig,
    context::Context,
    data_structures::{scene_graph::SceneNode, texture::Texture},
    env,
    fit::fit_model_to_viewport,
    flow::{GraphicsFlow, Out},
    material::apply_glass_material,
    motion::{ModelMotion, PointerState, REST_ROTATION, TargetRotation},
    render::Render,
    resources,
    tweak::{Effect, LogoParams, Pane},
};

/// Results of the asynchronous loads.
pub enum LogoEvent {
    ModelLoaded(Box<dyn SceneNode>),
    BackgroundLoaded { name: String, texture: Texture },
    LoadFailed { asset: String, error: anyhow::Error },
}

impl std::fmt::Debug for LogoEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModelLoaded(_) => f.write_str("ModelLoaded"),
            Self::BackgroundLoaded { name, .. } => {
                f.debug_struct("BackgroundLoaded").field("name", name).finish()
            }
            Self::LoadFailed { asset, error } => f
                .debug_struct("LoadFailed")
                .field("asset", asset)
                .field("error", error)
                .finish(),
        }
    }
}

/// Number of loads that have to settle before the page is told we are ready.
pub const INITIAL_LOADS: u8 = 2;

/// Outcome of attaching a loaded asset.
#[derive(Debug, PartialEq)]
pub enum Attach<T> {
    /// Nothing was attached before.
    Fresh,
    /// The previous asset was detached and is handed back.
    Replaced(T),
    /// The load belongs to a selection that changed since; it is handed back
    /// and nothing was attached.
    Stale(T),
}

/// The attached model and background plus the count of pending initial loads.
///
/// Each slot holds at most one asset: attaching detaches the previous one.
#[derive(Debug)]
pub struct LogoSlots<M, B> {
    model: Option<M>,
    background: Option<(String, B)>,
    pending_loads: u8,
}

impl<M, B> Default for LogoSlots<M, B> {
    fn default() -> Self {
        Self {
            model: None,
            background: None,
            pending_loads: INITIAL_LOADS,
        }
    }
}

impl<M, B> LogoSlots<M, B> {
    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut M> {
        self.model.as_mut()
    }

    pub fn background(&self) -> Option<&B> {
        self.background.as_ref().map(|(_, background)| background)
    }

    pub fn background_name(&self) -> Option<&str> {
        self.background.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn attach_model(&mut self, model: M) -> Attach<M> {
        match self.model.replace(model) {
            Some(previous) => Attach::Replaced(previous),
            None => Attach::Fresh,
        }
    }

    /// Attach the background loaded for `name` unless `selected` names another one.
    pub fn attach_background(&mut self, name: &str, selected: &str, background: B) -> Attach<B> {
        if name != selected {
            return Attach::Stale(background);
        }
        match self.background.replace((name.to_string(), background)) {
            Some((_, previous)) => Attach::Replaced(previous),
            None => Attach::Fresh,
        }
    }

    /// Count one settled load, successful or not.
    ///
    /// Returns `true` for the load that completes the initial set; loads after
    /// that are not counted.
    pub fn settle(&mut self) -> bool {
        if self.pending_loads == 0 {
            return false;
        }
        self.pending_loads -= 1;
        self.pending_loads == 0
    }

    pub fn is_loaded(&self) -> bool {
        self.pending_loads == 0
    }
}

pub struct GlassLogo {
    model_file: String,
    asset_base: Option<String>,
    params: LogoParams,
    pane: Pane,
    track_pointer: bool,
    slots: LogoSlots<Box<dyn SceneNode>, BackgroundMesh>,
    /// Background plane height, fixed by the first background.
    frustum_height: Option<f32>,
    motion: ModelMotion,
    pointer: PointerState,
}

impl GlassLogo {
    pub fn new(config: &LogoConfig) -> Self {
        Self {
            model_file: config.model.clone(),
            asset_base: config.asset_base.clone(),
            params: LogoParams {
                glass: config.glass.clone(),
                outline: config.outline.clone(),
                bloom: config.bloom.clone(),
                background: config.background.clone(),
                light_mode: false,
            },
            pane: Pane::new(config.panel),
            track_pointer: config.track_pointer,
            slots: LogoSlots::default(),
            frustum_height: None,
            motion: ModelMotion::new(),
            pointer: PointerState::default(),
        }
    }

    pub fn params(&self) -> &LogoParams {
        &self.params
    }

    pub fn is_loaded(&self) -> bool {
        self.slots.is_loaded()
    }

    fn load_model(&self, ctx: &Context) -> Box<dyn Future<Output = LogoEvent>> {
        let device = ctx.device.clone();
        let file = self.model_file.clone();
        let base = self.asset_base.clone();
        Box::new(async move {
            match resources::load_model_glb(&file, base.as_deref(), &device).await {
                Ok(node) => LogoEvent::ModelLoaded(node),
                Err(error) => LogoEvent::LoadFailed { asset: file, error },
            }
        })
    }

    fn load_background(&self, ctx: &Context) -> Box<dyn Future<Output = LogoEvent>> {
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();
        let base = self.asset_base.clone();
        let image = self.params.background.selected();
        let location = image.location(&self.params.background);
        let name = image.name.to_string();
        Box::new(async move {
            let loaded = resources::load_texture(
                &location,
                base.as_deref(),
                &device,
                &queue,
                image.format_hint(),
            )
            .await;
            match loaded {
                Ok(texture) => LogoEvent::BackgroundLoaded { name, texture },
                Err(error) => LogoEvent::LoadFailed {
                    asset: location,
                    error,
                },
            }
        })
    }

    /// Attach a freshly loaded model in place of the current one.
    fn replace_model(&mut self, ctx: &mut Context, mut node: Box<dyn SceneNode>) {
        node.get_local_transform_mut().rotation = REST_ROTATION.to_quaternion();
        self.motion = ModelMotion::new();

        let meshes = apply_glass_material(
            node.as_mut(),
            &self.params.glass,
            &ctx.device,
            &ctx.layouts.material,
        );
        if meshes == 0 {
            log::warn!("{} has no meshes to draw", self.model_file);
        }

        match fit_model_to_viewport(node.as_mut(), &mut ctx.camera.camera, &mut ctx.projection) {
            Some(depth) => ctx.fitted_depth = Some(depth),
            None => log::warn!("{} has no bounds, camera left as is", self.model_file),
        }
        ctx.write_camera();
        let (width, height) = (ctx.config.width, ctx.config.height);
        ctx.handle_resize(width, height);

        node.write_to_buffers(&ctx.queue);
        if let Attach::Replaced(_) = self.slots.attach_model(node) {
            log::info!("Replaced the logo model");
        }
    }

    /// Attach a background plane in place of the current one.
    fn replace_background(&mut self, ctx: &Context, name: &str, texture: &Texture) {
        let selected = self.params.background.selected().name;
        // A newer selection supersedes this load.
        if name != selected {
            log::debug!("Dropping stale background {}", name);
            return;
        }
        let camera_z = ctx.camera.camera.position.z;
        let fov = cgmath::Deg::from(ctx.projection.fovy).0;
        let height = *self
            .frustum_height
            .get_or_insert_with(|| frustum_height(fov, camera_z, BACKGROUND_Z));
        let mesh = BackgroundMesh::new(&ctx.device, &ctx.layouts.background, name, texture, height);
        log::info!("Background {} at {:.2} x {:.2}", name, mesh.size.0, mesh.size.1);
        self.slots.attach_background(name, selected, mesh);
    }

    fn settle_load(&mut self) {
        if self.slots.settle() {
            log::info!("Logo ready");
            env::mark_container(env::LOADED_CLASS);
        }
    }

    fn rebuild_material(&mut self, ctx: &Context) {
        if let Some(model) = self.slots.model_mut() {
            apply_glass_material(model.as_mut(), &self.params.glass, &ctx.device, &ctx.layouts.material);
        }
    }

    fn apply_effect(&mut self, ctx: &Context, effect: Effect) -> Out<(), LogoEvent> {
        match effect {
            Effect::None => Out::Empty,
            Effect::RebuildMaterial => {
                self.rebuild_material(ctx);
                Out::Empty
            }
            // Only swap a background that is already shown.
            Effect::ReloadBackground if self.slots.background().is_some() => {
                Out::FutEvent(vec![self.load_background(ctx)])
            }
            Effect::ReloadBackground => Out::Empty,
            Effect::ConfigurePass(setting) => Out::Configure(Box::new(move |ctx: &mut Context| {
                if !ctx.post.configure(&ctx.queue, &setting) {
                    log::debug!("No post-processing pass takes {:?}", setting);
                }
            })),
            Effect::SetLightMode(on) => {
                env::set_root_class(env::LIGHT_CLASS, on);
                Out::Empty
            }
        }
    }
}

impl GraphicsFlow<(), LogoEvent> for GlassLogo {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ()) -> Out<(), LogoEvent> {
        log::info!(
            "Loading {} and background {}",
            self.model_file,
            self.params.background.background
        );
        Out::FutEvent(vec![self.load_model(ctx), self.load_background(ctx)])
    }

    fn on_update(&mut self, ctx: &Context, _: &mut (), _dt: Duration) -> Out<(), LogoEvent> {
        let Some(model) = self.slots.model_mut() else {
            return Out::Empty;
        };
        let viewport = (ctx.config.width as f32, ctx.config.height as f32);
        let target = TargetRotation::from_pointer(self.pointer, viewport);
        let rotation = self.motion.step(target);
        model.get_local_transform_mut().rotation = rotation.to_quaternion();
        model.update_world_transform_all();
        model.write_to_buffers(&ctx.queue);
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        _: &Context,
        _: &mut (),
        event: &WindowEvent,
    ) -> Out<(), LogoEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } if self.track_pointer => {
                self.pointer = PointerState {
                    x: position.x,
                    y: position.y,
                };
                Out::Empty
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } if *code == KeyCode::F1 => {
                self.pane.toggle();
                Out::Empty
            }
            _ => Out::Empty,
        }
    }

    fn on_custom_events(
        &mut self,
        ctx: &mut Context,
        _: &mut (),
        event: LogoEvent,
    ) -> Option<LogoEvent> {
        match event {
            LogoEvent::ModelLoaded(node) => {
                self.replace_model(ctx, node);
                self.settle_load();
            }
            LogoEvent::BackgroundLoaded { name, texture } => {
                self.replace_background(ctx, &name, &texture);
                self.settle_load();
            }
            LogoEvent::LoadFailed { asset, error } => {
                log::error!("Failed to load {}: {:#}", asset, error);
                self.settle_load();
            }
        }
        None
    }

    fn on_ui(&mut self, ctx: &Context, _: &mut (), ui: &egui::Context) -> Out<(), LogoEvent> {
        let mut configure = Vec::new();
        let mut loads = Vec::new();
        for (key, value) in self.pane.show(ui, &self.params) {
            let effect = self.params.set(key, value);
            match self.apply_effect(ctx, effect) {
                Out::Configure(f) => configure.push(f),
                Out::FutEvent(futures) => loads.extend(futures),
                _ => {}
            }
        }
        if !loads.is_empty() {
            if !configure.is_empty() {
                log::warn!("Pass changes made together with a background reload are dropped");
            }
            return Out::FutEvent(loads);
        }
        if configure.is_empty() {
            return Out::Empty;
        }
        Out::Configure(Box::new(move |ctx: &mut Context| {
            configure.into_iter().for_each(|f| f(ctx))
        }))
    }

    fn on_render(&self) -> Render<'_> {
        let mut renders = Vec::with_capacity(2);
        if let Some(background) = self.slots.background() {
            renders.push(Render::from(background));
        }
        if let Some(model) = self.slots.model() {
            renders.push(Render::Glasses(model.get_render(true)));
        }
        Render::Composed(renders)
    }

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _: &Context,
        _: &mut (),
        _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<crate::flow::ImageTestResult, anyhow::Error> {
        use crate::flow::ImageTestResult;
        Ok(if self.is_loaded() {
            ImageTestResult::Passed
        } else {
            ImageTestResult::Waiting
        })
    }
}
