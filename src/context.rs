//! GPU and window context.
//!
//! [`Context`] owns everything shared by the flows: surface, device and queue,
//! the camera, light and pipelines, and the post-processing chain with its
//! offscreen targets. Flows get a cheap [`InitContext`] while loading and the
//! full `Context` in their lifecycle hooks.

use std::sync::Arc;

use anyhow::Context as _;
use cgmath::{Deg, Point3, Vector3};
use winit::window::Window;

use crate::{
    background::background_layout,
    camera::{Camera, CameraResources, Projection},
    config::LogoConfig,
    material::material_layout,
    pipelines::{
        basic::{mk_background_pipeline, mk_glass_pipeline},
        light::{LightResources, LightUniform},
    },
    postprocess::PostChain,
    viewport::{ResizePolicy, ViewportUpdate},
};

/// Clip planes used until a model has been fitted.
pub const DEFAULT_ZNEAR: f32 = 0.01;
pub const DEFAULT_ZFAR: f32 = 10000.0;

#[derive(Debug)]
pub struct Pipelines {
    pub background: wgpu::RenderPipeline,
    pub glass: wgpu::RenderPipeline,
}

#[derive(Debug, Clone)]
pub struct Layouts {
    pub material: wgpu::BindGroupLayout,
    pub background: wgpu::BindGroupLayout,
}

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub clear_colour: wgpu::Color,
    pub pipelines: Pipelines,
    pub layouts: Layouts,
    pub post: PostChain,
    pub resize_policy: ResizePolicy,
    /// Camera depth computed by the last viewport fit.
    pub fitted_depth: Option<f32>,
}

impl Context {
    pub async fn new(window: Arc<Window>, config: &LogoConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Cannot create a rendering surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable graphics adapter")?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Cannot create a graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours are handled in linear space and written to an sRGB surface.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("The surface supports no texture format")?;
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        // The camera starts at the origin looking down -z until a model is fitted.
        let camera = Camera {
            position: Point3::new(0.0, 0.0, 0.0),
            target: Point3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
        };
        let projection = Projection::new(
            width,
            height,
            Deg(config.fov),
            DEFAULT_ZNEAR,
            DEFAULT_ZFAR,
        );
        let camera = CameraResources::new(&device, camera, &projection);

        let light = LightResources::new(
            &device,
            LightUniform::new(
                config.key_light.position,
                config.key_light.color,
                config.key_light.intensity,
                config.ambient,
            ),
        );

        let post = PostChain::new(
            &device,
            &queue,
            surface_format,
            [width, height],
            &config.post,
            &config.outline,
            &config.bloom,
            &camera.bind_group_layout,
        );

        let layouts = Layouts {
            material: material_layout(&device),
            background: background_layout(&device),
        };
        let pipelines = Pipelines {
            background: mk_background_pipeline(
                &device,
                surface_format,
                &layouts.background,
                &camera.bind_group_layout,
            ),
            glass: mk_glass_pipeline(
                &device,
                surface_format,
                &layouts.material,
                &camera.bind_group_layout,
                &light.bind_group_layout,
                &post.transmission_layout,
            ),
        };

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config: surface_config,
            camera,
            projection,
            light,
            clear_colour: config.clear_colour.to_wgpu(),
            pipelines,
            layouts,
            post,
            resize_policy: config.resize.clone(),
            fitted_depth: None,
        })
    }

    /// Upload the camera after its position or projection changed.
    pub fn write_camera(&mut self) {
        self.camera.write_to_buffer(&self.queue, &self.projection);
    }

    /// Resize the surface and every offscreen target.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.post.resize(&self.device, &self.queue, width, height);
    }

    /// Apply the resize policy to a new canvas size.
    ///
    /// The window is the canvas, so the page it would sit in is derived from
    /// the canvas width.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        let page_width = self.resize_policy.page_width_for_canvas(width as f32);
        match self
            .resize_policy
            .resolve(page_width, height as f32, self.fitted_depth)
        {
            Some(update) => self.apply_viewport(update),
            None => log::debug!(
                "Page width {} is at or below {}, leaving the viewport untouched",
                page_width,
                self.resize_policy.min_page_width
            ),
        }
    }

    /// Carry out a resolved resize.
    pub fn apply_viewport(&mut self, update: ViewportUpdate) {
        self.resize_surface(update.surface_width, update.surface_height);
        self.projection.set_aspect(update.aspect);
        if let Some(z) = update.camera_z {
            self.camera.camera.position.z = z;
        }
        self.write_camera();
        log::debug!("Viewport updated: {:?}", update);
    }
}

/// The part of the [`Context`] flows need while their assets load.
///
/// Device and queue are reference counted, so cloning them is cheap.
#[derive(Debug, Clone)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub layouts: Layouts,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            layouts: ctx.layouts.clone(),
        }
    }
}
