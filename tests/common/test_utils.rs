use cgmath::Vector3;
#[cfg(feature = "integration-tests")]
use glass_logo::flow::ImageTestResult;
use glass_logo::{
    data_structures::{
        bounds::Aabb,
        instance::Instance,
        model::Model,
        scene_graph::SceneNode,
    },
    render::Instanced,
};
#[cfg(feature = "integration-tests")]
use glass_logo::{
    context::Context,
    flow::{GraphicsFlow, Out},
    render::Render,
};

/// A GPU free scene node: an axis aligned box with a transform, optionally
/// carrying a model.
pub(crate) struct BoxNode {
    local: Instance,
    world: Instance,
    bounds: Option<Aabb>,
    children: Vec<Box<dyn SceneNode>>,
    model: Option<Model>,
}

impl BoxNode {
    /// Box of side `size` centred at `position`.
    pub(crate) fn cube(position: Vector3<f32>, size: f32) -> Self {
        let half = size / 2.0;
        Self {
            local: Instance::from(position),
            world: Instance::new(),
            bounds: Some(Aabb::new(
                [-half, -half, -half].into(),
                [half, half, half].into(),
            )),
            children: Vec::new(),
            model: None,
        }
    }

    /// A node without geometry of its own.
    pub(crate) fn empty() -> Self {
        Self {
            local: Instance::new(),
            world: Instance::new(),
            bounds: None,
            children: Vec::new(),
            model: None,
        }
    }

    #[allow(dead_code)]
    pub(crate) fn with_model(mut self, model: Model) -> Self {
        self.bounds = model.bounds();
        self.model = Some(model);
        self
    }
}

impl SceneNode for BoxNode {
    fn get_local_transform(&self) -> &Instance {
        &self.local
    }

    fn get_local_transform_mut(&mut self) -> &mut Instance {
        &mut self.local
    }

    fn get_world_transform(&self) -> &Instance {
        &self.world
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        let world = self.world.clone();
        self.children
            .iter_mut()
            .for_each(|child| child.update_world_transforms(&world));
    }

    fn get_local_bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn get_model_mut(&mut self) -> Option<&mut Model> {
        self.model.as_mut()
    }

    fn write_to_buffers(&mut self, _: &wgpu::Queue) {}

    fn get_render(&self, _: bool) -> Vec<Instanced<'_>> {
        Vec::new()
    }
}

#[derive(Default)]
pub(crate) struct FrameCounter(pub(crate) u32);

impl FrameCounter {
    pub(crate) fn frame(&self) -> u32 {
        self.0
    }

    pub(crate) fn progress(&mut self) {
        self.0 += 1;
    }
}

#[cfg(feature = "integration-tests")]
pub(crate) type Validate = Box<
    dyn Fn(
        &Context,
        &mut FrameCounter,
        &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error>,
>;

/// A flow that draws nothing itself and checks the rendered frame.
#[cfg(feature = "integration-tests")]
pub(crate) struct TestRender {
    pub(crate) setup: Box<dyn Fn(&mut Context)>,
    pub(crate) validate: Validate,
}

#[cfg(feature = "integration-tests")]
impl GraphicsFlow<FrameCounter, ()> for TestRender {
    fn on_init(&mut self, ctx: &mut Context, _: &mut FrameCounter) -> Out<FrameCounter, ()> {
        (self.setup)(ctx);
        Out::Empty
    }

    fn on_update(
        &mut self,
        _: &Context,
        state: &mut FrameCounter,
        _: instant::Duration,
    ) -> Out<FrameCounter, ()> {
        state.progress();
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        _: &Context,
        _: &mut FrameCounter,
        _: &winit::event::WindowEvent,
    ) -> Out<FrameCounter, ()> {
        Out::Empty
    }

    fn on_custom_events(&mut self, _: &mut Context, _: &mut FrameCounter, event: ()) -> Option<()> {
        Some(event)
    }

    fn on_render(&self) -> Render<'_> {
        Render::None
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut FrameCounter,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        (self.validate)(ctx, state, texture)
    }
}

#[macro_export]
macro_rules! golden_image_test {
    ($graphics_elem:expr, $config:expr) => {{
        use crate::common::test_utils::FrameCounter;
        use glass_logo::flow::{FlowConstructor, GraphicsFlow};
        let constructor: FlowConstructor<FrameCounter, ()> = Box::new(|_| {
            Box::pin(async move {
                let g_flow: Box<dyn GraphicsFlow<FrameCounter, ()>> = Box::new($graphics_elem);
                g_flow
            })
        });

        glass_logo::flow::run(vec![constructor], $config)
            .expect("Failed to run flow for integration test.");
    }};
}
