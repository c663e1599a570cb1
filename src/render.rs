//! Render composition and pipeline batching.
//!
//! Flows describe what they want drawn with a [`Render`] value every frame. The
//! frame loop flattens those into [`Batches`], one list per pipeline, so that
//! every pipeline is bound once regardless of how many flows contribute.
//!
//! # Key types
//!
//! - [`Render<'a>`] is the enum flows return from `on_render`
//! - [`Instanced<'a>`] is a glass model plus the instance buffer placing it

use crate::{background::BackgroundMesh, data_structures::model::Model};

/// A model drawn with the glass pipeline, placed by an instance buffer.
#[derive(Clone, Copy)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
    /// Whether the outline pass draws this model into its mask.
    pub outlined: bool,
}

/// Specifies how a flow's objects should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Background(..)` renders a textured background plane behind everything
/// - `Glass(Instanced)` renders a single glass object
/// - `Glasses(Vec<Instanced>)` renders a batch of glass objects
/// - `Composed(Vec<Render>)` recursively renders a composition of renders
pub enum Render<'a> {
    None,
    Background(&'a BackgroundMesh),
    Glass(Instanced<'a>),
    Glasses(Vec<Instanced<'a>>),
    Composed(Vec<Render<'a>>),
}

/// Everything to draw this frame, grouped by pipeline.
#[derive(Default)]
pub struct Batches<'a> {
    pub backgrounds: Vec<&'a BackgroundMesh>,
    pub glasses: Vec<Instanced<'a>>,
}

impl<'a> Batches<'a> {
    /// The glass objects that carry an outline.
    pub fn outlined(&self) -> Vec<Instanced<'a>> {
        self.glasses
            .iter()
            .filter(|instanced| instanced.outlined)
            .copied()
            .collect()
    }
}

impl<'a> Render<'a> {
    pub(crate) fn set_pipelines(self, batches: &mut Batches<'a>) {
        match self {
            Render::Background(mesh) => batches.backgrounds.push(mesh),
            Render::Glass(instanced) => batches.glasses.push(instanced),
            Render::Glasses(mut vec) => batches.glasses.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(batches)),
            Render::None => (),
        }
    }
}

impl<'a> From<&'a BackgroundMesh> for Render<'a> {
    fn from(mesh: &'a BackgroundMesh) -> Self {
        Render::Background(mesh)
    }
}
