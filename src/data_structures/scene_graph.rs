//! Scene graph and hierarchical scene organization.
//!
//! A loaded logo is a tree of [`SceneNode`]s: container nodes that only carry a
//! transform and model nodes that additionally own mesh geometry and a GPU
//! instance buffer holding their world matrix. Each node keeps a local and a
//! world transform; world transforms are refreshed top-down with
//! [`SceneNode::update_world_transform_all`].

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        bounds::Aabb,
        instance::{Instance, InstanceRaw},
        model::{self, Model},
    },
    render::Instanced,
};

pub trait SceneNode {
    fn get_local_transform(&self) -> &Instance;

    fn get_local_transform_mut(&mut self) -> &mut Instance;

    fn get_world_transform(&self) -> &Instance;

    /// Recompute this node's world transform from `parent` and recurse.
    fn update_world_transforms(&mut self, parent: &Instance);

    /// Bounds of the geometry owned by this node (children excluded), in node space.
    fn get_local_bounds(&self) -> Option<Aabb>;

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>);

    fn get_model_mut(&mut self) -> Option<&mut Model>;

    fn write_to_buffers(&mut self, queue: &wgpu::Queue);

    fn get_render(&self, outlined: bool) -> Vec<Instanced<'_>>;

    fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&Instance::default());
    }

    /// World-space bounds of the whole hierarchy; expects up to date world transforms.
    fn get_world_bounds(&self) -> Option<Aabb> {
        let own = self
            .get_local_bounds()
            .map(|b| b.transformed(&self.get_world_transform().to_matrix()));
        self.get_children()
            .iter()
            .filter_map(|child| child.get_world_bounds())
            .fold(own, |acc, b| match acc {
                Some(acc) => Some(acc.union(&b)),
                None => Some(b),
            })
    }

    /// Visit every model in the hierarchy, parents before children.
    fn traverse_models_mut(&mut self, f: &mut dyn FnMut(&mut Model)) {
        if let Some(model) = self.get_model_mut() {
            f(model);
        }
        for child in self.get_children_mut().iter_mut() {
            child.traverse_models_mut(f);
        }
    }
}

pub struct ContainerNode {
    pub children: Vec<Box<dyn SceneNode>>,
    local: Instance,
    world: Instance,
}

impl ContainerNode {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            local: Instance::default(),
            world: Instance::default(),
        }
    }
}

impl Default for ContainerNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneNode for ContainerNode {
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
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    fn get_local_bounds(&self) -> Option<Aabb> {
        None
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
        None
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn get_render(&self, outlined: bool) -> Vec<Instanced<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render(outlined))
            .collect()
    }
}

/// Group the root nodes of a scene under one identity container.
///
/// The container is what the logo rotates and recentres, so the roots keep
/// the transforms they were authored with.
pub fn scene_root(roots: Vec<Box<dyn SceneNode>>) -> Box<dyn SceneNode> {
    let mut root = ContainerNode::new();
    root.children = roots;
    Box::new(root)
}

pub struct ModelNode {
    children: Vec<Box<dyn SceneNode>>,
    instance_buffer: wgpu::Buffer,
    local: Instance,
    world: Instance,
    model: Model,
}

impl ModelNode {
    pub fn from_model(device: &wgpu::Device, model: Model) -> Self {
        let world = Instance::default();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(&[world.to_raw()]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            children: Vec::new(),
            instance_buffer,
            local: Instance::default(),
            world,
            model,
        }
    }
}

impl SceneNode for ModelNode {
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
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    fn get_local_bounds(&self) -> Option<Aabb> {
        self.model.bounds()
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
        Some(&mut self.model)
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        let raw: [InstanceRaw; 1] = [self.world.to_raw()];
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&raw));
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn get_render(&self, outlined: bool) -> Vec<Instanced<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render(outlined))
            .chain([Instanced {
                instance: &self.instance_buffer,
                model: &self.model,
                amount: 1,
                outlined,
            }])
            .collect()
    }
}

/// Convert a glTF node (and its children) into scene nodes.
///
/// Every primitive of the node's mesh becomes one [`model::Mesh`]. Materials of
/// the file are ignored: the glass material is applied afterwards.
pub fn to_scene_node(
    node: gltf::scene::Node,
    buf: &[Vec<u8>],
    device: &wgpu::Device,
) -> Box<dyn SceneNode> {
    let mut scene_node: Box<dyn SceneNode> = match node.mesh() {
        Some(mesh) => {
            let name = mesh.name().unwrap_or("unknown_mesh");
            let meshes = mesh
                .primitives()
                .filter_map(|primitive| {
                    let reader = primitive.reader(|buffer| buf.get(buffer.index()).map(Vec::as_slice));
                    let mut vertices: Vec<model::ModelVertex> = match reader.read_positions() {
                        Some(positions) => positions
                            .map(|position| model::ModelVertex {
                                position,
                                ..Default::default()
                            })
                            .collect(),
                        None => {
                            log::warn!("Primitive {} of mesh {} has no positions", primitive.index(), name);
                            return None;
                        }
                    };
                    if let Some(normals) = reader.read_normals() {
                        vertices
                            .iter_mut()
                            .zip(normals)
                            .for_each(|(vertex, normal)| vertex.normal = normal);
                    }
                    if let Some(tex_coords) = reader.read_tex_coords(0).map(|v| v.into_f32()) {
                        vertices
                            .iter_mut()
                            .zip(tex_coords)
                            .for_each(|(vertex, uv)| vertex.tex_coords = uv);
                    }
                    let indices: Vec<u32> = match reader.read_indices() {
                        Some(indices) => indices.into_u32().collect(),
                        None => (0..vertices.len() as u32).collect(),
                    };
                    Some(mk_mesh(device, name, &vertices, &indices))
                })
                .collect::<Vec<_>>();
            Box::new(ModelNode::from_model(device, Model { meshes }))
        }
        None => Box::new(ContainerNode::new()),
    };
    let (position, rotation, scale) = node.transform().decomposed();
    *scene_node.get_local_transform_mut() = Instance {
        position: position.into(),
        rotation: rotation.into(),
        scale: scale.into(),
    };
    for child in node.children() {
        scene_node.add_child(to_scene_node(child, buf, device));
    }
    scene_node
}

/// Upload vertices and indices; the bounds are taken from the CPU-side positions.
pub fn mk_mesh(
    device: &wgpu::Device,
    name: &str,
    vertices: &[model::ModelVertex],
    indices: &[u32],
) -> model::Mesh {
    let bounds = Aabb::from_points(vertices.iter().map(|v| v.position.into()))
        .unwrap_or_else(|| Aabb::new([0.0; 3].into(), [0.0; 3].into()));
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", name)),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Index Buffer", name)),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    model::Mesh {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: indices.len() as u32,
        bounds,
        material: None,
    }
}
