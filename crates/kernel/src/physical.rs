use bolts_common::Color;
use bolts_geometry::Shape;
use bolts_render::{ProgramHandle, Renderer, VertexLayout, uniforms};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Fixed normal written for every submitted vertex.
const UP_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// Extents of a mesh along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Bounds {
    /// Component-wise `max - min` over every vertex of every shape.
    ///
    /// Returns `None` for a mesh with no vertices.
    pub fn of_mesh(mesh: &[Shape]) -> Option<Self> {
        let mut vertices = mesh.iter().flat_map(Shape::vertices);
        let first = vertices.next()?;
        let (min, max) = vertices.fold((first, first), |(min, max), v| (min.min(v), max.max(v)));
        let size = max - min;
        Some(Self {
            width: size.x,
            height: size.y,
            depth: size.z,
        })
    }

    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth) / 2.0
    }
}

/// World-space axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn centered(center: Vec3, bounds: Bounds) -> Self {
        let half = bounds.half_extents();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Closed-interval overlap on all three axes; touching faces count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PhysicalError {
    #[error("scene object mesh must contain at least one shape")]
    EmptyMesh,
}

/// A drawable, optionally collidable scene object.
///
/// The mesh is fixed at construction, so the bounds computed there stay
/// valid for the object's whole life. Only the offset, the collidable flag
/// and the force list change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Physical {
    mesh: Vec<Shape>,
    color: Color,
    offset: Vec3,
    bounds: Bounds,
    collidable: bool,
    forces: Vec<Vec3>,
}

impl Physical {
    pub fn new(mesh: Vec<Shape>, color: Color) -> Result<Self, PhysicalError> {
        let bounds = Bounds::of_mesh(&mesh).ok_or(PhysicalError::EmptyMesh)?;
        Ok(Self {
            mesh,
            color,
            offset: Vec3::ZERO,
            bounds,
            collidable: true,
            forces: Vec::new(),
        })
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.mesh
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vec3) {
        self.offset = offset;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.offset += delta;
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Box centred on the offset with the mesh's extents.
    pub fn aabb(&self) -> Aabb {
        Aabb::centered(self.offset, self.bounds)
    }

    pub fn is_collidable(&self) -> bool {
        self.collidable
    }

    pub fn set_collidable(&mut self, collidable: bool) {
        self.collidable = collidable;
    }

    /// Record a force. Nothing integrates forces; they only accumulate.
    pub fn apply_force(&mut self, force: Vec3) {
        self.forces.push(force);
    }

    pub fn forces(&self) -> &[Vec3] {
        &self.forces
    }

    pub fn net_force(&self) -> Vec3 {
        self.forces.iter().copied().sum()
    }

    pub fn clear_forces(&mut self) {
        self.forces.clear();
    }

    /// AABB overlap with `other`. Always false against itself.
    ///
    /// The collidable flag is not consulted here; filtering by it is the
    /// world's job.
    pub fn is_colliding(&self, other: &Physical) -> bool {
        if std::ptr::eq(self, other) {
            return false;
        }
        self.aabb().intersects(&other.aabb())
    }

    /// Submit every shape, translated by the offset, with the object color
    /// set on `program`.
    pub fn draw(&self, renderer: &mut dyn Renderer, program: ProgramHandle) {
        for shape in &self.mesh {
            renderer.set_uniform(program, uniforms::COLOR, self.color.into());
            let vertex_count = shape.triangle_count() * 3;
            let mut data = Vec::with_capacity(vertex_count * 6);
            for triangle in shape.triangles() {
                for v in triangle.vertices() {
                    let p = v + self.offset;
                    data.extend_from_slice(&[p.x, p.y, p.z]);
                    data.extend_from_slice(&UP_NORMAL);
                }
            }
            renderer.upload_and_draw(
                &data,
                VertexLayout::PositionNormal,
                program,
                vertex_count as u32,
            );
        }
    }
}
