use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A single triangle in object-local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Vertices in `[a, b, c]` order.
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }
}

/// An axis-aligned rectangle built from two triangles sharing a diagonal.
///
/// Fields are private: the triangles are derived from the corners once and
/// never change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    t1: Triangle,
    t2: Triangle,
}

impl Rectangle {
    /// Build a rectangle from its top-left and bottom-right corners.
    ///
    /// `t1 = (tl, bottom_left, top_right)` and
    /// `t2 = (bottom_left, br, top_right)`; the winding must stay in this
    /// order for face culling to behave if it is ever enabled.
    pub fn new(top_left: Vec3, bottom_right: Vec3) -> Self {
        let top_right = Vec3::new(bottom_right.x, top_left.y, top_left.z);
        let bottom_left = Vec3::new(top_left.x, bottom_right.y, bottom_right.z);
        Self {
            t1: Triangle::new(top_left, bottom_left, top_right),
            t2: Triangle::new(bottom_left, bottom_right, top_right),
        }
    }

    pub fn triangles(&self) -> [Triangle; 2] {
        [self.t1, self.t2]
    }

    /// Vertices of `t1` followed by vertices of `t2`.
    pub fn vertices(&self) -> [Vec3; 6] {
        [
            self.t1.a, self.t1.b, self.t1.c, self.t2.a, self.t2.b, self.t2.c,
        ]
    }
}

/// Closed set of drawable shapes.
///
/// Shapes are plain values; objects that want the same geometry each hold a
/// copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Triangle(Triangle),
    Rectangle(Rectangle),
}

impl Shape {
    pub fn triangle(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self::Triangle(Triangle::new(a, b, c))
    }

    pub fn rectangle(top_left: Vec3, bottom_right: Vec3) -> Self {
        Self::Rectangle(Rectangle::new(top_left, bottom_right))
    }

    /// Vertex positions in the order bounds computation and draw
    /// submission rely on.
    pub fn vertices(&self) -> Vec<Vec3> {
        match self {
            Self::Triangle(t) => t.vertices().to_vec(),
            Self::Rectangle(r) => r.vertices().to_vec(),
        }
    }

    pub fn triangles(&self) -> Vec<Triangle> {
        match self {
            Self::Triangle(t) => vec![*t],
            Self::Rectangle(r) => r.triangles().to_vec(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        match self {
            Self::Triangle(_) => 1,
            Self::Rectangle(_) => 2,
        }
    }
}

impl From<Triangle> for Shape {
    fn from(t: Triangle) -> Self {
        Self::Triangle(t)
    }
}

impl From<Rectangle> for Shape {
    fn from(r: Rectangle) -> Self {
        Self::Rectangle(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_vertex_order() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);
        let shape = Shape::triangle(a, b, c);
        assert_eq!(shape.vertices(), vec![a, b, c]);
        assert_eq!(shape.triangle_count(), 1);
    }

    #[test]
    fn rectangle_vertex_order() {
        let rect = Rectangle::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        assert_eq!(
            rect.vertices(),
            [
                Vec3::new(-1.0, 1.0, 0.0),
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ]
        );
    }

    #[test]
    fn rectangle_triangles_share_diagonal() {
        let rect = Rectangle::new(Vec3::new(0.0, 2.0, 1.0), Vec3::new(3.0, 0.0, 1.0));
        let [t1, t2] = rect.triangles();
        // bottom-left and top-right are the shared diagonal
        assert_eq!(t1.b, t2.a);
        assert_eq!(t1.c, t2.c);
        let from_triangles: Vec<Vec3> = t1
            .vertices()
            .into_iter()
            .chain(t2.vertices())
            .collect();
        assert_eq!(from_triangles, rect.vertices().to_vec());
    }

    #[test]
    fn rectangle_in_floor_plane() {
        // corners at different z: the rectangle lies in the y = 0 plane
        let rect = Rectangle::new(Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 0.0, 5.0));
        let [t1, _] = rect.triangles();
        assert_eq!(t1.b, Vec3::new(-5.0, 0.0, 5.0));
        assert_eq!(t1.c, Vec3::new(5.0, 0.0, -5.0));
    }

    #[test]
    fn shape_from_variants() {
        let r: Shape = Rectangle::new(Vec3::ZERO, Vec3::ONE).into();
        assert_eq!(r.triangle_count(), 2);
        assert_eq!(r.vertices().len(), 6);
        assert_eq!(r.triangles().len(), 2);
    }
}
