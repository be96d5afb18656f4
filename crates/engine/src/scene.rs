//! Fixed vertex data for the screen-space and sky passes, plus a demo scene.

use bolts_common::{Color, ObjectId};
use bolts_geometry::Shape;
use bolts_kernel::{Physical, PhysicalError, PhysicalWorld};
use glam::Vec3;

/// Clear color behind the background pass.
pub const CLEAR_COLOR: Color = Color::rgba(0.0, 0.0, 0.431, 1.0);
pub const OVERLAY_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 0.5);
pub const CROSSHAIR_COLOR: Color = Color::WHITE;

/// Half-length of each crosshair bar in NDC.
pub const CROSS_SIZE: f32 = 0.025;
/// Half-thickness of each crosshair bar in NDC.
pub const CROSS_LINE_WIDTH: f32 = 0.0025;

/// Full-screen quad in NDC.
#[rustfmt::skip]
pub const BACKGROUND_QUAD: [f32; 18] = [
    -1.0,  1.0, 0.0,
    -1.0, -1.0, 0.0,
     1.0, -1.0, 0.0,
    -1.0,  1.0, 0.0,
     1.0, -1.0, 0.0,
     1.0,  1.0, 0.0,
];

/// Centered pause panel in NDC.
#[rustfmt::skip]
pub const OVERLAY_QUAD: [f32; 18] = [
    -0.5,  0.3, 0.0,
    -0.5, -0.3, 0.0,
     0.5, -0.3, 0.0,
    -0.5,  0.3, 0.0,
     0.5, -0.3, 0.0,
     0.5,  0.3, 0.0,
];

/// Two bars, vertical then horizontal, twelve vertices in all.
#[rustfmt::skip]
pub fn crosshair() -> [f32; 36] {
    let (s, w) = (CROSS_SIZE, CROSS_LINE_WIDTH);
    [
        -w,  s, 0.0,
        -w, -s, 0.0,
         w, -s, 0.0,
        -w,  s, 0.0,
         w, -s, 0.0,
         w,  s, 0.0,

        -s,  w, 0.0,
        -s, -w, 0.0,
         s, -w, 0.0,
        -s,  w, 0.0,
         s, -w, 0.0,
         s,  w, 0.0,
    ]
}

/// Unit cube around the origin, 36 vertices, sampled as cubemap directions.
#[rustfmt::skip]
pub const SKYBOX_CUBE: [f32; 108] = [
    -1.0,  1.0, -1.0,  -1.0, -1.0, -1.0,   1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,   1.0,  1.0, -1.0,  -1.0,  1.0, -1.0,

    -1.0, -1.0,  1.0,  -1.0, -1.0, -1.0,  -1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0,  -1.0,  1.0,  1.0,  -1.0, -1.0,  1.0,

     1.0, -1.0, -1.0,   1.0, -1.0,  1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,   1.0,  1.0, -1.0,   1.0, -1.0, -1.0,

    -1.0, -1.0,  1.0,  -1.0,  1.0,  1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,   1.0, -1.0,  1.0,  -1.0, -1.0,  1.0,

    -1.0,  1.0, -1.0,   1.0,  1.0, -1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,  -1.0,  1.0,  1.0,  -1.0,  1.0, -1.0,

    -1.0, -1.0, -1.0,  -1.0, -1.0,  1.0,   1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,  -1.0, -1.0,  1.0,   1.0, -1.0,  1.0,
];

/// Closed box of edge `size` centred on the origin.
///
/// Faces normal to X are built from triangles because a [`Shape::rectangle`]
/// derives its corners from the X and Y of its two inputs and cannot lie in a
/// constant-X plane.
pub fn box_mesh(size: f32) -> Vec<Shape> {
    let h = size / 2.0;
    let v = Vec3::new;
    vec![
        // front and back
        Shape::rectangle(v(-h, h, h), v(h, -h, h)),
        Shape::rectangle(v(-h, h, -h), v(h, -h, -h)),
        // top and bottom
        Shape::rectangle(v(-h, h, -h), v(h, h, h)),
        Shape::rectangle(v(-h, -h, -h), v(h, -h, h)),
        // right
        Shape::triangle(v(h, h, -h), v(h, -h, -h), v(h, h, h)),
        Shape::triangle(v(h, -h, -h), v(h, -h, h), v(h, h, h)),
        // left
        Shape::triangle(v(-h, h, -h), v(-h, -h, -h), v(-h, h, h)),
        Shape::triangle(v(-h, -h, -h), v(-h, -h, h), v(-h, h, h)),
    ]
}

/// Ids of the objects spawned by [`spawn_demo_scene`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoScene {
    pub floor: ObjectId,
    pub boxes: Vec<ObjectId>,
}

/// A grey floor plus a short row of boxes, the middle two overlapping.
pub fn spawn_demo_scene(world: &mut PhysicalWorld) -> Result<DemoScene, PhysicalError> {
    let mut floor = Physical::new(
        vec![Shape::rectangle(
            Vec3::new(-20.0, 0.0, -20.0),
            Vec3::new(20.0, 0.0, 20.0),
        )],
        Color::rgb(0.35, 0.35, 0.38),
    )?
    .with_offset(Vec3::new(0.0, -1.0, 0.0));
    floor.set_collidable(false);
    let floor = world.spawn(floor);

    let placements = [
        (Vec3::new(-3.0, -0.5, -4.0), Color::RED),
        (Vec3::new(-0.4, -0.5, -4.0), Color::GREEN),
        (Vec3::new(0.4, -0.5, -4.0), Color::BLUE),
        (Vec3::new(3.0, -0.5, -4.0), Color::rgb(0.9, 0.7, 0.1)),
    ];
    let mut boxes = Vec::with_capacity(placements.len());
    for (offset, color) in placements {
        let object = Physical::new(box_mesh(1.0), color)?.with_offset(offset);
        boxes.push(world.spawn(object));
    }
    Ok(DemoScene { floor, boxes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bolts_kernel::Bounds;

    #[test]
    fn crosshair_has_twelve_vertices() {
        assert_eq!(crosshair().len() / 3, 12);
        assert_eq!(SKYBOX_CUBE.len() / 3, 36);
    }

    #[test]
    fn box_mesh_bounds_are_cubic() {
        let b = Physical::new(box_mesh(2.0), Color::WHITE).unwrap();
        assert_eq!(
            b.bounds(),
            Bounds {
                width: 2.0,
                height: 2.0,
                depth: 2.0
            }
        );
    }

    #[test]
    fn demo_scene_overlaps_middle_pair_only() {
        let mut world = PhysicalWorld::new();
        let scene = spawn_demo_scene(&mut world).unwrap();
        assert_eq!(world.len(), 5);
        assert_eq!(world.collision_pairs(), vec![(scene.boxes[1], scene.boxes[2])]);
        assert!(!world.get(scene.floor).unwrap().is_collidable());
    }
}
