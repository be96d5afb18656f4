use std::hint::black_box;
use std::time::Instant;

use bolts_common::{Color, ObjectId};
use bolts_geometry::Shape;
use bolts_kernel::{Physical, PhysicalWorld};
use glam::Vec3;

fn make_world(object_count: usize, spacing: f32) -> PhysicalWorld {
    let mut world = PhysicalWorld::new();
    let side = (object_count as f32).sqrt().ceil() as usize;
    for i in 0..object_count {
        let x = (i % side) as f32 * spacing;
        let z = (i / side) as f32 * spacing;
        let mesh = vec![
            Shape::rectangle(Vec3::new(-0.5, 0.5, 0.5), Vec3::new(0.5, -0.5, 0.5)),
            Shape::rectangle(Vec3::new(-0.5, 0.5, -0.5), Vec3::new(0.5, -0.5, -0.5)),
        ];
        let Ok(object) = Physical::new(mesh, Color::WHITE) else {
            continue;
        };
        world.spawn(object.with_offset(Vec3::new(x, 0.0, z)));
    }
    world
}

fn bench_pairs(object_count: usize, spacing: f32, iterations: usize) {
    let world = make_world(object_count, spacing);

    let start = Instant::now();
    let mut found = 0;
    for _ in 0..iterations {
        found = black_box(world.collision_pairs()).len();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  pairs ({object_count} objects, spacing {spacing}, {iterations} iters): {per_iter:?}/iter, {found} pairs"
    );
}

fn bench_single_query(object_count: usize, iterations: usize) {
    let world = make_world(object_count, 0.9);

    let start = Instant::now();
    for i in 0..iterations {
        let id = ObjectId((i % object_count) as u64);
        let _ = black_box(world.detect_collisions_with(black_box(id)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  detect_collisions_with ({object_count} objects, {iterations} iters): {per_iter:?}/iter"
    );
}

fn main() {
    println!("=== Collision Benchmarks ===\n");

    println!("All pairs, sparse:");
    bench_pairs(100, 4.0, 1000);
    bench_pairs(1000, 4.0, 10);

    println!("\nAll pairs, packed:");
    bench_pairs(100, 0.9, 1000);
    bench_pairs(1000, 0.9, 10);

    println!("\nSingle object query:");
    bench_single_query(100, 10000);
    bench_single_query(1000, 1000);

    println!("\n=== Done ===");
}
