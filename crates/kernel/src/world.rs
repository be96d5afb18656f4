use crate::physical::Physical;
use bolts_common::ObjectId;
use std::collections::BTreeMap;

/// Registry that exclusively owns every scene object.
///
/// Ids are handed out in increasing order and the map is a `BTreeMap`, so
/// iteration, collision results and drawing all follow registration order.
/// A separate transient buffer holds objects that live for a single frame.
#[derive(Debug, Clone, Default)]
pub struct PhysicalWorld {
    objects: BTreeMap<ObjectId, Physical>,
    next_id: u64,
    transient: Vec<Physical>,
}

impl PhysicalWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `object` and return its id.
    pub fn spawn(&mut self, object: Physical) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, object);
        tracing::debug!(%id, "spawned scene object");
        id
    }

    pub fn despawn(&mut self, id: ObjectId) -> Option<Physical> {
        self.objects.remove(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&Physical> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Physical> {
        self.objects.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Registered objects in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Physical)> {
        self.objects.iter().map(|(id, p)| (*id, p))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut Physical)> {
        self.objects.iter_mut().map(|(id, p)| (*id, p))
    }

    /// Queue an object that is drawn this frame only.
    pub fn push_transient(&mut self, object: Physical) {
        self.transient.push(object);
    }

    pub fn transient(&self) -> &[Physical] {
        &self.transient
    }

    /// Drop all transient objects. Registered objects are untouched.
    pub fn clear_transient(&mut self) {
        self.transient.clear();
    }

    /// Every other collidable object whose box overlaps `id`'s, in
    /// registration order.
    ///
    /// Empty when `id` is unknown or not collidable.
    pub fn detect_collisions_with(&self, id: ObjectId) -> Vec<ObjectId> {
        let Some(subject) = self.objects.get(&id) else {
            return Vec::new();
        };
        if !subject.is_collidable() {
            return Vec::new();
        }
        self.objects
            .iter()
            .filter(|(other_id, other)| {
                **other_id != id && other.is_collidable() && subject.is_colliding(other)
            })
            .map(|(other_id, _)| *other_id)
            .collect()
    }

    /// Every overlapping pair of collidable objects, each pair once with the
    /// earlier-registered id first.
    pub fn collision_pairs(&self) -> Vec<(ObjectId, ObjectId)> {
        let collidable: Vec<(ObjectId, &Physical)> =
            self.iter().filter(|(_, p)| p.is_collidable()).collect();
        let mut pairs = Vec::new();
        for (i, (a_id, a)) in collidable.iter().enumerate() {
            for (b_id, b) in &collidable[i + 1..] {
                if a.is_colliding(b) {
                    pairs.push((*a_id, *b_id));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bolts_common::Color;
    use bolts_geometry::Shape;
    use glam::Vec3;

    fn box_at(x: f32) -> Physical {
        Physical::new(
            vec![
                Shape::rectangle(Vec3::new(-0.5, 0.5, 0.5), Vec3::new(0.5, -0.5, 0.5)),
                Shape::rectangle(Vec3::new(-0.5, 0.5, -0.5), Vec3::new(0.5, -0.5, -0.5)),
            ],
            Color::GREEN,
        )
        .unwrap()
        .with_offset(Vec3::new(x, 0.0, 0.0))
    }

    #[test]
    fn spawn_assigns_increasing_ids() {
        let mut world = PhysicalWorld::new();
        let a = world.spawn(box_at(0.0));
        let b = world.spawn(box_at(3.0));
        assert!(a < b);
        assert_eq!(world.len(), 2);
        let ids: Vec<_> = world.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn despawn_removes_object() {
        let mut world = PhysicalWorld::new();
        let a = world.spawn(box_at(0.0));
        assert!(world.despawn(a).is_some());
        assert!(world.get(a).is_none());
        assert!(world.is_empty());
        // ids are never reused
        let b = world.spawn(box_at(0.0));
        assert_ne!(a, b);
    }

    #[test]
    fn collisions_in_registration_order() {
        let mut world = PhysicalWorld::new();
        let a = world.spawn(box_at(0.0));
        let far = world.spawn(box_at(10.0));
        let b = world.spawn(box_at(0.5));
        let c = world.spawn(box_at(-0.6));

        assert_eq!(world.detect_collisions_with(a), vec![b, c]);
        assert!(world.detect_collisions_with(far).is_empty());
        assert_eq!(world.collision_pairs(), vec![(a, b), (a, c)]);
    }

    #[test]
    fn non_collidable_objects_are_skipped() {
        let mut world = PhysicalWorld::new();
        let a = world.spawn(box_at(0.0));
        let b = world.spawn(box_at(0.2));
        world.get_mut(b).unwrap().set_collidable(false);

        assert!(world.detect_collisions_with(a).is_empty());
        assert!(world.detect_collisions_with(b).is_empty());
        assert!(world.collision_pairs().is_empty());
    }

    #[test]
    fn unknown_id_has_no_collisions() {
        let world = PhysicalWorld::new();
        assert!(world.detect_collisions_with(ObjectId(42)).is_empty());
    }

    #[test]
    fn clearing_transient_keeps_registry() {
        let mut world = PhysicalWorld::new();
        world.spawn(box_at(0.0));
        world.push_transient(box_at(1.0));
        assert_eq!(world.transient().len(), 1);
        world.clear_transient();
        assert!(world.transient().is_empty());
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn mutated_offset_changes_collisions() {
        let mut world = PhysicalWorld::new();
        let a = world.spawn(box_at(0.0));
        let b = world.spawn(box_at(5.0));
        assert!(world.collision_pairs().is_empty());
        world.get_mut(b).unwrap().translate(Vec3::new(-4.5, 0.0, 0.0));
        assert_eq!(world.collision_pairs(), vec![(a, b)]);
    }

    #[test]
    fn flat_rectangle_touching_cube_face_collides() {
        let mut world = PhysicalWorld::new();
        let cube = world.spawn(box_at(0.0));
        let plate = world.spawn(
            Physical::new(
                vec![Shape::rectangle(
                    Vec3::new(-0.5, 0.5, 0.0),
                    Vec3::new(0.5, -0.5, 0.0),
                )],
                Color::RED,
            )
            .unwrap()
            .with_offset(Vec3::new(0.0, 0.0, 0.5)),
        );

        assert_eq!(world.detect_collisions_with(cube), vec![plate]);
        assert_eq!(world.detect_collisions_with(plate), vec![cube]);
    }
}
