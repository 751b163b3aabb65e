use glam::Vec2;

use crate::ecs::components::{Body, Position};

/// Pre-tick copy of a cat's placement. Repulsion reads only these so no
/// cat sees a neighbor that already moved this tick.
pub struct CatSnapshot {
    pub entity: hecs::Entity,
    pub pos: Vec2,
    pub width: f32,
}

/// Rebuild the snapshot cache from current positions.
pub fn rebuild(world: &hecs::World, snapshots: &mut Vec<CatSnapshot>) {
    snapshots.clear();
    for (entity, (pos, body)) in world.query::<(&Position, &Body)>().iter() {
        snapshots.push(CatSnapshot {
            entity,
            pos: pos.0,
            width: body.size.x,
        });
    }
}
