//! Creation of new bodies.
//!
//! Every creation first makes sure the [`ScratchMatrix`] can hold one more
//! body, so several spawns in the same frame never run against a stale
//! capacity check.

use glam::Vec2;
use log::trace;
use rand::Rng;

use crate::{
    error::Result,
    scratch_matrix::ScratchMatrix,
    types::{Entity, SizeTier},
    world::{BodyQuery, Physics, World},
};

/// A request to create a body at `position` with the given size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    pub position: Vec2,
    pub tier: SizeTier,
}

impl SpawnRequest {
    pub fn new(position: Vec2, tier: SizeTier) -> Self {
        Self { position, tier }
    }
}

/// Creates one motionless body.
///
/// If the world already fills the matrix, the matrix is grown (doubled)
/// before the body is created. The new body has zero velocity and force and
/// mass `tier * MASS_AMPLIFY`.
///
/// ### Parameters
/// - `world` - Store receiving the new body.
/// - `matrix` - Scratch matrix that must be able to hold it.
/// - `request` - Where and how large the body is.
///
/// ### Returns
/// The identifier of the new body.
///
/// ### Errors
/// [`crate::error::Error::Allocation`] if the matrix cannot grow; the body
/// is then not created.
pub fn spawn(world: &mut World, matrix: &mut ScratchMatrix, request: SpawnRequest) -> Result<Entity> {
    let needed = world.widest_table() + 1;
    if needed > matrix.capacity() {
        matrix.ensure_capacity(matrix.capacity().saturating_mul(2).max(needed))?;
    }

    let entity = world.create(request.position, Physics::at_rest(request.tier.mass()));
    trace!(
        "spawned {:?} at ({}, {}) tier {}",
        entity,
        request.position.x,
        request.position.y,
        request.tier.get()
    );
    Ok(entity)
}

/// Spawns `count` bodies uniformly inside the rectangle
/// `center ± half_extents`.
///
/// ### Parameters
/// - `center`, `half_extents` - The rectangle, in world coordinates.
/// - `count` - Number of bodies to create.
/// - `tier` - Size tier shared by all of them.
/// - `rng` - Source of the positions.
///
/// ### Returns
/// The created entities, in creation order. On error, bodies created before
/// the failure remain in the world.
pub fn scatter_in_rect(
    world: &mut World,
    matrix: &mut ScratchMatrix,
    center: Vec2,
    half_extents: Vec2,
    count: usize,
    tier: SizeTier,
    rng: &mut impl Rng,
) -> Result<Vec<Entity>> {
    let mut created = Vec::with_capacity(count);
    for _ in 0..count {
        let x = rng.random_range(-half_extents.x..=half_extents.x);
        let y = rng.random_range(-half_extents.y..=half_extents.y);
        let request = SpawnRequest::new(center + Vec2::new(x, y), tier);
        created.push(spawn(world, matrix, request)?);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn spawn_creates_body_at_rest_with_amplified_mass() {
        let mut world = World::new();
        let mut matrix = ScratchMatrix::with_capacity(4).unwrap();
        let tier = SizeTier::new(3).unwrap();

        let e = spawn(&mut world, &mut matrix, SpawnRequest::new(Vec2::new(12.0, 7.0), tier))
            .unwrap();

        let (pos, phys) = world.get(e).unwrap();
        assert_eq!(pos, Vec2::new(12.0, 7.0));
        assert_eq!(phys.vel, Vec2::ZERO);
        assert_eq!(phys.magnitude, 0.0);
        assert_eq!(phys.angle, 0.0);
        assert_eq!(phys.mass.get(), 300.0);
    }

    #[test]
    fn spawn_doubles_capacity_when_full() {
        let mut world = World::new();
        let mut matrix = ScratchMatrix::with_capacity(2).unwrap();
        let req = SpawnRequest::new(Vec2::ZERO, SizeTier::DEFAULT);

        spawn(&mut world, &mut matrix, req).unwrap();
        spawn(&mut world, &mut matrix, req).unwrap();
        assert_eq!(matrix.capacity(), 2);

        spawn(&mut world, &mut matrix, req).unwrap();
        assert_eq!(matrix.capacity(), 4);
        assert_eq!(world.len(), 3);
    }

    #[test]
    fn scatter_stays_inside_rect_and_grows_matrix() {
        let mut world = World::new();
        let mut matrix = ScratchMatrix::with_capacity(4).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let center = Vec2::new(100.0, 50.0);
        let half = Vec2::new(10.0, 5.0);

        let created = scatter_in_rect(
            &mut world,
            &mut matrix,
            center,
            half,
            20,
            SizeTier::DEFAULT,
            &mut rng,
        )
        .unwrap();

        assert_eq!(created.len(), 20);
        assert_eq!(world.len(), 20);
        assert_eq!(matrix.capacity(), 32);
        for (pos, _) in world.bodies() {
            let d = (pos - center).abs();
            assert!(d.x <= half.x && d.y <= half.y, "{pos:?} outside rect");
        }
    }
}
