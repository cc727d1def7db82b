//! In-memory entity store.
//!
//! Bodies are kept in [`BodyTable`]s: parallel arrays of entity ids,
//! positions and physics state, addressed by a per-frame [`Slot`].
//! Systems never see the concrete store, only the [`BodyQuery`] trait.

use glam::Vec2;

use crate::types::{Entity, Mass, Slot};

/// Velocity, net force and mass of one body.
///
/// `magnitude` / `angle` are the polar form of the net force acting on the
/// body, rewritten every frame while gravity is enabled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Physics {
    pub vel: Vec2,
    pub magnitude: f32,
    pub angle: f32,
    pub mass: Mass,
}

impl Physics {
    /// A motionless body with no net force.
    pub fn at_rest(mass: Mass) -> Self {
        Self {
            vel: Vec2::ZERO,
            magnitude: 0.0,
            angle: 0.0,
            mass,
        }
    }

    /// Net force as a Cartesian vector.
    pub fn force(&self) -> Vec2 {
        Vec2::from_angle(self.angle) * self.magnitude
    }
}

/// Parallel component arrays for a group of bodies.
#[derive(Debug, Default, Clone)]
pub struct BodyTable {
    pub entities: Vec<Entity>,
    pub positions: Vec<Vec2>,
    pub physics: Vec<Physics>,
}

impl BodyTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Appends a body at the end of the table.
    ///
    /// ### Parameters
    /// - `entity` - Identifier of the new body.
    /// - `position` - Initial position.
    /// - `physics` - Initial velocity, force and mass.
    ///
    /// ### Returns
    /// The slot the body landed in (the previous length).
    pub fn push(&mut self, entity: Entity, position: Vec2, physics: Physics) -> Slot {
        let slot = self.entities.len();
        self.entities.push(entity);
        self.positions.push(position);
        self.physics.push(physics);
        slot
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.positions.clear();
        self.physics.clear();
    }

    /// Slot currently holding `entity`.
    ///
    /// ### Returns
    /// `Some(slot)` if the table contains `entity`, `None` otherwise.
    pub fn slot_of(&self, entity: Entity) -> Option<Slot> {
        self.entities.iter().position(|&e| e == entity)
    }
}

/// Access to every table whose bodies carry both a position and physics.
pub trait BodyQuery {
    fn tables(&self) -> &[BodyTable];

    fn tables_mut(&mut self) -> &mut [BodyTable];

    /// Total number of live bodies across all tables.
    fn len(&self) -> usize {
        self.tables().iter().map(BodyTable::len).sum()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest single table; this is what the scratch matrix must hold.
    fn widest_table(&self) -> usize {
        self.tables().iter().map(BodyTable::len).max().unwrap_or(0)
    }
}

/// The default store: one table holding every body.
#[derive(Debug)]
pub struct World {
    tables: [BodyTable; 1],
    next_id: u32,
}

impl World {
    /// Creates an empty world whose first entity gets id `0`.
    pub fn new() -> Self {
        Self {
            tables: [BodyTable::new()],
            next_id: 0,
        }
    }

    /// Allocates a new entity and attaches the given components to it.
    ///
    /// ### Parameters
    /// - `position` - Initial position.
    /// - `physics` - Initial physics state; its mass is already validated.
    ///
    /// ### Returns
    /// The identifier of the created entity.
    pub fn create(&mut self, position: Vec2, physics: Physics) -> Entity {
        let entity = Entity(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.tables[0].push(entity, position, physics);
        entity
    }

    /// Position and physics of `entity`.
    ///
    /// ### Returns
    /// A copy of both components, or `None` if `entity` is not alive.
    pub fn get(&self, entity: Entity) -> Option<(Vec2, Physics)> {
        self.tables.iter().find_map(|t| {
            t.slot_of(entity)
                .map(|slot| (t.positions[slot], t.physics[slot]))
        })
    }

    /// Removes every body. Identifiers keep counting upward.
    pub fn clear(&mut self) {
        for t in &mut self.tables {
            t.clear();
        }
    }

    /// Iterates `(position, physics)` of every body, for drawing.
    pub fn bodies(&self) -> impl Iterator<Item = (Vec2, &Physics)> {
        self.tables
            .iter()
            .flat_map(|t| t.positions.iter().copied().zip(t.physics.iter()))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyQuery for World {
    fn tables(&self) -> &[BodyTable] {
        &self.tables
    }

    fn tables_mut(&mut self) -> &mut [BodyTable] {
        &mut self.tables
    }
}
