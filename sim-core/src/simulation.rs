//! The simulation context and its per-frame pipeline.
//!
//! One call to [`Simulation::step`] runs, in order:
//! 1. pending spawn requests (each one revalidating matrix capacity),
//! 2. the capacity check for the widest body table,
//! 3. [`forces::net_force_pass`] — pairwise forces and resultants
//!    (skipped while gravity is disabled),
//! 4. [`integrator::integrate`].

use glam::Vec2;
use log::{info, warn};
use rand::Rng;

use crate::{
    config::Config,
    error::Result,
    forces, integrator,
    scratch_matrix::ScratchMatrix,
    spawner::{self, SpawnRequest},
    types::{Entity, SizeTier},
    world::{BodyQuery, World},
};

/// Owns everything one running simulation needs.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    matrix: ScratchMatrix,
    config: Config,
    pending: Vec<SpawnRequest>,
    frame: u64,
}

impl Simulation {
    /// Creates an empty simulation.
    ///
    /// ### Parameters
    /// - `config` - Initial matrix capacity, gravity flag and angle mode.
    ///
    /// ### Errors
    /// - [`crate::error::Error::InvalidConfig`] if `config` fails validation.
    /// - [`crate::error::Error::Allocation`] if the initial matrix cannot be
    ///   allocated.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            world: World::new(),
            matrix: ScratchMatrix::with_capacity(config.initial_capacity)?,
            config,
            pending: Vec::new(),
            frame: 0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn matrix(&self) -> &ScratchMatrix {
        &self.matrix
    }

    /// Parameters this simulation runs with, including the live gravity flag.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn body_count(&self) -> usize {
        self.world.len()
    }

    /// Number of completed steps.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn gravity_enabled(&self) -> bool {
        self.config.gravity_enabled
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        if self.config.gravity_enabled != enabled {
            info!("gravity {}", if enabled { "enabled" } else { "disabled" });
        }
        self.config.gravity_enabled = enabled;
    }

    pub fn toggle_gravity(&mut self) {
        self.set_gravity_enabled(!self.config.gravity_enabled);
    }

    /// Queues a spawn that is carried out at the start of the next step.
    pub fn request_spawn(&mut self, request: SpawnRequest) {
        self.pending.push(request);
    }

    /// Spawns one body immediately.
    ///
    /// ### Parameters
    /// - `position` - Where the body appears.
    /// - `tier` - Size tier; the mass is `tier * MASS_AMPLIFY`.
    ///
    /// ### Returns
    /// The identifier of the new body.
    pub fn spawn(&mut self, position: Vec2, tier: SizeTier) -> Result<Entity> {
        spawner::spawn(
            &mut self.world,
            &mut self.matrix,
            SpawnRequest::new(position, tier),
        )
    }

    /// Spawns `count` bodies at random inside `center ± half_extents`.
    ///
    /// ### Returns
    /// The created entities, in creation order.
    pub fn scatter(
        &mut self,
        center: Vec2,
        half_extents: Vec2,
        count: usize,
        tier: SizeTier,
        rng: &mut impl Rng,
    ) -> Result<Vec<Entity>> {
        spawner::scatter_in_rect(
            &mut self.world,
            &mut self.matrix,
            center,
            half_extents,
            count,
            tier,
            rng,
        )
    }

    /// Removes every body and pending request and zeroes the matrix.
    /// The matrix keeps its capacity.
    pub fn clear(&mut self) {
        self.world.clear();
        self.pending.clear();
        self.matrix.clear();
    }

    /// Advances the simulation by one frame.
    ///
    /// ### Errors
    /// [`crate::error::Error::Allocation`] if the matrix cannot grow. The
    /// frame is aborted before any force or position is touched. Queued
    /// spawns carried out before the failing one stay in the world; the
    /// failing request and the ones after it stay queued for the next step.
    pub fn step(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);
        let mut requests = pending.into_iter();
        while let Some(request) = requests.next() {
            if let Err(e) = spawner::spawn(&mut self.world, &mut self.matrix, request) {
                warn!("spawn at {:?} rejected: {e}", request.position);
                self.pending.push(request);
                self.pending.extend(requests);
                return Err(e);
            }
        }

        self.matrix.ensure_capacity(self.world.widest_table())?;

        let gravity = self.config.gravity_enabled;
        if gravity {
            forces::net_force_pass(&mut self.world, &mut self.matrix, self.config.angle_mode);
        }
        integrator::integrate(&mut self.world, gravity);

        self.frame += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AngleMode, error::Error};

    fn sim_with_capacity(initial_capacity: usize) -> Simulation {
        Simulation::new(Config {
            initial_capacity,
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = Simulation::new(Config {
            initial_capacity: 0,
            ..Config::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn pending_requests_spawn_on_next_step() {
        let mut sim = sim_with_capacity(2);
        for i in 0..3 {
            sim.request_spawn(SpawnRequest::new(
                Vec2::new(100.0 * i as f32, 0.0),
                SizeTier::DEFAULT,
            ));
        }
        assert_eq!(sim.body_count(), 0);

        sim.step().unwrap();

        assert_eq!(sim.body_count(), 3);
        assert_eq!(sim.matrix().capacity(), 4);
        assert_eq!(sim.frame(), 1);
    }

    #[test]
    fn two_body_step_matches_hand_computation() {
        let mut sim = sim_with_capacity(4);
        let tier = SizeTier::new(1).unwrap();
        let a = sim.spawn(Vec2::new(0.0, 0.0), tier).unwrap();
        let b = sim.spawn(Vec2::new(10.0, 0.0), tier).unwrap();

        sim.step().unwrap();

        let (pos_a, phys_a) = sim.world().get(a).unwrap();
        assert_eq!(phys_a.magnitude, 100.0);
        assert_eq!(phys_a.angle, 0.0);
        assert_eq!(phys_a.vel, Vec2::new(1.0, 0.0));
        assert_eq!(pos_a, Vec2::new(1.0, 0.0));

        let (pos_b, phys_b) = sim.world().get(b).unwrap();
        assert!((phys_b.vel.x + 1.0).abs() < 1e-4);
        assert!((pos_b.x - 9.0).abs() < 1e-4);
    }

    #[test]
    fn disabling_gravity_freezes_velocity_and_force() {
        let mut sim = sim_with_capacity(4);
        let a = sim.spawn(Vec2::new(0.0, 0.0), SizeTier::DEFAULT).unwrap();
        sim.spawn(Vec2::new(50.0, 0.0), SizeTier::DEFAULT).unwrap();

        sim.step().unwrap();
        let (p1, phys1) = sim.world().get(a).unwrap();

        sim.toggle_gravity();
        assert!(!sim.gravity_enabled());
        assert!(!sim.config().gravity_enabled);
        sim.step().unwrap();
        sim.step().unwrap();

        let (p3, phys3) = sim.world().get(a).unwrap();
        assert_eq!(phys3.vel, phys1.vel);
        assert_eq!(phys3.magnitude, phys1.magnitude);
        assert!((p3 - (p1 + phys1.vel * 2.0)).length() < 1e-5);
    }

    #[test]
    fn clear_empties_world_and_keeps_capacity() {
        let mut sim = sim_with_capacity(2);
        for i in 0..5 {
            sim.spawn(Vec2::new(i as f32 * 10.0, 0.0), SizeTier::DEFAULT)
                .unwrap();
        }
        sim.request_spawn(SpawnRequest::new(Vec2::ZERO, SizeTier::DEFAULT));
        sim.step().unwrap();
        let capacity = sim.matrix().capacity();

        sim.request_spawn(SpawnRequest::new(Vec2::ZERO, SizeTier::DEFAULT));
        sim.clear();

        assert_eq!(sim.body_count(), 0);
        assert_eq!(sim.matrix().capacity(), capacity);
        sim.step().unwrap();
        assert_eq!(sim.body_count(), 0);
    }

    #[test]
    fn atan2_mode_pulls_along_diagonal() {
        let mut sim = Simulation::new(Config {
            angle_mode: AngleMode::Atan2,
            ..Config::default()
        })
        .unwrap();
        let a = sim.spawn(Vec2::new(10.0, 10.0), SizeTier::DEFAULT).unwrap();
        sim.spawn(Vec2::new(0.0, 0.0), SizeTier::DEFAULT).unwrap();

        sim.step().unwrap();

        let (_, phys) = sim.world().get(a).unwrap();
        assert!(phys.vel.x < 0.0 && phys.vel.y < 0.0);
        assert!((phys.vel.x - phys.vel.y).abs() < 1e-4);
    }
}
