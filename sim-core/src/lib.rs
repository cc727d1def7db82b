//! Core 2-D point-mass gravity simulation library.
//!
//! Main components:
//! - [`scratch_matrix`] — growable square buffers of pairwise forces.
//! - [`forces`] — pairwise force evaluation and per-body resultants.
//! - [`integrator`] — velocity / position update.
//! - [`spawner`] — creation of new bodies.
//! - [`simulation`] — the context object tying a frame together.
//! - [`world`] — the entity store and the [`world::BodyQuery`] seam.
//! - [`config`] — simulation parameters.
//! - [`error`] — crate-wide error type.
//! - [`types`] — shared ids and validated scalars.

pub mod config;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod scratch_matrix;
pub mod simulation;
pub mod spawner;
pub mod types;
pub mod world;

pub use config::{AngleMode, Config};
pub use error::{Error, Result};
pub use simulation::Simulation;
pub use spawner::SpawnRequest;
pub use types::{Entity, MASS_AMPLIFY, Mass, SizeTier};
pub use world::{BodyQuery, BodyTable, Physics, World};
