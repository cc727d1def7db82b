use glam::Vec2;

use crate::world::BodyQuery;

/// Advances every body by one frame (semi-implicit Euler, unit time step).
///
/// When `apply_forces` is set, the net force divided by mass is added to
/// the velocity first. Position always moves by the (possibly updated)
/// velocity. No clamping or collision response.
///
/// ### Parameters
/// - `bodies` - Every table to advance.
/// - `apply_forces` - Whether the net force updates velocities this frame.
pub fn integrate<Q: BodyQuery + ?Sized>(bodies: &mut Q, apply_forces: bool) {
    for table in bodies.tables_mut() {
        for (pos, physics) in table.positions.iter_mut().zip(table.physics.iter_mut()) {
            if apply_forces {
                physics.vel += Vec2::from_angle(physics.angle) * physics.magnitude
                    / physics.mass.get();
            }
            *pos += physics.vel;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        types::Mass,
        world::{Physics, World},
    };

    fn body(world: &mut World, pos: Vec2, vel: Vec2, magnitude: f32, angle: f32, m: f32) {
        let mut p = Physics::at_rest(Mass::new(m).unwrap());
        p.vel = vel;
        p.magnitude = magnitude;
        p.angle = angle;
        world.create(pos, p);
    }

    #[test]
    fn force_accelerates_then_moves() {
        let mut world = World::new();
        body(&mut world, Vec2::ZERO, Vec2::ZERO, 100.0, 0.0, 100.0);

        integrate(&mut world, true);

        let t = &world.tables()[0];
        assert_eq!(t.physics[0].vel, Vec2::new(1.0, 0.0));
        assert_eq!(t.positions[0], Vec2::new(1.0, 0.0));
    }

    #[test]
    fn disabled_forces_keep_velocity_but_still_move() {
        let mut world = World::new();
        body(
            &mut world,
            Vec2::new(5.0, 5.0),
            Vec2::new(1.0, -2.0),
            50.0,
            1.0,
            10.0,
        );

        integrate(&mut world, false);
        integrate(&mut world, false);

        let t = &world.tables()[0];
        assert_eq!(t.physics[0].vel, Vec2::new(1.0, -2.0));
        assert_eq!(t.positions[0], Vec2::new(7.0, 1.0));
    }

    #[test]
    fn body_at_rest_without_force_stays_put() {
        let mut world = World::new();
        body(&mut world, Vec2::new(3.0, 4.0), Vec2::ZERO, 0.0, 0.0, 1.0);

        integrate(&mut world, true);

        assert_eq!(world.tables()[0].positions[0], Vec2::new(3.0, 4.0));
    }
}
