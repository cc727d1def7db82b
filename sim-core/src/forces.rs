//! Pairwise force evaluation and per-body resultant accumulation.
//!
//! A force pass over one [`BodyTable`] runs in two stages:
//! 1. [`evaluate_pairs`] — every unordered pair of slots gets its
//!    inverse-square force written into the [`ScratchMatrix`], once per
//!    direction.
//! 2. [`accumulate_resultants`] — each row of the matrix is vector-summed
//!    into the body's net force (`Physics::magnitude` / `Physics::angle`).
//!
//! [`net_force_pass`] runs both stages for every table of a [`BodyQuery`].

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use crate::{
    config::AngleMode,
    scratch_matrix::ScratchMatrix,
    types::Slot,
    world::{BodyQuery, BodyTable},
};

const THREE_FRAC_PI_2: f32 = 3.0 * FRAC_PI_2;

/// Inverse-square attraction between two masses `r` apart.
///
/// Coincident bodies (`r == 0`) exert no force on each other.
///
/// ### Parameters
/// - `mass_a`, `mass_b` - Masses of the two bodies.
/// - `r` - Distance between them.
#[inline]
pub fn force_magnitude(mass_a: f32, mass_b: f32, r: f32) -> f32 {
    if r == 0.0 {
        0.0
    } else {
        mass_a * mass_b / (r * r)
    }
}

/// Direction of the offset `(dx, dy)` from one body to another.
///
/// In [`AngleMode::Legacy`] a vertical offset maps to `3π/2` when `dy > 0`
/// and `π/2` otherwise, any offset with `dx < 0` maps to `π` regardless of
/// `dy`, and everything else is `atan(dy / dx)`.
///
/// ### Parameters
/// - `dx`, `dy` - Offset from the attracted body to the attracting one.
/// - `mode` - Which angle convention to use.
pub fn pair_angle(dx: f32, dy: f32, mode: AngleMode) -> f32 {
    match mode {
        AngleMode::Legacy => {
            if dx < 0.0 {
                PI
            } else if dx == 0.0 {
                if dy > 0.0 { THREE_FRAC_PI_2 } else { FRAC_PI_2 }
            } else {
                (dy / dx).atan()
            }
        }
        AngleMode::Atan2 => dy.atan2(dx),
    }
}

/// Converts a Cartesian sum back to `(magnitude, angle)`.
fn to_polar(v: Vec2) -> (f32, f32) {
    let magnitude = v.length();
    let angle = if v.x == 0.0 {
        if v.y < 0.0 { THREE_FRAC_PI_2 } else { FRAC_PI_2 }
    } else if v.x < 0.0 {
        (v.y / v.x).atan() + PI
    } else {
        (v.y / v.x).atan()
    };
    (magnitude, angle)
}

/// Writes the force of every pair of slots in `table` into `matrix`.
///
/// For `j < k`, cell `(j, k)` receives `(m, a)` where `a` points from `j`
/// towards `k`, and cell `(k, j)` receives `(m, a + π)`. Diagonal cells are
/// zeroed. Only the matrix is mutated.
///
/// ### Parameters
/// - `table` - Bodies of one table; only read.
/// - `matrix` - Scratch storage receiving the pairwise forces.
/// - `mode` - Angle convention, see [`pair_angle`].
///
/// ### Panics
/// Panics if `table.len()` exceeds `matrix.capacity()`.
pub fn evaluate_pairs(table: &BodyTable, matrix: &mut ScratchMatrix, mode: AngleMode) {
    let n = table.len();
    assert!(
        n <= matrix.capacity(),
        "table of {n} bodies does not fit scratch matrix of capacity {}",
        matrix.capacity()
    );

    for j in 0..n {
        matrix.set(j, j, 0.0, 0.0);

        let pj = table.positions[j];
        let mj = table.physics[j].mass.get();

        for k in (j + 1)..n {
            let d = table.positions[k] - pj;
            let r = d.length();
            let m = force_magnitude(mj, table.physics[k].mass.get(), r);
            let a = pair_angle(d.x, d.y, mode);

            matrix.set(j, k, m, a);
            matrix.set(k, j, m, a + PI);
        }
    }
}

/// Vector sum of one full-width matrix row, in polar form.
///
/// Zero-magnitude cells are skipped, which is what makes columns beyond
/// the live slots harmless. A row with no contributing cell yields
/// `(0.0, 0.0)`.
///
/// ### Returns
/// `(magnitude, angle)` of the net force on slot `j`.
pub fn resultant(matrix: &ScratchMatrix, j: Slot) -> (f32, f32) {
    let (magnitudes, angles) = matrix.row(j);

    let mut sum = Vec2::ZERO;
    let mut contributed = false;
    for (&m, &a) in magnitudes.iter().zip(angles) {
        if m == 0.0 {
            continue;
        }
        sum += Vec2::from_angle(a) * m;
        contributed = true;
    }

    if contributed { to_polar(sum) } else { (0.0, 0.0) }
}

/// Stores the resultant of row `j` into the physics of slot `j`, for every
/// slot of `table`.
pub fn accumulate_resultants(table: &mut BodyTable, matrix: &ScratchMatrix) {
    for (j, physics) in table.physics.iter_mut().enumerate() {
        let (magnitude, angle) = resultant(matrix, j);
        physics.magnitude = magnitude;
        physics.angle = angle;
    }
}

/// Computes the net force on every body of every table.
///
/// Tables are processed one after another against the same matrix; slots
/// of different tables never interact.
///
/// ### Panics
/// Panics if a table is wider than the matrix. Callers grow the matrix
/// with [`ScratchMatrix::ensure_capacity`] first.
pub fn net_force_pass<Q: BodyQuery + ?Sized>(
    bodies: &mut Q,
    matrix: &mut ScratchMatrix,
    mode: AngleMode,
) {
    for table in bodies.tables_mut() {
        matrix.prepare_live_region(table.len());
        evaluate_pairs(table, matrix, mode);
        accumulate_resultants(table, matrix);
    }
}
