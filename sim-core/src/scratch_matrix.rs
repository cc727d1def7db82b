use log::debug;

use crate::error::{Error, Result};
use crate::types::Slot;

/// Square scratch storage for pairwise forces.
///
/// Two parallel row-major buffers of side `capacity` hold, for every pair
/// of slots `(j, k)`, the magnitude and angle of the force body `k` exerts
/// on body `j`.
///
/// Every cell outside the region written by the current pass is zero:
/// the resultant pass scans whole rows and relies on that to skip unused
/// columns. [`ScratchMatrix::prepare_live_region`] restores the guarantee
/// when the number of slots shrinks.
///
/// Contents are scratch data for one frame. Growing the matrix does not
/// carry old cells over; the next pairwise pass rewrites every live cell.
#[derive(Debug)]
pub struct ScratchMatrix {
    capacity: usize,
    magnitudes: Vec<f32>,
    angles: Vec<f32>,
    /// Rows and columns `0..dirty` may hold nonzero cells.
    dirty: usize,
}

fn zeroed(len: usize, requested: usize) -> Result<Vec<f32>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::Allocation { requested })?;
    buf.resize(len, 0.0);
    Ok(buf)
}

impl ScratchMatrix {
    /// Allocates a zeroed matrix of side `capacity`.
    ///
    /// ### Parameters
    /// - `capacity` - Number of slots per row and per column.
    ///
    /// ### Errors
    /// [`Error::Allocation`] if `capacity²` cells cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let cells = capacity
            .checked_mul(capacity)
            .ok_or(Error::Allocation {
                requested: capacity,
            })?;
        Ok(Self {
            capacity,
            magnitudes: zeroed(cells, capacity)?,
            angles: zeroed(cells, capacity)?,
            dirty: 0,
        })
    }

    /// Current side length of the matrix.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Guarantees `capacity() >= n`.
    ///
    /// If `n` already fits this is a no-op. Otherwise the capacity is
    /// doubled until it holds `n` and both buffers are replaced by zeroed
    /// ones. Both buffers are allocated before either is swapped in, so on
    /// error the matrix is left exactly as it was.
    ///
    /// ### Parameters
    /// - `n` - Number of slots that must fit.
    ///
    /// ### Returns
    /// `true` if the matrix grew.
    ///
    /// ### Errors
    /// [`Error::Allocation`] if the doubled size overflows or cannot be
    /// allocated.
    pub fn ensure_capacity(&mut self, n: usize) -> Result<bool> {
        if n <= self.capacity {
            return Ok(false);
        }

        let mut new_capacity = self.capacity.max(1);
        while new_capacity < n {
            new_capacity = new_capacity
                .checked_mul(2)
                .ok_or(Error::Allocation { requested: n })?;
        }
        let cells = new_capacity
            .checked_mul(new_capacity)
            .ok_or(Error::Allocation {
                requested: new_capacity,
            })?;

        let magnitudes = zeroed(cells, new_capacity)?;
        let angles = zeroed(cells, new_capacity)?;

        debug!(
            "scratch matrix grown from {} to {} (requested {})",
            self.capacity, new_capacity, n
        );

        self.magnitudes = magnitudes;
        self.angles = angles;
        self.capacity = new_capacity;
        self.dirty = 0;
        Ok(true)
    }

    #[inline]
    fn index(&self, j: Slot, k: Slot) -> usize {
        assert!(
            j < self.capacity && k < self.capacity,
            "cell ({j}, {k}) out of bounds for capacity {}",
            self.capacity
        );
        j * self.capacity + k
    }

    /// Magnitude and angle stored in cell `(j, k)`.
    ///
    /// ### Panics
    /// Panics if `j` or `k` is not below [`ScratchMatrix::capacity`].
    #[inline]
    pub fn get(&self, j: Slot, k: Slot) -> (f32, f32) {
        let i = self.index(j, k);
        (self.magnitudes[i], self.angles[i])
    }

    /// Writes cell `(j, k)`.
    ///
    /// ### Panics
    /// Panics if `j` or `k` is not below [`ScratchMatrix::capacity`].
    #[inline]
    pub fn set(&mut self, j: Slot, k: Slot, magnitude: f32, angle: f32) {
        let i = self.index(j, k);
        self.magnitudes[i] = magnitude;
        self.angles[i] = angle;
        self.dirty = self.dirty.max(j.max(k) + 1);
    }

    /// Full-width row `j`.
    ///
    /// ### Returns
    /// `(magnitudes, angles)`, each of length [`ScratchMatrix::capacity`].
    pub fn row(&self, j: Slot) -> (&[f32], &[f32]) {
        let start = self.index(j, 0);
        let end = start + self.capacity;
        (&self.magnitudes[start..end], &self.angles[start..end])
    }

    /// Zeroes every cell that lies outside rows/columns `0..count` but may
    /// still hold values from a wider previous pass.
    ///
    /// ### Parameters
    /// - `count` - Number of slots the next pass will write.
    pub fn prepare_live_region(&mut self, count: usize) {
        if self.dirty <= count {
            return;
        }
        let cap = self.capacity;
        let dirty = self.dirty;
        for j in 0..dirty {
            let cols = if j < count { count..dirty } else { 0..dirty };
            let start = j * cap;
            self.magnitudes[start + cols.start..start + cols.end].fill(0.0);
            self.angles[start + cols.start..start + cols.end].fill(0.0);
        }
        self.dirty = count;
    }

    /// Zeroes the whole matrix. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.magnitudes.fill(0.0);
        self.angles.fill(0.0);
        self.dirty = 0;
    }
}
