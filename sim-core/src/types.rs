use crate::error::{Error, Result};

/// Index of a body inside one [`crate::world::BodyTable`].
///
/// Slots are contiguous (`0..table.len()`) and only meaningful for the
/// duration of a single simulation step.
pub type Slot = usize;

/// Factor converting a [`SizeTier`] into a simulated mass.
pub const MASS_AMPLIFY: f32 = 100.0;

/// Largest size tier a body can be spawned with.
pub const MAX_SIZE_TIER: u32 = 10;

/// Opaque identifier of one simulated point mass.
///
/// Identifiers are handed out by [`crate::world::World`] and never reused
/// within the lifetime of that world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(pub(crate) u32);

impl Entity {
    /// Raw numeric value of the identifier.
    pub fn id(self) -> u32 {
        self.0
    }
}

/// Strictly positive, finite mass.
///
/// The only way to obtain a `Mass` is through [`Mass::new`] (or a
/// [`SizeTier`]), so dividing by it in the integrator is always defined.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Mass(f32);

impl Mass {
    /// Validates `value` and wraps it.
    ///
    /// ### Parameters
    /// - `value` - Mass in simulation units.
    ///
    /// ### Errors
    /// [`Error::InvalidMass`] if `value` is not finite or not `> 0`.
    pub fn new(value: f32) -> Result<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(Error::InvalidMass(value))
        }
    }

    /// The wrapped value, always `> 0`.
    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
}

/// Discrete size selected by the user when spawning a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SizeTier(u32);

impl SizeTier {
    /// Tier selected when nothing else has been chosen.
    pub const DEFAULT: SizeTier = SizeTier(2);

    /// ### Parameters
    /// - `tier` - Requested tier.
    ///
    /// ### Errors
    /// [`Error::InvalidSizeTier`] if `tier` is outside `1..=MAX_SIZE_TIER`.
    pub fn new(tier: u32) -> Result<Self> {
        if (1..=MAX_SIZE_TIER).contains(&tier) {
            Ok(Self(tier))
        } else {
            Err(Error::InvalidSizeTier(tier))
        }
    }

    /// Maps a number key (`1`..=`9`) to its tier (`2`..=`10`).
    pub fn from_number_key(key: u32) -> Option<Self> {
        match key {
            1..=9 => Some(Self(key + 1)),
            _ => None,
        }
    }

    /// The tier as a number in `1..=MAX_SIZE_TIER`.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Mass of a body spawned with this tier.
    pub fn mass(self) -> Mass {
        Mass(self.0 as f32 * MASS_AMPLIFY)
    }
}

impl Default for SizeTier {
    fn default() -> Self {
        Self::DEFAULT
    }
}
