use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the simulation core.
#[derive(Debug, Error)]
pub enum Error {
    /// The scratch matrix could not be grown to the requested capacity.
    ///
    /// Fatal for the frame that triggered it: nothing has been mutated.
    #[error("failed to allocate scratch matrix for capacity {requested}")]
    Allocation { requested: usize },

    /// Mass must be finite and strictly positive.
    #[error("invalid mass: {0}")]
    InvalidMass(f32),

    /// Size tier outside the supported range.
    #[error("invalid size tier: {0}")]
    InvalidSizeTier(u32),

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::Allocation { requested: 4096 };
        let msg = format!("{e}");
        assert!(msg.contains("allocate"));
        assert!(msg.contains("4096"));

        let e = Error::InvalidConfig("initial_capacity must be > 0".to_string());
        assert!(format!("{e}").contains("initial_capacity"));
    }
}
