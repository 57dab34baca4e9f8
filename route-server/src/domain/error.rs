//! Errors raised while assembling legs into routes.

/// A leg or route failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A leg's numeric fields are out of range
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Consecutive legs don't share an endpoint
    #[error("leg {0} does not start where the previous leg ends")]
    DisconnectedLegs(usize),

    /// Route has no legs
    #[error("route must have at least one leg")]
    EmptyRoute,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidLeg("cost must be non-negative");
        assert_eq!(err.to_string(), "invalid leg: cost must be non-negative");

        let err = DomainError::DisconnectedLegs(2);
        assert_eq!(
            err.to_string(),
            "leg 2 does not start where the previous leg ends"
        );

        let err = DomainError::EmptyRoute;
        assert_eq!(err.to_string(), "route must have at least one leg");
    }
}
