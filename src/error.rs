//! Error taxonomy for a colored-line call.
//!
//! Every variant except [`ClineError::Surface`] is raised while the call is
//! being resolved, before anything is drawn.

use thiserror::Error;

/// Boxed error coming back from a drawing collaborator.
pub type SurfaceFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ClineError {
    #[error("not enough arguments: {0}; expected cline([axes,] [x,] y[, z], palette[, values][, style...])")]
    InsufficientArguments(String),

    #[error("no palette found: expected an N-by-3 color table or a palette name after the coordinate vectors")]
    MissingPalette,

    #[error("invalid palette: {0}; expected an N-by-3 table of RGB components in [0, 1] with N >= 1")]
    InvalidPalette(String),

    #[error("coordinate mismatch: {0}")]
    CoordinateMismatch(String),

    #[error("too many leading arguments: palette found at position {position}, expected position 2, 3 or 4 (after y, x y or x y z)")]
    TooManyLeadingArguments { position: usize },

    #[error("value sequence has {got} entries but the line has {expected} points")]
    ValueLengthMismatch { expected: usize, got: usize },

    #[error("invalid style option: {0}")]
    InvalidStyle(String),

    #[error(transparent)]
    Surface(SurfaceFailure),
}

impl ClineError {
    /// Wrap a collaborator error without altering its message or source chain.
    pub fn surface<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Surface(Box::new(err))
    }

    /// True for failures raised before rendering began.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Surface(_))
    }
}

pub type Result<T> = std::result::Result<T, ClineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Offline;

    impl fmt::Display for Offline {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "surface offline")
        }
    }

    impl std::error::Error for Offline {}

    #[test]
    fn surface_errors_keep_their_message() {
        let err = ClineError::surface(Offline);
        assert_eq!(err.to_string(), "surface offline");
        assert!(!err.is_validation());
        match err {
            ClineError::Surface(inner) => assert!(inner.downcast_ref::<Offline>().is_some()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn messages_name_the_expected_shape() {
        let msg = ClineError::InvalidPalette("table has 2 columns".into()).to_string();
        assert!(msg.contains("N-by-3"));
        let msg = ClineError::ValueLengthMismatch { expected: 4, got: 3 }.to_string();
        assert!(msg.contains('4') && msg.contains('3'));
        assert!(ClineError::MissingPalette.is_validation());
    }
}
