//! Error type shared by the NTT engine and the BFV multiplier.

/// Errors surfaced by this crate.
///
/// All arithmetic is total on coefficients in [0, q); errors can only arise
/// from parameter validation at construction time or from polynomials of
/// the wrong length.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FheError {
    /// Construction-time validation failure: N not a power of two, q out of
    /// range or composite, q ≢ 1 (mod 2N), t out of range, accumulator
    /// width bound violated, or a bad relinearization base.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A polynomial (or key component) does not have length N.
    #[error("polynomial length mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}
