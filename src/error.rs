use thiserror::Error;

/// Failures surfaced by the alignment core.
///
/// A scanner pair that simply does not overlap is not an error; the pair
/// matcher reports it as `None` and the orchestrator moves on to the next pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    /// The input contained no scanners at all.
    #[error("No scanners to align")]
    NoScanners,

    /// A full pass over the unaligned scanners promoted none of them.
    ///
    /// The overlap graph of the input is disconnected (or some scanners see
    /// fewer beacons than the overlap threshold), so alignment cannot finish.
    #[error("Alignment stalled: {} scanner(s) overlap no aligned scanner: {}", remaining.len(), remaining.join(", "))]
    AlignmentStalled { remaining: Vec<String> },

    /// A rotation index outside the catalog.
    #[error("Invalid rotation index {0}, the catalog holds 24 rotations")]
    InvalidRotation(usize),
}

/// Result type for the alignment core
pub type AlignmentResult<T> = std::result::Result<T, AlignmentError>;
