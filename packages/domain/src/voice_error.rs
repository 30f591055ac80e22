//! Unified error for the concatenation pipeline.
use thiserror::Error;

/// Top-level error covering store access, configuration and assembly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    /// A timeline lookup fell outside the recorded material.
    #[error("timeline position {position} out of range (timeline holds {total} samples)")]
    OutOfRange {
        /// Requested sample position (end of range for run lookups).
        position: u64,
        /// Total number of samples in the timeline.
        total: u64,
    },
    /// Any other audio store failure.
    #[error("store: {0}")]
    Store(String),
    /// Configuration-related failure reason.
    #[error("configuration: {0}")]
    Configuration(String),
    /// A selection carries a prosodic target that cannot be rendered.
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    /// A unit reached the assembler without frames.
    #[error("unit {index} has no frames to assemble")]
    EmptyUnit {
        /// Position of the unit in the output sequence.
        index: usize,
    },
    /// Failure while writing rendered audio.
    #[error("io: {0}")]
    Io(String),
}

