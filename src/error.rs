//! Error types for spaudio

use crate::math::Vec3;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpaudioError {
    #[error("Expected {expected} source positions (one per input channel), got {actual}")]
    Cardinality { expected: usize, actual: usize },

    #[error(
        "{what} at ({:.3}, {:.3}, {:.3}) lies outside the room ({:.3} x {:.3} x {:.3})",
        .position.x, .position.y, .position.z, .dimensions.x, .dimensions.y, .dimensions.z
    )]
    OutOfBounds {
        what: String,
        position: Vec3,
        dimensions: Vec3,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Degenerate signal: {0}")]
    DegenerateSignal(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audio loading error: {0}")]
    AudioLoading(String),

    #[error("Audio format error: {0}")]
    AudioFormat(String),

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Coarse classification of [`SpaudioError`] for callers that branch on failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source/microphone counts or positions inconsistent with the input or the room.
    Configuration,
    /// A normalization divisor of zero.
    DegenerateSignal,
    /// The propagation engine failed.
    Simulation,
    /// Decode, encode or device failures.
    Io,
}

impl SpaudioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cardinality { .. } | Self::OutOfBounds { .. } | Self::Configuration(_) => {
                ErrorKind::Configuration
            }
            Self::DegenerateSignal(_) => ErrorKind::DegenerateSignal,
            Self::Simulation(_) => ErrorKind::Simulation,
            Self::Io(_)
            | Self::AudioLoading(_)
            | Self::AudioFormat(_)
            | Self::AudioDevice(_)
            | Self::Encoding(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpaudioError>;
