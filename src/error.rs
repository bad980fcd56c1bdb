//! Errors surfaced by the sponge and its contexts.
//!
//! Every fallible operation validates its inputs before touching any state, so
//! receiving one of these errors means nothing was absorbed, squeezed or
//! permuted.
use core::fmt;

use crate::algorithm::Algorithm;
use crate::context::Phase;

/// The result type used throughout this crate.
pub type Result<T> = core::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum Error {
    /// A block handed to `absorb_block` was not exactly one rate long.
    #[cfg_attr(
        feature = "std",
        error("block must be {expected} bytes, got {actual}")
    )]
    InvalidBlockLength { expected: usize, actual: usize },
    /// A whole block was absorbed while part of a block was already buffered.
    #[cfg_attr(
        feature = "std",
        error("whole blocks must start at a block boundary, sponge is at byte {position}")
    )]
    UnalignedBlock { position: usize },
    /// Sponge parameters which can't describe a valid sponge.
    #[cfg_attr(feature = "std", error("invalid sponge parameters: {reason}"))]
    InvalidParameters { reason: &'static str },
    /// An operation was attempted in a phase which does not allow it.
    #[cfg_attr(feature = "std", error("cannot {operation} while {phase}"))]
    InvalidState {
        operation: &'static str,
        phase: Phase,
    },
    /// The algorithm doesn't offer this operation.
    #[cfg_attr(feature = "std", error("{algorithm} does not support {operation}"))]
    Unsupported {
        operation: &'static str,
        algorithm: Algorithm,
    },
    /// A serialized state or context had the wrong number of bytes.
    #[cfg_attr(
        feature = "std",
        error("{context}: expected {expected} bytes, got {actual}")
    )]
    InvalidLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A serialized context had the right length but inconsistent fields.
    #[cfg_attr(feature = "std", error("malformed context: {reason}"))]
    MalformedContext { reason: &'static str },
    /// The output buffer cannot hold a fixed-length digest.
    #[cfg_attr(
        feature = "std",
        error("output buffer holds {actual} bytes, digest needs {required}")
    )]
    OutputTooShort { required: usize, actual: usize },
    /// Reserving space for squeezed output failed.
    #[cfg_attr(feature = "std", error("failed to allocate {requested} output bytes"))]
    Allocation { requested: usize },
    /// Keccak-p was asked to run more rounds than Keccak-f has.
    #[cfg_attr(feature = "std", error("keccak-p supports at most 24 rounds, got {requested}"))]
    InvalidRounds { requested: usize },
}

#[cfg(not(feature = "std"))]
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidBlockLength { expected, actual } => {
                write!(f, "block must be {expected} bytes, got {actual}")
            }
            Error::UnalignedBlock { position } => write!(
                f,
                "whole blocks must start at a block boundary, sponge is at byte {position}"
            ),
            Error::InvalidParameters { reason } => {
                write!(f, "invalid sponge parameters: {reason}")
            }
            Error::Unsupported {
                operation,
                algorithm,
            } => write!(f, "{algorithm} does not support {operation}"),
            Error::InvalidState { operation, phase } => {
                write!(f, "cannot {operation} while {phase}")
            }
            Error::InvalidLength {
                context,
                expected,
                actual,
            } => write!(f, "{context}: expected {expected} bytes, got {actual}"),
            Error::MalformedContext { reason } => write!(f, "malformed context: {reason}"),
            Error::OutputTooShort { required, actual } => {
                write!(f, "output buffer holds {actual} bytes, digest needs {required}")
            }
            Error::Allocation { requested } => {
                write!(f, "failed to allocate {requested} output bytes")
            }
            Error::InvalidRounds { requested } => {
                write!(f, "keccak-p supports at most 24 rounds, got {requested}")
            }
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Absorbing => "absorbing",
            Phase::Squeezing => "squeezing",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}
