//! Video bitstream collaborator
//!
//! Exp-Golomb coded bit I/O in both directions plus the H.264 syntax
//! built on it.

pub mod bitstream;
pub mod h264;

pub use bitstream::{BitReader, BitWriter, Bitstream, Direction, Fill, Inferable};
pub use h264::{PredWeightTable, ScalingMatrix, SeqParm};
