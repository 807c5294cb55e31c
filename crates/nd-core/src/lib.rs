//! Core types for the nvdis disassembler
//!
//! This crate provides the error types, configuration and logging
//! setup shared by the decoder engine, the ISA tables and the
//! bitstream collaborator.

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{DecodeError, FieldError, NvdisError, Result, VstreamError};
