//! Error types for the nvdis disassembler

use thiserror::Error;

/// Main error type for nvdis
#[derive(Error, Debug)]
pub enum NvdisError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Bitstream error: {0}")]
    Vstream(#[from] VstreamError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Instruction decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No row of `table` matched the word
    #[error("No matching rule in table '{table}' for 0x{word:016x}")]
    NoMatchingRule { table: &'static str, word: u64 },

    /// A row matched but carried the unrecognized-encoding marker
    #[error("Unrecognized encoding 0x{word:016x} at 0x{address:x}: {rendering}")]
    ExplicitUnrecognized {
        word: u64,
        address: u64,
        rendering: String,
    },

    /// Fewer bytes than one instruction word remained
    #[error("Truncated instruction at 0x{address:x}: {len} trailing bytes")]
    Truncated { address: u64, len: usize },
}

/// Bitfield encode errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Field overflow: {value} does not fit in {width} bits (signed: {signed})")]
    FieldOverflow { value: i64, width: u32, signed: bool },

    #[error("Misaligned value: {value} is not a multiple of 1 << {shift}")]
    Misaligned { value: i64, shift: u32 },
}

/// Bit-level stream errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VstreamError {
    #[error("End of stream")]
    EndOfStream,

    #[error("Exp-Golomb code too long")]
    ExpGolombOverflow,

    #[error("Inferred value mismatch: expected {expected}, got {actual}")]
    InferMismatch { expected: i64, actual: i64 },

    #[error("Value {value} does not fit in {bits} bits")]
    ValueTooWide { value: u64, bits: u32 },

    #[error("Unsupported syntax: {0}")]
    Unsupported(&'static str),

    #[error("Unknown profile_idc: {0}")]
    UnknownProfile(u32),
}

/// Result type alias for nvdis operations
pub type Result<T> = std::result::Result<T, NvdisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecodeError::NoMatchingRule {
            table: "tabm",
            word: 0xdead_beef,
        };
        assert_eq!(
            format!("{}", err),
            "No matching rule in table 'tabm' for 0x00000000deadbeef"
        );

        let err = DecodeError::Truncated {
            address: 0x18,
            len: 3,
        };
        assert_eq!(format!("{}", err), "Truncated instruction at 0x18: 3 trailing bytes");

        let err = FieldError::Misaligned { value: 6, shift: 2 };
        assert_eq!(format!("{}", err), "Misaligned value: 6 is not a multiple of 1 << 2");

        let err = VstreamError::InferMismatch {
            expected: 1,
            actual: 3,
        };
        assert_eq!(format!("{}", err), "Inferred value mismatch: expected 1, got 3");
    }

    #[test]
    fn test_error_conversion() {
        let err: NvdisError = FieldError::FieldOverflow {
            value: 300,
            width: 8,
            signed: false,
        }
        .into();
        assert!(matches!(err, NvdisError::Field(_)));

        let err: NvdisError = VstreamError::EndOfStream.into();
        assert!(matches!(err, NvdisError::Vstream(VstreamError::EndOfStream)));
    }
}
