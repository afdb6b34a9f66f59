//! Error types for SafeTensors inspection
//!
//! Every structural defect in a file is a distinct variant carrying the
//! offending tensor name (where one exists) and the numeric values involved,
//! so callers can render a precise diagnostic. None of these are retryable:
//! the same bytes always produce the same error.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RevisarError>;

/// Error type for SafeTensors inspection operations
#[derive(Debug, Error)]
pub enum RevisarError {
    /// File shorter than 8 bytes, or shorter than its declared header length
    #[error("truncated file: need {needed} bytes, have {available}")]
    TruncatedFile {
        /// Bytes required by the length prefix (8 + declared header length)
        needed: u64,
        /// Bytes actually present
        available: u64,
    },

    /// Header is not valid UTF-8/JSON, not a JSON object, exceeds the size
    /// ceiling, or a tensor entry is missing or mistypes a required field.
    /// The reason names the offending tensor when one exists.
    #[error("malformed header: {reason}")]
    MalformedHeader {
        /// Human-readable description of the defect
        reason: String,
    },

    /// Tensor declares a dtype code absent from the registry
    #[error("tensor '{tensor}': unknown dtype '{dtype}'")]
    UnknownDtype {
        /// Offending tensor name
        tensor: String,
        /// The unrecognized dtype code
        dtype: String,
    },

    /// Tensor's declared byte range does not equal `parameters * byte_width`
    #[error(
        "tensor '{tensor}': data_offsets span {declared} bytes, \
         shape and dtype require {expected}"
    )]
    SizeMismatch {
        /// Offending tensor name
        tensor: String,
        /// `product(shape) * byte_width(dtype)`
        expected: u64,
        /// `data_offsets[1] - data_offsets[0]`
        declared: u64,
    },

    /// Tensor's byte range falls outside the payload region
    #[error("tensor '{tensor}': data ends at offset {end} but payload is {payload_len} bytes")]
    OffsetOutOfRange {
        /// Offending tensor name
        tensor: String,
        /// Declared end offset (relative to payload start)
        end: u64,
        /// Payload length (file length - 8 - header length)
        payload_len: u64,
    },

    /// Two tensors' byte ranges intersect
    #[error("tensors '{first}' and '{second}' have overlapping data ranges")]
    OverlappingTensors {
        /// Tensor whose range starts first
        first: String,
        /// Tensor whose range intrudes into it
        second: String,
    },

    /// I/O failure opening or mapping the file
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_file_display() {
        let err = RevisarError::TruncatedFile {
            needed: 108,
            available: 50,
        };
        assert_eq!(err.to_string(), "truncated file: need 108 bytes, have 50");
    }

    #[test]
    fn test_size_mismatch_display_names_tensor_and_values() {
        let err = RevisarError::SizeMismatch {
            tensor: "w".to_string(),
            expected: 24,
            declared: 16,
        };
        let msg = err.to_string();
        assert!(msg.contains("'w'"));
        assert!(msg.contains("24"));
        assert!(msg.contains("16"));
    }

    #[test]
    fn test_overlapping_tensors_display_names_both() {
        let err = RevisarError::OverlappingTensors {
            first: "a".to_string(),
            second: "b".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'a'"));
        assert!(msg.contains("'b'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: RevisarError = io.into();
        assert!(matches!(err, RevisarError::Io(_)));
    }
}
