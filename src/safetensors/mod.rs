//! SafeTensors container parser
//!
//! Pure Rust reader for the SafeTensors header, the format `HuggingFace`
//! uses for safe tensor storage. Only the header is ever decoded; tensor
//! payload bytes are validated by offset arithmetic and never read.
//!
//! Format specification: <https://github.com/huggingface/safetensors>
//!
//! ## Format Overview
//!
//! ```text
//! SafeTensors := HEADER_LEN HEADER PAYLOAD
//!
//! HEADER_LEN := u64 (little-endian), byte length of HEADER
//!
//! HEADER := JSON {
//!   "__metadata__": { "key": "value", ... },      // optional, strings only
//!   "tensor_name": {
//!     "dtype": "F32" | "F16" | "BF16" | ...,
//!     "shape": [dim1, dim2, ...],
//!     "data_offsets": [begin, end]                // relative to PAYLOAD
//!   },
//!   ...
//! }
//! ```
//!
//! A parsed [`SafetensorsHeader`] is fully validated: every entry's byte
//! range equals `product(shape) * byte_width(dtype)`, all ranges lie inside
//! the payload region, and no two ranges overlap. There is no partial
//! output; the first structural defect aborts the parse.

mod dtype;

pub use dtype::Dtype;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Result, RevisarError};

/// Reserved header key holding free-form string metadata
pub const METADATA_KEY: &str = "__metadata__";

/// Maximum accepted header length (DOS protection). A length prefix above
/// this is rejected before any buffer is sliced or allocated.
pub const MAX_HEADER_LEN: u64 = 100_000_000;

/// Tensor entry as it appears in the header JSON
#[derive(Debug, Deserialize)]
struct RawEntry {
    dtype: String,
    shape: Vec<u64>,
    data_offsets: [u64; 2],
}

/// One fully validated tensor entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTensor {
    /// Tensor name (header key, unique per file)
    pub name: String,
    /// Element type
    pub dtype: Dtype,
    /// Shape; empty means scalar
    pub shape: Vec<u64>,
    /// Byte range `[begin, end)` relative to the payload region
    pub data_offsets: [u64; 2],
    /// Element count, `product(shape)` (1 for a scalar)
    pub parameters: u64,
    /// Byte size, `end - begin` (equals `parameters * byte_width`)
    pub size_bytes: u64,
}

/// Decoded and validated SafeTensors header
#[derive(Debug, Clone)]
pub struct SafetensorsHeader {
    /// Declared length of the header JSON in bytes
    pub header_len: u64,
    /// Contents of `__metadata__` if present. `None` when the key is
    /// absent, `Some` (possibly empty) when it is present.
    pub metadata: Option<IndexMap<String, String>>,
    /// Tensor entries in header key order
    pub tensors: Vec<ValidatedTensor>,
}

impl SafetensorsHeader {
    /// Decode and validate the header of a complete SafeTensors file.
    ///
    /// `data` must span the whole file: the trailing payload is never read,
    /// but its length bounds the offset containment check.
    ///
    /// # Errors
    ///
    /// Returns [`RevisarError::TruncatedFile`] if the file is shorter than
    /// 8 bytes or than its declared header length,
    /// [`RevisarError::MalformedHeader`] for invalid UTF-8/JSON or mistyped
    /// entries, and the per-tensor variants (`UnknownDtype`, `SizeMismatch`,
    /// `OffsetOutOfRange`, `OverlappingTensors`) for structural defects.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let total_len = data.len() as u64;
        if total_len < 8 {
            return Err(RevisarError::TruncatedFile {
                needed: 8,
                available: total_len,
            });
        }

        let header_len =
            u64::from_le_bytes(data[0..8].try_into().expect("slice is exactly 8 bytes"));
        if header_len > MAX_HEADER_LEN {
            return Err(RevisarError::MalformedHeader {
                reason: format!(
                    "declared header length {header_len} exceeds {MAX_HEADER_LEN} byte ceiling"
                ),
            });
        }

        let needed = 8 + header_len;
        if total_len < needed {
            return Err(RevisarError::TruncatedFile {
                needed,
                available: total_len,
            });
        }

        let header_end = 8 + usize::try_from(header_len).map_err(|_| {
            RevisarError::MalformedHeader {
                reason: format!("header length {header_len} exceeds platform usize limit"),
            }
        })?;

        let payload_len = total_len - needed;
        Self::from_header_json(&data[8..header_end], header_len, payload_len)
    }

    /// Parse the header JSON and validate every entry against a payload of
    /// `payload_len` bytes.
    fn from_header_json(json_bytes: &[u8], header_len: u64, payload_len: u64) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_slice(json_bytes).map_err(|e| RevisarError::MalformedHeader {
                reason: e.to_string(),
            })?;

        let Some(entries) = value.as_object() else {
            return Err(RevisarError::MalformedHeader {
                reason: format!("expected a JSON object at the top level, got {value}"),
            });
        };

        let mut metadata = None;
        let mut tensors = Vec::with_capacity(entries.len());

        // serde_json is built with preserve_order, so this iteration (and
        // therefore the tensor list) follows header key order.
        for (name, entry) in entries {
            if name == METADATA_KEY {
                metadata = Some(parse_metadata(entry)?);
            } else {
                tensors.push(validate_entry(name, entry)?);
            }
        }

        check_layout(&tensors, payload_len)?;

        Ok(Self {
            header_len,
            metadata,
            tensors,
        })
    }

    /// Total parameter count across all tensors
    #[must_use]
    pub fn total_parameters(&self) -> u64 {
        self.tensors.iter().map(|t| t.parameters).sum()
    }
}

/// Parse the reserved `__metadata__` entry (string-to-string map only)
fn parse_metadata(entry: &serde_json::Value) -> Result<IndexMap<String, String>> {
    serde_json::from_value(entry.clone()).map_err(|e| RevisarError::MalformedHeader {
        reason: format!("{METADATA_KEY} must map strings to strings: {e}"),
    })
}

/// Validate a single tensor entry: required fields, dtype lookup, and the
/// size invariant `end - begin == product(shape) * byte_width`.
fn validate_entry(name: &str, entry: &serde_json::Value) -> Result<ValidatedTensor> {
    let raw: RawEntry =
        serde_json::from_value(entry.clone()).map_err(|e| RevisarError::MalformedHeader {
            reason: format!("tensor '{name}': {e}"),
        })?;

    let [begin, end] = raw.data_offsets;
    if begin > end {
        return Err(RevisarError::MalformedHeader {
            reason: format!("tensor '{name}': data_offsets begin {begin} exceeds end {end}"),
        });
    }

    let dtype = Dtype::from_code(&raw.dtype).ok_or_else(|| RevisarError::UnknownDtype {
        tensor: name.to_string(),
        dtype: raw.dtype.clone(),
    })?;

    let parameters = raw
        .shape
        .iter()
        .try_fold(1u64, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| RevisarError::MalformedHeader {
            reason: format!("tensor '{name}': shape product overflows u64"),
        })?;

    let expected =
        parameters
            .checked_mul(dtype.byte_width())
            .ok_or_else(|| RevisarError::MalformedHeader {
                reason: format!("tensor '{name}': byte size overflows u64"),
            })?;

    let declared = end - begin;
    if declared != expected {
        return Err(RevisarError::SizeMismatch {
            tensor: name.to_string(),
            expected,
            declared,
        });
    }

    Ok(ValidatedTensor {
        name: name.to_string(),
        dtype,
        shape: raw.shape,
        data_offsets: raw.data_offsets,
        parameters,
        size_bytes: declared,
    })
}

/// Cross-entry checks: every range contained in `[0, payload_len)` and no
/// two non-empty ranges overlapping. Ranges are scanned sorted by begin
/// offset; header key order is irrelevant here (the format does not require
/// offsets to be monotone in key order).
fn check_layout(tensors: &[ValidatedTensor], payload_len: u64) -> Result<()> {
    let mut ranges: Vec<(u64, u64, &str)> = tensors
        .iter()
        .map(|t| (t.data_offsets[0], t.data_offsets[1], t.name.as_str()))
        .collect();
    ranges.sort_unstable_by_key(|&(begin, end, _)| (begin, end));

    // Furthest end seen so far and the tensor that owns it
    let mut cursor: Option<(u64, &str)> = None;
    for &(begin, end, name) in &ranges {
        if end > payload_len {
            return Err(RevisarError::OffsetOutOfRange {
                tensor: name.to_string(),
                end,
                payload_len,
            });
        }
        if begin == end {
            // zero-size tensor, intersects nothing
            continue;
        }
        if let Some((max_end, holder)) = cursor {
            if begin < max_end {
                return Err(RevisarError::OverlappingTensors {
                    first: holder.to_string(),
                    second: name.to_string(),
                });
            }
        }
        if cursor.is_none_or(|(max_end, _)| end > max_end) {
            cursor = Some((end, name));
        }
    }

    Ok(())
}
