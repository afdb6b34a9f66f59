//! # Revisar
//!
//! Pure Rust SafeTensors model inspector.
//!
//! Revisar (Spanish: "to review, to inspect") reads the header of a
//! `.safetensors` file and reports every tensor's name, shape, dtype,
//! parameter count and byte size, plus any embedded `__metadata__`, without
//! loading a single tensor value into memory. Inspection cost is O(header),
//! not O(file): the payload region is validated purely from the declared
//! offsets and the file's total length.
//!
//! ## Example
//!
//! ```rust
//! use revisar::Report;
//!
//! let json = r#"{"w":{"dtype":"F32","shape":[2,2],"data_offsets":[0,16]}}"#;
//! let mut data = Vec::new();
//! data.extend_from_slice(&(json.len() as u64).to_le_bytes());
//! data.extend_from_slice(json.as_bytes());
//! data.extend_from_slice(&[0u8; 16]);
//!
//! let report = Report::from_bytes("model.safetensors", &data).unwrap();
//! assert_eq!(report.tensor_count, 1);
//! assert_eq!(report.total_parameters, 4);
//! ```
//!
//! ## Guarantees
//!
//! - A [`Report`] is produced only if every tensor entry validated: offsets
//!   in bounds, pairwise non-overlapping, and sized exactly
//!   `product(shape) * byte_width(dtype)`. No partial output.
//! - Tensors appear in the report in header key order (insertion order),
//!   never sorted.
//! - Every failure is a typed [`RevisarError`] carrying the offending
//!   tensor name and the numeric values involved.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_precision_loss)]

/// CLI rendering (text and JSON output)
pub mod cli;
pub mod error;
/// Report assembly from a validated header
pub mod report;
/// SafeTensors container parsing and validation
pub mod safetensors;

pub use error::{Result, RevisarError};
pub use report::{Report, TensorReport};
pub use safetensors::{Dtype, SafetensorsHeader, ValidatedTensor};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
