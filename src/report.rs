//! Report assembly
//!
//! Combines a validated [`SafetensorsHeader`] with the file's identity into
//! the single handoff record consumed by renderers: per-tensor rows in
//! header key order plus file-level totals. Aggregation never touches
//! payload bytes; everything derives from the header and the total length.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::safetensors::{Dtype, SafetensorsHeader, ValidatedTensor};

/// One tensor row in the final report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TensorReport {
    /// Tensor name
    pub name: String,
    /// Element type
    pub dtype: Dtype,
    /// Shape; empty means scalar
    pub shape: Vec<u64>,
    /// Element count
    pub parameters: u64,
    /// Byte size of the tensor's payload range
    pub size_bytes: u64,
}

impl From<ValidatedTensor> for TensorReport {
    fn from(tensor: ValidatedTensor) -> Self {
        Self {
            name: tensor.name,
            dtype: tensor.dtype,
            shape: tensor.shape,
            parameters: tensor.parameters,
            size_bytes: tensor.size_bytes,
        }
    }
}

/// Fully validated inspection result for one file
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Path the file was inspected under
    pub file_path: String,
    /// Total file size in bytes
    pub file_size: u64,
    /// Contents of `__metadata__`; `None` when the key is absent
    pub metadata: Option<IndexMap<String, String>>,
    /// Tensor rows in header key order
    pub tensors: Vec<TensorReport>,
    /// Number of tensors
    pub tensor_count: usize,
    /// Sum of every tensor's parameter count
    pub total_parameters: u64,
}

impl Report {
    /// Inspect an in-memory SafeTensors file.
    ///
    /// `file_path` only labels the report; no filesystem access happens.
    pub fn from_bytes(file_path: &str, data: &[u8]) -> Result<Self> {
        let header = SafetensorsHeader::parse(data)?;
        Ok(Self::build(file_path, data.len() as u64, header))
    }

    /// Inspect a SafeTensors file on disk.
    ///
    /// The file is mapped read-only and only its header pages are ever
    /// touched, so inspection time is independent of file size. The mapping
    /// is released on every path, including errors.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        // SAFETY: the file is opened read-only and never modified through
        // this mapping
        let mmap = unsafe { memmap2::MmapOptions::new().map(&file)? };

        let header = SafetensorsHeader::parse(&mmap)?;
        Ok(Self::build(
            &path.display().to_string(),
            mmap.len() as u64,
            header,
        ))
    }

    fn build(file_path: &str, file_size: u64, header: SafetensorsHeader) -> Self {
        let total_parameters = header.total_parameters();
        let tensors: Vec<TensorReport> = header.tensors.into_iter().map(Into::into).collect();

        Self {
            file_path: file_path.to_string(),
            file_size,
            metadata: header.metadata,
            tensor_count: tensors.len(),
            total_parameters,
            tensors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RevisarError;
    use std::io::Write;

    fn file_with(json: &str, payload_len: usize) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&(json.len() as u64).to_le_bytes());
        data.extend_from_slice(json.as_bytes());
        data.extend_from_slice(&vec![0u8; payload_len]);
        data
    }

    #[test]
    fn test_end_to_end_scenario() {
        let json = r#"{"__metadata__":{"format":"pt"},"w":{"dtype":"F32","shape":[2,2],"data_offsets":[0,16]}}"#;
        let data = file_with(json, 16);

        let report = Report::from_bytes("model.safetensors", &data).expect("inspect");

        assert_eq!(report.file_path, "model.safetensors");
        assert_eq!(report.file_size, data.len() as u64);
        assert_eq!(
            report.metadata.as_ref().and_then(|m| m.get("format")),
            Some(&"pt".to_string())
        );
        assert_eq!(report.tensor_count, 1);
        assert_eq!(report.total_parameters, 4);

        let tensor = &report.tensors[0];
        assert_eq!(tensor.name, "w");
        assert_eq!(tensor.dtype, crate::safetensors::Dtype::F32);
        assert_eq!(tensor.shape, vec![2, 2]);
        assert_eq!(tensor.parameters, 4);
        assert_eq!(tensor.size_bytes, 16);
    }

    #[test]
    fn test_report_preserves_header_key_order() {
        let json = r#"{
            "layer.9":{"dtype":"U8","shape":[1],"data_offsets":[0,1]},
            "layer.10":{"dtype":"U8","shape":[1],"data_offsets":[1,2]},
            "layer.2":{"dtype":"U8","shape":[1],"data_offsets":[2,3]}
        }"#;
        let data = file_with(json, 3);

        let report = Report::from_bytes("m", &data).expect("inspect");
        let names: Vec<&str> = report.tensors.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["layer.9", "layer.10", "layer.2"]);
    }

    #[test]
    fn test_no_metadata_serializes_as_null() {
        let json = r#"{"t":{"dtype":"U8","shape":[1],"data_offsets":[0,1]}}"#;
        let data = file_with(json, 1);

        let report = Report::from_bytes("m", &data).expect("inspect");
        assert!(report.metadata.is_none());

        let value = serde_json::to_value(&report).expect("serialize");
        assert!(value["metadata"].is_null());
        assert_eq!(value["tensor_count"], 1);
        assert_eq!(value["tensors"][0]["dtype"], "U8");
    }

    #[test]
    fn test_empty_metadata_serializes_as_empty_object() {
        let json = r#"{"__metadata__":{},"t":{"dtype":"U8","shape":[1],"data_offsets":[0,1]}}"#;
        let data = file_with(json, 1);

        let report = Report::from_bytes("m", &data).expect("inspect");
        let value = serde_json::to_value(&report).expect("serialize");
        assert_eq!(value["metadata"], serde_json::json!({}));
    }

    #[test]
    fn test_from_file_via_mmap() {
        let json = r#"{"w":{"dtype":"F16","shape":[3],"data_offsets":[0,6]}}"#;
        let data = file_with(json, 6);

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(&data).expect("write");
        file.flush().expect("flush");

        let report = Report::from_file(file.path()).expect("inspect");
        assert_eq!(report.tensor_count, 1);
        assert_eq!(report.total_parameters, 3);
        assert_eq!(report.file_size, data.len() as u64);
        assert_eq!(report.file_path, file.path().display().to_string());
    }

    #[test]
    fn test_from_file_missing_path_is_io_error() {
        let result = Report::from_file("/nonexistent/model.safetensors");
        assert!(matches!(result, Err(RevisarError::Io(_))));
    }

    #[test]
    fn test_invalid_file_produces_no_partial_report() {
        // Second tensor overlaps the first; nothing is reported
        let json = r#"{
            "a":{"dtype":"U8","shape":[4],"data_offsets":[0,4]},
            "b":{"dtype":"U8","shape":[4],"data_offsets":[2,6]}
        }"#;
        let data = file_with(json, 6);

        let result = Report::from_bytes("m", &data);
        assert!(matches!(
            result,
            Err(RevisarError::OverlappingTensors { .. })
        ));
    }
}
