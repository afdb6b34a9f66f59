//! SafeTensors dtype registry
//!
//! Static mapping from the format's dtype code strings to element byte
//! widths. Lookup never fails; an unrecognized code is `None` and it is the
//! validator's job to turn that into an error.

use serde::{Serialize, Serializer};

/// SafeTensors element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dtype {
    /// 64-bit float
    F64,
    /// 32-bit float
    F32,
    /// 16-bit float
    F16,
    /// Brain float 16
    BF16,
    /// 8-bit float, e4m3 layout
    F8E4M3,
    /// 8-bit float, e5m2 layout
    F8E5M2,
    /// 64-bit signed integer
    I64,
    /// 32-bit signed integer
    I32,
    /// 16-bit signed integer
    I16,
    /// 8-bit signed integer
    I8,
    /// 8-bit unsigned integer
    U8,
    /// Boolean (one byte per element)
    Bool,
}

impl Dtype {
    /// Look up a dtype by its header code string (e.g. `"F32"`).
    ///
    /// Returns `None` for codes absent from the registry; the registry
    /// itself never fails.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "F64" => Some(Self::F64),
            "F32" => Some(Self::F32),
            "F16" => Some(Self::F16),
            "BF16" => Some(Self::BF16),
            "F8_E4M3" => Some(Self::F8E4M3),
            "F8_E5M2" => Some(Self::F8E5M2),
            "I64" => Some(Self::I64),
            "I32" => Some(Self::I32),
            "I16" => Some(Self::I16),
            "I8" => Some(Self::I8),
            "U8" => Some(Self::U8),
            "BOOL" => Some(Self::Bool),
            _ => None,
        }
    }

    /// Bytes per element for this dtype
    #[must_use]
    pub const fn byte_width(self) -> u64 {
        match self {
            Self::F64 | Self::I64 => 8,
            Self::F32 | Self::I32 => 4,
            Self::F16 | Self::BF16 | Self::I16 => 2,
            Self::F8E4M3 | Self::F8E5M2 | Self::I8 | Self::U8 | Self::Bool => 1,
        }
    }

    /// Canonical code string as it appears in headers
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::F64 => "F64",
            Self::F32 => "F32",
            Self::F16 => "F16",
            Self::BF16 => "BF16",
            Self::F8E4M3 => "F8_E4M3",
            Self::F8E5M2 => "F8_E5M2",
            Self::I64 => "I64",
            Self::I32 => "I32",
            Self::I16 => "I16",
            Self::I8 => "I8",
            Self::U8 => "U8",
            Self::Bool => "BOOL",
        }
    }
}

impl std::fmt::Display for Dtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Dtype {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_widths() {
        assert_eq!(Dtype::F64.byte_width(), 8);
        assert_eq!(Dtype::F32.byte_width(), 4);
        assert_eq!(Dtype::F16.byte_width(), 2);
        assert_eq!(Dtype::BF16.byte_width(), 2);
        assert_eq!(Dtype::I64.byte_width(), 8);
        assert_eq!(Dtype::I32.byte_width(), 4);
        assert_eq!(Dtype::I16.byte_width(), 2);
        assert_eq!(Dtype::I8.byte_width(), 1);
        assert_eq!(Dtype::U8.byte_width(), 1);
        assert_eq!(Dtype::Bool.byte_width(), 1);
        assert_eq!(Dtype::F8E4M3.byte_width(), 1);
        assert_eq!(Dtype::F8E5M2.byte_width(), 1);
    }

    #[test]
    fn test_code_round_trip() {
        for code in [
            "F64", "F32", "F16", "BF16", "F8_E4M3", "F8_E5M2", "I64", "I32", "I16", "I8", "U8",
            "BOOL",
        ] {
            let dtype = Dtype::from_code(code).expect("registered code");
            assert_eq!(dtype.code(), code);
            assert_eq!(dtype.to_string(), code);
        }
    }

    #[test]
    fn test_unknown_codes_return_none() {
        assert!(Dtype::from_code("F4").is_none());
        assert!(Dtype::from_code("f32").is_none());
        assert!(Dtype::from_code("").is_none());
        assert!(Dtype::from_code("COMPLEX64").is_none());
    }

    #[test]
    fn test_serializes_as_code_string() {
        let json = serde_json::to_string(&Dtype::BF16).expect("serialize");
        assert_eq!(json, "\"BF16\"");
    }
}
