//! Typed dense containers produced by result-set extraction.

use bufr_query::Query;

use crate::constants::{MISSING_THRESHOLD, MISSING_VALUE};
use crate::error::{Result, ResultSetError};
use crate::type_info::TypeInfo;

/// Element kinds a [`DataObject`] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Str,
}

impl ElementKind {
    /// Element kind implied by descriptor metadata.
    pub fn for_type_info(info: &TypeInfo) -> Self {
        if info.is_string() {
            ElementKind::Str
        } else if info.is_integer() {
            match (info.is_signed(), info.is_64bit()) {
                (true, true) => ElementKind::Int64,
                (true, false) => ElementKind::Int32,
                (false, true) => ElementKind::UInt64,
                (false, false) => ElementKind::UInt32,
            }
        } else if info.is_64bit() {
            ElementKind::Float64
        } else {
            ElementKind::Float32
        }
    }

    /// Element kind named by an override token.
    pub fn from_override(token: &str) -> Result<Self> {
        match token {
            "int" | "int32" => Ok(ElementKind::Int32),
            "float" | "float32" => Ok(ElementKind::Float32),
            "double" | "float64" => Ok(ElementKind::Float64),
            "string" => Ok(ElementKind::Str),
            "int64" => Ok(ElementKind::Int64),
            "uint64" => Ok(ElementKind::UInt64),
            "uint32" | "uint" => Ok(ElementKind::UInt32),
            _ => Err(ResultSetError::BadOverrideType(token.to_string())),
        }
    }

    /// Whether this kind holds character data.
    pub fn is_string(self) -> bool {
        self == ElementKind::Str
    }
}

/// Dense value storage, one variant per element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum DataBuffer {
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Str(Vec<String>),
}

impl DataBuffer {
    /// Number of cells.
    pub fn len(&self) -> usize {
        match self {
            DataBuffer::Int32(values) => values.len(),
            DataBuffer::Int64(values) => values.len(),
            DataBuffer::UInt32(values) => values.len(),
            DataBuffer::UInt64(values) => values.len(),
            DataBuffer::Float32(values) => values.len(),
            DataBuffer::Float64(values) => values.len(),
            DataBuffer::Str(values) => values.len(),
        }
    }

    /// Whether the buffer has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element kind this buffer stores.
    pub fn kind(&self) -> ElementKind {
        match self {
            DataBuffer::Int32(_) => ElementKind::Int32,
            DataBuffer::Int64(_) => ElementKind::Int64,
            DataBuffer::UInt32(_) => ElementKind::UInt32,
            DataBuffer::UInt64(_) => ElementKind::UInt64,
            DataBuffer::Float32(_) => ElementKind::Float32,
            DataBuffer::Float64(_) => ElementKind::Float64,
            DataBuffer::Str(_) => ElementKind::Str,
        }
    }
}

/// A dense, shape-regular array extracted from a result set.
///
/// Owns its buffer independently of the result set that produced it. Integer
/// buffers mark missing cells with the type's maximum value; float buffers
/// keep the missing sentinel; string buffers use the empty string.
#[derive(Debug, Clone)]
pub struct DataObject {
    buffer: DataBuffer,
    dims: Vec<usize>,
    field_name: String,
    group_by_field_name: Option<String>,
    dim_paths: Vec<Query>,
}

impl DataObject {
    /// Convert solver lanes into a typed container.
    ///
    /// Numeric kinds treat lanes at or above the missing threshold as
    /// missing; string kinds reinterpret every lane's 8 bytes as characters,
    /// with no threshold applied.
    pub(crate) fn from_lanes(
        kind: ElementKind,
        lanes: Vec<f64>,
        dims: Vec<usize>,
        field_name: String,
        group_by_field_name: Option<String>,
        dim_paths: Vec<Query>,
    ) -> Self {
        let buffer = match kind {
            ElementKind::Int32 => DataBuffer::Int32(convert(&lanes, i32::MAX, |v| v as i32)),
            ElementKind::Int64 => DataBuffer::Int64(convert(&lanes, i64::MAX, |v| v as i64)),
            ElementKind::UInt32 => DataBuffer::UInt32(convert(&lanes, u32::MAX, |v| v as u32)),
            ElementKind::UInt64 => DataBuffer::UInt64(convert(&lanes, u64::MAX, |v| v as u64)),
            ElementKind::Float32 => {
                DataBuffer::Float32(convert(&lanes, MISSING_VALUE as f32, |v| v as f32))
            }
            ElementKind::Float64 => DataBuffer::Float64(convert(&lanes, MISSING_VALUE, |v| v)),
            ElementKind::Str => {
                DataBuffer::Str(lanes.iter().map(|&lane| unpack_string_lane(lane)).collect())
            }
        };

        Self {
            buffer,
            dims,
            field_name,
            group_by_field_name,
            dim_paths,
        }
    }

    /// The element kind of the buffer.
    pub fn kind(&self) -> ElementKind {
        self.buffer.kind()
    }

    /// The dense buffer. Host bindings use this to build native arrays.
    pub fn buffer(&self) -> &DataBuffer {
        &self.buffer
    }

    /// Output shape, one extent per exported dimension.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Name of the extracted field.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Name of the group-by field, when one was used.
    pub fn group_by_field_name(&self) -> Option<&str> {
        self.group_by_field_name.as_deref()
    }

    /// Path tags identifying what each output axis represents.
    pub fn dim_paths(&self) -> &[Query] {
        &self.dim_paths
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the container has no cells.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether the cell at `idx` is missing.
    pub fn is_missing(&self, idx: usize) -> bool {
        match &self.buffer {
            DataBuffer::Int32(values) => values[idx] == i32::MAX,
            DataBuffer::Int64(values) => values[idx] == i64::MAX,
            DataBuffer::UInt32(values) => values[idx] == u32::MAX,
            DataBuffer::UInt64(values) => values[idx] == u64::MAX,
            DataBuffer::Float32(values) => values[idx].abs() >= MISSING_THRESHOLD as f32,
            DataBuffer::Float64(values) => values[idx].abs() >= MISSING_THRESHOLD,
            DataBuffer::Str(values) => values[idx].is_empty(),
        }
    }

    /// The cell at `idx` as an integer, truncating floats.
    ///
    /// Returns `None` for missing cells and string buffers.
    pub fn get_as_int(&self, idx: usize) -> Option<i64> {
        if self.is_missing(idx) {
            return None;
        }

        match &self.buffer {
            DataBuffer::Int32(values) => Some(values[idx] as i64),
            DataBuffer::Int64(values) => Some(values[idx]),
            DataBuffer::UInt32(values) => Some(values[idx] as i64),
            DataBuffer::UInt64(values) => Some(values[idx] as i64),
            DataBuffer::Float32(values) => Some(values[idx] as i64),
            DataBuffer::Float64(values) => Some(values[idx] as i64),
            DataBuffer::Str(_) => None,
        }
    }

    /// The cell at `idx` as a float.
    ///
    /// Returns `None` for missing cells and string buffers.
    pub fn get_as_float(&self, idx: usize) -> Option<f64> {
        if self.is_missing(idx) {
            return None;
        }

        match &self.buffer {
            DataBuffer::Int32(values) => Some(values[idx] as f64),
            DataBuffer::Int64(values) => Some(values[idx] as f64),
            DataBuffer::UInt32(values) => Some(values[idx] as f64),
            DataBuffer::UInt64(values) => Some(values[idx] as f64),
            DataBuffer::Float32(values) => Some(values[idx] as f64),
            DataBuffer::Float64(values) => Some(values[idx]),
            DataBuffer::Str(_) => None,
        }
    }

    /// The cell at `idx` as a string slice, for string buffers only.
    pub fn get_as_string(&self, idx: usize) -> Option<&str> {
        match &self.buffer {
            DataBuffer::Str(values) if !values[idx].is_empty() => Some(&values[idx]),
            _ => None,
        }
    }
}

fn convert<T: Copy>(lanes: &[f64], missing: T, cast: impl Fn(f64) -> T) -> Vec<T> {
    lanes
        .iter()
        .map(|&lane| {
            if lane.abs() >= MISSING_THRESHOLD {
                missing
            } else {
                cast(lane)
            }
        })
        .collect()
}

/// Unpack a bit-packed character lane.
///
/// Characters occupy the lane's 8 bytes from the high end down; shorter
/// strings are NUL- or space-padded by the decoder.
fn unpack_string_lane(lane: f64) -> String {
    let bytes = lane.to_bits().to_be_bytes();
    let end = bytes.iter().position(|&byte| byte == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}
