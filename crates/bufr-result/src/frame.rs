//! Decoded message frames and their per-field views.

use std::sync::Arc;

use bufr_query::Query;

use crate::error::{Result, ResultSetError};
use crate::type_info::TypeInfo;

/// Resolved descriptor metadata for one exported field.
///
/// The decoder resolves one target per exported name at the start of a run
/// and shares it across every frame it populates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTarget {
    /// Exported field name.
    pub name: String,
    /// Path tag for each dimension the field can span.
    pub dim_paths: Vec<Query>,
    /// Indices of the dimensions that survive to the output shape.
    pub export_dim_idxs: Vec<usize>,
    /// Packing metadata from the descriptor table.
    pub type_info: TypeInfo,
    /// Unit string from the descriptor table.
    pub unit: String,
}

/// One field of a decoded message.
#[derive(Debug, Clone, Default)]
pub struct DataField {
    /// Flat decoded values in leaf order, encoded as doubles. Character
    /// payloads are bit-packed into the same 8-byte lane.
    pub data: Vec<f64>,
    /// Child counts observed at each repetition level of the ragged tree.
    pub seq_counts: Vec<Vec<usize>>,
    /// Descriptor metadata, shared with the decoder.
    pub target: Arc<FieldTarget>,
}

/// All exported fields decoded from a single message, in export order.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    fields: Vec<DataField>,
}

impl DataFrame {
    /// Create a frame with `count` empty field slots for the decoder to fill.
    pub fn with_field_count(count: usize) -> Self {
        Self {
            fields: vec![DataField::default(); count],
        }
    }

    /// Whether any slot carries a field with the given name.
    pub fn has_field_named(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.target.name == name)
    }

    /// Slot index of the field with the given name.
    pub fn field_index_for_node_named(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|field| field.target.name == name)
            .ok_or_else(|| ResultSetError::UnknownField(name.to_string()))
    }

    /// Field at slot `idx`.
    ///
    /// Panics if `idx` is out of range; slot indices come from
    /// [`field_index_for_node_named`](DataFrame::field_index_for_node_named)
    /// or the result set's name order.
    pub fn field_at_idx(&self, idx: usize) -> &DataField {
        &self.fields[idx]
    }

    /// Mutable field at slot `idx`, for the decoder to populate.
    ///
    /// Panics if `idx` is out of range.
    pub fn field_at_idx_mut(&mut self, idx: usize) -> &mut DataField {
        &mut self.fields[idx]
    }

    /// All field slots in export order.
    pub fn fields(&self) -> &[DataField] {
        &self.fields
    }
}
