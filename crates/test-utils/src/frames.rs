//! Frame and field builders standing in for the decoder.
//!
//! Tests populate result-set frames the same way the decoder does: resolve a
//! target per export name, then fill each frame's slots with flat values and
//! per-level sequence counts.

use std::sync::Arc;

use bufr_query::parse;
use bufr_result::{DataFrame, FieldTarget, TypeInfo};

/// Build a resolved field target.
///
/// `dim_paths` are textual query paths (`*/SEQ` style), parsed the way the
/// descriptor walker tags output dimensions.
pub fn target(
    name: &str,
    dim_paths: &[&str],
    export_dim_idxs: &[usize],
    type_info: TypeInfo,
    unit: &str,
) -> Arc<FieldTarget> {
    Arc::new(FieldTarget {
        name: name.to_string(),
        dim_paths: dim_paths
            .iter()
            .map(|path| {
                let mut queries = parse(path).expect("test dim path parses");
                queries.remove(0)
            })
            .collect(),
        export_dim_idxs: export_dim_idxs.to_vec(),
        type_info,
        unit: unit.to_string(),
    })
}

/// Populate slot `idx` of a frame with values, counts and target.
pub fn fill_field(
    frame: &mut DataFrame,
    idx: usize,
    target: &Arc<FieldTarget>,
    data: &[f64],
    seq_counts: &[&[usize]],
) {
    let field = frame.field_at_idx_mut(idx);
    field.data = data.to_vec();
    field.seq_counts = seq_counts.iter().map(|counts| counts.to_vec()).collect();
    field.target = Arc::clone(target);
}

/// Metadata for an unsigned integer field (code-table style).
pub fn uint_info() -> TypeInfo {
    TypeInfo {
        reference: 0,
        bits: 12,
        scale: 0,
        unit: "CODE TABLE".to_string(),
    }
}

/// Metadata for a signed integer field.
pub fn int_info() -> TypeInfo {
    TypeInfo {
        reference: -1024,
        bits: 12,
        scale: 0,
        unit: "m".to_string(),
    }
}

/// Metadata for a single-precision float field.
pub fn float_info() -> TypeInfo {
    TypeInfo {
        reference: 0,
        bits: 16,
        scale: 2,
        unit: "K".to_string(),
    }
}

/// Metadata for a double-precision float field.
pub fn double_info() -> TypeInfo {
    TypeInfo {
        reference: 0,
        bits: 40,
        scale: 2,
        unit: "K".to_string(),
    }
}

/// Metadata for a bit-packed character field.
pub fn string_info() -> TypeInfo {
    TypeInfo {
        reference: 0,
        bits: 64,
        scale: 0,
        unit: "CCITT IA5".to_string(),
    }
}

/// Pack up to 8 characters into a value lane, decoder style.
pub fn pack_string_lane(text: &str) -> f64 {
    let mut bytes = [0u8; 8];
    for (slot, byte) in bytes.iter_mut().zip(text.bytes()) {
        *slot = byte;
    }
    f64::from_bits(u64::from_be_bytes(bytes))
}
