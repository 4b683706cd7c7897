//! Frame accumulation and dense field extraction.
//!
//! The result set has a two-phase lifecycle: a build phase, where the decoder
//! repeatedly takes [`next_data_frame`] and populates it, and a read phase,
//! where [`get`] folds a field's ragged values across all frames into one
//! dense typed array. Frames are appended only and never mutated after the
//! decoder hands them back.
//!
//! The dense layout is solved in two steps. The dimension solver measures the
//! largest replication count seen at every repetition level across all frames
//! (reshaping under a group-by field when one is given). Row inflation then
//! maps each frame's ragged values into that dense shape by computing, per
//! parent node, how many padding cells the parent lacks, and shifting all
//! trailing value indices past the gap. Values never move twice and the
//! lexicographic leaf order is preserved.
//!
//! [`next_data_frame`]: ResultSet::next_data_frame
//! [`get`]: ResultSet::get

use tracing::debug;

use bufr_query::Query;

use crate::constants::MISSING_VALUE;
use crate::data_object::{DataObject, ElementKind};
use crate::error::{Result, ResultSetError};
use crate::frame::{DataField, DataFrame};
use crate::type_info::TypeInfo;

/// Flat values plus resolved shape for one extracted field.
struct RawValues {
    data: Vec<f64>,
    dims: Vec<usize>,
    dim_paths: Vec<Query>,
    info: TypeInfo,
}

/// Accumulates decoded frames and flattens fields into dense typed arrays.
#[derive(Debug, Default)]
pub struct ResultSet {
    names: Vec<String>,
    frames: Vec<DataFrame>,
}

impl ResultSet {
    /// Create a result set with one field slot per export name.
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            frames: Vec::new(),
        }
    }

    /// Exported field names, in frame slot order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of accumulated frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Whether any frames have been accumulated.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Append an empty frame and return it for the decoder to populate.
    pub fn next_data_frame(&mut self) -> &mut DataFrame {
        let idx = self.frames.len();
        self.frames.push(DataFrame::with_field_count(self.names.len()));
        &mut self.frames[idx]
    }

    /// Extract a field as a dense typed array.
    ///
    /// `group_by` re-bins the target's cells under the repetition structure
    /// of another field that shares its path. `override_type` forces the
    /// element kind instead of deriving it from the field's metadata; it
    /// cannot cross the string/numeric boundary.
    pub fn get(
        &self,
        field_name: &str,
        group_by: Option<&str>,
        override_type: Option<&str>,
    ) -> Result<DataObject> {
        let first = self.frames.first().ok_or(ResultSetError::EmptyResultSet)?;

        if !first.has_field_named(field_name) {
            return Err(ResultSetError::UnknownField(field_name.to_string()));
        }
        if let Some(group_field) = group_by {
            if !first.has_field_named(group_field) {
                return Err(ResultSetError::UnknownField(group_field.to_string()));
            }
        }

        debug!(
            field = field_name,
            group_by = group_by.unwrap_or(""),
            frames = self.frames.len(),
            "extracting field"
        );

        let raw = self.raw_values(field_name, group_by)?;
        self.make_data_object(field_name, group_by, raw, override_type)
    }

    /// Unit string recorded for a field.
    pub fn unit(&self, field_name: &str) -> Result<String> {
        let first = self.frames.first().ok_or(ResultSetError::EmptyResultSet)?;
        let idx = first.field_index_for_node_named(field_name)?;
        Ok(first.field_at_idx(idx).target.unit.clone())
    }

    /// Solve the dense shape for a field and inflate every frame into it.
    fn raw_values(&self, field_name: &str, group_by: Option<&str>) -> Result<RawValues> {
        let first = &self.frames[0];
        let target_idx = first.field_index_for_node_named(field_name)?;

        let group_idx = match group_by {
            Some(group_field) => {
                let idx = first.field_index_for_node_named(group_field)?;
                validate_group_by_path(first, target_idx, idx)?;
                Some(idx)
            }
            None => None,
        };

        let target0 = first.field_at_idx(target_idx);
        let mut dim_paths = target0.target.dim_paths.clone();
        let mut export_dims = target0.target.export_dim_idxs.clone();

        // Measure per-level maxima and fold metadata across all frames.
        let mut dims_list: Vec<usize> = Vec::new();
        let mut groupby_idx = 0usize;
        let mut total_groupby_elements = 0usize;
        let mut info = TypeInfo::default();

        for frame in &self.frames {
            let target = frame.field_at_idx(target_idx);

            if !target.target.dim_paths.is_empty()
                && dim_paths.len() < target.target.dim_paths.len()
            {
                dim_paths = target.target.dim_paths.clone();
                export_dims = target.target.export_dim_idxs.clone();
            }

            if dims_list.len() < target.seq_counts.len() {
                dims_list.resize(target.seq_counts.len(), 0);
            }
            for (level, counts) in target.seq_counts.iter().enumerate() {
                if let Some(&largest) = counts.iter().max() {
                    dims_list[level] = dims_list[level].max(largest);
                }
            }

            info.merge(&target.target.type_info);

            if let Some(group_idx) = group_idx {
                let group = frame.field_at_idx(group_idx);
                groupby_idx = groupby_idx.max(group.seq_counts.len());

                if groupby_idx > dims_list.len() {
                    // The group field repeats deeper than the target; the
                    // output collapses to one axis sized by the group.
                    dim_paths = group.target.dim_paths.last().cloned().into_iter().collect();

                    let elements: usize = group
                        .seq_counts
                        .iter()
                        .filter_map(|counts| counts.iter().max().copied())
                        .product();
                    total_groupby_elements = total_groupby_elements.max(elements);
                } else {
                    // The rebuilt tags start one before the group's first
                    // export dim; a group target with no export dims
                    // inherits nothing.
                    dim_paths = match group.target.export_dim_idxs.len().checked_sub(1) {
                        Some(start) => {
                            target.target.dim_paths.get(start..).unwrap_or(&[]).to_vec()
                        }
                        None => Vec::new(),
                    };
                }
            }
        }

        // Promote zero-sized dimensions so a field with no data still has a
        // cell to hold the missing value.
        let mut all_dims = dims_list.clone();
        for dim in &mut all_dims {
            if *dim == 0 {
                *dim = 1;
            }
        }
        if all_dims.is_empty() {
            all_dims.push(1);
        }

        let mut dims: Vec<usize>;
        if groupby_idx > 0 {
            if groupby_idx > dims_list.len() {
                dims = vec![total_groupby_elements];
                export_dims = vec![0];
                all_dims = dims.clone();
            } else {
                // Collapse the leading group levels into a single row axis.
                dims = vec![1; dims_list.len() - groupby_idx + 1];
                for dim in &all_dims[..groupby_idx] {
                    dims[0] *= dim;
                }
                for (offset, &dim) in all_dims[groupby_idx..].iter().enumerate() {
                    dims[offset + 1] = dim;
                }

                let shift = groupby_idx as isize - 1;
                let mut shifted: Vec<usize> = export_dims
                    .iter()
                    .map(|&idx| idx as isize - shift)
                    .filter(|&idx| idx >= 0)
                    .map(|idx| idx as usize)
                    .collect();
                if shifted.first() != Some(&0) {
                    shifted.insert(0, 0);
                }
                export_dims = shifted;
            }
        } else {
            dims = all_dims.clone();
        }

        let row_length: usize = dims[1..].iter().product();
        let total_rows = dims[0] * self.frames.len();

        let mut data = vec![MISSING_VALUE; total_rows * row_length];

        for (frame_idx, frame) in self.frames.iter().enumerate() {
            let target = frame.field_at_idx(target_idx);
            if target.data.is_empty() {
                continue;
            }

            let rows = rows_for_field(target, &all_dims, groupby_idx);

            let block_start = dims[0] * frame_idx * row_length;
            let block = &mut data[block_start..block_start + dims[0] * row_length];
            let mut offset = 0;
            for row in &rows {
                if offset + row.len() > block.len() {
                    break;
                }
                block[offset..offset + row.len()].copy_from_slice(row);
                offset += row.len();
            }
        }

        dims[0] = total_rows;
        let dims: Vec<usize> = export_dims.iter().map(|&idx| dims[idx]).collect();

        debug!(
            field = field_name,
            dims = ?dims,
            cells = data.len(),
            "resolved dense shape"
        );

        Ok(RawValues {
            data,
            dims,
            dim_paths,
            info,
        })
    }

    /// Box the solved lanes into a typed container.
    fn make_data_object(
        &self,
        field_name: &str,
        group_by: Option<&str>,
        raw: RawValues,
        override_type: Option<&str>,
    ) -> Result<DataObject> {
        let kind = match override_type {
            None => ElementKind::for_type_info(&raw.info),
            Some(token) => {
                let kind = ElementKind::from_override(token)?;
                if kind.is_string() != raw.info.is_string() {
                    return Err(ResultSetError::BadConversion(field_name.to_string()));
                }
                kind
            }
        };

        Ok(DataObject::from_lanes(
            kind,
            raw.data,
            raw.dims,
            field_name.to_string(),
            group_by.map(str::to_string),
            raw.dim_paths,
        ))
    }
}

/// Require the target and group-by fields to lie on a shared path.
///
/// Only node components are compared; the subset selector may differ so
/// grouping works across subsets.
fn validate_group_by_path(frame: &DataFrame, target_idx: usize, group_idx: usize) -> Result<()> {
    let target_paths = &frame.field_at_idx(target_idx).target.dim_paths;
    let group_paths = &frame.field_at_idx(group_idx).target.dim_paths;

    let (Some(target_path), Some(group_path)) = (target_paths.last(), group_paths.last()) else {
        return Ok(());
    };

    let shared = target_path.path.len().min(group_path.path.len());
    if target_path.path[..shared] != group_path.path[..shared] {
        return Err(ResultSetError::BadGroupByPath {
            target_path: target_path.to_string(),
            group_by_path: group_path.to_string(),
        });
    }

    Ok(())
}

/// Inflate one frame's ragged field into dense rows.
///
/// `dims` is the solved per-frame shape. With no group-by the result is a
/// single row covering the whole frame block; with one, the rows are the
/// group bins.
fn rows_for_field(field: &DataField, dims: &[usize], groupby_idx: usize) -> Vec<Vec<f64>> {
    let max_counts = field.seq_counts.iter().map(Vec::len).max().unwrap_or(0);

    let mut idxs: Vec<usize> = (0..field.data.len()).collect();

    // How many padding cells each parent lacks, per level.
    let mut inserts: Vec<Vec<usize>> = vec![vec![0]; dims.len()];
    for level in 0..dims.len().min(field.seq_counts.len()) {
        let stride: usize = dims[level..].iter().product();
        let child_stride: usize = dims[level + 1..].iter().product();
        inserts[level] = field.seq_counts[level]
            .iter()
            .map(|&count| stride.saturating_sub(count * child_stride))
            .collect();
    }

    // Open holes from the deepest level up: every value index past a hole's
    // anchor shifts right by the hole size.
    for level in (0..dims.len()).rev() {
        let stride: usize = dims[level..].iter().product();
        for (parent, &gap) in inserts[level].iter().enumerate() {
            if gap == 0 {
                continue;
            }
            let anchor = (stride * (parent + 1)) as isize - gap as isize - 1;
            for idx in &mut idxs {
                if *idx as isize > anchor {
                    *idx += gap;
                }
            }
        }
    }

    let dense_len: usize = dims.iter().product();
    let mut output = vec![MISSING_VALUE; dense_len];
    for (value_idx, &cell_idx) in idxs.iter().enumerate() {
        output[cell_idx] = field.data[value_idx];
    }

    if groupby_idx == 0 {
        return vec![output];
    }

    if groupby_idx > field.seq_counts.len() {
        // The group field repeats deeper than this target: broadcast the
        // target's first value across every group row.
        let mut rows = vec![vec![MISSING_VALUE]; dense_len * max_counts];
        if let Some(&first) = output.first() {
            for row in &mut rows {
                row[0] = first;
            }
        }
        return rows;
    }

    let split = groupby_idx.min(dims.len());
    let row_count: usize = dims[..split].iter().product();
    let row_length: usize = dims[split..].iter().product();
    let mut rows = vec![vec![MISSING_VALUE; row_length]; row_count];
    for (row_idx, row) in rows.iter_mut().enumerate() {
        let start = row_idx * row_length;
        row.copy_from_slice(&output[start..start + row_length]);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FieldTarget;
    use std::sync::Arc;

    fn field(data: &[f64], seq_counts: &[&[usize]]) -> DataField {
        DataField {
            data: data.to_vec(),
            seq_counts: seq_counts.iter().map(|c| c.to_vec()).collect(),
            target: Arc::new(FieldTarget::default()),
        }
    }

    #[test]
    fn test_inflation_regular_counts_is_identity() {
        let field = field(&[1.0, 2.0, 3.0, 4.0], &[&[2], &[2, 2]]);
        let rows = rows_for_field(&field, &[2, 2], 0);

        assert_eq!(rows, vec![vec![1.0, 2.0, 3.0, 4.0]]);
    }

    #[test]
    fn test_inflation_pads_short_parents() {
        let field = field(&[1.0, 2.0, 3.0, 4.0, 5.0], &[&[2], &[2, 3]]);
        let rows = rows_for_field(&field, &[2, 3], 0);

        assert_eq!(
            rows,
            vec![vec![1.0, 2.0, MISSING_VALUE, 3.0, 4.0, 5.0]]
        );
    }

    #[test]
    fn test_inflation_pads_leading_parent() {
        // First parent is the short one; the hole opens before the second
        // parent's values, which keep their relative order.
        let field = field(&[1.0, 3.0, 4.0, 5.0], &[&[2], &[1, 3]]);
        let rows = rows_for_field(&field, &[2, 3], 0);

        assert_eq!(
            rows,
            vec![vec![1.0, MISSING_VALUE, MISSING_VALUE, 3.0, 4.0, 5.0]]
        );
    }

    #[test]
    fn test_inflation_preserves_value_count() {
        let field = field(
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
            &[&[3], &[3, 1, 3]],
        );
        let rows = rows_for_field(&field, &[3, 3], 0);

        let placed = rows[0].iter().filter(|&&v| v != MISSING_VALUE).count();
        assert_eq!(placed, 7);
        assert_eq!(rows[0].len(), 9);
    }

    #[test]
    fn test_inflation_empty_field_yields_all_missing() {
        let field = field(&[], &[]);
        let rows = rows_for_field(&field, &[2, 2], 0);

        assert_eq!(rows, vec![vec![MISSING_VALUE; 4]]);
    }

    #[test]
    fn test_group_split_emits_group_rows() {
        let field = field(&[1.0, 2.0, 3.0, 4.0, 5.0], &[&[2], &[2, 3]]);
        let rows = rows_for_field(&field, &[2, 3], 1);

        assert_eq!(
            rows,
            vec![vec![1.0, 2.0, MISSING_VALUE], vec![3.0, 4.0, 5.0]]
        );
    }

    #[test]
    fn test_deep_group_broadcasts_first_value() {
        let field = field(&[42.0], &[&[1]]);
        let rows = rows_for_field(&field, &[3], 2);

        assert_eq!(rows, vec![vec![42.0], vec![42.0], vec![42.0]]);
    }
}
