//! Packing metadata for decoded fields.

use serde::{Deserialize, Serialize};

/// How a field was encoded in the source message: the table-B reference
/// value, bit width, decimal scale and unit string.
///
/// The predicates derive the natural element kind of the decoded values.
/// Character data is flagged by the `CCITT IA5` unit; a non-positive scale
/// means the decoded values are integral.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Reference value added during decoding.
    pub reference: i64,
    /// Bit width of the packed value.
    pub bits: u32,
    /// Decimal scale factor (power of ten).
    pub scale: i32,
    /// Unit string from the descriptor table.
    pub unit: String,
}

impl TypeInfo {
    /// Whether the decoded values are bit-packed character data.
    pub fn is_string(&self) -> bool {
        self.unit == "CCITT IA5"
    }

    /// Whether the decoded values are integral.
    pub fn is_integer(&self) -> bool {
        self.scale <= 0
    }

    /// Whether the decoded values can be negative.
    pub fn is_signed(&self) -> bool {
        self.reference < 0
    }

    /// Whether 32 bits cannot hold the decoded values.
    pub fn is_64bit(&self) -> bool {
        if self.bits == 0 {
            return false;
        }

        if self.is_integer() {
            // Largest decodable magnitude after scaling.
            let span = (2f64.powi(self.bits.min(1024) as i32) - 1.0
                + self.reference.unsigned_abs() as f64)
                * 10f64.powi(-self.scale);

            if self.is_signed() {
                span > i32::MAX as f64
            } else {
                span > u32::MAX as f64
            }
        } else {
            self.bits > 32
        }
    }

    /// Fold another frame's metadata into this one.
    ///
    /// Reference takes the minimum, bits the maximum, the unit keeps the
    /// first non-empty value. The scale keeps whichever value has the larger
    /// magnitude, sign included, so a later negative scale of larger
    /// magnitude replaces an earlier positive one.
    pub fn merge(&mut self, other: &TypeInfo) {
        self.reference = self.reference.min(other.reference);
        self.bits = self.bits.max(other.bits);

        if other.scale.abs() > self.scale.abs() {
            self.scale = other.scale;
        }

        if self.unit.is_empty() {
            self.unit = other.unit.clone();
        }
    }
}
