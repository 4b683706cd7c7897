//! Shared constants for dense extraction.

/// Sentinel stored in dense buffers for cells that carry no decoded value.
pub const MISSING_VALUE: f64 = 10.0e10;

/// Magnitude at or above which a numeric value is treated as missing on
/// export. Never applied to bit-packed string lanes.
pub const MISSING_THRESHOLD: f64 = 1.0e10;
