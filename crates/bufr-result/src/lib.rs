//! Frame accumulation and dense array extraction for BUFR queries.
//!
//! A decoder produces one [`DataFrame`] per decoded message, each holding the
//! ragged values of every exported field. The [`ResultSet`] accumulates those
//! frames and, on demand, folds a field's ragged forest into a single dense
//! N-dimensional array: values are aligned across messages and sparse nodes
//! inflated with a missing sentinel, with optional re-binning under a
//! group-by field. The dense output is boxed in a typed [`DataObject`].

pub mod constants;
pub mod data_object;
pub mod error;
pub mod frame;
pub mod result_set;
pub mod type_info;

pub use constants::{MISSING_THRESHOLD, MISSING_VALUE};
pub use data_object::{DataBuffer, DataObject, ElementKind};
pub use error::{Result, ResultSetError};
pub use frame::{DataField, DataFrame, FieldTarget};
pub use result_set::ResultSet;
pub use type_info::TypeInfo;
