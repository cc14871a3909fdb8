//! Size Estimation Module
//!
//! Pluggable strategies for approximating the memory footprint of a value.

use std::fmt::Debug;

use serde::Serialize;

use crate::error::Result;

// == Size Estimator Trait ==
/// Estimates the byte cost charged against the memory ceiling for a value.
pub trait SizeEstimator<V>: Send + Sync + Debug {
    fn estimate(&self, value: &V) -> Result<u64>;
}

// == JSON Size Estimator ==
/// Charges two bytes per UTF-16 code unit of the value's JSON text.
///
/// This is an approximation of a 16-bit string encoding, not a measurement.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSizeEstimator;

impl<V: Serialize> SizeEstimator<V> for JsonSizeEstimator {
    fn estimate(&self, value: &V) -> Result<u64> {
        let text = serde_json::to_string(value)?;
        Ok(text.encode_utf16().count() as u64 * 2)
    }
}
