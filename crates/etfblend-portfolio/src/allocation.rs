//! Allocation sanity check.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Allowed distance of the allocation total from 100%.
pub const DEFAULT_ALLOCATION_TOLERANCE: f64 = 0.01;

/// Whether fund allocations add up to 100%.
///
/// This is informational only: an unbalanced allocation is still analysed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationCheck {
    /// Sum of all allocations, in percent.
    pub total: f64,

    /// Accepted deviation from 100.
    pub tolerance: f64,
}

impl AllocationCheck {
    /// Check a set of allocations.
    pub fn new(allocations: &[f64], tolerance: f64) -> Self {
        Self {
            total: allocations.iter().sum(),
            tolerance,
        }
    }

    /// Returns true if the total is within tolerance of 100%.
    pub fn is_balanced(&self) -> bool {
        (self.total - 100.0).abs() <= self.tolerance
    }
}

impl fmt::Display for AllocationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_balanced() {
            write!(f, "Allocation: {:.1}%", self.total)
        } else {
            write!(
                f,
                "Allocation does not sum to 100% (current: {:.1}%)",
                self.total
            )
        }
    }
}

/// Split 100% evenly across `count` funds.
pub fn equal_allocations(count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    vec![100.0 / count as f64; count]
}
