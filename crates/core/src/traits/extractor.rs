//! Authoritative constraint extraction trait.

use crate::error::Result;
use crate::types::{Constraints, ExplicitRestaurant};

/// The authoritative constraint source.
///
/// Its answers win over every other source. An `Err` means the source is
/// unavailable and callers fall back to lighter parsing.
pub trait ConstraintSource: Send + Sync {
    /// Extract calorie and macro bounds from raw text.
    fn extract_constraints(&self, text: &str) -> Result<Constraints>;

    /// Detect a restaurant the user named directly.
    fn detect_explicit_restaurant(&self, text: &str) -> Result<ExplicitRestaurant>;
}
