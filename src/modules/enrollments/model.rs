//! Enrollment data models and DTOs.
//!
//! This module re-exports enrollment models from the `bursar-models` crate
//! for backward compatibility and provides any controller-specific types.

// Re-export all enrollment models from the shared crate
pub use bursar_models::enrollments::*;
