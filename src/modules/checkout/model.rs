//! Checkout data models and DTOs.
//!
//! This module re-exports checkout models from the `bursar-models` crate
//! for backward compatibility and provides any controller-specific types.

// Re-export all checkout models from the shared crate
pub use bursar_models::checkout::*;
