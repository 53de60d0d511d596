//! Invoice data models and DTOs.
//!
//! This module re-exports invoice models from the `bursar-models` crate
//! for backward compatibility and provides any controller-specific types.

// Re-export all invoice models from the shared crate
pub use bursar_models::invoices::*;
