//! # Bursar Models
//!
//! Domain models and DTOs for the Bursar API.
//!
//! This crate provides all data structures used throughout the billing
//! core, including database entities, request/response DTOs, and the value
//! logic (fee cycles, period math, due-date policies) the engine is built
//! on.
//!
//! # Modules
//!
//! - [`access`]: payment-gate decision models
//! - [`billing`]: currencies, fee cycles, billing periods, due-date policies
//! - [`checkout`]: checkout request/response models
//! - [`directory`]: records served by the student/class/parent directories
//! - [`enrollments`]: enrollment entity and DTOs
//! - [`invoices`]: invoice aggregate, line items, and DTOs
//! - [`logs`]: append-only generation and reminder audit logs
//! - [`payments`]: payment-processor call shapes

pub mod access;
pub mod billing;
pub mod checkout;
pub mod directory;
pub mod enrollments;
pub mod invoices;
pub mod logs;
pub mod payments;

// Re-export commonly used types at crate root for convenience
pub use access::{AccessDecision, PaymentSnapshot};

pub use billing::{BillingPeriod, Currency, DueDatePolicy, FeeCycle, FeeCycleKind};

pub use checkout::{CartItemDto, CheckoutDto, CheckoutSummary};

pub use directory::{ClassRecord, NewParentRecord, NewStudentRecord, ParentRecord, StudentRecord};

pub use enrollments::{
    CreateEnrollmentDto, Enrollment, EnrollmentStatus, ToggleAdminAccessDto,
};

pub use invoices::{
    AttachProofDto, CreateInvoiceDto, CreateInvoiceItemDto, Invoice, InvoiceItem, InvoiceRef,
    InvoiceStatus, MarkPaidDto, NewInvoice, NewInvoiceItem, RefundDto,
};

pub use logs::{
    FeeReminderLog, GenerationStatus, GenerationType, InvoiceGenerationLog, NewFeeReminderLog,
    NewGenerationLog, PaginatedGenerationLogsResponse, PaginatedReminderLogsResponse,
    ReminderRunSummary, ReminderStatus, ReminderType, RunSummary,
};

pub use payments::{NewPaymentTransaction, PaymentTransaction};
