//! # Bursar API
//!
//! The billing & enrollment lifecycle engine of a school-management
//! backend, built with Rust, Axum, and PostgreSQL.
//!
//! ## Overview
//!
//! Bursar decides whether a student may access a paid course, issues
//! uniquely-numbered invoices under concurrent writers, periodically
//! regenerates recurring fees without duplication, and reconciles
//! enrollment state with payment state:
//!
//! - **Sequence allocation**: year-scoped `INV-<year>-<seq>` invoice
//!   numbers, unique and monotonically increasing even under concurrency,
//!   protected by transaction row locking.
//! - **Payment gate**: a pure decision table combining an enrollment and
//!   its invoices into an access verdict.
//! - **Invoice lifecycle**: create / mark-paid / refund / proof
//!   attachment, with bounded retry on number conflicts.
//! - **Recurring billing**: a daily sweep generating fee-cycle invoices,
//!   guarded by period idempotency and an append-only generation log.
//! - **Checkout**: a cart becomes enrollments plus draft invoices in one
//!   pass, idempotent for already-owned courses.
//! - **Fee reminders**: a weekly sweep notifying on overdue and upcoming
//!   invoices through the external dispatcher.
//!
//! ## Architecture
//!
//! The codebase follows a modular architecture inspired by NestJS:
//!
//! ```text
//! src/
//! ├── modules/           # Feature modules
//! │   ├── access_control/    # Payment gate
//! │   ├── checkout/          # Checkout orchestration
//! │   ├── directory/         # Student/class/parent collaborator traits
//! │   ├── enrollments/       # Enrollment ledger
//! │   ├── invoice_generation/# Recurring billing scheduler
//! │   ├── invoices/          # Invoice lifecycle + sequence allocator
//! │   ├── notifications/     # Fire-and-forget dispatcher
//! │   ├── payments/          # Payment processor collaborator
//! │   └── reminders/         # Fee reminder scheduler
//! ├── docs.rs            # OpenAPI document
//! ├── logging.rs         # Request logging middleware
//! ├── router.rs          # Axum router configuration
//! └── state.rs           # Shared application state
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `store.rs` / `log.rs`: Persistence traits and Postgres impls
//! - `router.rs`: Axum router configuration
//!
//! External collaborators (directories, notifications, payments) and the
//! billing stores are consumed through `async_trait` objects, so the
//! engine's semantics are testable against in-memory doubles without a
//! database.

pub mod docs;
pub mod logging;
pub mod modules;
pub mod router;
pub mod state;
