use utoipa::OpenApi;

use bursar_core::pagination::{PaginationMeta, PaginationParams};
use bursar_models::access::AccessDecision;
use bursar_models::billing::Currency;
use bursar_models::checkout::{CartItemDto, CheckoutDto, CheckoutSummary};
use bursar_models::enrollments::{
    CreateEnrollmentDto, Enrollment, EnrollmentStatus, ToggleAdminAccessDto,
};
use bursar_models::invoices::{
    AttachProofDto, CreateInvoiceDto, CreateInvoiceItemDto, Invoice, InvoiceItem, InvoiceRef,
    InvoiceStatus, MarkPaidDto, RefundDto,
};
use bursar_models::logs::{
    FeeReminderLog, GenerationStatus, GenerationType, InvoiceGenerationLog,
    PaginatedGenerationLogsResponse, PaginatedReminderLogsResponse, ReminderRunSummary,
    ReminderStatus, ReminderType, RunSummary,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::access_control::controller::check_access,
        crate::modules::access_control::controller::toggle_admin_access,
        crate::modules::checkout::controller::create_checkout,
        crate::modules::enrollments::controller::create_enrollment,
        crate::modules::enrollments::controller::activate_enrollment,
        crate::modules::enrollments::controller::drop_enrollment,
        crate::modules::enrollments::controller::get_student_enrollments,
        crate::modules::invoices::controller::create_invoice,
        crate::modules::invoices::controller::get_invoice,
        crate::modules::invoices::controller::get_student_invoices,
        crate::modules::invoices::controller::mark_invoice_paid,
        crate::modules::invoices::controller::refund_invoice,
        crate::modules::invoices::controller::attach_payment_proof,
        crate::modules::invoices::controller::delete_invoice,
        crate::modules::invoice_generation::controller::generate_monthly,
        crate::modules::invoice_generation::controller::generate_quarterly,
        crate::modules::invoice_generation::controller::generate_yearly,
        crate::modules::invoice_generation::controller::generate_for_student,
        crate::modules::invoice_generation::controller::get_generation_logs,
        crate::modules::reminders::controller::run_reminders,
        crate::modules::reminders::controller::get_reminder_logs,
    ),
    components(
        schemas(
            AccessDecision,
            AttachProofDto,
            CartItemDto,
            CheckoutDto,
            CheckoutSummary,
            CreateEnrollmentDto,
            CreateInvoiceDto,
            CreateInvoiceItemDto,
            Currency,
            Enrollment,
            EnrollmentStatus,
            FeeReminderLog,
            GenerationStatus,
            GenerationType,
            Invoice,
            InvoiceGenerationLog,
            InvoiceItem,
            InvoiceRef,
            InvoiceStatus,
            MarkPaidDto,
            PaginatedGenerationLogsResponse,
            PaginatedReminderLogsResponse,
            PaginationMeta,
            PaginationParams,
            RefundDto,
            ReminderRunSummary,
            ReminderStatus,
            ReminderType,
            RunSummary,
            ToggleAdminAccessDto,
        )
    ),
    tags(
        (name = "Access Control", description = "Course access decisions and admin overrides"),
        (name = "Checkout", description = "Cart checkout into enrollments and draft invoices"),
        (name = "Enrollments", description = "Enrollment ledger"),
        (name = "Invoices", description = "Invoice lifecycle"),
        (name = "Invoice Generation", description = "Recurring fee generation"),
        (name = "Fee Reminders", description = "Overdue and upcoming payment reminders")
    ),
    info(
        title = "Bursar API",
        version = "0.1.0",
        description = "Billing and enrollment lifecycle engine for a school-management backend.",
        contact(
            name = "API Support",
            email = "support@bursar.app"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;
