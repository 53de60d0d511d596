//! In-memory doubles for the billing engine's trait seams, plus fixture
//! builders. The doubles mirror the Postgres stores' contracts: the
//! invoice store serializes allocation+insert under one lock, the
//! enrollment store enforces the one-open-enrollment invariant, and the
//! log stores are append-only.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use bursar_config::BillingConfig;
use bursar_core::StoreError;
use bursar_models::billing::{BillingPeriod, Currency};
use bursar_models::directory::{
    ClassRecord, NewParentRecord, NewStudentRecord, ParentRecord, StudentRecord,
};
use bursar_models::enrollments::{Enrollment, EnrollmentStatus};
use bursar_models::invoices::{Invoice, InvoiceItem, InvoiceStatus, NewInvoice};
use bursar_models::logs::{
    FeeReminderLog, InvoiceGenerationLog, NewFeeReminderLog, NewGenerationLog,
};
use bursar_models::payments::{NewPaymentTransaction, PaymentTransaction};

use bursar::modules::access_control::service::AccessService;
use bursar::modules::checkout::service::CheckoutService;
use bursar::modules::directory::{ClassCatalog, ParentDirectory, StudentDirectory};
use bursar::modules::enrollments::service::EnrollmentService;
use bursar::modules::enrollments::store::EnrollmentStore;
use bursar::modules::invoice_generation::log::GenerationLogStore;
use bursar::modules::invoice_generation::service::GenerationService;
use bursar::modules::invoices::sequence;
use bursar::modules::invoices::service::InvoiceService;
use bursar::modules::invoices::store::InvoiceStore;
use bursar::modules::notifications::{
    CheckoutNotice, EnrollmentNotice, InvoiceNotice, NotificationDispatcher, ReminderNotice,
};
use bursar::modules::payments::PaymentProcessor;
use bursar::modules::reminders::log::ReminderLogStore;
use bursar::modules::reminders::service::ReminderService;

// ============================================================================
// Invoice store
// ============================================================================

#[derive(Default)]
pub struct MemoryInvoiceStore {
    rows: Mutex<Vec<Invoice>>,
}

impl MemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an invoice directly, bypassing allocation. Lets tests pick
    /// created_at/generated_date/status precisely.
    pub async fn seed(&self, invoice: Invoice) {
        self.rows.lock().await.push(invoice);
    }

    pub async fn all(&self) -> Vec<Invoice> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl InvoiceStore for MemoryInvoiceStore {
    async fn create(&self, new: NewInvoice) -> Result<Invoice, StoreError> {
        // The lock spans the max-scan and the insert, mirroring the
        // FOR UPDATE row lock of the Postgres store. Soft-deleted rows
        // stay in `rows` and keep their numbers burned.
        let mut rows = self.rows.lock().await;

        let invoice_number = match new.invoice_number {
            Some(number) => {
                if rows.iter().any(|i| i.invoice_number == number) {
                    return Err(StoreError::DuplicateInvoiceNumber);
                }
                number
            }
            None => sequence::next_number(
                Utc::now().year(),
                rows.iter().map(|i| i.invoice_number.as_str()),
            ),
        };

        let id = Uuid::new_v4();
        let now = Utc::now();
        let items = new
            .items
            .iter()
            .map(|item| InvoiceItem {
                id: Uuid::new_v4(),
                invoice_id: id,
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                amount: item.amount(),
            })
            .collect();

        let invoice = Invoice {
            id,
            invoice_number,
            student_id: new.student_id,
            parent_id: new.parent_id,
            class_id: new.class_id,
            amount: new.amount,
            currency: new.currency,
            status: new.status,
            due_date: new.due_date,
            generated_date: now,
            paid_date: None,
            payment_method: None,
            transaction_id: None,
            description: new.description,
            original_price: new.original_price,
            discount_amount: new.discount_amount,
            payment_proof_url: None,
            notes: None,
            deleted_at: None,
            created_at: now,
            items,
        };

        rows.push(invoice.clone());
        Ok(invoice)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Invoice>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|i| i.id == id && !i.is_deleted())
            .cloned())
    }

    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Invoice>, StoreError> {
        let mut invoices: Vec<Invoice> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|i| i.student_id == student_id && !i.is_deleted())
            .cloned()
            .collect();
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invoices)
    }

    async fn mark_paid(
        &self,
        id: Uuid,
        payment_method: &str,
        transaction_id: &str,
    ) -> Result<Invoice, StoreError> {
        let mut rows = self.rows.lock().await;
        let invoice = rows
            .iter_mut()
            .find(|i| i.id == id && !i.is_deleted())
            .ok_or(StoreError::NotFound)?;
        invoice.status = InvoiceStatus::Paid;
        invoice.paid_date = Some(Utc::now());
        invoice.payment_method = Some(payment_method.to_string());
        invoice.transaction_id = Some(transaction_id.to_string());
        Ok(invoice.clone())
    }

    async fn mark_refunded(&self, id: Uuid, note: &str) -> Result<Invoice, StoreError> {
        let mut rows = self.rows.lock().await;
        let invoice = rows
            .iter_mut()
            .find(|i| i.id == id && i.status == InvoiceStatus::Paid && !i.is_deleted())
            .ok_or(StoreError::NotFound)?;
        invoice.status = InvoiceStatus::Refunded;
        invoice.notes = Some(note.to_string());
        Ok(invoice.clone())
    }

    async fn mark_overdue(&self, id: Uuid) -> Result<Option<Invoice>, StoreError> {
        let today = Utc::now().date_naive();
        let mut rows = self.rows.lock().await;
        let Some(invoice) = rows.iter_mut().find(|i| {
            i.id == id
                && matches!(i.status, InvoiceStatus::Draft | InvoiceStatus::Sent)
                && i.due_date < today
                && !i.is_deleted()
        }) else {
            return Ok(None);
        };
        invoice.status = InvoiceStatus::Overdue;
        Ok(Some(invoice.clone()))
    }

    async fn attach_proof(&self, id: Uuid, proof_url: &str) -> Result<Invoice, StoreError> {
        let mut rows = self.rows.lock().await;
        let invoice = rows
            .iter_mut()
            .find(|i| i.id == id && !i.is_deleted())
            .ok_or(StoreError::NotFound)?;
        invoice.payment_proof_url = Some(proof_url.to_string());
        Ok(invoice.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().await;
        let invoice = rows
            .iter_mut()
            .find(|i| i.id == id && !i.is_deleted())
            .ok_or(StoreError::NotFound)?;
        invoice.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn list_unpaid_due_by(&self, due_by: NaiveDate) -> Result<Vec<Invoice>, StoreError> {
        let mut invoices: Vec<Invoice> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|i| i.status.is_unpaid() && i.due_date <= due_by && !i.is_deleted())
            .cloned()
            .collect();
        invoices.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        Ok(invoices)
    }
}

// ============================================================================
// Enrollment store
// ============================================================================

#[derive(Default)]
pub struct MemoryEnrollmentStore {
    rows: Mutex<Vec<Enrollment>>,
}

impl MemoryEnrollmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Enrollment> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl EnrollmentStore for MemoryEnrollmentStore {
    async fn insert(
        &self,
        student_id: Uuid,
        class_id: Uuid,
        status: EnrollmentStatus,
    ) -> Result<Enrollment, StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|e| {
            e.student_id == student_id
                && e.class_id == class_id
                && e.status != EnrollmentStatus::Dropped
        }) {
            return Err(StoreError::AlreadyEnrolled);
        }

        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            student_id,
            class_id,
            enrollment_date: Utc::now(),
            deenrollment_date: None,
            status,
            admin_granted_access: false,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };
        rows.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Enrollment>, StoreError> {
        Ok(self.rows.lock().await.iter().find(|e| e.id == id).cloned())
    }

    async fn find_open(
        &self,
        student_id: Uuid,
        class_id: Uuid,
    ) -> Result<Option<Enrollment>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|e| {
                e.student_id == student_id
                    && e.class_id == class_id
                    && e.status != EnrollmentStatus::Dropped
            })
            .cloned())
    }

    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Enrollment>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn list_active(&self) -> Result<Vec<Enrollment>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .filter(|e| e.status == EnrollmentStatus::Active)
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: EnrollmentStatus,
    ) -> Result<Enrollment, StoreError> {
        let mut rows = self.rows.lock().await;
        let enrollment = rows
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound)?;
        enrollment.status = status;
        if status == EnrollmentStatus::Dropped {
            enrollment.deenrollment_date = Some(Utc::now());
        }
        enrollment.updated_at = Some(Utc::now());
        Ok(enrollment.clone())
    }

    async fn set_admin_access(
        &self,
        student_id: Uuid,
        class_id: Uuid,
        enabled: bool,
    ) -> Result<Enrollment, StoreError> {
        let mut rows = self.rows.lock().await;
        let enrollment = rows
            .iter_mut()
            .find(|e| {
                e.student_id == student_id
                    && e.class_id == class_id
                    && e.status != EnrollmentStatus::Dropped
            })
            .ok_or(StoreError::NotFound)?;
        enrollment.admin_granted_access = enabled;
        Ok(enrollment.clone())
    }
}

// ============================================================================
// Audit log stores
// ============================================================================

#[derive(Default)]
pub struct MemoryGenerationLogStore {
    rows: Mutex<Vec<InvoiceGenerationLog>>,
}

impl MemoryGenerationLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<InvoiceGenerationLog> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl GenerationLogStore for MemoryGenerationLogStore {
    async fn append(&self, new: NewGenerationLog) -> Result<InvoiceGenerationLog, StoreError> {
        let log = InvoiceGenerationLog {
            id: Uuid::new_v4(),
            student_id: new.student_id,
            class_id: new.class_id,
            invoice_id: new.invoice_id,
            generation_type: new.generation_type,
            status: new.status,
            reason: new.reason,
            amount: new.amount,
            currency: new.currency,
            period_start: new.period_start,
            period_end: new.period_end,
            created_at: Utc::now(),
        };
        self.rows.lock().await.push(log.clone());
        Ok(log)
    }

    async fn has_success_in_period(
        &self,
        student_id: Uuid,
        class_id: Uuid,
        period: &BillingPeriod,
    ) -> Result<bool, StoreError> {
        Ok(self.rows.lock().await.iter().any(|l| {
            l.student_id == student_id
                && l.class_id == class_id
                && l.status == bursar_models::logs::GenerationStatus::Success
                && l.period_start <= period.end
                && l.period_end >= period.start
        }))
    }

    async fn list_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<InvoiceGenerationLog>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .filter(|l| l.student_id == student_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryReminderLogStore {
    rows: Mutex<Vec<FeeReminderLog>>,
}

impl MemoryReminderLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<FeeReminderLog> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl ReminderLogStore for MemoryReminderLogStore {
    async fn append(&self, new: NewFeeReminderLog) -> Result<FeeReminderLog, StoreError> {
        let log = FeeReminderLog {
            id: Uuid::new_v4(),
            student_id: new.student_id,
            parent_id: new.parent_id,
            invoice_id: new.invoice_id,
            reminder_type: new.reminder_type,
            status: new.status,
            message: new.message,
            recipient: new.recipient,
            sent_at: new.sent_at,
            error_message: new.error_message,
            created_at: Utc::now(),
        };
        self.rows.lock().await.push(log.clone());
        Ok(log)
    }

    async fn last_attempt_at(
        &self,
        invoice_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .filter(|l| l.invoice_id == Some(invoice_id))
            .map(|l| l.created_at)
            .max())
    }

    async fn list_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<FeeReminderLog>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .filter(|l| l.student_id == student_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Directory doubles
// ============================================================================

#[derive(Default)]
pub struct MemoryStudentDirectory {
    rows: Mutex<Vec<StudentRecord>>,
}

impl MemoryStudentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, student: StudentRecord) {
        self.rows.lock().await.push(student);
    }
}

#[async_trait]
impl StudentDirectory for MemoryStudentDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StudentRecord>, StoreError> {
        Ok(self.rows.lock().await.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|s| s.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<StudentRecord>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|s| s.user_id == Some(user_id))
            .cloned())
    }

    async fn create(&self, new: NewStudentRecord) -> Result<StudentRecord, StoreError> {
        let student = StudentRecord {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            country: new.country,
            user_id: new.user_id,
            phone: new.phone,
        };
        self.rows.lock().await.push(student.clone());
        Ok(student)
    }
}

#[derive(Default)]
pub struct MemoryClassCatalog {
    rows: Mutex<Vec<ClassRecord>>,
}

impl MemoryClassCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, class: ClassRecord) {
        self.rows.lock().await.push(class);
    }
}

#[async_trait]
impl ClassCatalog for MemoryClassCatalog {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ClassRecord>, StoreError> {
        Ok(self.rows.lock().await.iter().find(|c| c.id == id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryParentDirectory {
    rows: Mutex<Vec<ParentRecord>>,
    links: Mutex<Vec<(Uuid, Uuid)>>,
}

impl MemoryParentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, parent: ParentRecord) {
        self.rows.lock().await.push(parent);
    }

    pub async fn links(&self) -> Vec<(Uuid, Uuid)> {
        self.links.lock().await.clone()
    }
}

#[async_trait]
impl ParentDirectory for MemoryParentDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<ParentRecord>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_student_id(
        &self,
        student_id: Uuid,
    ) -> Result<Option<ParentRecord>, StoreError> {
        let links = self.links.lock().await;
        let Some((parent_id, _)) = links.iter().find(|(_, s)| *s == student_id) else {
            return Ok(None);
        };
        let parent_id = *parent_id;
        drop(links);
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|p| p.id == parent_id)
            .cloned())
    }

    async fn create(&self, new: NewParentRecord) -> Result<ParentRecord, StoreError> {
        let parent = ParentRecord {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            phone: new.phone,
        };
        self.rows.lock().await.push(parent.clone());
        Ok(parent)
    }

    async fn link_student(&self, parent_id: Uuid, student_id: Uuid) -> Result<(), StoreError> {
        let mut links = self.links.lock().await;
        if !links.contains(&(parent_id, student_id)) {
            links.push((parent_id, student_id));
        }
        Ok(())
    }
}

// ============================================================================
// Notifier and payments doubles
// ============================================================================

/// Counts dispatches per channel; `fail_all` makes every send error, for
/// the fire-and-forget tests.
#[derive(Default)]
pub struct RecordingNotifier {
    pub enrollment_count: AtomicUsize,
    pub invoice_count: AtomicUsize,
    pub payment_count: AtomicUsize,
    pub checkout_count: AtomicUsize,
    pub reminder_count: AtomicUsize,
    fail_all: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    fn outcome(&self) -> anyhow::Result<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            anyhow::bail!("smtp relay unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn enrollment_created(&self, _notice: &EnrollmentNotice) -> anyhow::Result<()> {
        self.enrollment_count.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    async fn invoice_generated(&self, _notice: &InvoiceNotice) -> anyhow::Result<()> {
        self.invoice_count.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    async fn payment_confirmed(&self, _notice: &InvoiceNotice) -> anyhow::Result<()> {
        self.payment_count.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    async fn guest_checkout(&self, _notice: &CheckoutNotice) -> anyhow::Result<()> {
        self.checkout_count.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    async fn fee_reminder(&self, _notice: &ReminderNotice) -> anyhow::Result<()> {
        self.reminder_count.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }
}

#[derive(Default)]
pub struct RecordingPayments {
    rows: Mutex<Vec<PaymentTransaction>>,
}

impl RecordingPayments {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<PaymentTransaction> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl PaymentProcessor for RecordingPayments {
    async fn create_transaction(
        &self,
        new: NewPaymentTransaction,
    ) -> Result<PaymentTransaction, StoreError> {
        let transaction = PaymentTransaction {
            id: Uuid::new_v4(),
            transaction_id: format!("txn_{}", Uuid::new_v4().simple()),
            student_id: new.student_id,
            invoice_id: new.invoice_id,
            amount: new.amount,
            currency: new.currency,
            description: new.description,
            reference_transaction_id: new.reference_transaction_id,
            created_at: Utc::now(),
        };
        self.rows.lock().await.push(transaction.clone());
        Ok(transaction)
    }

    async fn get_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<PaymentTransaction>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|t| t.transaction_id == transaction_id)
            .cloned())
    }
}

// ============================================================================
// Test environment
// ============================================================================

/// Everything the engine's services need, wired to in-memory doubles.
pub struct TestEnv {
    pub students: Arc<MemoryStudentDirectory>,
    pub classes: Arc<MemoryClassCatalog>,
    pub parents: Arc<MemoryParentDirectory>,
    pub enrollments: Arc<MemoryEnrollmentStore>,
    pub invoices: Arc<MemoryInvoiceStore>,
    pub generation_logs: Arc<MemoryGenerationLogStore>,
    pub reminder_logs: Arc<MemoryReminderLogStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub payments: Arc<RecordingPayments>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            students: Arc::new(MemoryStudentDirectory::new()),
            classes: Arc::new(MemoryClassCatalog::new()),
            parents: Arc::new(MemoryParentDirectory::new()),
            enrollments: Arc::new(MemoryEnrollmentStore::new()),
            invoices: Arc::new(MemoryInvoiceStore::new()),
            generation_logs: Arc::new(MemoryGenerationLogStore::new()),
            reminder_logs: Arc::new(MemoryReminderLogStore::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            payments: Arc::new(RecordingPayments::new()),
        }
    }

    pub fn invoice_service(&self) -> InvoiceService {
        InvoiceService::new(
            self.invoices.clone(),
            self.students.clone(),
            self.parents.clone(),
            self.notifier.clone(),
            self.payments.clone(),
        )
    }

    pub fn enrollment_service(&self) -> EnrollmentService {
        EnrollmentService::new(
            self.enrollments.clone(),
            self.students.clone(),
            self.classes.clone(),
            self.notifier.clone(),
        )
    }

    pub fn access_service(&self) -> AccessService {
        AccessService::new(
            self.enrollments.clone(),
            self.invoices.clone(),
            self.classes.clone(),
        )
    }

    pub fn generation_service(&self) -> GenerationService {
        GenerationService::new(
            self.enrollments.clone(),
            self.invoices.clone(),
            self.students.clone(),
            self.classes.clone(),
            self.generation_logs.clone(),
            self.invoice_service(),
        )
    }

    pub fn checkout_service(&self) -> CheckoutService {
        CheckoutService::new(
            self.students.clone(),
            self.parents.clone(),
            self.classes.clone(),
            self.enrollments.clone(),
            self.notifier.clone(),
            self.invoice_service(),
        )
    }

    pub fn reminder_service(&self, config: BillingConfig) -> ReminderService {
        ReminderService::new(
            self.invoices.clone(),
            self.students.clone(),
            self.parents.clone(),
            self.reminder_logs.clone(),
            self.notifier.clone(),
            config,
        )
    }

    pub async fn add_student(&self, name: &str, email: &str, country: Option<&str>) -> StudentRecord {
        let student = StudentRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            country: country.map(str::to_string),
            user_id: None,
            phone: None,
        };
        self.students.seed(student.clone()).await;
        student
    }

    pub async fn add_class(&self, name: &str, fee_usd: i64, fee_pkr: i64) -> ClassRecord {
        let class = ClassRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            fee_usd: Decimal::from(fee_usd),
            fee_pkr: Decimal::from(fee_pkr),
        };
        self.classes.seed(class.clone()).await;
        class
    }
}

/// A bare invoice row for seeding, draft by default.
pub fn invoice_fixture(
    student_id: Uuid,
    class_id: Option<Uuid>,
    number: &str,
    description: &str,
    status: InvoiceStatus,
    due_date: NaiveDate,
    created_at: DateTime<Utc>,
) -> Invoice {
    Invoice {
        id: Uuid::new_v4(),
        invoice_number: number.to_string(),
        student_id,
        parent_id: None,
        class_id,
        amount: Decimal::from(50),
        currency: Currency::Usd,
        status,
        due_date,
        generated_date: created_at,
        paid_date: None,
        payment_method: None,
        transaction_id: None,
        description: description.to_string(),
        original_price: None,
        discount_amount: None,
        payment_proof_url: None,
        notes: None,
        deleted_at: None,
        created_at,
        items: Vec::new(),
    }
}
