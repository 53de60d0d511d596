//! Invoice lifecycle: creation defaults, the mark-paid re-stamp quirk,
//! refund guards, and payment-proof attachment.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Days, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use bursar_models::invoices::{
    CreateInvoiceDto, InvoiceStatus, MarkPaidDto, RefundDto,
};

use common::{TestEnv, invoice_fixture};

fn create_dto(student_id: Uuid) -> CreateInvoiceDto {
    CreateInvoiceDto {
        student_id,
        parent_id: None,
        class_id: None,
        invoice_number: None,
        amount: Decimal::from(80),
        currency: None,
        due_date: None,
        description: "Lab fee".to_string(),
        items: vec![],
    }
}

fn mark_paid_dto(txn: &str) -> MarkPaidDto {
    MarkPaidDto {
        payment_method: "bank_transfer".to_string(),
        transaction_id: txn.to_string(),
    }
}

#[tokio::test]
async fn test_create_allocates_number_and_defaults() {
    let env = TestEnv::new();
    let student = env.add_student("Omar Riaz", "omar@example.com", None).await;
    let service = env.invoice_service();

    let invoice = service.create(create_dto(student.id)).await.unwrap();

    assert_eq!(invoice.status, InvoiceStatus::Draft);
    assert!(invoice.invoice_number.starts_with(&format!("INV-{}-", Utc::now().year())));
    // Manual invoices follow the 30-day checkout due rule.
    assert_eq!(
        invoice.due_date,
        Utc::now().date_naive().checked_add_days(Days::new(30)).unwrap()
    );
    // Header-only requests get a synthesized line item.
    assert_eq!(invoice.items.len(), 1);
    assert_eq!(invoice.items[0].amount, Decimal::from(80));
    assert_eq!(env.notifier.invoice_count.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_create_fails_for_unknown_student() {
    let env = TestEnv::new();
    let service = env.invoice_service();

    let err = service.create(create_dto(Uuid::new_v4())).await.unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert!(env.invoices.all().await.is_empty());
}

#[tokio::test]
async fn test_create_survives_notification_failure() {
    let env = TestEnv::new();
    let student = env.add_student("Omar Riaz", "omar@example.com", None).await;
    env.notifier.fail_all(true);

    let invoice = env.invoice_service().create(create_dto(student.id)).await.unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Draft);
}

#[tokio::test]
async fn test_mark_paid_twice_restamps() {
    let env = TestEnv::new();
    let student = env.add_student("Omar Riaz", "omar@example.com", None).await;
    let service = env.invoice_service();

    let invoice = service.create(create_dto(student.id)).await.unwrap();

    let first = service
        .mark_as_paid(invoice.id, mark_paid_dto("txn_first"))
        .await
        .unwrap();
    assert_eq!(first.status, InvoiceStatus::Paid);
    assert_eq!(first.transaction_id.as_deref(), Some("txn_first"));

    // Re-marking succeeds and re-stamps: existence is the only guard.
    let second = service
        .mark_as_paid(invoice.id, mark_paid_dto("txn_second"))
        .await
        .unwrap();
    assert_eq!(second.status, InvoiceStatus::Paid);
    assert_eq!(second.transaction_id.as_deref(), Some("txn_second"));
    assert!(second.paid_date.unwrap() >= first.paid_date.unwrap());
}

#[tokio::test]
async fn test_refund_writes_negative_transaction_and_flips_status() {
    let env = TestEnv::new();
    let student = env.add_student("Omar Riaz", "omar@example.com", None).await;
    let service = env.invoice_service();

    let invoice = service.create(create_dto(student.id)).await.unwrap();
    service
        .mark_as_paid(invoice.id, mark_paid_dto("txn_orig"))
        .await
        .unwrap();

    let refunded = service
        .refund(
            invoice.id,
            RefundDto {
                amount: Some(Decimal::from(20)),
                reason: "partial withdrawal".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(refunded.status, InvoiceStatus::Refunded);
    assert!(refunded.notes.as_deref().unwrap().contains("partial withdrawal"));

    let transactions = env.payments.all().await;
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].amount, Decimal::from(-20));
    assert_eq!(
        transactions[0].reference_transaction_id.as_deref(),
        Some("txn_orig")
    );
}

#[tokio::test]
async fn test_refund_rejects_unpaid_invoice_without_writing_transaction() {
    let env = TestEnv::new();
    let student = env.add_student("Omar Riaz", "omar@example.com", None).await;
    let service = env.invoice_service();

    let invoice = service.create(create_dto(student.id)).await.unwrap();

    let err = service
        .refund(
            invoice.id,
            RefundDto {
                amount: None,
                reason: "changed mind".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        err.fields.unwrap().get("invoice"),
        Some(&"refund_requires_paid_invoice")
    );
    assert!(env.payments.all().await.is_empty());
}

#[tokio::test]
async fn test_refund_requires_stored_transaction_id() {
    let env = TestEnv::new();
    let student = env.add_student("Omar Riaz", "omar@example.com", None).await;
    let service = env.invoice_service();

    // Paid but with no transaction on record.
    let mut seeded = invoice_fixture(
        student.id,
        None,
        "INV-2024-0001",
        "Legacy tuition",
        InvoiceStatus::Paid,
        Utc::now().date_naive(),
        Utc::now(),
    );
    seeded.paid_date = Some(Utc::now());
    env.invoices.seed(seeded.clone()).await;

    let err = service
        .refund(
            seeded.id,
            RefundDto {
                amount: None,
                reason: "no gateway record".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        err.fields.unwrap().get("invoice"),
        Some(&"missing_transaction_id")
    );
    assert!(env.payments.all().await.is_empty());
}

#[tokio::test]
async fn test_attach_proof_picks_most_recent_unpaid_invoice() {
    let env = TestEnv::new();
    let student = env.add_student("Omar Riaz", "omar@example.com", None).await;
    let service = env.invoice_service();

    let older = Utc::now() - Duration::hours(2);
    let newer = Utc::now() - Duration::hours(1);
    let due = Utc::now().date_naive();

    let first = invoice_fixture(
        student.id, None, "INV-2024-0010", "March fee", InvoiceStatus::Sent, due, older,
    );
    let second = invoice_fixture(
        student.id, None, "INV-2024-0011", "April fee", InvoiceStatus::Draft, due, newer,
    );
    let mut paid = invoice_fixture(
        student.id, None, "INV-2024-0012", "May fee", InvoiceStatus::Paid, due, Utc::now(),
    );
    paid.paid_date = Some(Utc::now());

    env.invoices.seed(first.clone()).await;
    env.invoices.seed(second.clone()).await;
    env.invoices.seed(paid).await;

    let attached = service
        .attach_proof_to_latest_unpaid(student.id, "https://cdn.example.com/proof.png")
        .await
        .unwrap()
        .expect("an unpaid invoice exists");

    assert_eq!(attached.id, second.id);
    assert_eq!(
        attached.payment_proof_url.as_deref(),
        Some("https://cdn.example.com/proof.png")
    );
}

#[tokio::test]
async fn test_attach_proof_is_noop_without_unpaid_invoices() {
    let env = TestEnv::new();
    let student = env.add_student("Omar Riaz", "omar@example.com", None).await;

    let attached = env
        .invoice_service()
        .attach_proof_to_latest_unpaid(student.id, "https://cdn.example.com/proof.png")
        .await
        .unwrap();

    assert!(attached.is_none());
}
