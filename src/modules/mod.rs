pub mod access_control;
pub mod checkout;
pub mod directory;
pub mod enrollments;
pub mod invoice_generation;
pub mod invoices;
pub mod notifications;
pub mod payments;
pub mod reminders;
