//! Status of invoices.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Issued but not sent to the customer.
    Draft,
    /// Sent and not yet due.
    Sent,
    /// Due date passed without payment.
    Overdue,
    /// Paid by the customer.
    Paid,
    /// Cancelled; terminal.
    Cancelled,
}

/// Dates that drive the invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceDates {
    /// Date the invoice was sent.
    pub date_sent: Option<NaiveDate>,
    /// Date the invoice was paid.
    pub date_paid: Option<NaiveDate>,
    /// Date the invoice was cancelled.
    pub date_cancelled: Option<NaiveDate>,
    /// Payment due date.
    pub due_date: NaiveDate,
}

impl InvoiceStatus {
    /// Derives the status as of `today`.
    ///
    /// Cancellation wins over payment, payment over due date; an unpaid
    /// invoice past its due date is overdue whether it was sent or not.
    #[must_use]
    pub fn derive(dates: &InvoiceDates, today: NaiveDate) -> Self {
        if dates.date_cancelled.is_some() {
            Self::Cancelled
        } else if dates.date_paid.is_some() {
            Self::Paid
        } else if dates.due_date < today {
            Self::Overdue
        } else if dates.date_sent.is_some() {
            Self::Sent
        } else {
            Self::Draft
        }
    }
}
