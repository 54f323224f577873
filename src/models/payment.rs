//! Payment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::helpers::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Cash,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Refunded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i64,
    pub reservation_id: i64,
    pub amount: f64,
    pub method: String,
    pub status: String,
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    #[validate(range(min = 0.01, max = 10000000.0))]
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: Option<PaymentStatus>,
    #[validate(length(max = 255))]
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
}

/// Money owed versus money received for one reservation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub total_amount: f64,
    pub total_paid: f64,
    pub refunded: f64,
    pub balance_due: f64,
}

impl PaymentSummary {
    pub fn from_payments(total_amount: f64, payments: &[Payment]) -> Self {
        let sum_with = |status: PaymentStatus| -> f64 {
            payments
                .iter()
                .filter(|p| p.status == status.as_str())
                .map(|p| p.amount)
                .sum()
        };

        let total_paid = round_to(sum_with(PaymentStatus::Completed), 2);
        let refunded = round_to(sum_with(PaymentStatus::Refunded), 2);
        let balance_due = round_to((total_amount - total_paid).max(0.0), 2);

        Self {
            total_amount,
            total_paid,
            refunded,
            balance_due,
        }
    }
}
