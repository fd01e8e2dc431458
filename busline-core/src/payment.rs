use async_trait::async_trait;
use busline_shared::Masked;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Upi,
    Qr,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::Qr => "qr",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// A charge the booking flow asks the gateway to collect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: i32,
    pub currency: String,
    pub method: PaymentMethod,
    pub upi_id: Option<Masked<String>>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl PaymentIntent {
    pub fn new(id: String, amount: i32, currency: &str, method: PaymentMethod, upi_id: Option<String>) -> Self {
        Self {
            id,
            amount,
            currency: currency.to_string(),
            method,
            upi_id: upi_id.map(Masked),
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait PaymentAdapter: Send + Sync {
    /// Collect the payment and report its final status
    async fn process_payment(
        &self,
        payment: &PaymentIntent,
    ) -> Result<PaymentStatus, Box<dyn std::error::Error + Send + Sync>>;
}
