use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Pending is initial; Error and Completed are terminal and never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Error,
    Completed,
}

impl TransactionStatus {
    pub fn code(self) -> i16 {
        match self {
            TransactionStatus::Pending => 10,
            TransactionStatus::Error => 20,
            TransactionStatus::Completed => 80,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            10 => Some(TransactionStatus::Pending),
            20 => Some(TransactionStatus::Error),
            80 => Some(TransactionStatus::Completed),
            _ => None,
        }
    }
}

// `authority` is unique once assigned and the only externally shown handle;
// `payment_id` is present exactly when the attempt completed.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub authority: Option<String>,
    pub component: String,
    pub payment_area: String,
    pub item_id: i64,
    pub user_id: i64,
    pub account_id: i64,
    pub merchant_id: String,
    pub amount: i64,
    pub currency: String,
    pub status: TransactionStatus,
    pub code: Option<i32>,
    pub ref_id: Option<String>,
    pub payment_id: Option<i64>,
    pub data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub component: String,
    pub payment_area: String,
    pub item_id: i64,
    pub user_id: i64,
    pub account_id: i64,
    pub merchant_id: String,
    pub amount: i64,
    pub currency: String,
}
