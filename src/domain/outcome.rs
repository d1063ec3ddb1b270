use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub success: bool,
    pub url: String,
    pub message: String,
}

impl PaymentResponse {
    pub fn approved(url: String, message: &str) -> Self {
        Self {
            success: true,
            url,
            message: message.to_string(),
        }
    }

    pub fn declined(message: &str) -> Self {
        Self {
            success: false,
            url: String::new(),
            message: message.to_string(),
        }
    }
}

pub const ERROR_UNKNOWN: &str = "Unknown error";
pub const UNSUPPORTED_CURRENCY: &str = "ZarinPal only supports payments in IRR.";
pub const PAYMENT_NOT_FOUND: &str = "Payment information not found.";
pub const PAYMENT_SUCCESSFUL: &str = "Your payment was successfully completed.";
pub const PAYMENT_ALREADY_PROCESSED: &str = "This payment has already been processed.";

pub fn payment_failed_message(transaction_id: i64) -> String {
    format!("Payment failed. Tracking code: {transaction_id}")
}
