use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod mock;
pub mod zarinpal;

/// Verify response code ZarinPal uses for a confirmed payment.
pub const VERIFY_OK_CODE: i64 = 100;

/// Status query parameter the gateway sends back on a successful redirect.
pub const CALLBACK_STATUS_OK: &str = "OK";

/// The only currency ZarinPal settles.
pub const SUPPORTED_CURRENCY: &str = "IRR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Sandbox => "https://sandbox.zarinpal.com",
            Environment::Production => "https://payment.zarinpal.com",
        }
    }

    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("sandbox") {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequestBody {
    pub merchant_id: String,
    pub amount: i64,
    pub callback_url: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequestBody {
    pub merchant_id: String,
    pub amount: i64,
    pub authority: String,
}

// `raw` keeps the full body for diagnostic storage on the transaction row.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub authority: Option<String>,
    pub error_message: Option<String>,
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    pub code: Option<i64>,
    pub ref_id: Option<String>,
    pub raw: serde_json::Value,
}

impl VerifyOutcome {
    pub fn is_verified(&self) -> bool {
        self.code == Some(VERIFY_OK_CODE)
    }
}

#[async_trait::async_trait]
pub trait ZarinpalApi: Send + Sync {
    async fn request_payment(&self, env: Environment, body: PaymentRequestBody) -> Result<RequestOutcome>;

    async fn verify_payment(&self, env: Environment, body: VerifyRequestBody) -> Result<VerifyOutcome>;

    fn start_pay_url(&self, env: Environment, authority: &str) -> String {
        format!("{}/pg/StartPay/{}", env.base_url(), authority)
    }
}
