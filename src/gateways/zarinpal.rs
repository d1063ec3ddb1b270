use crate::gateways::{
    Environment, PaymentRequestBody, RequestOutcome, VerifyOutcome, VerifyRequestBody, ZarinpalApi,
};
use anyhow::Result;
use serde_json::json;

// One bounded attempt per call; a verify is never retried automatically.
pub struct ZarinpalClient {
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl ZarinpalClient {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            client: reqwest::Client::new(),
        }
    }

    async fn post_json(&self, url: String, body: &impl serde::Serialize) -> serde_json::Value {
        let resp = self
            .client
            .post(url)
            .json(body)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            // ZarinPal reports protocol errors in the body even on non-2xx,
            // so the body is parsed regardless of the HTTP status.
            Ok(r) => r.json().await.unwrap_or_default(),
            Err(e) if e.is_timeout() => json!({"errors": {"message": "gateway timeout"}}),
            Err(e) => json!({"errors": {"message": e.to_string()}}),
        }
    }
}

#[async_trait::async_trait]
impl ZarinpalApi for ZarinpalClient {
    async fn request_payment(&self, env: Environment, body: PaymentRequestBody) -> Result<RequestOutcome> {
        let url = format!("{}/pg/v4/payment/request.json", env.base_url());
        let raw = self.post_json(url, &body).await;

        Ok(RequestOutcome {
            authority: raw
                .pointer("/data/authority")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
            error_message: raw
                .pointer("/errors/message")
                .and_then(|v| v.as_str())
                .map(ToString::to_string),
            raw,
        })
    }

    async fn verify_payment(&self, env: Environment, body: VerifyRequestBody) -> Result<VerifyOutcome> {
        let url = format!("{}/pg/v4/payment/verify.json", env.base_url());
        let raw = self.post_json(url, &body).await;

        Ok(VerifyOutcome {
            code: raw.pointer("/data/code").and_then(|v| v.as_i64()),
            // ref_id arrives as a bare number for settled payments.
            ref_id: raw.pointer("/data/ref_id").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            raw,
        })
    }
}
