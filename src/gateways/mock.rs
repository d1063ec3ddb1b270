use crate::gateways::{
    Environment, PaymentRequestBody, RequestOutcome, VerifyOutcome, VerifyRequestBody, ZarinpalApi,
};
use anyhow::Result;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// Scripted gateway double; the optional barrier holds every in-flight verify
// at the wire boundary until all callers have arrived.
pub struct MockZarinpal {
    pub authority: Option<String>,
    pub request_error: Option<String>,
    pub verify_code: Option<i64>,
    pub verify_ref_id: Option<String>,
    pub verify_barrier: Option<Arc<tokio::sync::Barrier>>,
    pub request_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub last_request: Mutex<Option<PaymentRequestBody>>,
    pub last_verify: Mutex<Option<VerifyRequestBody>>,
}

impl MockZarinpal {
    pub fn approving(authority: &str) -> Self {
        Self {
            authority: Some(authority.to_string()),
            request_error: None,
            verify_code: None,
            verify_ref_id: None,
            verify_barrier: None,
            request_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            last_verify: Mutex::new(None),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            request_error: Some(message.to_string()),
            ..Self::approving("")
        }
        .without_authority()
    }

    fn without_authority(mut self) -> Self {
        self.authority = None;
        self
    }

    pub fn with_verify(mut self, code: i64, ref_id: Option<&str>) -> Self {
        self.verify_code = Some(code);
        self.verify_ref_id = ref_id.map(ToString::to_string);
        self
    }

    pub fn with_verify_barrier(mut self, barrier: Arc<tokio::sync::Barrier>) -> Self {
        self.verify_barrier = Some(barrier);
        self
    }
}

#[async_trait::async_trait]
impl ZarinpalApi for MockZarinpal {
    async fn request_payment(&self, _env: Environment, body: PaymentRequestBody) -> Result<RequestOutcome> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(body);

        Ok(match (&self.authority, &self.request_error) {
            (Some(authority), _) => RequestOutcome {
                authority: Some(authority.clone()),
                error_message: None,
                raw: json!({"data": {"authority": authority}}),
            },
            (None, message) => RequestOutcome {
                authority: None,
                error_message: message.clone(),
                raw: json!({"errors": {"message": message}}),
            },
        })
    }

    async fn verify_payment(&self, _env: Environment, body: VerifyRequestBody) -> Result<VerifyOutcome> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_verify.lock().unwrap() = Some(body);

        if let Some(barrier) = &self.verify_barrier {
            barrier.wait().await;
        }

        Ok(VerifyOutcome {
            code: self.verify_code,
            ref_id: self.verify_ref_id.clone(),
            raw: json!({"data": {"code": self.verify_code, "ref_id": self.verify_ref_id}}),
        })
    }
}
