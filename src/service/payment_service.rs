use crate::domain::outcome::{
    payment_failed_message, PaymentResponse, ERROR_UNKNOWN, PAYMENT_ALREADY_PROCESSED,
    PAYMENT_NOT_FOUND, PAYMENT_SUCCESSFUL, UNSUPPORTED_CURRENCY,
};
use crate::domain::transaction::{NewTransaction, Transaction, TransactionStatus};
use crate::gateways::{
    PaymentRequestBody, VerifyRequestBody, ZarinpalApi, CALLBACK_STATUS_OK, SUPPORTED_CURRENCY,
    VERIFY_OK_CODE,
};
use crate::ledger::platform::{rounded_cost, GatewayConfiguration, PaymentPlatform};
use crate::repo::transactions_repo::TransactionStore;
use crate::service::delivery::{ComponentRegistry, DeliveryDecision};
use anyhow::Result;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct InitiateRequest {
    pub user_id: i64,
    pub component: String,
    pub payment_area: String,
    pub item_id: i64,
    pub description: String,
}

#[derive(Clone)]
pub struct PaymentService {
    pub store: Arc<dyn TransactionStore>,
    pub gateway: Arc<dyn ZarinpalApi>,
    pub platform: Arc<dyn PaymentPlatform>,
    pub registry: ComponentRegistry,
    // Externally reachable base, used to build the gateway callback URL.
    pub public_url: String,
}

impl PaymentService {
    pub async fn initiate(&self, req: InitiateRequest) -> Result<PaymentResponse> {
        let config = self
            .platform
            .gateway_configuration(&req.component, &req.payment_area, req.item_id)
            .await?;
        let payable = self
            .platform
            .payable(&req.component, &req.payment_area, req.item_id)
            .await?;

        if payable.currency != SUPPORTED_CURRENCY {
            return Ok(PaymentResponse::declined(UNSUPPORTED_CURRENCY));
        }

        let amount = rounded_cost(payable.amount, self.platform.surcharge_percent());

        self.request_payment(
            &config,
            payable.account_id,
            amount,
            &payable.currency,
            &req,
        )
        .await
    }

    async fn request_payment(
        &self,
        config: &GatewayConfiguration,
        account_id: i64,
        amount: i64,
        currency: &str,
        req: &InitiateRequest,
    ) -> Result<PaymentResponse> {
        // The row exists before the gateway call so a local reference
        // survives a failure mid-flight.
        let id = self
            .store
            .create_pending(NewTransaction {
                component: req.component.clone(),
                payment_area: req.payment_area.clone(),
                item_id: req.item_id,
                user_id: req.user_id,
                account_id,
                merchant_id: config.merchant_id.clone(),
                amount,
                currency: currency.to_string(),
            })
            .await?;

        let body = PaymentRequestBody {
            merchant_id: config.merchant_id.clone(),
            amount,
            // The local id rides along so the callback can be correlated even
            // before the caller learns the authority.
            callback_url: format!("{}/payments/process?id={}", self.public_url, id),
            description: if req.description.is_empty() {
                req.component.clone()
            } else {
                req.description.clone()
            },
        };

        let outcome = self.gateway.request_payment(config.environment, body).await?;

        match outcome.authority {
            Some(authority) => {
                self.store.set_authority(id, &authority).await?;
                tracing::info!(transaction_id = id, %authority, "payment initiated");

                Ok(PaymentResponse::approved(
                    self.gateway.start_pay_url(config.environment, &authority),
                    "",
                ))
            }
            None => {
                self.store.mark_error(id, None, outcome.raw).await?;
                tracing::warn!(transaction_id = id, "payment request rejected by gateway");

                Ok(PaymentResponse::declined(
                    outcome.error_message.as_deref().unwrap_or(ERROR_UNKNOWN),
                ))
            }
        }
    }

    pub async fn verify(&self, authority: &str, status: &str) -> Result<PaymentResponse> {
        let Some(tx) = self.store.find_by_authority(authority).await? else {
            return Ok(PaymentResponse::declined(PAYMENT_NOT_FOUND));
        };

        // Terminal rows are absorbing; a duplicate callback gets an answer
        // without touching the gateway again.
        if tx.status != TransactionStatus::Pending {
            return Ok(PaymentResponse::declined(PAYMENT_ALREADY_PROCESSED));
        }

        // The gateway already reported this attempt as failed or cancelled,
        // so spending a verify call on it would be wasted.
        if status != CALLBACK_STATUS_OK {
            self.store
                .mark_error(tx.id, None, json!({ "status": status }))
                .await?;

            return Ok(PaymentResponse::declined(&payment_failed_message(tx.id)));
        }

        // Ask the owning component whether the order is still deliverable
        // before the single verify attempt is spent. A decline is external
        // and possibly transient, so the row stays PENDING.
        if let Some(capability) = self.registry.deliverable(&tx.component) {
            let decision = capability
                .can_deliver(&tx.payment_area, tx.item_id, tx.id, tx.user_id)
                .await?;
            if let DeliveryDecision::Declined(message) = decision {
                return Ok(PaymentResponse::declined(&message));
            }
        }

        let config = self
            .platform
            .gateway_configuration(&tx.component, &tx.payment_area, tx.item_id)
            .await?;
        let outcome = self
            .gateway
            .verify_payment(
                config.environment,
                VerifyRequestBody {
                    merchant_id: config.merchant_id.clone(),
                    amount: tx.amount,
                    authority: authority.to_string(),
                },
            )
            .await?;

        let verified = outcome.is_verified();
        let diagnostic = json!({ "status": status, "verify_result": outcome.raw });

        if !verified {
            self.store
                .mark_error(tx.id, Some(outcome.code.unwrap_or(0) as i32), diagnostic)
                .await?;
            tracing::warn!(transaction_id = tx.id, code = outcome.code, "payment verification failed");

            return Ok(PaymentResponse::declined(&payment_failed_message(tx.id)));
        }

        let ref_id = outcome.ref_id.clone().unwrap_or_default();

        // Claim the row before any side effect. Losing the claim means a
        // concurrent duplicate callback already finalized this attempt, and
        // ledger save and delivery must not happen a second time.
        let claimed = self
            .store
            .mark_completed(tx.id, VERIFY_OK_CODE as i32, &ref_id, diagnostic)
            .await?;
        if !claimed {
            return Ok(PaymentResponse::declined(PAYMENT_ALREADY_PROCESSED));
        }

        let payment_id = self
            .platform
            .save_payment(
                tx.account_id,
                &tx.component,
                &tx.payment_area,
                tx.item_id,
                tx.user_id,
                tx.amount,
                &tx.currency,
            )
            .await?;
        self.store.set_payment_id(tx.id, payment_id).await?;

        self.platform
            .deliver_order(&tx.component, &tx.payment_area, tx.item_id, payment_id, tx.user_id)
            .await?;

        tracing::info!(transaction_id = tx.id, payment_id, %ref_id, "payment completed");

        Ok(PaymentResponse::approved(
            self.platform
                .success_url(&tx.component, &tx.payment_area, tx.item_id),
            PAYMENT_SUCCESSFUL,
        ))
    }

    pub async fn transaction_by_authority(&self, authority: &str) -> Result<Option<Transaction>> {
        self.store.find_by_authority(authority).await
    }
}
