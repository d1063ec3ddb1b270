use crate::gateways::Environment;
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct Payable {
    pub amount: f64,
    pub currency: String,
    pub account_id: i64,
}

#[derive(Debug, Clone)]
pub struct GatewayConfiguration {
    pub merchant_id: String,
    pub environment: Environment,
}

// Seam to the surrounding payment platform; the core never writes the ledger
// or deliveries directly.
#[async_trait::async_trait]
pub trait PaymentPlatform: Send + Sync {
    async fn gateway_configuration(
        &self,
        component: &str,
        payment_area: &str,
        item_id: i64,
    ) -> Result<GatewayConfiguration>;

    async fn payable(&self, component: &str, payment_area: &str, item_id: i64) -> Result<Payable>;

    fn surcharge_percent(&self) -> f64;

    #[allow(clippy::too_many_arguments)]
    async fn save_payment(
        &self,
        account_id: i64,
        component: &str,
        payment_area: &str,
        item_id: i64,
        user_id: i64,
        amount: i64,
        currency: &str,
    ) -> Result<i64>;

    async fn deliver_order(
        &self,
        component: &str,
        payment_area: &str,
        item_id: i64,
        payment_id: i64,
        user_id: i64,
    ) -> Result<()>;

    fn success_url(&self, component: &str, payment_area: &str, item_id: i64) -> String;
}

// IRR has no minor unit, so the surcharged cost rounds to whole Rials.
pub fn rounded_cost(amount: f64, surcharge_percent: f64) -> i64 {
    (amount * (100.0 + surcharge_percent) / 100.0).round() as i64
}
