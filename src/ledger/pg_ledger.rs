use crate::gateways::Environment;
use crate::ledger::platform::{GatewayConfiguration, Payable, PaymentPlatform};
use anyhow::{anyhow, Result};
use sqlx::{PgPool, Row};

// Gateway configuration is deployment-wide here; a payable row must exist for
// every sellable (component, payment_area, item_id) triple.
#[derive(Clone)]
pub struct PgLedger {
    pub pool: PgPool,
    pub merchant_id: String,
    pub environment: Environment,
    pub surcharge_percent: f64,
    pub success_url_base: String,
}

#[async_trait::async_trait]
impl PaymentPlatform for PgLedger {
    async fn gateway_configuration(
        &self,
        _component: &str,
        _payment_area: &str,
        _item_id: i64,
    ) -> Result<GatewayConfiguration> {
        if self.merchant_id.is_empty() {
            return Err(anyhow!("zarinpal merchant id is not configured"));
        }

        Ok(GatewayConfiguration {
            merchant_id: self.merchant_id.clone(),
            environment: self.environment,
        })
    }

    async fn payable(&self, component: &str, payment_area: &str, item_id: i64) -> Result<Payable> {
        let row = sqlx::query(
            "SELECT amount, currency, account_id FROM payables WHERE component = $1 AND payment_area = $2 AND item_id = $3",
        )
        .bind(component)
        .bind(payment_area)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| anyhow!("no payable registered for {component}/{payment_area}/{item_id}"))?;

        Ok(Payable {
            amount: row.get("amount"),
            currency: row.get("currency"),
            account_id: row.get("account_id"),
        })
    }

    fn surcharge_percent(&self) -> f64 {
        self.surcharge_percent
    }

    async fn save_payment(
        &self,
        account_id: i64,
        component: &str,
        payment_area: &str,
        item_id: i64,
        user_id: i64,
        amount: i64,
        currency: &str,
    ) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO payments (account_id, component, payment_area, item_id, user_id, amount, currency)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(account_id)
        .bind(component)
        .bind(payment_area)
        .bind(item_id)
        .bind(user_id)
        .bind(amount)
        .bind(currency)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    async fn deliver_order(
        &self,
        component: &str,
        payment_area: &str,
        item_id: i64,
        payment_id: i64,
        user_id: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO deliveries (payment_id, component, payment_area, item_id, user_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(payment_id)
        .bind(component)
        .bind(payment_area)
        .bind(item_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        tracing::info!(payment_id, component, item_id, user_id, "order delivered");
        Ok(())
    }

    fn success_url(&self, component: &str, payment_area: &str, item_id: i64) -> String {
        format!(
            "{}/payment/success/{}/{}/{}",
            self.success_url_base, component, payment_area, item_id
        )
    }
}
