use crate::domain::transaction::{NewTransaction, Transaction, TransactionStatus};
use anyhow::{anyhow, Result};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

// mark_error/mark_completed only apply while the row is still PENDING and
// report whether this caller won the transition.
#[async_trait::async_trait]
pub trait TransactionStore: Send + Sync {
    async fn create_pending(&self, new: NewTransaction) -> Result<i64>;

    async fn set_authority(&self, id: i64, authority: &str) -> Result<()>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Transaction>>;

    async fn find_by_authority(&self, authority: &str) -> Result<Option<Transaction>>;

    async fn mark_error(&self, id: i64, code: Option<i32>, data: serde_json::Value) -> Result<bool>;

    async fn mark_completed(&self, id: i64, code: i32, ref_id: &str, data: serde_json::Value) -> Result<bool>;

    async fn set_payment_id(&self, id: i64, payment_id: i64) -> Result<()>;
}

#[derive(Clone)]
pub struct TransactionsRepo {
    pub pool: PgPool,
}

#[async_trait::async_trait]
impl TransactionStore for TransactionsRepo {
    async fn create_pending(&self, new: NewTransaction) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions (
                component, payment_area, item_id, user_id, account_id,
                merchant_id, amount, currency, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(new.component)
        .bind(new.payment_area)
        .bind(new.item_id)
        .bind(new.user_id)
        .bind(new.account_id)
        .bind(new.merchant_id)
        .bind(new.amount)
        .bind(new.currency)
        .bind(TransactionStatus::Pending.code())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    async fn set_authority(&self, id: i64, authority: &str) -> Result<()> {
        sqlx::query("UPDATE transactions SET authority = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(authority)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let row = sqlx::query("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(to_transaction).transpose()
    }

    async fn find_by_authority(&self, authority: &str) -> Result<Option<Transaction>> {
        let row = sqlx::query("SELECT * FROM transactions WHERE authority = $1")
            .bind(authority)
            .fetch_optional(&self.pool)
            .await?;

        row.map(to_transaction).transpose()
    }

    async fn mark_error(&self, id: i64, code: Option<i32>, data: serde_json::Value) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = $2, code = COALESCE($3, code), data = $4, updated_at = now()
            WHERE id = $1 AND status = $5
            "#,
        )
        .bind(id)
        .bind(TransactionStatus::Error.code())
        .bind(code)
        .bind(data)
        .bind(TransactionStatus::Pending.code())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_completed(&self, id: i64, code: i32, ref_id: &str, data: serde_json::Value) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = $2, code = $3, ref_id = $4, data = $5, updated_at = now()
            WHERE id = $1 AND status = $6
            "#,
        )
        .bind(id)
        .bind(TransactionStatus::Completed.code())
        .bind(code)
        .bind(ref_id)
        .bind(data)
        .bind(TransactionStatus::Pending.code())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_payment_id(&self, id: i64, payment_id: i64) -> Result<()> {
        sqlx::query("UPDATE transactions SET payment_id = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(payment_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn to_transaction(row: PgRow) -> Result<Transaction> {
    let status_code: i16 = row.get("status");
    let status = TransactionStatus::from_code(status_code)
        .ok_or_else(|| anyhow!("transaction row carries unknown status code {status_code}"))?;

    Ok(Transaction {
        id: row.get("id"),
        authority: row.get("authority"),
        component: row.get("component"),
        payment_area: row.get("payment_area"),
        item_id: row.get("item_id"),
        user_id: row.get("user_id"),
        account_id: row.get("account_id"),
        merchant_id: row.get("merchant_id"),
        amount: row.get("amount"),
        currency: row.get("currency"),
        status,
        code: row.get("code"),
        ref_id: row.get("ref_id"),
        payment_id: row.get("payment_id"),
        data: row.get("data"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
