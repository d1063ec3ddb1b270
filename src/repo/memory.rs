use crate::domain::transaction::{NewTransaction, Transaction, TransactionStatus};
use crate::repo::transactions_repo::TransactionStore;
use anyhow::Result;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

// Same conditional-transition semantics as the Postgres repo.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: HashMap<i64, Transaction>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl TransactionStore for MemoryStore {
    async fn create_pending(&self, new: NewTransaction) -> Result<i64> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        let now = Utc::now();

        inner.rows.insert(
            id,
            Transaction {
                id,
                authority: None,
                component: new.component,
                payment_area: new.payment_area,
                item_id: new.item_id,
                user_id: new.user_id,
                account_id: new.account_id,
                merchant_id: new.merchant_id,
                amount: new.amount,
                currency: new.currency,
                status: TransactionStatus::Pending,
                code: None,
                ref_id: None,
                payment_id: None,
                data: None,
                created_at: now,
                updated_at: now,
            },
        );

        Ok(id)
    }

    async fn set_authority(&self, id: i64, authority: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(row) = inner.rows.get_mut(&id) {
            row.authority = Some(authority.to_string());
            row.updated_at = Utc::now();
        }

        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        Ok(self.inner.lock().unwrap().rows.get(&id).cloned())
    }

    async fn find_by_authority(&self, authority: &str) -> Result<Option<Transaction>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .rows
            .values()
            .find(|row| row.authority.as_deref() == Some(authority))
            .cloned())
    }

    async fn mark_error(&self, id: i64, code: Option<i32>, data: serde_json::Value) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(false);
        };
        if row.status != TransactionStatus::Pending {
            return Ok(false);
        }

        row.status = TransactionStatus::Error;
        if code.is_some() {
            row.code = code;
        }
        row.data = Some(data);
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn mark_completed(&self, id: i64, code: i32, ref_id: &str, data: serde_json::Value) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(false);
        };
        if row.status != TransactionStatus::Pending {
            return Ok(false);
        }

        row.status = TransactionStatus::Completed;
        row.code = Some(code);
        row.ref_id = Some(ref_id.to_string());
        row.data = Some(data);
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn set_payment_id(&self, id: i64, payment_id: i64) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(row) = inner.rows.get_mut(&id) {
            row.payment_id = Some(payment_id);
            row.updated_at = Utc::now();
        }

        Ok(())
    }
}
