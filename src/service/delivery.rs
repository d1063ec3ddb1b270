use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryDecision {
    Eligible,
    /// Component-supplied reason (stock ran out, enrolment closed, ...).
    Declined(String),
}

// Asked before a verify call is spent on an order that can no longer be
// delivered.
#[async_trait::async_trait]
pub trait Deliverable: Send + Sync {
    async fn can_deliver(
        &self,
        payment_area: &str,
        item_id: i64,
        transaction_id: i64,
        user_id: i64,
    ) -> Result<DeliveryDecision>;
}

// A component without an entry is always eligible.
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    capabilities: HashMap<String, Arc<dyn Deliverable>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, component: &str, capability: Arc<dyn Deliverable>) {
        self.capabilities.insert(component.to_string(), capability);
    }

    pub fn deliverable(&self, component: &str) -> Option<&Arc<dyn Deliverable>> {
        self.capabilities.get(component)
    }
}
