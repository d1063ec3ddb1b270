#![allow(dead_code)]

use anyhow::Result;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use zarinpal_gateway::gateways::mock::MockZarinpal;
use zarinpal_gateway::gateways::Environment;
use zarinpal_gateway::ledger::platform::{GatewayConfiguration, Payable, PaymentPlatform};
use zarinpal_gateway::repo::memory::MemoryStore;
use zarinpal_gateway::service::delivery::{ComponentRegistry, Deliverable, DeliveryDecision};
use zarinpal_gateway::service::payment_service::{InitiateRequest, PaymentService};

// Platform double: fixed payable, counting ledger and delivery.
pub struct StubPlatform {
    pub payable: Payable,
    pub surcharge_percent: f64,
    pub next_payment_id: AtomicI64,
    pub saved_payments: AtomicUsize,
    pub deliveries: AtomicUsize,
}

impl StubPlatform {
    pub fn new(amount: f64, currency: &str, account_id: i64) -> Self {
        Self {
            payable: Payable {
                amount,
                currency: currency.to_string(),
                account_id,
            },
            surcharge_percent: 0.0,
            next_payment_id: AtomicI64::new(900),
            saved_payments: AtomicUsize::new(0),
            deliveries: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl PaymentPlatform for StubPlatform {
    async fn gateway_configuration(
        &self,
        _component: &str,
        _payment_area: &str,
        _item_id: i64,
    ) -> Result<GatewayConfiguration> {
        Ok(GatewayConfiguration {
            merchant_id: "merchant-1".to_string(),
            environment: Environment::Sandbox,
        })
    }

    async fn payable(&self, _component: &str, _payment_area: &str, _item_id: i64) -> Result<Payable> {
        Ok(self.payable.clone())
    }

    fn surcharge_percent(&self) -> f64 {
        self.surcharge_percent
    }

    async fn save_payment(
        &self,
        _account_id: i64,
        _component: &str,
        _payment_area: &str,
        _item_id: i64,
        _user_id: i64,
        _amount: i64,
        _currency: &str,
    ) -> Result<i64> {
        self.saved_payments.fetch_add(1, Ordering::SeqCst);
        Ok(self.next_payment_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn deliver_order(
        &self,
        _component: &str,
        _payment_area: &str,
        _item_id: i64,
        _payment_id: i64,
        _user_id: i64,
    ) -> Result<()> {
        self.deliveries.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn success_url(&self, component: &str, payment_area: &str, item_id: i64) -> String {
        format!("https://shop.example/success/{component}/{payment_area}/{item_id}")
    }
}

// Delivery capability that always declines with a fixed reason.
pub struct Declining(pub String);

#[async_trait::async_trait]
impl Deliverable for Declining {
    async fn can_deliver(
        &self,
        _payment_area: &str,
        _item_id: i64,
        _transaction_id: i64,
        _user_id: i64,
    ) -> Result<DeliveryDecision> {
        Ok(DeliveryDecision::Declined(self.0.clone()))
    }
}

pub struct Fixture {
    pub service: PaymentService,
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<MockZarinpal>,
    pub platform: Arc<StubPlatform>,
}

pub fn fixture(gateway: MockZarinpal) -> Fixture {
    fixture_with_registry(gateway, ComponentRegistry::new())
}

pub fn fixture_with_payable(gateway: MockZarinpal, amount: f64, currency: &str) -> Fixture {
    build(gateway, ComponentRegistry::new(), StubPlatform::new(amount, currency, 1))
}

pub fn fixture_with_registry(gateway: MockZarinpal, registry: ComponentRegistry) -> Fixture {
    build(gateway, registry, StubPlatform::new(10000.0, "IRR", 1))
}

fn build(gateway: MockZarinpal, registry: ComponentRegistry, platform: StubPlatform) -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let gateway = Arc::new(gateway);
    let platform = Arc::new(platform);

    let service = PaymentService {
        store: store.clone(),
        gateway: gateway.clone(),
        platform: platform.clone(),
        registry,
        public_url: "https://shop.example".to_string(),
    };

    Fixture {
        service,
        store,
        gateway,
        platform,
    }
}

pub fn initiate_request() -> InitiateRequest {
    InitiateRequest {
        user_id: 7,
        component: "mod_x".to_string(),
        payment_area: "a".to_string(),
        item_id: 5,
        description: String::new(),
    }
}
