pub mod config;
pub mod domain {
    pub mod outcome;
    pub mod transaction;
}
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod callback;
        pub mod payments;
    }
}
pub mod ledger {
    pub mod pg_ledger;
    pub mod platform;
}
pub mod repo {
    pub mod memory;
    pub mod transactions_repo;
}
pub mod service {
    pub mod delivery;
    pub mod payment_service;
}

#[derive(Clone)]
pub struct AppState {
    pub payment_service: service::payment_service::PaymentService,
}
