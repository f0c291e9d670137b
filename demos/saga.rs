//! # Example: saga
//!
//! Order/credit saga driven entirely by events submitted from inside handlers.
//!
//! Shows how to:
//! - Write kind-matching equality so one subscription covers every payload of a kind.
//! - Submit follow-up events from a handler through its `source`.
//! - Wait until the whole chain of nested submissions has drained.
//!
//! ## Flow
//! ```text
//! create_order(customer, amount)
//!     └─► OrderCreated ──► CustomerService (reserve credit)
//!                            ├─► CreditReserved       ──► OrderService ──► checkout(ok)
//!                            └─► CreditLimitExceeded  ──► OrderService ──► checkout(rejected)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example saga
//! ```

use std::collections::HashMap;
use std::mem::discriminant;
use std::sync::Arc;
use std::time::Duration;

use eventsourcing::{EventSourcing, MemoryJournal, SyncFn};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Clone)]
enum Shop {
    #[default]
    Generic,
    OrderCreated(Option<(String, u64)>),
    CreditReserved(Option<String>),
    CreditLimitExceeded(Option<String>),
}

impl Shop {
    fn has_payload(&self) -> bool {
        match self {
            Shop::Generic => false,
            Shop::OrderCreated(p) => p.is_some(),
            Shop::CreditReserved(p) | Shop::CreditLimitExceeded(p) => p.is_some(),
        }
    }
}

/// Same kind and, when both sides carry a payload, same payload.
impl PartialEq for Shop {
    fn eq(&self, other: &Self) -> bool {
        if discriminant(self) != discriminant(other) {
            return false;
        }
        if !self.has_payload() || !other.has_payload() {
            return true;
        }
        match (self, other) {
            (Shop::OrderCreated(a), Shop::OrderCreated(b)) => a == b,
            (Shop::CreditReserved(a), Shop::CreditReserved(b)) => a == b,
            (Shop::CreditLimitExceeded(a), Shop::CreditLimitExceeded(b)) => a == b,
            _ => true,
        }
    }
}

struct CustomerService {
    credit: Mutex<HashMap<String, u64>>,
}

impl CustomerService {
    fn attach(es: &EventSourcing<Shop>, credit: HashMap<String, u64>) -> Arc<Self> {
        let svc = Arc::new(Self {
            credit: Mutex::new(credit),
        });
        let this = Arc::clone(&svc);
        es.subscribe_to(
            SyncFn::arc(
                "customer-service",
                move |src: &EventSourcing<Shop>, ev: &Shop| -> anyhow::Result<()> {
                    let Shop::OrderCreated(Some((customer, amount))) = ev else {
                        return Ok(());
                    };
                    let reserved = {
                        let mut credit = this.credit.lock();
                        match credit.get_mut(customer) {
                            Some(left) if *left >= *amount => {
                                *left -= amount;
                                true
                            }
                            _ => false,
                        }
                    };
                    let next = if reserved {
                        Shop::CreditReserved(Some(customer.clone()))
                    } else {
                        Shop::CreditLimitExceeded(Some(customer.clone()))
                    };
                    src.add_event(next)?;
                    Ok(())
                },
            ),
            Shop::OrderCreated(None),
        );
        svc
    }

    fn credit(&self, customer: &str) -> u64 {
        self.credit.lock().get(customer).copied().unwrap_or(0)
    }
}

/// Must not capture an `EventSourcing` clone; see `EventSourcing` docs on ownership.
struct OrderService {
    checkouts: Mutex<Vec<(String, bool)>>,
}

impl OrderService {
    fn attach(es: &EventSourcing<Shop>) -> Arc<Self> {
        let svc = Arc::new(Self {
            checkouts: Mutex::new(Vec::new()),
        });
        for filter in [Shop::CreditReserved(None), Shop::CreditLimitExceeded(None)] {
            let this = Arc::clone(&svc);
            es.subscribe_to(
                SyncFn::arc(
                    "order-service",
                    move |_src: &EventSourcing<Shop>, ev: &Shop| -> anyhow::Result<()> {
                        match ev {
                            Shop::CreditReserved(Some(c)) => {
                                this.checkouts.lock().push((c.clone(), true))
                            }
                            Shop::CreditLimitExceeded(Some(c)) => {
                                this.checkouts.lock().push((c.clone(), false))
                            }
                            _ => {}
                        }
                        Ok(())
                    },
                ),
                filter,
            );
        }
        svc
    }

    fn create_order(
        &self,
        es: &EventSourcing<Shop>,
        customer: &str,
        amount: u64,
    ) -> anyhow::Result<()> {
        es.add_event(Shop::OrderCreated(Some((customer.to_string(), amount))))?;
        Ok(())
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let journal = MemoryJournal::<Shop>::new();
    let es = EventSourcing::new(journal.clone());

    let customers = CustomerService::attach(
        &es,
        HashMap::from([("solvent".to_string(), 500), ("insolvent".to_string(), 50)]),
    );
    let orders = OrderService::attach(&es);

    orders.create_order(&es, "solvent", 100)?;
    orders.create_order(&es, "insolvent", 100)?;

    let outcome = es
        .wait_events_processed_async(Some(Duration::from_secs(5)))
        .await;
    println!("saga finished: {outcome:?}");

    for (customer, approved) in orders.checkouts.lock().iter() {
        println!(
            "checkout {customer}: {} (credit left {})",
            if *approved { "approved" } else { "rejected" },
            customers.credit(customer)
        );
    }
    println!("journal holds {} events", journal.len());

    es.shutdown().await?;
    Ok(())
}
