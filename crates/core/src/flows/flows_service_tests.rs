//! Tests for the flow service orchestration.

use std::sync::Arc;

use chrono::Duration;
use rust_decimal_macros::dec;

use crate::accounts::AccountType;
use crate::balances::{BalanceService, BalanceServiceTrait};
use crate::cache::{InvalidationCoordinator, MemoryCacheStore};
use crate::errors::Error;
use crate::events::{ChangeNotifier, MemoryPubSub, PubSubTrait};
use crate::flows::{FlowService, FlowServiceTrait, FlowUpdate, NewFlow};
use crate::test_utils::{account, flow_due, MemoryAccountRepository, MemoryFlowRepository};
use crate::utils::time_utils;

const OWNER: &str = "user-1";

struct Fixture {
    accounts: Arc<MemoryAccountRepository>,
    flows: Arc<MemoryFlowRepository>,
    cache: Arc<MemoryCacheStore>,
    pubsub: Arc<MemoryPubSub>,
    balances: BalanceService,
    service: FlowService,
}

fn fixture() -> Fixture {
    let accounts = Arc::new(MemoryAccountRepository::new());
    let flows = Arc::new(MemoryFlowRepository::new(accounts.clone()));
    let cache = Arc::new(MemoryCacheStore::new());
    let pubsub = Arc::new(MemoryPubSub::new());

    let balances = BalanceService::new(accounts.clone(), flows.clone(), cache.clone());
    let service = FlowService::new(
        flows.clone(),
        Arc::new(InvalidationCoordinator::new(cache.clone())),
        Arc::new(ChangeNotifier::new(pubsub.clone())),
    );

    Fixture {
        accounts,
        flows,
        cache,
        pubsub,
        balances,
        service,
    }
}

fn new_flow(from: &str, to: &str, amount: rust_decimal::Decimal) -> NewFlow {
    NewFlow {
        id: None,
        description: "rent".to_string(),
        amount,
        paid: false,
        scheduled: false,
        from_account_id: Some(from.to_string()),
        to_account_id: Some(to.to_string()),
        date_due: time_utils::today(),
        date_cancelled: None,
        parent_flow_id: None,
    }
}

#[tokio::test]
async fn test_create_flow_persists_and_publishes() {
    let f = fixture();
    let mut rx = f.pubsub.subscribe(&format!("{OWNER}:flow:save"));

    let created = f.service.create_flow(OWNER, new_flow("a", "b", dec!(25))).await.unwrap();

    assert!(!created.id().is_empty());
    assert_eq!(rx.recv().await.unwrap(), created.id());
    assert_eq!(f.service.list_flows(OWNER).unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_flow_rejects_missing_account_ref() {
    let f = fixture();
    let mut missing = new_flow("a", "b", dec!(25));
    missing.to_account_id = None;

    let err = f.service.create_flow(OWNER, missing).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_delete_flow_invalidates_both_endpoints() {
    let f = fixture();
    let mut a = account("a", OWNER, AccountType::Checking, dec!(100));
    let mut b = account("b", OWNER, AccountType::Checking, dec!(0));
    f.accounts.insert(a.clone());
    f.accounts.insert(b.clone());

    let created = f.service.create_flow(OWNER, new_flow("a", "b", dec!(40))).await.unwrap();

    // Warm both accounts' caches with the flow in place.
    f.balances.enrich_account(&mut a).await.unwrap();
    f.balances.enrich_account(&mut b).await.unwrap();
    assert_eq!(a.accrued_balance, Some(dec!(60)));
    assert_eq!(b.accrued_balance, Some(dec!(40)));

    f.service.delete_flow(OWNER, created.id()).await.unwrap();
    assert!(f.cache.is_empty());

    // The next read recomputes rather than serving the stale figures.
    f.balances.enrich_account(&mut a).await.unwrap();
    f.balances.enrich_account(&mut b).await.unwrap();
    assert_eq!(a.accrued_balance, Some(dec!(100)));
    assert_eq!(b.accrued_balance, Some(dec!(0)));
}

#[tokio::test]
async fn test_delete_flow_publishes_delete_event() {
    let f = fixture();
    let created = f.service.create_flow(OWNER, new_flow("a", "b", dec!(25))).await.unwrap();
    let mut rx = f.pubsub.subscribe(&format!("{OWNER}:flow:delete"));

    f.service.delete_flow(OWNER, created.id()).await.unwrap();

    assert_eq!(rx.recv().await.unwrap(), created.id());
}

#[tokio::test]
async fn test_delete_is_owner_scoped() {
    let f = fixture();
    let created = f.service.create_flow(OWNER, new_flow("a", "b", dec!(25))).await.unwrap();

    let err = f.service.delete_flow("someone-else", created.id()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    // Still there for the real owner.
    assert!(f.service.get_flow(OWNER, created.id()).is_ok());
}

#[tokio::test]
async fn test_update_flow_replaces_fields_and_invalidates() {
    let f = fixture();
    f.accounts
        .insert(account("a", OWNER, AccountType::Checking, dec!(100)));
    f.accounts
        .insert(account("b", OWNER, AccountType::Checking, dec!(0)));

    let created = f.service.create_flow(OWNER, new_flow("a", "b", dec!(40))).await.unwrap();

    let mut a = f.accounts.get_any("a").unwrap();
    f.balances.enrich_account(&mut a).await.unwrap();
    assert_eq!(a.accrued_balance, Some(dec!(60)));

    let update = FlowUpdate {
        id: Some(created.id().to_string()),
        description: "rent (adjusted)".to_string(),
        amount: dec!(10),
        paid: false,
        scheduled: true,
        from_account_id: created.from_account_id.clone(),
        to_account_id: created.to_account_id.clone(),
        date_due: created.date_due,
        date_cancelled: None,
        parent_flow_id: None,
    };
    let updated = f.service.update_flow(OWNER, update).await.unwrap();
    assert_eq!(updated.amount, dec!(10));
    assert!(updated.resource.updated_on >= created.resource.updated_on);

    f.balances.enrich_account(&mut a).await.unwrap();
    assert_eq!(a.accrued_balance, Some(dec!(90)));
}

#[tokio::test]
async fn test_update_repointing_flow_invalidates_old_endpoint() {
    let f = fixture();
    let mut a = account("a", OWNER, AccountType::Checking, dec!(100));
    let mut b = account("b", OWNER, AccountType::Checking, dec!(0));
    f.accounts.insert(a.clone());
    f.accounts.insert(b.clone());
    f.accounts
        .insert(account("c", OWNER, AccountType::Checking, dec!(0)));

    let created = f.service.create_flow(OWNER, new_flow("a", "b", dec!(40))).await.unwrap();
    f.balances.enrich_account(&mut a).await.unwrap();
    f.balances.enrich_account(&mut b).await.unwrap();
    assert_eq!(b.accrued_balance, Some(dec!(40)));

    // Re-point the inflow side from "b" to "c".
    let update = FlowUpdate {
        id: Some(created.id().to_string()),
        description: created.description.clone(),
        amount: created.amount,
        paid: false,
        scheduled: false,
        from_account_id: created.from_account_id.clone(),
        to_account_id: Some("c".to_string()),
        date_due: created.date_due,
        date_cancelled: None,
        parent_flow_id: None,
    };
    f.service.update_flow(OWNER, update).await.unwrap();

    // The old endpoint must not keep serving its pre-update figure.
    f.balances.enrich_account(&mut b).await.unwrap();
    assert_eq!(b.accrued_balance, Some(dec!(0)));

    let mut c = f.accounts.get_any("c").unwrap();
    f.balances.enrich_account(&mut c).await.unwrap();
    assert_eq!(c.accrued_balance, Some(dec!(40)));
}

#[tokio::test]
async fn test_update_unknown_flow_is_not_found() {
    let f = fixture();
    let update = FlowUpdate {
        id: Some("ghost".to_string()),
        description: "rent".to_string(),
        amount: dec!(10),
        paid: false,
        scheduled: false,
        from_account_id: Some("a".to_string()),
        to_account_id: Some("b".to_string()),
        date_due: time_utils::today(),
        date_cancelled: None,
        parent_flow_id: None,
    };
    let err = f.service.update_flow(OWNER, update).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_inflow_and_outflow_listings_are_account_scoped() {
    let f = fixture();
    f.flows
        .insert(flow_due(OWNER, "a", "b", dec!(10), time_utils::today()));
    f.flows
        .insert(flow_due(OWNER, "b", "c", dec!(20), time_utils::today()));
    f.flows.insert(flow_due(
        OWNER,
        "c",
        "a",
        dec!(30),
        time_utils::today() + Duration::days(1),
    ));

    let inflows = f.service.get_inflows(OWNER, "a").unwrap();
    assert_eq!(inflows.len(), 1);
    assert_eq!(inflows[0].amount, dec!(30));

    let outflows = f.service.get_outflows(OWNER, "a").unwrap();
    assert_eq!(outflows.len(), 1);
    assert_eq!(outflows[0].amount, dec!(10));
}

#[tokio::test]
async fn test_payments_listing_follows_parent_flow() {
    let f = fixture();
    let parent = f.service.create_flow(OWNER, new_flow("a", "b", dec!(90))).await.unwrap();

    for _ in 0..2 {
        let mut installment = new_flow("a", "b", dec!(30));
        installment.parent_flow_id = Some(parent.id().to_string());
        f.service.create_flow(OWNER, installment).await.unwrap();
    }
    f.service.create_flow(OWNER, new_flow("a", "b", dec!(5))).await.unwrap();

    let payments = f.service.get_payments(OWNER, parent.id()).unwrap();
    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|p| p.amount == dec!(30)));
}
