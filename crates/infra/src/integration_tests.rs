//! End-to-end workflows against the in-memory store.

use std::collections::BTreeMap;

use clinistock_catalog::{Item, ItemDraft};
use clinistock_core::{ItemId, LpoId, Location, SessionId, StockBatchId, VendorId};
use clinistock_inventory::{StockBatch, apply_draws, plan_draw};
use clinistock_procurement::{
    Lpo, LpoStatus, ProcurementList, ProcurementSession, QuoteMatrix, finalize, low_stock_items,
};
use clinistock_vendors::{Vendor, VendorDraft};

use crate::Repositories;

fn item(name: &str, reorder_dispensary: i64, reorder_bulk: i64) -> Item {
    Item::new(
        ItemId::new(),
        ItemDraft {
            generic_name: name.to_string(),
            brand_name: None,
            strength: None,
            pack_size: None,
            category: "analgesic".to_string(),
            unit: "tablet".to_string(),
            reorder_level_dispensary: reorder_dispensary,
            reorder_level_bulk: reorder_bulk,
            unit_cost: 5,
            selling_price: 8,
        },
    )
    .unwrap()
}

fn vendor(name: &str, supplies: &[ItemId]) -> Vendor {
    Vendor::new(
        VendorId::new(),
        VendorDraft {
            name: name.to_string(),
            contact: Default::default(),
            supplied_items: supplies.iter().copied().collect(),
        },
    )
    .unwrap()
}

fn batch(item_id: ItemId, location: Location, quantity: i64) -> StockBatch {
    StockBatch::new(StockBatchId::new(), item_id, location, quantity, None, None).unwrap()
}

#[tokio::test]
async fn procurement_workflow_from_low_stock_to_completed_lpo() {
    let repos = Repositories::in_memory();

    // Seed: one item short at the bulk store, one healthy.
    let short = item("Paracetamol", 50, 100);
    let healthy = item("Amoxicillin", 50, 100);
    repos
        .items
        .put_many(&[short.clone(), healthy.clone()])
        .await
        .unwrap();
    repos
        .stocks
        .put_many(&[
            batch(short.id_typed(), Location::BulkStore, 20),
            batch(healthy.id_typed(), Location::BulkStore, 500),
        ])
        .await
        .unwrap();

    let cheap = vendor("Alpha Pharma", &[short.id_typed()]);
    let pricey = vendor("Beta Supplies", &[short.id_typed()]);
    repos
        .vendors
        .put_many(&[cheap.clone(), pricey.clone()])
        .await
        .unwrap();

    // Stage 1: list builder over persisted state.
    let catalog = repos.items.list().await.unwrap();
    let stocks = repos.stocks.list().await.unwrap();
    let mut list = ProcurementList::new();
    for id in low_stock_items(&catalog, &stocks, Location::BulkStore, &list) {
        list.add(id);
    }
    assert_eq!(list.members(), &[short.id_typed()]);

    // Stage 2: quotes.
    let mut quotes = QuoteMatrix::new();
    quotes.set_quote(&cheap, short.id_typed(), 7).unwrap();
    quotes.set_quote(&pricey, short.id_typed(), 9).unwrap();

    // Stage 3: finalize and persist.
    let vendors = repos.vendors.list().await.unwrap();
    let quantities: BTreeMap<_, _> = [(short.id_typed(), 40)].into();
    let drafts = finalize(&list, &catalog, &quantities, &vendors, &quotes).unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].vendor_id, cheap.id_typed());
    assert_eq!(drafts[0].grand_total, 280);

    let lpos: Vec<Lpo> = drafts
        .into_iter()
        .map(|d| Lpo::from_draft(LpoId::new(), d, chrono::Utc::now()))
        .collect();
    repos.lpos.put_many(&lpos).await.unwrap();

    // Transition the persisted copy and write it back.
    let mut lpo = repos
        .lpos
        .get(lpos[0].id_typed().into())
        .await
        .unwrap()
        .unwrap();
    lpo.mark_sent().unwrap();
    lpo.mark_completed().unwrap();
    repos.lpos.upsert(&lpo).await.unwrap();

    let reloaded = repos
        .lpos
        .get(lpo.id_typed().into())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status(), LpoStatus::Completed);
}

#[tokio::test]
async fn dispensing_persists_the_drawn_down_batches() {
    let repos = Repositories::in_memory();

    let it = item("Ibuprofen", 10, 20);
    repos.items.upsert(&it).await.unwrap();
    repos
        .stocks
        .put_many(&[
            batch(it.id_typed(), Location::Dispensary, 30),
            batch(it.id_typed(), Location::Dispensary, 30),
        ])
        .await
        .unwrap();

    let mut stocks = repos.stocks.list().await.unwrap();
    let draws = plan_draw(&stocks, it.id_typed(), Location::Dispensary, 45).unwrap();
    apply_draws(&mut stocks, &draws).unwrap();
    repos.stocks.put_many(&stocks).await.unwrap();

    let total: i64 = repos
        .stocks
        .list()
        .await
        .unwrap()
        .iter()
        .map(|b| b.quantity())
        .sum();
    assert_eq!(total, 15);
}

#[tokio::test]
async fn saved_session_reloads_with_its_state_intact() {
    let repos = Repositories::in_memory();

    let it = item("Cetirizine", 10, 20);
    let v = vendor("Gamma Traders", &[it.id_typed()]);

    let mut session = ProcurementSession::new(SessionId::new(), chrono::Utc::now());
    session.list.add(it.id_typed());
    session.quantities.insert(it.id_typed(), 12);
    session.quotes.set_quote(&v, it.id_typed(), 3).unwrap();
    repos.procurement_sessions.upsert(&session).await.unwrap();

    let reloaded = repos
        .procurement_sessions
        .get(session.id_typed().into())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded, session);
    assert_eq!(reloaded.quotes.min_quote(it.id_typed()), Some(3));
}

#[tokio::test]
async fn settings_document_is_a_singleton() {
    let repos = Repositories::in_memory();

    let mut settings = crate::ClinicSettings::default();
    settings.name = "Hillside Clinic".to_string();
    repos.settings.upsert(&settings).await.unwrap();

    settings.currency_code = "KES".to_string();
    repos.settings.upsert(&settings).await.unwrap();

    let all = repos.settings.list().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Hillside Clinic");
    assert_eq!(all[0].currency_code, "KES");
}
