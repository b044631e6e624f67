use std::sync::Arc;

use axum::{Json, Router, extract::Extension, response::IntoResponse, routing::post};

use clinistock_ai::{
    ItemSummary, LpoSuggestionRequest, ReorderRequest, VendorSummary, build_lpo_prompt,
    build_reorder_prompt, parse_lpo_suggestions, parse_reorder_recommendation,
};
use clinistock_inventory::on_hand;
use clinistock_procurement::ProcurementList;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/lpo-suggestion", post(lpo_suggestion))
        .route("/reorder-recommendation", post(reorder_recommendation))
}

/// Ask the model to propose purchases for everything low at one location.
///
/// The request context is assembled server-side from current stock and the
/// vendor list; the response is validated against that context before it is
/// returned.
pub async fn lpo_suggestion(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::LpoSuggestionBody>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "procurement.read") {
        return resp;
    }

    let catalog = match services.repos.items.list().await {
        Ok(items) => items,
        Err(e) => return errors::store_error_to_response(e),
    };
    let batches = match services.repos.stocks.list().await {
        Ok(batches) => batches,
        Err(e) => return errors::store_error_to_response(e),
    };
    let vendors = match services.repos.vendors.list().await {
        Ok(vendors) => vendors,
        Err(e) => return errors::store_error_to_response(e),
    };

    let totals = on_hand(&batches, body.location);
    let low = clinistock_procurement::low_stock_items(
        &catalog,
        &batches,
        body.location,
        &ProcurementList::new(),
    );

    let items: Vec<ItemSummary> = catalog
        .iter()
        .filter(|item| low.contains(&item.id_typed()))
        .map(|item| ItemSummary {
            item_id: item.id_typed(),
            display_name: item.display_name(),
            on_hand: totals.get(&item.id_typed()).copied().unwrap_or(0),
            reorder_level: item.reorder_level(body.location),
        })
        .collect();
    let vendors: Vec<VendorSummary> = vendors
        .iter()
        .map(|v| VendorSummary {
            vendor_id: v.id_typed(),
            name: v.name().to_string(),
            supplied_items: v.supplied_items().iter().copied().collect(),
        })
        .collect();

    let request = LpoSuggestionRequest { items, vendors };
    let prompt = match build_lpo_prompt(&request) {
        Ok(prompt) => prompt,
        Err(e) => return errors::ai_error_to_response(e),
    };
    let raw = match services.ai.complete(&prompt).await {
        Ok(raw) => raw,
        Err(e) => return errors::ai_error_to_response(e),
    };
    match parse_lpo_suggestions(&raw, &request) {
        Ok(suggestions) => Json(suggestions).into_response(),
        Err(e) => errors::ai_error_to_response(e),
    }
}

/// Ask the model for a reorder quantity from an item's usage history.
pub async fn reorder_recommendation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(request): Json<ReorderRequest>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "procurement.read") {
        return resp;
    }

    let prompt = match build_reorder_prompt(&request) {
        Ok(prompt) => prompt,
        Err(e) => return errors::ai_error_to_response(e),
    };
    let raw = match services.ai.complete(&prompt).await {
        Ok(raw) => raw,
        Err(e) => return errors::ai_error_to_response(e),
    };
    match parse_reorder_recommendation(&raw, &request) {
        Ok(recommendation) => Json(recommendation).into_response(),
        Err(e) => errors::ai_error_to_response(e),
    }
}
