//! Request/response contracts for the two prompt flows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use clinistock_core::{ItemId, Quantity, VendorId};

/// What the model is told about a low-stock item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub item_id: ItemId,
    pub display_name: String,
    pub on_hand: Quantity,
    pub reorder_level: Quantity,
}

/// What the model is told about a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSummary {
    pub vendor_id: VendorId,
    pub name: String,
    pub supplied_items: Vec<ItemId>,
}

impl VendorSummary {
    pub fn supplies(&self, item_id: ItemId) -> bool {
        self.supplied_items.contains(&item_id)
    }
}

/// Input to the LPO suggestion flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpoSuggestionRequest {
    pub items: Vec<ItemSummary>,
    pub vendors: Vec<VendorSummary>,
}

/// One model-proposed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpoSuggestion {
    pub item_id: ItemId,
    pub quantity: Quantity,
    pub vendor_id: VendorId,
    pub reasoning: String,
}

/// One historical usage observation for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePoint {
    pub date: NaiveDate,
    pub quantity_used: Quantity,
}

/// Input to the reorder recommendation flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub item: ItemSummary,
    pub usage: Vec<UsagePoint>,
}

/// The model's reorder recommendation for a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRecommendation {
    pub item_id: ItemId,
    pub recommended_quantity: Quantity,
    pub rationale: String,
}
