//! Request/response DTOs.
//!
//! Domain drafts double as request bodies where they fit; the types here
//! cover the routes whose wire shape differs from the domain shape.

use serde::{Deserialize, Serialize};

use clinistock_catalog::{ColumnMapping, RowError};
use clinistock_core::{ItemId, Location, Money, PatientId, Quantity, SessionId};
use clinistock_inventory::OrderLine;

#[derive(Debug, Deserialize)]
pub struct ImportItemsRequest {
    pub mapping: ColumnMapping,
    /// Raw CSV file content.
    pub csv: String,
}

#[derive(Debug, Serialize)]
pub struct ImportItemsResponse {
    pub imported: usize,
    pub skipped: Vec<RowError>,
}

#[derive(Debug, Deserialize)]
pub struct DispenseRequest {
    pub item_id: ItemId,
    pub location: Location,
    pub quantity: Quantity,
}

#[derive(Debug, Deserialize)]
pub struct CreateInternalOrderRequest {
    pub from: Location,
    pub to: Location,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStockTakeRequest {
    pub location: Location,
}

/// Physical count for one item; the system count is captured server-side.
#[derive(Debug, Deserialize)]
pub struct StockTakeLineRequest {
    pub item_id: ItemId,
    pub physical_count: Quantity,
}

#[derive(Debug, Deserialize)]
pub struct CreateBillRequest {
    pub patient_id: PatientId,
    pub lines: Vec<BillLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct BillLineRequest {
    pub description: String,
    pub quantity: Quantity,
    pub unit_price: Money,
}

#[derive(Debug, Deserialize)]
pub struct FinalizeRequest {
    pub session_id: SessionId,
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub location: Location,
}

#[derive(Debug, Deserialize)]
pub struct LpoSuggestionBody {
    pub location: Location,
}
