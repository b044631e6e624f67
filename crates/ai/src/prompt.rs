//! Deterministic prompt rendering.
//!
//! Prompts embed the request data as JSON and pin the exact response shape;
//! the same request always renders the same prompt.

use crate::contract::{LpoSuggestionRequest, ReorderRequest};
use crate::error::AiError;

/// Render the LPO suggestion prompt.
pub fn build_lpo_prompt(request: &LpoSuggestionRequest) -> Result<String, AiError> {
    if request.items.is_empty() {
        return Err(AiError::InvalidInput(
            "no low-stock items to suggest purchases for".to_string(),
        ));
    }
    if request.vendors.is_empty() {
        return Err(AiError::InvalidInput("no vendors to choose from".to_string()));
    }

    let data = serde_json::to_string_pretty(request)
        .map_err(|e| AiError::InvalidInput(format!("request not serializable: {e}")))?;

    Ok(format!(
        "You are assisting a pharmacy procurement officer.\n\
         Given the low-stock items and the vendors below, propose what to buy.\n\
         Only use vendor_id values listed for an item's suppliers.\n\n\
         DATA:\n{data}\n\n\
         Respond with JSON only, no prose, in exactly this shape:\n\
         {{\"suggestions\": [{{\"item_id\": \"<uuid>\", \"quantity\": <positive integer>, \
         \"vendor_id\": \"<uuid>\", \"reasoning\": \"<short text>\"}}]}}"
    ))
}

/// Render the single-item reorder prompt.
pub fn build_reorder_prompt(request: &ReorderRequest) -> Result<String, AiError> {
    if request.usage.is_empty() {
        return Err(AiError::InvalidInput(
            "no usage history for the item".to_string(),
        ));
    }

    let data = serde_json::to_string_pretty(request)
        .map_err(|e| AiError::InvalidInput(format!("request not serializable: {e}")))?;

    Ok(format!(
        "You are assisting a pharmacy procurement officer.\n\
         Given one item's stock position and usage history below, recommend a\n\
         reorder quantity.\n\n\
         DATA:\n{data}\n\n\
         Respond with JSON only, no prose, in exactly this shape:\n\
         {{\"item_id\": \"<uuid>\", \"recommended_quantity\": <positive integer>, \
         \"rationale\": \"<short text>\"}}"
    ))
}
