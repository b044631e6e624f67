//! Schema validation of model responses.
//!
//! Responses are parsed into the contract types and then checked against the
//! request context; any mismatch is a typed error, never a shape assumption.

use serde::Deserialize;

use crate::contract::{
    LpoSuggestion, LpoSuggestionRequest, ReorderRecommendation, ReorderRequest,
};
use crate::error::AiError;

#[derive(Debug, Deserialize)]
struct LpoSuggestionEnvelope {
    suggestions: Vec<LpoSuggestion>,
}

/// Parse and validate an LPO suggestion response.
pub fn parse_lpo_suggestions(
    raw: &str,
    request: &LpoSuggestionRequest,
) -> Result<Vec<LpoSuggestion>, AiError> {
    let envelope: LpoSuggestionEnvelope = serde_json::from_str(strip_fences(raw))
        .map_err(|e| AiError::Schema(e.to_string()))?;

    for suggestion in &envelope.suggestions {
        if suggestion.quantity <= 0 {
            return Err(AiError::InvalidSuggestion(format!(
                "non-positive quantity for item {}",
                suggestion.item_id
            )));
        }
        if !request.items.iter().any(|i| i.item_id == suggestion.item_id) {
            return Err(AiError::InvalidSuggestion(format!(
                "item {} was not in the request",
                suggestion.item_id
            )));
        }
        let vendor = request
            .vendors
            .iter()
            .find(|v| v.vendor_id == suggestion.vendor_id)
            .ok_or_else(|| {
                AiError::InvalidSuggestion(format!(
                    "vendor {} was not in the request",
                    suggestion.vendor_id
                ))
            })?;
        if !vendor.supplies(suggestion.item_id) {
            return Err(AiError::InvalidSuggestion(format!(
                "vendor {} does not supply item {}",
                suggestion.vendor_id, suggestion.item_id
            )));
        }
    }

    Ok(envelope.suggestions)
}

/// Parse and validate a reorder recommendation response.
pub fn parse_reorder_recommendation(
    raw: &str,
    request: &ReorderRequest,
) -> Result<ReorderRecommendation, AiError> {
    let recommendation: ReorderRecommendation = serde_json::from_str(strip_fences(raw))
        .map_err(|e| AiError::Schema(e.to_string()))?;

    if recommendation.item_id != request.item.item_id {
        return Err(AiError::InvalidSuggestion(format!(
            "recommendation is for item {}, request was for {}",
            recommendation.item_id, request.item.item_id
        )));
    }
    if recommendation.recommended_quantity <= 0 {
        return Err(AiError::InvalidSuggestion(
            "recommended quantity must be positive".to_string(),
        ));
    }

    Ok(recommendation)
}

/// Models often wrap JSON in a markdown code fence despite instructions.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{ItemSummary, UsagePoint, VendorSummary};
    use chrono::NaiveDate;
    use clinistock_core::{ItemId, VendorId};

    fn request() -> LpoSuggestionRequest {
        let item_id = ItemId::new();
        let vendor_id = VendorId::new();
        LpoSuggestionRequest {
            items: vec![ItemSummary {
                item_id,
                display_name: "Paracetamol 500mg".to_string(),
                on_hand: 200,
                reorder_level: 500,
            }],
            vendors: vec![VendorSummary {
                vendor_id,
                name: "Alpha Pharma".to_string(),
                supplied_items: vec![item_id],
            }],
        }
    }

    fn suggestion_json(request: &LpoSuggestionRequest, quantity: i64) -> String {
        format!(
            r#"{{"suggestions": [{{"item_id": "{}", "quantity": {quantity}, "vendor_id": "{}", "reasoning": "stock below reorder level"}}]}}"#,
            request.items[0].item_id, request.vendors[0].vendor_id
        )
    }

    #[test]
    fn a_valid_response_parses() {
        let req = request();
        let parsed = parse_lpo_suggestions(&suggestion_json(&req, 300), &req).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].quantity, 300);
    }

    #[test]
    fn fenced_json_is_accepted() {
        let req = request();
        let raw = format!("```json\n{}\n```", suggestion_json(&req, 300));
        assert!(parse_lpo_suggestions(&raw, &req).is_ok());
    }

    #[test]
    fn malformed_json_is_a_schema_error() {
        let req = request();
        let err = parse_lpo_suggestions("not json at all", &req).unwrap_err();
        assert!(matches!(err, AiError::Schema(_)));
    }

    #[test]
    fn unknown_vendor_is_rejected() {
        let req = request();
        let raw = format!(
            r#"{{"suggestions": [{{"item_id": "{}", "quantity": 10, "vendor_id": "{}", "reasoning": "x"}}]}}"#,
            req.items[0].item_id,
            VendorId::new()
        );
        let err = parse_lpo_suggestions(&raw, &req).unwrap_err();
        assert!(matches!(err, AiError::InvalidSuggestion(_)));
    }

    #[test]
    fn vendor_must_supply_the_item() {
        let mut req = request();
        req.vendors[0].supplied_items.clear();
        let raw = suggestion_json(&req, 10);
        let err = parse_lpo_suggestions(&raw, &req).unwrap_err();
        assert!(matches!(err, AiError::InvalidSuggestion(_)));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let req = request();
        let err = parse_lpo_suggestions(&suggestion_json(&req, 0), &req).unwrap_err();
        assert!(matches!(err, AiError::InvalidSuggestion(_)));
    }

    #[test]
    fn reorder_recommendation_must_match_the_requested_item() {
        let item_id = ItemId::new();
        let req = ReorderRequest {
            item: ItemSummary {
                item_id,
                display_name: "Paracetamol 500mg".to_string(),
                on_hand: 200,
                reorder_level: 500,
            },
            usage: vec![UsagePoint {
                date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
                quantity_used: 40,
            }],
        };

        let ok = format!(
            r#"{{"item_id": "{item_id}", "recommended_quantity": 600, "rationale": "covers a month"}}"#
        );
        assert_eq!(
            parse_reorder_recommendation(&ok, &req).unwrap().recommended_quantity,
            600
        );

        let wrong_item = format!(
            r#"{{"item_id": "{}", "recommended_quantity": 600, "rationale": "x"}}"#,
            ItemId::new()
        );
        assert!(matches!(
            parse_reorder_recommendation(&wrong_item, &req).unwrap_err(),
            AiError::InvalidSuggestion(_)
        ));
    }
}
