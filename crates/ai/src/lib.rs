//! Generative-AI boundary.
//!
//! Two prompt-based flows: an LPO suggestion built from low-stock items and
//! the vendor list, and a per-item reorder recommendation built from usage
//! history. The model is an external collaborator; this crate only renders
//! deterministic prompts and fail-fast validates the structured responses.
//! Nothing here trusts the response shape at runtime.

pub mod client;
pub mod contract;
pub mod error;
pub mod parse;
pub mod prompt;

pub use client::SuggestionClient;
pub use contract::{
    ItemSummary, LpoSuggestion, LpoSuggestionRequest, ReorderRecommendation, ReorderRequest,
    UsagePoint, VendorSummary,
};
pub use error::AiError;
pub use parse::{parse_lpo_suggestions, parse_reorder_recommendation};
pub use prompt::{build_lpo_prompt, build_reorder_prompt};
