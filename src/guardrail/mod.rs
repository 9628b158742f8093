//! Deterministic guardrail rules around retrieval.
//!
//! - [`apply_pre_match`] separates brand variants from doses before the query.
//! - [`apply_post_match`] locks combination products, penalizes form and
//!   variant disagreement, and injects the official strength.
//!
//! Every rule is a pure function of its inputs.

mod error;
mod post_match;
mod pre_match;


pub use error::GuardrailError;
pub use post_match::{
    POST_MATCH_RULES, PostMatchOutcome, PostMatchPolicy, PostMatchRule, PostMatchState,
    apply_post_match, combination_lock, form_penalty, strength_injection, variant_penalty,
};
pub use pre_match::apply_pre_match;
