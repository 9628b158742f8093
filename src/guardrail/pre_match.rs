use crate::audit::{AuditEntry, GuardrailRule};
use crate::model::ExtractedMention;
use crate::normalize::{first_numeric_token, remove_token};

/// Separates a numeric variant token from the brand before retrieval.
///
/// The first whole-word number in the brand is moved into `variant` (an
/// explicitly extracted variant wins) and any extracted strength is discarded:
/// in brand names like "Augmentin 625" the number is a product variant, not a
/// dose. A brand with no number passes through untouched.
pub fn apply_pre_match(mention: &ExtractedMention) -> (ExtractedMention, Vec<AuditEntry>) {
    let Some(range) = first_numeric_token(&mention.brand) else {
        return (mention.clone(), Vec::new());
    };

    let token = &mention.brand[range.clone()];
    let stripped = remove_token(&mention.brand, range);

    let mut out = mention.clone();
    // A brand that is nothing but the number keeps its text.
    if !stripped.is_empty() {
        out.brand = stripped;
    }
    if out.variant.is_none() {
        out.variant = Some(token.to_string());
    }

    let mut entries = vec![AuditEntry::with_detail(
        GuardrailRule::VariantStripped,
        token,
    )];

    if out.strength.take().is_some() {
        entries.push(AuditEntry::new(GuardrailRule::StrengthCleared));
    }

    (out, entries)
}
