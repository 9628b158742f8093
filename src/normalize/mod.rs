//! Text canonicalization for extracted mentions.
//!
//! Lowercases every textual field, collapses whitespace, and expands a fixed
//! abbreviation table. Expansion is whole-token only: "tab" becomes "tablet",
//! but "Tabcin" is left alone. A token with no mapping passes through.


use std::sync::LazyLock;

use regex::Regex;

use crate::audit::{AuditEntry, GuardrailRule};
use crate::model::ExtractedMention;

const TOKEN_JOINERS: [char; 2] = ['-', '/'];

static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\b").expect("numeric token pattern is valid"));

/// Dosage-form abbreviations.
pub const FORM_ABBREVIATIONS: &[(&str, &str)] = &[
    ("tab", "tablet"),
    ("tabs", "tablet"),
    ("tablets", "tablet"),
    ("cap", "capsule"),
    ("caps", "capsule"),
    ("capsules", "capsule"),
    ("syp", "syrup"),
    ("syr", "syrup"),
    ("inj", "injection"),
    ("susp", "suspension"),
    ("oint", "ointment"),
    ("sol", "solution"),
    ("soln", "solution"),
    ("gtt", "drops"),
];

/// Canonical dosage forms (targets of [`FORM_ABBREVIATIONS`] plus unabbreviated forms).
pub const CANONICAL_FORMS: &[&str] = &[
    "tablet",
    "capsule",
    "syrup",
    "injection",
    "suspension",
    "ointment",
    "solution",
    "drops",
    "cream",
    "gel",
    "inhaler",
];

/// Dosing-frequency abbreviations.
pub const FREQUENCY_ABBREVIATIONS: &[(&str, &str)] = &[
    ("od", "1 time per day"),
    ("qd", "1 time per day"),
    ("bd", "2 times per day"),
    ("bid", "2 times per day"),
    ("tds", "3 times per day"),
    ("tid", "3 times per day"),
    ("qid", "4 times per day"),
    ("qds", "4 times per day"),
    ("hs", "at bedtime"),
    ("prn", "as needed"),
    ("sos", "as needed"),
];

/// Iterates over whole-word runs of digits ("625" in "augmentin 625", not in "625mg").
pub fn numeric_tokens(text: &str) -> impl Iterator<Item = &str> {
    NUMERIC_TOKEN.find_iter(text).map(|m| m.as_str())
}

/// Byte range of the first whole-word run of digits.
pub(crate) fn first_numeric_token(text: &str) -> Option<std::ops::Range<usize>> {
    NUMERIC_TOKEN.find(text).map(|m| m.range())
}

/// Removes `range` from `text` along with any `-` or `/` joining it to a
/// neighbouring word ("dolo-650" becomes "dolo").
pub(crate) fn remove_token(text: &str, range: std::ops::Range<usize>) -> String {
    let before = text[..range.start].trim_end_matches(TOKEN_JOINERS);
    let after = text[range.end..].trim_start_matches(TOKEN_JOINERS);
    collapse_whitespace(&format!("{before} {after}"))
}

/// Lowercased brand with every numeric variant token removed.
///
/// "Augmentin 625 Duo" and "augmentin-625 duo" both key to "augmentin duo".
pub fn brand_key(brand_name: &str) -> String {
    let mut key = collapse_whitespace(&brand_name.to_lowercase());
    while let Some(range) = first_numeric_token(&key) {
        key = remove_token(&key, range);
    }
    key
}

pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Maps a lowercase token to its canonical dosage form, if it names one.
pub fn canonical_form(token: &str) -> Option<&'static str> {
    lookup(FORM_ABBREVIATIONS, token).or_else(|| CANONICAL_FORMS.iter().copied().find(|f| *f == token))
}

/// Canonical comparison key for a form string from any source.
pub fn form_key(form: &str) -> String {
    let cleaned = collapse_whitespace(&form.to_lowercase());
    canonical_form(&cleaned)
        .map(str::to_string)
        .unwrap_or(cleaned)
}

fn lookup(table: &[(&str, &'static str)], token: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(abbr, _)| *abbr == token)
        .map(|(_, expanded)| *expanded)
}

fn expand_tokens(value: &str, table: &[(&str, &'static str)]) -> String {
    value
        .split(' ')
        .map(|token| lookup(table, token).unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn clean(value: &str, changed: &mut bool) -> String {
    let cleaned = collapse_whitespace(&value.to_lowercase());
    if cleaned != value {
        *changed = true;
    }
    cleaned
}

fn clean_opt(value: Option<&str>, changed: &mut bool) -> Option<String> {
    let value = value?;
    let cleaned = clean(value, changed);
    if cleaned.is_empty() {
        *changed = true;
        None
    } else {
        Some(cleaned)
    }
}

/// Canonicalizes a mention, returning a new mention and the rules that fired.
///
/// Normalizing an already-normalized mention returns it unchanged with no entries.
pub fn normalize(mention: &ExtractedMention) -> (ExtractedMention, Vec<AuditEntry>) {
    let mut entries = Vec::new();
    let mut lowercased = false;

    let mut brand = clean(&mention.brand, &mut lowercased);
    let variant = clean_opt(mention.variant.as_deref(), &mut lowercased);
    let generic_name = clean_opt(mention.generic_name.as_deref(), &mut lowercased);
    let strength = clean_opt(mention.strength.as_deref(), &mut lowercased);
    let cleaned_form = clean_opt(mention.form.as_deref(), &mut lowercased);
    let cleaned_frequency = clean_opt(mention.frequency.as_deref(), &mut lowercased);

    if lowercased {
        entries.push(AuditEntry::new(GuardrailRule::LowercaseFields));
    }

    let mut form = cleaned_form.map(|f| {
        let expanded = expand_tokens(&f, FORM_ABBREVIATIONS);
        if expanded != f {
            entries.push(AuditEntry::new(GuardrailRule::FormAbbreviation));
        }
        expanded
    });

    let frequency = cleaned_frequency.map(|f| {
        let expanded = expand_tokens(&f, FREQUENCY_ABBREVIATIONS);
        if expanded != f {
            entries.push(AuditEntry::new(GuardrailRule::FrequencyAbbreviation));
        }
        expanded
    });

    if form.is_none() {
        let tokens: Vec<&str> = brand.split(' ').collect();
        if tokens.len() > 1 {
            let lifted = tokens
                .iter()
                .enumerate()
                .find_map(|(i, t)| canonical_form(t).map(|f| (i, f)));

            if let Some((index, canonical)) = lifted {
                let remaining: Vec<&str> = tokens
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .map(|(_, t)| *t)
                    .collect();
                form = Some(canonical.to_string());
                brand = remaining.join(" ");
                entries.push(AuditEntry::new(GuardrailRule::FormTokenLifted));
            }
        }
    }

    let normalized = ExtractedMention {
        raw_input: mention.raw_input.clone(),
        brand,
        variant,
        generic_name,
        strength,
        form,
        frequency,
    };

    (normalized, entries)
}
