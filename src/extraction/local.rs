//! Rule-based extraction from free prescription text.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use super::{ExtractionError, Extractor, RawInput};
use crate::model::ExtractedMention;
use crate::normalize::{FREQUENCY_ABBREVIATIONS, canonical_form, collapse_whitespace};

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]+").expect("line break pattern is valid"));

static INLINE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[,;|]\s*").expect("separator pattern is valid"));

static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*]\s*|\d+[).\-:]\s*)").expect("list marker pattern is valid")
});

static STRENGTH_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:\.\d+)?(?:mg|mcg|ml|g|iu|%)(?:/\S*)?$|mg/")
        .expect("strength pattern is valid")
});

/// Splits prescription text into one chunk per medicine.
///
/// Newline-separated entries win; otherwise commas, semicolons and pipes
/// separate. List markers are stripped and case-insensitive duplicates
/// dropped, keeping first-seen order.
pub fn split_medicines(raw_text: &str) -> Vec<String> {
    let normalized = collapse_whitespace(raw_text);
    if normalized.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = LINE_BREAK
        .split(raw_text)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let chunks: Vec<String> = if lines.len() > 1 {
        lines.into_iter().map(collapse_whitespace).collect()
    } else {
        let inline: Vec<String> = INLINE_SEPARATOR
            .split(&normalized)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        if inline.len() > 1 { inline } else { vec![normalized] }
    };

    let mut seen = std::collections::HashSet::new();
    chunks
        .into_iter()
        .map(|chunk| LIST_MARKER.replace(&chunk, "").trim().to_string())
        .filter(|chunk| !chunk.is_empty())
        .filter(|chunk| seen.insert(chunk.to_lowercase()))
        .collect()
}

fn is_frequency(token: &str) -> bool {
    FREQUENCY_ABBREVIATIONS.iter().any(|(abbr, _)| *abbr == token)
}

/// Classifies the tokens of one chunk.
///
/// Bare numbers stay in the brand: telling a variant from a dose is the
/// pre-match guardrail's job. Returns `None` when no brand word remains.
pub fn parse_mention(chunk: &str) -> Option<ExtractedMention> {
    let mut brand_words: Vec<&str> = Vec::new();
    let mut form = None;
    let mut strength = None;
    let mut frequency = None;

    for token in chunk.split_whitespace() {
        let cleaned = token
            .trim_matches(|c: char| matches!(c, ',' | '.' | ';'))
            .to_lowercase();
        if cleaned.is_empty() {
            continue;
        }

        if form.is_none() && canonical_form(&cleaned).is_some() {
            form = Some(cleaned);
        } else if strength.is_none() && STRENGTH_TOKEN.is_match(&cleaned) {
            strength = Some(cleaned);
        } else if frequency.is_none() && is_frequency(&cleaned) {
            frequency = Some(cleaned);
        } else {
            brand_words.push(token.trim_matches(|c: char| matches!(c, ',' | ';')));
        }
    }

    if brand_words.is_empty() {
        return None;
    }

    Some(ExtractedMention {
        raw_input: chunk.to_string(),
        brand: brand_words.join(" "),
        variant: None,
        generic_name: None,
        strength,
        form,
        frequency,
    })
}

/// Extractor for raw text input only.
#[derive(Debug, Clone, Default)]
pub struct LocalTextExtractor;

impl LocalTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for LocalTextExtractor {
    async fn extract(&self, input: &RawInput) -> Result<Vec<ExtractedMention>, ExtractionError> {
        let text = match input {
            RawInput::Text(text) => text,
            RawInput::Image(_) => {
                return Err(ExtractionError::UnsupportedInput {
                    reason: "local text extractor cannot read images".to_string(),
                });
            }
        };

        let chunks = split_medicines(text);
        if chunks.is_empty() {
            return Err(ExtractionError::EmptyResult);
        }

        let mut mentions = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            match parse_mention(chunk) {
                Some(mention) => mentions.push(mention),
                None => warn!(chunk = %chunk, "No medicine name in chunk; skipped"),
            }
        }

        if mentions.is_empty() {
            return Err(ExtractionError::Unparseable {
                reason: "no medicine name found".to_string(),
            });
        }

        debug!(chunks = chunks.len(), mentions = mentions.len(), "Local extraction complete");
        Ok(mentions)
    }
}
