//! Domain types shared by every pipeline stage.
//!
//! - [`MedicineRecord`] is ground truth and is never mutated here.
//! - [`ExtractedMention`] is produced once by extraction and then rewritten
//!   copy-on-write by the normalizer and the pre-match guardrail.
//! - [`Candidate`] is an ephemeral retrieval result.
//! - [`MatchResult`] is the immutable outcome for one mention; it converts into
//!   the contractual wire shape ([`ProcessedMedicine`]).

pub mod candidate;
pub mod mention;
pub mod record;
pub mod response;
pub mod result;

pub use candidate::{Candidate, CandidateSource};
pub use mention::ExtractedMention;
pub use record::MedicineRecord;
pub use response::{ExtractionResponse, MatchedMedicine, ProcessedMedicine};
pub use result::{MatchResult, RiskTier};
