//! Heuristic CV parser: PDF/DOCX text extraction followed by a fixed pipeline
//! of field extractors that pre-fill a candidate onboarding form, plus a
//! weighted candidate/job matcher fed by the parsed fields.

pub mod config;
pub mod document;
pub mod errors;
pub mod extraction;
pub mod matching;
pub mod parser;
pub mod vocabulary;

pub use document::{DocumentKind, ExtractedText, RawDocument};
pub use errors::{CvParseError, DocumentFormatError, MatchError, PdfEngineError, VocabularyError};
pub use extraction::{ExperienceBand, ParsedCandidateFields, SeniorityRank};
pub use matching::{
    CandidateMatcher, CandidateMatches, CandidateProfile, JobPosting, MatchOptions, MatchResult,
    WeightedMatcher,
};
pub use parser::CvParser;
pub use vocabulary::Vocabulary;
