//! Weighted fuzzy record linkage between a target and a reference table.
//!
//! A run configures column links ([`MatchConfig`]), weights each linked
//! column by its uniqueness in the target table, narrows candidates by
//! grouping columns, scores every target row against its pool, classifies
//! the best candidates and flags reference rows claimed more than once.

pub mod classify;
pub mod config;
pub mod error;
pub mod matcher;
pub mod profile;
pub mod resolve;
pub mod scorer;
pub mod similarity;
pub mod subset;
pub mod summary;
pub mod weighting;

pub use classify::{Classification, classify, round2};
pub use config::{ColumnLink, DEFAULT_THRESHOLD, MatchConfig};
pub use error::{MatchError, Result};
pub use matcher::{MatchOutcome, MatchProgress, Matcher, NoProgress};
pub use profile::{
    ColumnOverlap, ColumnProfile, blank_rows, column_overlap, column_profiles, duplicate_rows,
    group_percentage,
};
pub use resolve::resolve_duplicates;
pub use scorer::{CompositeScorer, ScoreMap};
pub use similarity::{AdaptiveRatio, ScorerKind, Similarity, WeightedRatio};
pub use subset::{CandidatePool, CandidateSubsetter};
pub use summary::{MatchSummary, NO_SCORE};
pub use weighting::{UniquenessWeights, uniqueness};
