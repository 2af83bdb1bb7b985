//! Top-level module for the statistical sequence models.
//!
//! This crate provides discrete Markov-chain estimation over symbol
//! sequences, including:
//! - A generic fixed-order estimator (`MarkovEstimator`)
//! - A smoothed bigram language model (`LanguageModel`)
//! - An unsmoothed tag-transition model (`TagTransitionModel`)
//! - Corpus-level frequency statistics (`CorpusStatistics`)

/// Generic fixed-order Markov estimator (`n >= 2`).
///
/// Handles sequence bracketing, n-gram and context counting, normalized
/// transition tables, weighted successor sampling and model merging.
pub mod markov_estimator;

/// Bigram language model with Laplace (add-one) smoothing.
///
/// Tokenizes sentences, delegates counting to the estimator, and answers
/// strictly-positive smoothed probability queries.
pub mod language_model;

/// First-order tag-transition model for part-of-speech and named-entity tags.
///
/// Unsmoothed by design; unseen previous tags surface as typed errors so
/// callers can apply their own fallback. Also hosts the BIO span-to-tag
/// derivation helper.
pub mod tag_model;

/// Corpus frequency statistics (totals and top-20 rankings).
///
/// Uses the language model's tokenization so reported numbers stay
/// comparable with the model's own statistics.
pub mod corpus_stats;
