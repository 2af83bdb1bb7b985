use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::io;
use super::markov_estimator::MarkovEstimator;

/// Sentinel marking the start of a tag sequence.
pub const START_TAG: &str = "<START>";
/// Sentinel marking the end of a tag sequence.
pub const END_TAG: &str = "<END>";
/// BIO tag for tokens outside any entity span.
pub const OUTSIDE_TAG: &str = "O";

/// Transitions are conditioned on a single previous tag.
pub const TRANSITION_ORDER: usize = 2;

/// Summary of a trained tag-transition model.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagTransitionStatistics {
	pub tag_vocabulary_size: usize,
	pub total_transitions: usize,
	pub unique_transitions: usize,
}

/// A half-open token span carrying an entity label, as produced by an external
/// entity recognizer (`start` inclusive, `end` exclusive).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EntitySpan {
	pub start: usize,
	pub end: usize,
	pub label: String,
}

/// First-order tag-transition model, used identically for part-of-speech and
/// named-entity tag sequences.
///
/// A specialization of [`MarkovEstimator`] fixed at order 2 with the
/// `<START>`/`<END>` sequence sentinels. Tags are used verbatim, no
/// normalization is applied. Unlike the language model this estimator is
/// *unsmoothed*: a never-observed previous tag is a typed [`ModelError::UnseenContext`]
/// error, and callers must apply their own fallback (e.g. a uniform
/// distribution). The tagging itself is performed by an external library; this
/// model only consumes its output sequences.
///
/// # Responsibilities
/// - Count tag-to-tag transitions over bracketed tag sequences
/// - Answer unsmoothed transition probabilities keyed by previous tag
/// - Expose the full normalized transition table
/// - Persist and reload its trained state as a snapshot
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TagTransitionModel {
	estimator: MarkovEstimator,
}

impl TagTransitionModel {
	/// Creates a new empty tag-transition model.
	pub fn new() -> Self {
		// Cannot fail, the transition order is always >= 2
		let estimator = MarkovEstimator::new(TRANSITION_ORDER, START_TAG, END_TAG)
			.expect("transition order is valid");
		Self { estimator }
	}

	/// Trains the model on a batch of tag sequences.
	///
	/// Each sequence is one sentence's tags, aligned to its tokens. Every
	/// sequence contributes one synthetic start transition (`<START>` to the
	/// first tag) and one synthetic end transition (the last tag to `<END>`).
	pub fn train(&mut self, tag_sequences: &[Vec<String>]) {
		self.estimator.train(tag_sequences);
		tracing::info!(
			sequences = tag_sequences.len(),
			tags = self.estimator.vocab_size(),
			"trained tag-transition model"
		);
	}

	/// Returns the unsmoothed probability of `next_tag` following `prev_tag`.
	///
	/// # Errors
	/// - `NotTrained` if the model has never been trained.
	/// - `UnseenContext` if `prev_tag` never occurred as a previous tag.
	pub fn transition_probability(&self, prev_tag: &str, next_tag: &str) -> Result<f64> {
		let context = [prev_tag.to_owned()];
		self.estimator.transition_probability(&context, next_tag)
	}

	/// Returns, for every observed previous tag, the normalized distribution
	/// over next tags. Probabilities for a fixed previous tag sum to 1.0.
	pub fn transition_table(&self) -> HashMap<String, HashMap<String, f64>> {
		self.estimator
			.normalized_transition_table()
			.into_iter()
			.filter_map(|(mut context, successors)| context.pop().map(|prev| (prev, successors)))
			.collect()
	}

	/// Draws a next tag for `prev_tag`, weighted by observed transition counts.
	///
	/// # Errors
	/// Same conditions as [`Self::transition_probability`].
	pub fn sample_next(&self, prev_tag: &str) -> Result<String> {
		let context = [prev_tag.to_owned()];
		self.estimator.sample_next(&context)
	}

	/// Returns tag vocabulary size and total/unique transition counts.
	pub fn statistics(&self) -> TagTransitionStatistics {
		let stats = self.estimator.statistics();
		TagTransitionStatistics {
			tag_vocabulary_size: stats.vocabulary_size,
			total_transitions: stats.total_ngrams,
			unique_transitions: stats.unique_ngrams,
		}
	}

	/// Writes the trained state to a snapshot file.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		io::save_snapshot(path, &self.estimator)
	}

	/// Reconstructs a model from a snapshot file.
	///
	/// # Errors
	/// - `OrderMismatch` if the snapshot order is not 2.
	/// - `SentinelMismatch` if the snapshot does not use the tag sentinels
	///   (e.g. a language-model snapshot).
	/// - `Io`/`Codec` if the file is missing or corrupt.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let estimator = io::load_snapshot(path, TRANSITION_ORDER)?;
		if estimator.start_symbol() != START_TAG || estimator.end_symbol() != END_TAG {
			return Err(ModelError::SentinelMismatch {
				ours: format!("{START_TAG}..{END_TAG}"),
				theirs: format!("{}..{}", estimator.start_symbol(), estimator.end_symbol()),
			});
		}
		tracing::info!(tags = estimator.vocab_size(), "loaded tag-transition snapshot");
		Ok(Self { estimator })
	}
}

impl Default for TagTransitionModel {
	fn default() -> Self {
		Self::new()
	}
}

/// Derives a BIO tag sequence from entity spans over a tokenized sentence.
///
/// Every token starts as `O`; the first token of a span becomes `B-<label>`
/// and the remaining tokens of the span become `I-<label>`. Spans reaching
/// past `token_count` are clamped. The resulting sequence is what an external
/// entity recognizer hands to [`TagTransitionModel::train`].
pub fn bio_tags(token_count: usize, entities: &[EntitySpan]) -> Vec<String> {
	let mut tags = vec![OUTSIDE_TAG.to_owned(); token_count];
	for entity in entities {
		let end = entity.end.min(token_count);
		for i in entity.start..end {
			tags[i] = if i == entity.start {
				format!("B-{}", entity.label)
			} else {
				format!("I-{}", entity.label)
			};
		}
	}
	tags
}
