use std::collections::{HashMap, HashSet};

use rand::Rng;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Summary statistics of a trained estimator.
///
/// `total_ngrams` is the sum of all occurrence counts; `unique_ngrams` is the
/// number of distinct n-grams observed at least once.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelStatistics {
	pub vocabulary_size: usize,
	pub total_ngrams: usize,
	pub unique_ngrams: usize,
}

/// First-order-style Markov estimator over sequences of string symbols.
///
/// The `MarkovEstimator` counts n-grams of a fixed order `n` across bracketed
/// symbol sequences and answers normalized transition queries. It is the shared
/// counting engine behind both the bigram language model (smoothed lookups)
/// and the tag-transition models (unsmoothed normalized tables).
///
/// Counts are kept as two flat tables, full n-gram counts and context totals,
/// instead of nested per-context maps. The same storage then serves smoothed
/// and unsmoothed lookups without duplicating the counting logic.
///
/// # Responsibilities
/// - Bracket each sequence with the start/end sentinels and count every window
/// - Accumulate occurrence counts over repeated training calls
/// - Answer transition probabilities and normalized per-context distributions
/// - Merge with another estimator of the same order and sentinels
///
/// # Invariants
/// - `n` is always >= 2
/// - For every context `c`, `contexts[c]` equals the sum of `ngrams[g]` over
///   all n-grams `g` whose first `n - 1` symbols are `c`
/// - Every recorded occurrence count is >= 1
/// - The vocabulary contains every symbol ever seen, sentinels included
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MarkovEstimator {
	/// The order of the model (number of symbols per n-gram)
	n: usize, // must be >= 2

	/// Sentinel prepended to every sequence before counting.
	start_symbol: String,
	/// Sentinel appended to every sequence before counting.
	end_symbol: String,

	/// Occurrence count per n-gram (window of `n` symbols).
	ngrams: HashMap<Vec<String>, usize>,
	/// Total occurrences per context (first `n - 1` symbols of an n-gram).
	contexts: HashMap<Vec<String>, usize>,
	/// Every distinct symbol observed, sentinels included.
	vocab: HashSet<String>,
}

impl MarkovEstimator {
	/// Creates a new empty estimator of order `n` with the given sentinels.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `n < 2`.
	pub fn new(n: usize, start_symbol: &str, end_symbol: &str) -> Result<Self> {
		if n < 2 {
			return Err(ModelError::InvalidOrder(n));
		}
		Ok(Self {
			n,
			start_symbol: start_symbol.to_owned(),
			end_symbol: end_symbol.to_owned(),
			ngrams: HashMap::new(),
			contexts: HashMap::new(),
			vocab: HashSet::new(),
		})
	}

	/// Returns the order `n` of the estimator.
	pub fn order(&self) -> usize {
		self.n
	}

	/// Returns the start sentinel.
	pub fn start_symbol(&self) -> &str {
		&self.start_symbol
	}

	/// Returns the end sentinel.
	pub fn end_symbol(&self) -> &str {
		&self.end_symbol
	}

	/// Returns the number of distinct symbols observed, sentinels included.
	pub fn vocab_size(&self) -> usize {
		self.vocab.len()
	}

	/// Returns the occurrence count of a full n-gram (0 if never observed).
	pub fn ngram_count(&self, ngram: &[String]) -> usize {
		self.ngrams.get(ngram).copied().unwrap_or(0)
	}

	/// Returns the total occurrences of a context (0 if never observed).
	pub fn context_count(&self, context: &[String]) -> usize {
		self.contexts.get(context).copied().unwrap_or(0)
	}

	/// Trains the estimator on a batch of symbol sequences.
	///
	/// Each sequence is bracketed with the start and end sentinels, then every
	/// window of `n` consecutive symbols increments its n-gram count and the
	/// count of its `n - 1`-symbol context. All symbols enter the vocabulary,
	/// sentinels included.
	///
	/// # Notes
	/// - An empty batch is a no-op, not an error.
	/// - Training is additive: calling twice with the same batch doubles all counts.
	/// - A bracketed sequence shorter than `n` (possible only for `n > 2`) still
	///   grows the vocabulary but records no n-grams.
	pub fn train(&mut self, sequences: &[Vec<String>]) {
		for sequence in sequences {
			let mut symbols = Vec::with_capacity(sequence.len() + 2);
			symbols.push(self.start_symbol.clone());
			symbols.extend(sequence.iter().cloned());
			symbols.push(self.end_symbol.clone());

			self.vocab.extend(symbols.iter().cloned());

			if symbols.len() < self.n {
				// Too short, no windows to count
				continue;
			}

			for window in symbols.windows(self.n) {
				*self.ngrams.entry(window.to_vec()).or_insert(0) += 1;
				*self.contexts.entry(window[..self.n - 1].to_vec()).or_insert(0) += 1;
			}
		}
		tracing::debug!(
			sequences = sequences.len(),
			vocabulary = self.vocab.len(),
			unique_ngrams = self.ngrams.len(),
			"accumulated training batch"
		);
	}

	/// Returns the unsmoothed transition probability of `next_symbol` given `context`.
	///
	/// Computed as `count(context + next_symbol) / total(context)`. The count of
	/// an unobserved continuation is 0, so the result may be 0.0 for a known
	/// context; an *unknown* context is an error instead of a silent division
	/// by zero.
	///
	/// # Errors
	/// - `MalformedInput` if `context` does not hold exactly `n - 1` symbols.
	/// - `NotTrained` if the estimator has an empty vocabulary.
	/// - `UnseenContext` if the context has no recorded occurrences.
	pub fn transition_probability(&self, context: &[String], next_symbol: &str) -> Result<f64> {
		self.check_context(context)?;

		let total = self.context_count(context);
		if total == 0 {
			return Err(ModelError::UnseenContext { context: context.to_vec() });
		}

		let mut ngram = context.to_vec();
		ngram.push(next_symbol.to_owned());

		Ok(self.ngram_count(&ngram) as f64 / total as f64)
	}

	/// Returns, for every observed context, the normalized distribution over
	/// next symbols.
	///
	/// For a fixed context the returned probabilities sum to 1.0 within
	/// floating-point tolerance.
	pub fn normalized_transition_table(&self) -> HashMap<Vec<String>, HashMap<String, f64>> {
		let mut table: HashMap<Vec<String>, HashMap<String, f64>> = HashMap::new();
		for (ngram, count) in &self.ngrams {
			let (context, next) = ngram.split_at(self.n - 1);
			let total = self.context_count(context);
			if total == 0 {
				// Unreachable while the context-sum invariant holds
				continue;
			}
			table
				.entry(context.to_vec())
				.or_default()
				.insert(next[0].clone(), *count as f64 / total as f64);
		}
		table
	}

	/// Returns vocabulary size, total n-gram occurrences and distinct n-gram count.
	pub fn statistics(&self) -> ModelStatistics {
		ModelStatistics {
			vocabulary_size: self.vocab.len(),
			total_ngrams: self.ngrams.values().sum(),
			unique_ngrams: self.ngrams.len(),
		}
	}

	/// Draws a next symbol for `context`, weighted by observed occurrence counts.
	///
	/// The probability of selecting a symbol is proportional to how often it
	/// followed the context in training. This performs an O(unique n-grams)
	/// scan with a cumulative subtraction to select a bucket.
	///
	/// # Errors
	/// Same conditions as [`Self::transition_probability`].
	pub fn sample_next(&self, context: &[String]) -> Result<String> {
		self.check_context(context)?;

		let total = self.context_count(context);
		if total == 0 {
			return Err(ModelError::UnseenContext { context: context.to_vec() });
		}

		// Randomly select a successor
		let mut r = rand::rng().random_range(0..total);

		let mut fallback: Option<&String> = None;
		for (ngram, occurrence) in &self.ngrams {
			if ngram[..self.n - 1] != *context {
				continue;
			}
			let next = &ngram[self.n - 1];
			if r < *occurrence {
				return Ok(next.clone());
			}
			r -= occurrence;
			fallback = Some(next);
		}

		// Fallback: should not happen, but kept for safety.
		fallback
			.cloned()
			.ok_or_else(|| ModelError::UnseenContext { context: context.to_vec() })
	}

	/// Merges another estimator into this one.
	///
	/// Occurrence counts for matching n-grams and contexts are summed and the
	/// vocabularies are united. Intended for combining partial models built
	/// over disjoint corpus chunks.
	///
	/// # Errors
	/// - `OrderMismatch` if the model orders differ.
	/// - `SentinelMismatch` if the bracketing sentinels differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.n != other.n {
			return Err(ModelError::OrderMismatch { expected: self.n, found: other.n });
		}
		if self.start_symbol != other.start_symbol || self.end_symbol != other.end_symbol {
			return Err(ModelError::SentinelMismatch {
				ours: format!("{}..{}", self.start_symbol, self.end_symbol),
				theirs: format!("{}..{}", other.start_symbol, other.end_symbol),
			});
		}

		for (ngram, occurrence) in &other.ngrams {
			*self.ngrams.entry(ngram.clone()).or_insert(0) += occurrence;
		}
		for (context, occurrence) in &other.contexts {
			*self.contexts.entry(context.clone()).or_insert(0) += occurrence;
		}
		self.vocab.extend(other.vocab.iter().cloned());

		Ok(())
	}

	/// Validates a query context: correct length, model trained.
	fn check_context(&self, context: &[String]) -> Result<()> {
		if context.len() != self.n - 1 {
			return Err(ModelError::MalformedInput { expected: self.n - 1, got: context.len() });
		}
		if self.vocab.is_empty() {
			return Err(ModelError::NotTrained);
		}
		Ok(())
	}
}
