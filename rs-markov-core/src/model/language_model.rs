use std::path::Path;
use std::sync::mpsc;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::io;
use super::markov_estimator::MarkovEstimator;

/// Sentinel marking the start of a sentence.
pub const START_OF_SENTENCE: &str = "<s>";
/// Sentinel marking the end of a sentence.
pub const END_OF_SENTENCE: &str = "</s>";

/// The language model is a bigram model: one word of context.
pub const BIGRAM_ORDER: usize = 2;

/// Laplace (add-one) smoothing constant: added to every bigram count, with the
/// vocabulary size added to every context total. Fixed policy, not configurable.
const ADD_ONE: f64 = 1.0;

/// Corpus-level summary of a trained language model.
///
/// This is the exact shape the serving layer reports for statistics queries.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LanguageModelStatistics {
	pub vocabulary_size: usize,
	pub total_bigrams: usize,
	pub unique_bigrams: usize,
}

/// Bigram language model with Laplace (add-one) smoothing.
///
/// A thin specialization of [`MarkovEstimator`] fixed at order 2 with the
/// `<s>`/`</s>` sentence sentinels. Sentences are lowercased and split on
/// whitespace; tokens keep any attached punctuation. Callers must apply the
/// same tokenization to get compatible results.
///
/// # Responsibilities
/// - Tokenize sentences and feed them to the underlying estimator
/// - Answer smoothed point probabilities `P(w2 | w1)`
/// - Report vocabulary and bigram summary statistics
/// - Persist and reload its trained state as a snapshot
///
/// # Invariants
/// - Smoothing guarantees every returned probability is strictly positive
///   once the model is trained
/// - Queries never mutate state
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LanguageModel {
	estimator: MarkovEstimator,
}

impl LanguageModel {
	/// Creates a new empty bigram language model.
	pub fn new() -> Self {
		// Cannot fail, the bigram order is always >= 2
		let estimator = MarkovEstimator::new(BIGRAM_ORDER, START_OF_SENTENCE, END_OF_SENTENCE)
			.expect("bigram order is valid");
		Self { estimator }
	}

	/// Splits a sentence into lowercased whitespace-separated tokens.
	///
	/// No punctuation stripping is performed; this is the single tokenization
	/// policy shared by training, queries and corpus statistics.
	pub fn tokenize(sentence: &str) -> Vec<String> {
		sentence.to_lowercase().split_whitespace().map(str::to_owned).collect()
	}

	/// Trains the model on a batch of sentences.
	///
	/// # Notes
	/// - Accumulates: training twice on the same batch doubles all counts.
	/// - An empty or whitespace-only sentence still contributes the bracketed
	///   `(<s>, </s>)` bigram.
	pub fn train(&mut self, sentences: &[String]) {
		let sequences: Vec<Vec<String>> = sentences.iter().map(|s| Self::tokenize(s)).collect();
		self.estimator.train(&sequences);
		tracing::info!(
			sentences = sentences.len(),
			vocabulary = self.estimator.vocab_size(),
			"trained bigram language model"
		);
	}

	/// Builds a model from a corpus by training partial models in parallel
	/// and merging them.
	///
	/// # Behavior
	/// - Splits the sentences into chunks (based on CPU cores * factor).
	/// - Spawns threads to train partial models for each chunk.
	/// - Merges all partial models sequentially on the calling thread.
	///
	/// The final counts are identical to a single sequential pass: counting is
	/// additive, so chunking does not change the result.
	pub fn train_parallel(sentences: Vec<String>) -> Result<Self> {
		if sentences.is_empty() {
			return Ok(Self::new());
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = (sentences.len() + chunks - 1) / chunks;

		let (tx, rx) = mpsc::channel();
		for chunk in sentences.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();

			thread::spawn(move || {
				let mut partial = LanguageModel::new();
				partial.train(&chunk);
				tx.send(partial).expect("Failed to send from thread");
			});
		}
		drop(tx);

		let mut model = Self::new();
		for partial in rx.iter() {
			model.merge(&partial)?;
		}

		Ok(model)
	}

	/// Merges another language model into this one, summing all counts.
	///
	/// # Errors
	/// Returns an error if the underlying estimators are incompatible
	/// (cannot happen for two models built by this type).
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		self.estimator.merge(&other.estimator)
	}

	/// Returns the smoothed probability `P(bigram[1] | bigram[0])`.
	///
	/// Computed as `(count(bigram) + 1) / (count(context) + vocab_size)`. The
	/// additive form is strictly positive for any pair of words, seen or
	/// unseen; an unseen context degrades to `1 / vocab_size`. Words are
	/// lowercased to match the training normalization.
	///
	/// # Errors
	/// - `MalformedInput` if `bigram` does not hold exactly two words.
	/// - `NotTrained` if the model has never been trained.
	pub fn probability(&self, bigram: &[String]) -> Result<f64> {
		if bigram.len() != BIGRAM_ORDER {
			return Err(ModelError::MalformedInput { expected: BIGRAM_ORDER, got: bigram.len() });
		}
		let vocab_size = self.estimator.vocab_size();
		if vocab_size == 0 {
			return Err(ModelError::NotTrained);
		}

		let ngram: Vec<String> = bigram.iter().map(|w| w.to_lowercase()).collect();
		let count = self.estimator.ngram_count(&ngram) as f64;
		let context_count = self.estimator.context_count(&ngram[..1]) as f64;

		Ok((count + ADD_ONE) / (context_count + vocab_size as f64))
	}

	/// Returns vocabulary size and total/unique bigram counts.
	pub fn statistics(&self) -> LanguageModelStatistics {
		let stats = self.estimator.statistics();
		LanguageModelStatistics {
			vocabulary_size: stats.vocabulary_size,
			total_bigrams: stats.total_ngrams,
			unique_bigrams: stats.unique_ngrams,
		}
	}

	/// Returns the number of distinct words observed, sentinels included.
	pub fn vocab_size(&self) -> usize {
		self.estimator.vocab_size()
	}

	/// Writes the trained state to a snapshot file.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		io::save_snapshot(path, &self.estimator)
	}

	/// Reconstructs a model from a snapshot file.
	///
	/// Either a fully consistent model is returned or the load fails outright;
	/// no partially-loaded model is ever exposed.
	///
	/// # Errors
	/// - `OrderMismatch` if the snapshot was produced by a non-bigram model.
	/// - `SentinelMismatch` if the snapshot does not use the sentence sentinels
	///   (e.g. a tag-transition snapshot).
	/// - `Io`/`Codec` if the file is missing or corrupt.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let estimator = io::load_snapshot(path, BIGRAM_ORDER)?;
		if estimator.start_symbol() != START_OF_SENTENCE || estimator.end_symbol() != END_OF_SENTENCE {
			return Err(ModelError::SentinelMismatch {
				ours: format!("{START_OF_SENTENCE}..{END_OF_SENTENCE}"),
				theirs: format!("{}..{}", estimator.start_symbol(), estimator.end_symbol()),
			});
		}
		tracing::info!(vocabulary = estimator.vocab_size(), "loaded language model snapshot");
		Ok(Self { estimator })
	}
}

impl Default for LanguageModel {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	fn sentences(texts: &[&str]) -> Vec<String> {
		texts.iter().map(|s| s.to_string()).collect()
	}

	fn bigram(w1: &str, w2: &str) -> Vec<String> {
		vec![w1.to_owned(), w2.to_owned()]
	}

	fn trained() -> LanguageModel {
		let mut lm = LanguageModel::new();
		lm.train(&sentences(&["the cat sat", "the dog sat"]));
		lm
	}

	fn temp_path(name: &str) -> PathBuf {
		std::env::temp_dir().join(format!("rs-markov-{}-{name}", std::process::id()))
	}

	#[test]
	fn two_sentence_corpus_probabilities() {
		let lm = trained();

		// <s>, the, cat, sat, </s>, dog
		assert_eq!(lm.vocab_size(), 6);

		// "the" occurs twice as a context: (1 + 1) / (2 + 6)
		assert_eq!(lm.probability(&bigram("the", "cat")).unwrap(), 0.25);
		assert_eq!(lm.probability(&bigram("the", "dog")).unwrap(), 0.25);

		let stats = lm.statistics();
		assert_eq!(stats.vocabulary_size, 6);
		// 4 bigrams per bracketed sentence
		assert_eq!(stats.total_bigrams, 8);
		// (<s> the) and (sat </s>) are shared between the two sentences
		assert_eq!(stats.unique_bigrams, 6);
	}

	#[test]
	fn untrained_model_rejects_queries() {
		let lm = LanguageModel::new();
		let stats = lm.statistics();
		assert_eq!(stats.vocabulary_size, 0);
		assert_eq!(stats.total_bigrams, 0);
		assert_eq!(stats.unique_bigrams, 0);

		assert!(matches!(
			lm.probability(&bigram("the", "cat")),
			Err(ModelError::NotTrained)
		));
	}

	#[test]
	fn smoothing_keeps_every_probability_positive() {
		let lm = trained();

		// Seen context, unseen continuation: 1 / (1 + 6)
		let p = lm.probability(&bigram("cat", "the")).unwrap();
		assert_eq!(p, 1.0 / 7.0);

		// Unseen context degrades to 1 / vocab_size
		let p = lm.probability(&bigram("zebra", "cat")).unwrap();
		assert_eq!(p, 1.0 / 6.0);
		assert!(p > 0.0);
	}

	#[test]
	fn queries_are_lowercased_like_training() {
		let lm = trained();
		assert_eq!(
			lm.probability(&bigram("The", "CAT")).unwrap(),
			lm.probability(&bigram("the", "cat")).unwrap()
		);
	}

	#[test]
	fn malformed_bigrams_are_rejected() {
		let lm = trained();
		assert!(matches!(
			lm.probability(&["the".to_owned()]),
			Err(ModelError::MalformedInput { expected: 2, got: 1 })
		));
		assert!(matches!(
			lm.probability(&[]),
			Err(ModelError::MalformedInput { expected: 2, got: 0 })
		));
	}

	#[test]
	fn training_twice_doubles_counts() {
		let corpus = sentences(&["the cat sat"]);
		let mut lm = LanguageModel::new();
		lm.train(&corpus);
		let once = lm.statistics();
		lm.train(&corpus);
		let twice = lm.statistics();

		assert_eq!(twice.total_bigrams, 2 * once.total_bigrams);
		assert_eq!(twice.unique_bigrams, once.unique_bigrams);
		assert_eq!(twice.vocabulary_size, once.vocabulary_size);
	}

	#[test]
	fn empty_sentence_contributes_sentinel_bigram() {
		let mut lm = LanguageModel::new();
		lm.train(&sentences(&["   "]));

		assert_eq!(lm.vocab_size(), 2);
		assert_eq!(lm.statistics().total_bigrams, 1);
	}

	#[test]
	fn parallel_training_matches_sequential() {
		let corpus = sentences(&[
			"the cat sat on the mat",
			"the dog sat",
			"a cat and a dog",
			"the mat sat still",
		]);

		let mut sequential = LanguageModel::new();
		sequential.train(&corpus);
		let parallel = LanguageModel::train_parallel(corpus).unwrap();

		assert_eq!(sequential.statistics(), parallel.statistics());
		assert_eq!(
			sequential.probability(&bigram("the", "cat")).unwrap(),
			parallel.probability(&bigram("the", "cat")).unwrap()
		);
	}

	#[test]
	fn snapshot_round_trip_preserves_queries() {
		let lm = trained();
		let path = temp_path("lm-roundtrip.bin");

		lm.save(&path).unwrap();
		let reloaded = LanguageModel::load(&path).unwrap();
		std::fs::remove_file(&path).ok();

		assert_eq!(lm.statistics(), reloaded.statistics());
		assert_eq!(
			lm.probability(&bigram("the", "cat")).unwrap(),
			reloaded.probability(&bigram("the", "cat")).unwrap()
		);
	}

	#[test]
	fn snapshot_of_wrong_order_is_rejected() {
		let mut trigram =
			MarkovEstimator::new(3, START_OF_SENTENCE, END_OF_SENTENCE).unwrap();
		trigram.train(&[vec!["the".to_owned(), "cat".to_owned(), "sat".to_owned()]]);

		let path = temp_path("lm-trigram.bin");
		io::save_snapshot(&path, &trigram).unwrap();
		let result = LanguageModel::load(&path);
		std::fs::remove_file(&path).ok();

		assert!(matches!(
			result,
			Err(ModelError::OrderMismatch { expected: 2, found: 3 })
		));
	}

	#[test]
	fn missing_snapshot_is_an_io_error() {
		let result = LanguageModel::load(temp_path("lm-missing.bin"));
		assert!(matches!(result, Err(ModelError::Io(_))));
	}
}
