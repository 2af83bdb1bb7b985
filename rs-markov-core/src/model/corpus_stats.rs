use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::language_model::LanguageModel;

/// Number of entries reported in each most-common ranking.
const TOP_COMMON: usize = 20;

/// Corpus-level frequency statistics, written alongside the trained models for
/// the serving layer to report.
///
/// Tokenization is the language model's own policy (lowercase, whitespace
/// split, punctuation kept) so these numbers stay comparable with the model's
/// statistics. Serialized as JSON; the rankings serialize as
/// `[["word", count], ...]` pairs.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CorpusStatistics {
	pub total_sentences: usize,
	pub total_words: usize,
	pub most_common_words: Vec<(String, usize)>,
	pub most_common_bigrams: Vec<(String, usize)>,
}

impl CorpusStatistics {
	/// Computes frequency statistics over a sentence corpus.
	///
	/// # Notes
	/// - Bigrams are counted over the flat token stream, so they cross
	///   sentence boundaries; no sentinels are involved here.
	/// - Rankings are sorted by descending count, ties broken alphabetically
	///   for a deterministic artifact.
	pub fn from_sentences(sentences: &[String]) -> Self {
		let mut words = Vec::new();
		for sentence in sentences {
			words.extend(LanguageModel::tokenize(sentence));
		}

		let mut word_counts: HashMap<String, usize> = HashMap::new();
		for word in &words {
			*word_counts.entry(word.clone()).or_insert(0) += 1;
		}

		let mut bigram_counts: HashMap<String, usize> = HashMap::new();
		for pair in words.windows(2) {
			*bigram_counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
		}

		Self {
			total_sentences: sentences.len(),
			total_words: words.len(),
			most_common_words: top_counts(word_counts),
			most_common_bigrams: top_counts(bigram_counts),
		}
	}
}

/// Ranks counts descending (ties alphabetical) and keeps the top entries.
fn top_counts(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
	let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
	entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
	entries.truncate(TOP_COMMON);
	entries
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sentences(texts: &[&str]) -> Vec<String> {
		texts.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn counts_words_and_cross_boundary_bigrams() {
		let stats = CorpusStatistics::from_sentences(&sentences(&["The cat sat", "the dog sat"]));

		assert_eq!(stats.total_sentences, 2);
		assert_eq!(stats.total_words, 6);

		// Counts tie at 2, alphabetical order decides
		assert_eq!(stats.most_common_words[0], ("sat".to_owned(), 2));
		assert_eq!(stats.most_common_words[1], ("the".to_owned(), 2));
		assert!(stats.most_common_words.contains(&("cat".to_owned(), 1)));

		// The flat token stream yields "sat the" across the sentence boundary
		assert!(stats.most_common_bigrams.contains(&("sat the".to_owned(), 1)));
		assert!(stats.most_common_bigrams.contains(&("the cat".to_owned(), 1)));
	}

	#[test]
	fn empty_corpus_yields_zeroes() {
		let stats = CorpusStatistics::from_sentences(&[]);
		assert_eq!(stats.total_sentences, 0);
		assert_eq!(stats.total_words, 0);
		assert!(stats.most_common_words.is_empty());
		assert!(stats.most_common_bigrams.is_empty());
	}

	#[test]
	fn rankings_are_capped_and_deterministic() {
		let corpus: Vec<String> = (0..40).map(|i| format!("w{i:02} w{i:02}")).collect();
		let stats = CorpusStatistics::from_sentences(&corpus);

		assert_eq!(stats.most_common_words.len(), TOP_COMMON);
		// All counts equal, so alphabetical order decides
		assert_eq!(stats.most_common_words[0].0, "w00");

		let again = CorpusStatistics::from_sentences(&corpus);
		assert_eq!(stats, again);
	}

	#[test]
	fn rankings_serialize_as_pairs() {
		let stats = CorpusStatistics::from_sentences(&sentences(&["a b a"]));
		let value = serde_json::to_value(&stats).unwrap();

		assert_eq!(value["total_words"], 3);
		assert_eq!(value["most_common_words"][0][0], "a");
		assert_eq!(value["most_common_words"][0][1], 2);
	}
}
